//! Decode pprof protobuf profiles into weighted call stacks.
//!
//! Only the parts of `profile.proto` needed to rebuild call stacks are
//! declared; prost skips every other field. Profiles written by the Go
//! runtime and by `go tool pprof -proto` are gzip-compressed, raw protobuf is
//! accepted as well.
//!
//! Samples whose stacks resolve to the same function names are merged (every
//! value dimension summed), then the stacks are sorted by descending weight.
//! Equal weights keep first-seen order.

use crate::aggregator::stack::{Frame, WeightedCallStack};
use crate::utils::error::ProfileError;
use flate2::read::GzDecoder;
use log::debug;
use prost::Message;
use std::collections::HashMap;
use std::io::Read;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Clone, PartialEq, Message)]
pub struct PprofProfile {
    #[prost(message, repeated, tag = "2")]
    pub sample: Vec<PprofSample>,
    #[prost(message, repeated, tag = "4")]
    pub location: Vec<PprofLocation>,
    #[prost(message, repeated, tag = "5")]
    pub function: Vec<PprofFunction>,
    #[prost(string, repeated, tag = "6")]
    pub string_table: Vec<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct PprofSample {
    /// Leaf first
    #[prost(uint64, repeated, tag = "1")]
    pub location_id: Vec<u64>,
    #[prost(int64, repeated, tag = "2")]
    pub value: Vec<i64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct PprofLocation {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    /// Innermost inlined function first
    #[prost(message, repeated, tag = "4")]
    pub line: Vec<PprofLine>,
}

#[derive(Clone, PartialEq, Message)]
pub struct PprofLine {
    #[prost(uint64, tag = "1")]
    pub function_id: u64,
    #[prost(int64, tag = "2")]
    pub line: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct PprofFunction {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    /// Index into the string table
    #[prost(int64, tag = "2")]
    pub name: i64,
}

/// Decode a (possibly gzip-compressed) pprof profile
pub fn decode_profile(data: &[u8]) -> Result<PprofProfile, ProfileError> {
    if data.starts_with(&GZIP_MAGIC) {
        let mut raw = Vec::new();
        GzDecoder::new(data).read_to_end(&mut raw)?;
        debug!("Decompressed profile: {} -> {} bytes", data.len(), raw.len());
        Ok(PprofProfile::decode(raw.as_slice())?)
    } else {
        Ok(PprofProfile::decode(data)?)
    }
}

/// Decode a profile and turn it into merged, weight-sorted call stacks
pub fn parse_profile(data: &[u8]) -> Result<Vec<WeightedCallStack>, ProfileError> {
    let profile = decode_profile(data)?;
    profile_to_stacks(&profile)
}

/// Resolve, merge and sort the samples of a decoded profile
pub fn profile_to_stacks(profile: &PprofProfile) -> Result<Vec<WeightedCallStack>, ProfileError> {
    let functions: HashMap<u64, &str> = profile
        .function
        .iter()
        .map(|f| (f.id, string_at(&profile.string_table, f.name)))
        .collect();

    let mut locations: HashMap<u64, Frame> = HashMap::with_capacity(profile.location.len());
    for loc in &profile.location {
        let names = loc
            .line
            .iter()
            .map(|line| {
                functions
                    .get(&line.function_id)
                    .map(|name| name.to_string())
                    .ok_or(ProfileError::UnknownFunction(line.function_id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        locations.insert(loc.id, Frame::new(names));
    }

    let mut stacks: Vec<WeightedCallStack> = Vec::new();
    let mut seen: HashMap<Vec<Frame>, usize> = HashMap::new();

    for sample in &profile.sample {
        let frames = sample
            .location_id
            .iter()
            .map(|id| {
                locations
                    .get(id)
                    .cloned()
                    .ok_or(ProfileError::UnknownLocation(*id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match seen.get(&frames) {
            Some(&idx) => add_values(&mut stacks[idx].values, &sample.value),
            None => {
                seen.insert(frames.clone(), stacks.len());
                stacks.push(WeightedCallStack::new(frames, sample.value.clone()));
            }
        }
    }

    debug!(
        "Merged {} samples into {} unique stacks",
        profile.sample.len(),
        stacks.len()
    );

    // stable: equal weights keep first-seen order
    stacks.sort_by(|a, b| b.weight().cmp(&a.weight()));
    Ok(stacks)
}

fn add_values(total: &mut Vec<i64>, values: &[i64]) {
    if total.len() < values.len() {
        total.resize(values.len(), 0);
    }
    for (t, v) in total.iter_mut().zip(values) {
        *t = t.saturating_add(*v);
    }
}

fn string_at(table: &[String], index: i64) -> &str {
    usize::try_from(index)
        .ok()
        .and_then(|i| table.get(i))
        .map(String::as_str)
        .unwrap_or("")
}
