//! Collector URL layout.
//!
//! Uploads go to `{api}/v1/gh/{org}/{repo}/commit/{commit}/bench/{bench}/cpu/{artifact}`
//! and results are browsable at `{site}/gh/{org}/{repo}/commit/{commit}/bench/{bench}/cpu`.

use crate::utils::config::ExportConfig;

/// Artifact name of the call tree upload
pub const FLAMEGRAPH_ARTIFACT: &str = "flamegraph";

/// Identifies the benchmark run a profile belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchCoordinates {
    pub org: String,
    pub repo: String,
    pub commit: String,
    pub bench: String,
}

impl BenchCoordinates {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            org: config.git_org.clone(),
            repo: config.git_repo.clone(),
            commit: config.git_commit.clone(),
            bench: config.bench.clone(),
        }
    }

    fn path(&self) -> String {
        format!(
            "gh/{}/{}/commit/{}/bench/{}/cpu",
            self.org, self.repo, self.commit, self.bench
        )
    }
}

/// Upload endpoint for one artifact (`flamegraph`, `lines`, `functions`)
pub fn upload_url(api_url: &str, coords: &BenchCoordinates, artifact: &str) -> String {
    format!(
        "{}/v1/{}/{}",
        api_url.trim_end_matches('/'),
        coords.path(),
        artifact
    )
}

/// Page where the uploaded profile can be viewed
pub fn result_url(site_url: &str, coords: &BenchCoordinates) -> String {
    format!("{}/{}", site_url.trim_end_matches('/'), coords.path())
}
