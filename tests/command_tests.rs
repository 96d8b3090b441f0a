use pprof_exporter::commands::benchmarks::find_benchmarks;
use pprof_exporter::commands::{run_export, ArtifactSink};
use pprof_exporter::driver::{Granularity, ProfileRenderer};
use pprof_exporter::output::{read_call_tree, read_report};
use pprof_exporter::parser::pprof::{
    PprofFunction, PprofLine, PprofLocation, PprofProfile, PprofSample,
};
use pprof_exporter::utils::config::{parse_config, ExportConfig, PartialConfig};
use pprof_exporter::utils::error::DriverError;
use pprof_exporter::utils::git::{detect_git_info, remote_to_org_repo, short_hash, GitInfo};
use git2::{Repository, Signature};
use pretty_assertions::assert_eq;
use prost::Message;
use std::path::Path;

/// Renderer returning canned pprof output
struct FakePprof {
    functions_report: String,
}

const LINES_REPORT: &str = "\
Type: cpu
Duration: 1s
Showing nodes accounting for 20ms, 100% of 20ms total
Dropped 0 nodes
      flat  flat%   sum%        cum   cum%
      flat  flat%   sum%        cum   cum%
      15ms 75.00% 75.00%       20ms   100%  main.work /src/main.go:12
       5ms 25.00%   100%        5ms 25.00%  main.main /src/main.go:5
";

impl FakePprof {
    fn new() -> Self {
        Self {
            functions_report: LINES_REPORT.replace(" /src/main.go:12", "").replace(" /src/main.go:5", ""),
        }
    }
}

impl ProfileRenderer for FakePprof {
    fn render_proto(&self, _profile: &Path) -> Result<Vec<u8>, DriverError> {
        let profile = PprofProfile {
            string_table: vec![String::new(), "main.main".into(), "main.work".into()],
            function: vec![
                PprofFunction { id: 1, name: 1 },
                PprofFunction { id: 2, name: 2 },
            ],
            location: vec![
                PprofLocation {
                    id: 1,
                    line: vec![PprofLine { function_id: 1, line: 5 }],
                },
                PprofLocation {
                    id: 2,
                    line: vec![PprofLine { function_id: 2, line: 12 }],
                },
            ],
            sample: vec![
                PprofSample { location_id: vec![2, 1], value: vec![15] },
                PprofSample { location_id: vec![1], value: vec![5] },
            ],
        };
        Ok(profile.encode_to_vec())
    }

    fn render_text(&self, _profile: &Path, granularity: Granularity) -> Result<String, DriverError> {
        Ok(match granularity {
            Granularity::Lines => LINES_REPORT.to_string(),
            Granularity::Functions => self.functions_report.clone(),
        })
    }
}

fn local_config(dir: &Path) -> ExportConfig {
    PartialConfig {
        bench: Some("BenchmarkWork".into()),
        local: Some(true),
        local_filename: Some(dir.join("profile.json")),
        ..Default::default()
    }
    .resolve(&GitInfo::default())
}

#[test]
fn test_local_export_writes_all_artifacts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = local_config(temp_dir.path());
    let sink = ArtifactSink::from_config(&config).unwrap();

    let summary = run_export(&FakePprof::new(), &sink, Path::new("cpu.out"), &config);

    assert!(summary.is_success(), "{}", summary);
    assert_eq!(summary.delivered_names(), vec!["flamegraph", "lines", "functions"]);

    let tree = read_call_tree(temp_dir.path().join("profile.flamegraph.json")).unwrap();
    assert_eq!(tree.cumulative_weight, 20);
    assert_eq!(tree.find_path(&["main", "work"]).unwrap().cumulative_weight, 15);

    let lines = read_report(temp_dir.path().join("profile.lines.json")).unwrap();
    assert_eq!(lines.total_rows, 2);
    assert_eq!(lines.items[0].symbol, "main.work /src/main.go:12");
    assert_eq!(lines.items[0].cum_percent, "100%");

    let functions = read_report(temp_dir.path().join("profile.functions.json")).unwrap();
    assert_eq!(functions.items[1].symbol, "main.main");
}

#[test]
fn test_malformed_report_does_not_stop_other_artifacts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = local_config(temp_dir.path());
    let sink = ArtifactSink::from_config(&config).unwrap();
    let renderer = FakePprof {
        functions_report: "Type: cpu\n".to_string(),
    };

    let summary = run_export(&renderer, &sink, Path::new("cpu.out"), &config);

    assert!(!summary.is_success());
    assert_eq!(summary.delivered_names(), vec!["flamegraph", "lines"]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].artifact, "functions");
    assert!(summary.failed[0].error.contains("Malformed report"));
    assert!(!temp_dir.path().join("profile.functions.json").exists());
}

#[test]
fn test_folded_stacks_written_alongside_artifacts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let folded_path = temp_dir.path().join("out/cpu.folded");
    let mut config = local_config(temp_dir.path());
    config.folded_output = Some(folded_path.clone());
    let sink = ArtifactSink::from_config(&config).unwrap();

    let summary = run_export(&FakePprof::new(), &sink, Path::new("cpu.out"), &config);

    assert!(summary.is_success(), "{}", summary);
    assert_eq!(
        summary.delivered_names(),
        vec!["flamegraph", "folded", "lines", "functions"]
    );
    assert_eq!(
        std::fs::read_to_string(&folded_path).unwrap(),
        "main.main;main.work 15\nmain.main 5\n"
    );
}

#[test]
fn test_only_requested_granularities_are_exported() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = local_config(temp_dir.path());
    config.granularities = vec![Granularity::Functions];
    let sink = ArtifactSink::from_config(&config).unwrap();

    let summary = run_export(&FakePprof::new(), &sink, Path::new("cpu.out"), &config);

    assert_eq!(summary.delivered_names(), vec!["flamegraph", "functions"]);
}

#[test]
fn test_config_validation() {
    assert!(ExportConfig::default().validate().is_err(), "bench is required");

    let local = local_config(Path::new("/tmp"));
    assert!(local.validate().is_ok());

    // remote mode needs the git coordinates
    let mut remote = local.clone();
    remote.local = false;
    assert!(remote.validate().is_err());

    remote.git_org = "codeperfio".into();
    remote.git_repo = "example-go".into();
    remote.git_commit = "1e872b5".into();
    assert!(remote.validate().is_ok());

    remote.node_fraction = 1.5;
    assert!(remote.validate().is_err());
}

#[test]
fn test_parse_config_file() {
    let config = parse_config(
        r#"
bench = "BenchmarkFib"
git-org = "codeperfio"
local = true
granularities = ["functions"]
node-fraction = 0.1
"#,
    )
    .unwrap();

    assert_eq!(config.bench.as_deref(), Some("BenchmarkFib"));
    assert_eq!(config.git_org.as_deref(), Some("codeperfio"));
    assert_eq!(config.local, Some(true));
    assert_eq!(config.granularities, Some(vec![Granularity::Functions]));
    assert_eq!(config.node_fraction, Some(0.1));

    assert!(parse_config("unknown-key = 1").is_err());
}

#[test]
fn test_remote_to_org_repo() {
    let cases = [
        ("git@github.com:codeperfio/pprof-exporter.git", "codeperfio", "pprof-exporter"),
        ("git@github.com:codeperfio/pprof-exporter", "codeperfio", "pprof-exporter"),
        ("github.com:codeperfio/pprof-exporter", "codeperfio", "pprof-exporter"),
        ("git@github.com:codeperfio/example-go.git", "codeperfio", "example-go"),
        ("https://github.com/codeperfio/example-go.git", "codeperfio", "example-go"),
        ("https://github.com/codeperfio/example-go", "codeperfio", "example-go"),
    ];

    for (remote, org, repo) in cases {
        assert_eq!(
            remote_to_org_repo(remote),
            (org.to_string(), repo.to_string()),
            "remote: {}",
            remote
        );
    }
}

#[test]
fn test_short_hash() {
    let hash = "1e872b59013425b7c404a91d16119e8452b983f2";
    assert_eq!(short_hash("a", 10), "a");
    assert_eq!(short_hash(hash, 7), "1e872b5");
    assert_eq!(short_hash(hash, 4), "1e87");
}

#[test]
fn test_detect_git_info_from_repository() {
    let temp_dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();
    repo.remote("origin", "git@github.com:codeperfio/example-go.git")
        .unwrap();

    // No commit yet: org and repo come from the remote, no hash
    let info = detect_git_info(temp_dir.path());
    assert_eq!(info.org.as_deref(), Some("codeperfio"));
    assert_eq!(info.repo.as_deref(), Some("example-go"));
    assert_eq!(info.commit, None);

    let signature = Signature::now("dev", "dev@example.com").unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let commit_id = repo
        .commit(Some("HEAD"), &signature, &signature, "init", &tree, &[])
        .unwrap();

    std::fs::create_dir_all(temp_dir.path().join("pkg")).unwrap();
    let info = detect_git_info(&temp_dir.path().join("pkg"));
    assert_eq!(
        info,
        GitInfo {
            org: Some("codeperfio".into()),
            repo: Some("example-go".into()),
            commit: Some(commit_id.to_string()),
        }
    );
}

#[test]
fn test_find_benchmarks() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    std::fs::create_dir_all(root.join("pkg/fib")).unwrap();
    std::fs::write(
        root.join("pkg/fib/fib_test.go"),
        "package fib\n\nfunc BenchmarkFib10(b *testing.B) {}\nfunc TestFib(t *testing.T) {}\n",
    )
    .unwrap();
    std::fs::write(
        root.join("a_test.go"),
        "package main\n\nfunc BenchmarkMain(b *testing.B) {}\n",
    )
    .unwrap();
    std::fs::write(
        root.join("main.go"),
        "package main\n\nfunc BenchmarkNotATest(b *testing.B) {}\n",
    )
    .unwrap();

    let found = find_benchmarks(root).unwrap();
    assert_eq!(found, vec!["BenchmarkMain", "BenchmarkFib10"]);
}
