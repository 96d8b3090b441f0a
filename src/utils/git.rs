//! Discovery of git metadata (org, repo, commit) for the current checkout.

use git2::Repository;
use log::{debug, info, warn};
use std::path::Path;

/// Git coordinates detected from a working tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitInfo {
    pub org: Option<String>,
    pub repo: Option<String>,
    pub commit: Option<String>,
}

/// Split a remote URL into `(org, repo)`.
///
/// Handles scp-like (`git@github.com:org/repo.git`) and https remotes,
/// with or without the `.git` suffix.
pub fn remote_to_org_repo(remote: &str) -> (String, String) {
    let remote = remote.trim();
    let remote = remote.strip_suffix(".git").unwrap_or(remote);

    let (owner_part, repo) = match remote.rfind('/') {
        Some(idx) => (&remote[..idx], &remote[idx + 1..]),
        None => ("", remote),
    };

    let org = match owner_part.rfind(['/', ':']) {
        Some(idx) => &owner_part[idx + 1..],
        None => owner_part,
    };

    (org.to_string(), repo.to_string())
}

/// First `ndigits` characters of a commit hash (the whole hash if shorter)
pub fn short_hash(hash: &str, ndigits: usize) -> &str {
    match hash.char_indices().nth(ndigits) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}

/// Detect org, repo and HEAD commit of the repository containing `dir`.
///
/// Missing pieces are left as `None`; the caller decides whether they are
/// required.
pub fn detect_git_info(dir: &Path) -> GitInfo {
    let repo = match Repository::discover(dir) {
        Ok(repo) => repo,
        Err(e) => {
            debug!("No git repository at {}: {}", dir.display(), e.message());
            warn!("Unable to retrieve current repo git info. Use --git-org, --git-repo and --git-hash to fill it in.");
            return GitInfo::default();
        }
    };

    let commit = head_commit(&repo);
    let (org, repo_name) = match first_remote_url(&repo) {
        Some(url) => {
            let (org, repo_name) = remote_to_org_repo(&url);
            (non_empty(org), non_empty(repo_name))
        }
        None => (None, None),
    };

    let info = GitInfo {
        org,
        repo: repo_name,
        commit,
    };
    if info.commit.is_none() {
        warn!("Unable to retrieve current repo git info. Use --git-org, --git-repo and --git-hash to fill it in.");
    } else {
        info!(
            "Detected git info org={} repo={} hash={}",
            info.org.as_deref().unwrap_or("?"),
            info.repo.as_deref().unwrap_or("?"),
            info.commit.as_deref().map(|c| short_hash(c, 7)).unwrap_or("?")
        );
    }
    info
}

fn head_commit(repo: &Repository) -> Option<String> {
    match repo.head().and_then(|head| head.peel_to_commit()) {
        Ok(commit) => Some(commit.id().to_string()),
        Err(e) => {
            debug!("Cannot resolve HEAD: {}", e.message());
            None
        }
    }
}

/// URL of the first configured remote
fn first_remote_url(repo: &Repository) -> Option<String> {
    let remotes = repo
        .remotes()
        .map_err(|e| debug!("Cannot list remotes: {}", e.message()))
        .ok()?;
    let name = remotes.iter().flatten().next()?;

    let remote = repo
        .find_remote(name)
        .map_err(|e| debug!("Cannot read remote {}: {}", name, e.message()))
        .ok()?;
    remote.url().map(str::to_string)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
