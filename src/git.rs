use std::process::Command;

use url::Url;

use crate::error::{CircleError, Result};

/// Organization and project a git remote points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProject {
    pub host: String,
    pub org: String,
    pub project: String,
}

fn git(args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CircleError::Git(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Name of the branch checked out in the working directory.
pub fn current_branch() -> Result<String> {
    let branch = git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
    if branch == "HEAD" {
        return Err(CircleError::Git(
            "HEAD is detached, pass a branch name explicitly".to_string(),
        ));
    }
    Ok(branch)
}

/// Full hash of the tip of `branch`. Fails if the branch does not exist.
pub fn tip(branch: &str) -> Result<String> {
    git(&["rev-parse", "--verify", &format!("{branch}^{{commit}}")])
}

/// Identity of the project behind the named remote.
pub fn remote_project(remote: &str) -> Result<RemoteProject> {
    let url = git(&["remote", "get-url", remote])?;
    parse_remote_url(&url)
}

/// Parses `git@host:org/project.git`, `https://host/org/project(.git)` and
/// `ssh://git@host/org/project` remotes.
pub fn parse_remote_url(remote: &str) -> Result<RemoteProject> {
    let invalid = || CircleError::Git(format!("Could not parse remote URL {remote}"));

    let (host, path) = match Url::parse(remote) {
        Ok(url) if url.has_host() => (
            url.host_str().unwrap_or_default().to_string(),
            url.path().to_string(),
        ),
        _ => {
            // scp-like syntax: [user@]host:path
            let (authority, path) = remote.split_once(':').ok_or_else(invalid)?;
            let host = authority.rsplit('@').next().unwrap_or(authority);
            (host.to_string(), path.to_string())
        }
    };

    let mut parts = path.trim_matches('/').rsplitn(2, '/');
    let project = parts.next().unwrap_or_default().trim_end_matches(".git");
    let org = parts.next().unwrap_or_default();
    if host.is_empty() || org.is_empty() || project.is_empty() {
        return Err(invalid());
    }

    Ok(RemoteProject {
        host,
        org: org.to_string(),
        project: project.to_string(),
    })
}
