use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use git2::{Cred, CredentialType, Repository as Git2Repo};

use crate::config::GitConfig;
use crate::domain::Version;
use crate::error::{Result, TaggitError};
use crate::git::{TagCreator, TagLister, TagPublisher};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    remote: String,
    timeout: Duration,
}

impl Git2Repository {
    /// Open or discover a git repository, publishing to `remote`
    pub fn open<P: AsRef<Path>>(path: P, remote: impl Into<String>) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(Git2Repository::from_git2(repo, remote))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo, remote: impl Into<String>) -> Self {
        Git2Repository {
            repo,
            remote: remote.into(),
            timeout: GitConfig::default().timeout(),
        }
    }

    /// Bound on how long a push may take before it is abandoned
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

type CredResult = std::result::Result<Cred, git2::Error>;

/// Credential callback for push: SSH keys from ~/.ssh, then the SSH agent,
/// then whatever libgit2 finds by default.
///
/// libgit2 calls back again for as long as authentication fails, so only the
/// first request is answered and later ones end the push with an error.
fn credentials() -> impl FnMut(&str, Option<&str>, CredentialType) -> CredResult {
    let mut attempted = false;
    move |_url, username_from_url, allowed_types| {
        if std::mem::replace(&mut attempted, true) {
            return Err(git2::Error::from_str("authentication failed"));
        }
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        Cred::default()
    }
}

/// Push `refs/tags/<name>` to `remote_name` using a fresh handle on the
/// repository at `path`.
fn push_tag(path: &Path, remote_name: &str, name: &str) -> Result<()> {
    let repo = Git2Repo::open(path)
        .map_err(|e| TaggitError::remote(format!("Cannot open repository: {}", e)))?;
    let mut remote = repo.find_remote(remote_name).map_err(|e| {
        TaggitError::remote(format!("Cannot find remote '{}': {}", remote_name, e))
    })?;

    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(credentials());
    // A rejected ref does not fail `push` itself; surface it here.
    callbacks.push_update_reference(|refname, status| match status {
        Some(status) => Err(git2::Error::from_str(&format!(
            "remote rejected {}: {}",
            refname, status
        ))),
        None => Ok(()),
    });

    let mut push_options = git2::PushOptions::new();
    push_options.remote_callbacks(callbacks);

    let refspec = format!("refs/tags/{}:refs/tags/{}", name, name);
    remote
        .push(&[refspec.as_str()], Some(&mut push_options))
        .map_err(|e| match e.class() {
            git2::ErrorClass::Net => {
                TaggitError::remote(format!("Network error during push: {}", e))
            }
            _ => TaggitError::remote(format!(
                "Failed to push tag '{}' to '{}': {}",
                name, remote_name, e
            )),
        })
}

impl TagLister for Git2Repository {
    fn list_tags(&self) -> Result<String> {
        let tags = self
            .repo
            .tag_names(None)
            .map_err(|e| TaggitError::list(format!("Cannot list tags: {}", e)))?;

        let names: Vec<&str> = tags.iter().flatten().collect();
        tracing::debug!(count = names.len(), "listed tags via libgit2");
        Ok(names.join("\n"))
    }
}

impl TagCreator for Git2Repository {
    fn create_tag(&self, version: &Version) -> Result<()> {
        let name = version.to_string();
        let head = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| TaggitError::tag(format!("Cannot resolve HEAD: {}", e)))?;

        self.repo
            .tag_lightweight(&name, head.as_object(), false)
            .map_err(|e| TaggitError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        tracing::info!(tag = %name, commit = %head.id(), "created tag");
        Ok(())
    }
}

impl TagPublisher for Git2Repository {
    fn publish(&self, version: &Version) -> Result<()> {
        let name = version.to_string();

        // libgit2 has no push deadline, so the push runs on a worker thread
        // that is abandoned once the timeout passes.
        let (tx, rx) = mpsc::channel();
        let path = self.repo.path().to_path_buf();
        let remote = self.remote.clone();
        let tag = name.clone();
        thread::spawn(move || {
            let _ = tx.send(push_tag(&path, &remote, &tag));
        });

        match rx.recv_timeout(self.timeout) {
            Ok(pushed) => pushed?,
            Err(RecvTimeoutError::Timeout) => {
                let command = format!("push {} {}", self.remote, name);
                tracing::warn!(%command, "push timed out");
                return Err(TaggitError::Timeout {
                    command,
                    seconds: self.timeout.as_secs(),
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(TaggitError::remote(format!(
                    "Push of tag '{}' to '{}' aborted",
                    name, self.remote
                )));
            }
        }

        tracing::info!(tag = %name, remote = %self.remote, "published tag");
        Ok(())
    }
}
