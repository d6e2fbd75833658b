//! Git access by spawning the `git` executable.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

use crate::domain::Version;
use crate::error::{Result, TaggitError};
use crate::git::{TagCreator, TagLister, TagPublisher};

/// Executes git commands.
pub trait GitCmd {
    /// Run git with `args`, returning its combined output.
    ///
    /// Fails if the process cannot be spawned, exits unsuccessfully, or does
    /// not finish (output included) within `timeout`, in which case it is
    /// killed.
    fn run(&self, args: &[&str], timeout: Duration) -> Result<String>;
}

/// [`GitCmd`] backed by a real executable on disk.
#[derive(Debug, Clone)]
pub struct ProcessCmd {
    executable: String,
}

impl ProcessCmd {
    pub fn new(executable: impl Into<String>) -> Self {
        ProcessCmd {
            executable: executable.into(),
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        std::iter::once(self.executable.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

const STDOUT: usize = 0;
const STDERR: usize = 1;

/// Read `pipe` to its end on a background thread and send the bytes, tagged
/// with `stream`, over `tx`.
fn drain<R>(pipe: Option<R>, stream: usize, tx: Sender<(usize, Vec<u8>)>)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send((stream, buf));
    });
}

fn timed_out(command: String, timeout: Duration) -> TaggitError {
    tracing::warn!(%command, "subprocess timed out");
    TaggitError::Timeout {
        command,
        seconds: timeout.as_secs(),
    }
}

/// Exit status of `child` given the result of waiting on it.
///
/// Unless the child exited on its own it is killed and reaped before the
/// error is returned.
fn settle(
    child: &mut Child,
    waited: io::Result<Option<ExitStatus>>,
    command: String,
    timeout: Duration,
) -> Result<ExitStatus> {
    match waited {
        Ok(Some(status)) => Ok(status),
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            Err(timed_out(command, timeout))
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            Err(e.into())
        }
    }
}

impl GitCmd for ProcessCmd {
    fn run(&self, args: &[&str], timeout: Duration) -> Result<String> {
        let command = self.describe(args);
        tracing::debug!(%command, ?timeout, "running subprocess");
        let deadline = Instant::now() + timeout;

        // The environment is inherited so credential helpers and ssh agents work.
        let mut child = Command::new(&self.executable)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TaggitError::Command {
                command: command.clone(),
                output: e.to_string(),
            })?;

        // Drain both pipes concurrently so a chatty child cannot block on a full pipe.
        let (tx, rx) = mpsc::channel();
        drain(child.stdout.take(), STDOUT, tx.clone());
        drain(child.stderr.take(), STDERR, tx);

        let waited = child.wait_timeout(timeout);
        let status = settle(&mut child, waited, command.clone(), timeout)?;

        // A grandchild holding the pipes open keeps them from closing after
        // the child exits; the same deadline bounds reading them.
        let mut buffers: [Option<Vec<u8>>; 2] = [None, None];
        while buffers.iter().any(Option::is_none) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((stream, buf)) => buffers[stream] = Some(buf),
                Err(RecvTimeoutError::Timeout) => return Err(timed_out(command, timeout)),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let [stdout, stderr] = buffers;
        let mut output = stdout.unwrap_or_default();
        output.extend(stderr.unwrap_or_default());
        let output = String::from_utf8_lossy(&output).into_owned();

        if !status.success() {
            tracing::debug!(%command, %status, "subprocess failed");
            return Err(TaggitError::Command {
                command,
                output: output.trim_end().to_string(),
            });
        }
        Ok(output)
    }
}

/// Repository operations expressed as git subcommands.
pub struct CommandRepository<C: GitCmd> {
    cmd: C,
    remote: String,
    timeout: Duration,
}

impl<C: GitCmd> CommandRepository<C> {
    pub fn new(cmd: C, remote: impl Into<String>, timeout: Duration) -> Self {
        CommandRepository {
            cmd,
            remote: remote.into(),
            timeout,
        }
    }
}

impl<C: GitCmd> TagLister for CommandRepository<C> {
    fn list_tags(&self) -> Result<String> {
        self.cmd
            .run(&["tag", "--list"], self.timeout)
            .map_err(|e| TaggitError::list(e.to_string()))
    }
}

impl<C: GitCmd> TagCreator for CommandRepository<C> {
    fn create_tag(&self, version: &Version) -> Result<()> {
        let name = version.to_string();
        self.cmd
            .run(&["tag", &name], self.timeout)
            .map_err(|e| TaggitError::tag(e.to_string()))?;
        tracing::info!(tag = %name, "created tag");
        Ok(())
    }
}

impl<C: GitCmd> TagPublisher for CommandRepository<C> {
    fn publish(&self, version: &Version) -> Result<()> {
        let name = version.to_string();
        self.cmd
            .run(&["push", &self.remote, &name], self.timeout)
            .map_err(|e| TaggitError::remote(e.to_string()))?;
        tracing::info!(tag = %name, remote = %self.remote, "published tag");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records invocations and replays a canned result.
    struct RecordingCmd {
        calls: RefCell<Vec<Vec<String>>>,
        result: std::result::Result<String, String>,
    }

    impl RecordingCmd {
        fn ok(output: &str) -> Self {
            RecordingCmd {
                calls: RefCell::new(Vec::new()),
                result: Ok(output.to_string()),
            }
        }

        fn failing(output: &str) -> Self {
            RecordingCmd {
                calls: RefCell::new(Vec::new()),
                result: Err(output.to_string()),
            }
        }
    }

    impl GitCmd for RecordingCmd {
        fn run(&self, args: &[&str], _timeout: Duration) -> Result<String> {
            self.calls
                .borrow_mut()
                .push(args.iter().map(|s| s.to_string()).collect());
            self.result.clone().map_err(|output| TaggitError::Command {
                command: format!("git {}", args.join(" ")),
                output,
            })
        }
    }

    fn repo(cmd: RecordingCmd) -> CommandRepository<RecordingCmd> {
        CommandRepository::new(cmd, "upstream", Duration::from_secs(5))
    }

    #[test]
    fn test_list_tags_args() {
        let repo = repo(RecordingCmd::ok("v1.0.0\nv1.1.0\n"));
        assert_eq!(repo.list_tags().unwrap(), "v1.0.0\nv1.1.0\n");
        assert_eq!(*repo.cmd.calls.borrow(), vec![vec!["tag", "--list"]]);
    }

    #[test]
    fn test_create_tag_args() {
        let repo = repo(RecordingCmd::ok(""));
        repo.create_tag(&Version::with_extension(1, 2, 3, "rc1"))
            .unwrap();
        assert_eq!(*repo.cmd.calls.borrow(), vec![vec!["tag", "v1.2.3-rc1"]]);
    }

    #[test]
    fn test_publish_args() {
        let repo = repo(RecordingCmd::ok(""));
        repo.publish(&Version::new(2, 0, 0)).unwrap();
        assert_eq!(
            *repo.cmd.calls.borrow(),
            vec![vec!["push", "upstream", "v2.0.0"]]
        );
    }

    #[test]
    fn test_failures_map_to_step_errors() {
        let repo = repo(RecordingCmd::failing("fatal: not a git repository"));
        assert!(matches!(repo.list_tags(), Err(TaggitError::List(_))));
        assert!(matches!(
            repo.create_tag(&Version::ZERO),
            Err(TaggitError::Tag(_))
        ));
        let err = repo.publish(&Version::ZERO).unwrap_err();
        assert!(matches!(err, TaggitError::Remote(_)));
        assert!(err.to_string().contains("fatal: not a git repository"));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_cmd_collects_output() {
        let cmd = ProcessCmd::new("sh");
        let output = cmd
            .run(&["-c", "echo out; echo err >&2"], Duration::from_secs(10))
            .unwrap();
        assert!(output.contains("out"));
        assert!(output.contains("err"));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_cmd_nonzero_exit() {
        let cmd = ProcessCmd::new("sh");
        let err = cmd
            .run(&["-c", "echo boom >&2; exit 3"], Duration::from_secs(10))
            .unwrap_err();
        match err {
            TaggitError::Command { command, output } => {
                assert_eq!(command, "sh -c echo boom >&2; exit 3");
                assert_eq!(output, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_process_cmd_timeout() {
        let cmd = ProcessCmd::new("sh");
        let err = cmd
            .run(&["-c", "sleep 5"], Duration::from_millis(100))
            .unwrap_err();
        assert!(matches!(err, TaggitError::Timeout { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_cmd_timeout_with_lingering_grandchild() {
        // The backgrounded sleep inherits the pipes and keeps them open after
        // sh itself exits.
        let cmd = ProcessCmd::new("sh");
        let started = Instant::now();
        let err = cmd
            .run(&["-c", "sleep 6 & echo hi"], Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, TaggitError::Timeout { seconds: 1, .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_settle_reaps_child_on_wait_error() {
        let mut child = Command::new("sleep")
            .arg("5")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        let waited = Err(io::Error::new(io::ErrorKind::Other, "wait failed"));
        let err = settle(
            &mut child,
            waited,
            "sleep 5".to_string(),
            Duration::from_secs(1),
        )
        .unwrap_err();

        assert!(matches!(err, TaggitError::Io(_)));
        assert!(child.try_wait().unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_settle_kills_child_on_timeout() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        let err = settle(&mut child, Ok(None), "sleep 5".to_string(), Duration::from_secs(2))
            .unwrap_err();

        assert!(matches!(err, TaggitError::Timeout { seconds: 2, .. }));
        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    fn test_process_cmd_missing_executable() {
        let cmd = ProcessCmd::new("definitely-not-a-real-git-binary");
        let err = cmd.run(&["--version"], Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TaggitError::Command { .. }));
    }
}
