use std::{
    io::Read,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
    time::Duration,
};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Flag that scopes a `playerctl` invocation to one player instance.
const PLAYER_FLAG: &str = "-p";

/// Runs an external program and hands back its trimmed stdout.
///
/// `None` covers every failure: spawn errors, non-zero exits, timeouts and
/// undecodable output. Callers treat it as "unknown", never as fatal.
pub trait CommandRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Option<String>;
}

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            timeout: COMMAND_TIMEOUT,
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Option<String> {
        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                debug!("failed to spawn {} {:?}: {err}", program.display(), args);
                return None;
            }
        };

        // Drain stdout while waiting so a chatty tool never blocks on a full pipe.
        let Some(mut pipe) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return None;
        };
        let reader = thread::spawn(move || {
            let mut stdout = String::new();
            pipe.read_to_string(&mut stdout).map(|_| stdout)
        });

        let status = match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                warn!(
                    "{} {:?} did not finish within {:?}; killing it",
                    program.display(),
                    args,
                    self.timeout
                );
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
            Err(err) => {
                debug!("failed to wait for {} {:?}: {err}", program.display(), args);
                return None;
            }
        };

        if !status.success() {
            debug!("{} {:?} exited with {status}", program.display(), args);
            return None;
        }

        match reader.join() {
            Ok(Ok(stdout)) => Some(stdout.trim().to_string()),
            Ok(Err(err)) => {
                debug!("unreadable output from {} {:?}: {err}", program.display(), args);
                None
            }
            Err(_) => {
                warn!("output reader for {} panicked", program.display());
                None
            }
        }
    }
}

/// Resolved locations of the two external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub playerctl: PathBuf,
    pub pactl: PathBuf,
}

impl ToolPaths {
    pub fn new(playerctl: impl Into<PathBuf>, pactl: impl Into<PathBuf>) -> Self {
        Self {
            playerctl: playerctl.into(),
            pactl: pactl.into(),
        }
    }
}

/// The media and mixer tools bound to a runner.
pub struct Tools<R> {
    runner: R,
    paths: ToolPaths,
}

impl<R: CommandRunner> Tools<R> {
    pub fn new(runner: R, paths: ToolPaths) -> Self {
        Self { runner, paths }
    }

    #[cfg(test)]
    pub(crate) fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs `playerctl`, optionally scoped to `target`. Empty output counts as
    /// absent.
    pub fn playerctl(&self, args: &[&str], target: Option<&str>) -> Option<String> {
        let mut full_args = Vec::with_capacity(args.len() + 2);
        if let Some(player) = target {
            full_args.push(PLAYER_FLAG);
            full_args.push(player);
        }
        full_args.extend_from_slice(args);
        non_empty(self.runner.run(&self.paths.playerctl, &full_args))
    }

    pub fn pactl(&self, args: &[&str]) -> Option<String> {
        non_empty(self.runner.run(&self.paths.pactl, args))
    }
}

fn non_empty(output: Option<String>) -> Option<String> {
    output.filter(|text| !text.is_empty())
}
