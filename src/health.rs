use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::Command;

/// Spawn a binary and capture what it prints.
pub trait ProcessRunner {
    /// Returns the captured output line, `None` if nothing was printed.
    fn run(&self, executable: &Path, args: &[&str]) -> Result<Option<String>>;
}

#[derive(Debug, Default)]
pub struct CommandRunner;

impl ProcessRunner for CommandRunner {
    fn run(&self, executable: &Path, args: &[&str]) -> Result<Option<String>> {
        let output = Command::new(executable)
            .args(args)
            .output()
            .with_context(|| format!("spawning {}", executable.display()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "{} exited with {}: {}",
                executable.display(),
                output.status,
                stderr.trim()
            ));
        }
        Ok(capture_line(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Last non-empty line of the output, without its line ending.
///
/// Hugo prints a single line for `hugo version`; if a build ever prints more,
/// the last line wins.
pub fn capture_line(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .last()
        .map(str::to_string)
}
