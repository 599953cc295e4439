//! The `version.json` record describing what sits in a destination directory.

use crate::error::{InstallError, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const STATE_FILE_NAME: &str = "version.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallState {
    pub arch: String,
    pub extended: bool,
    pub os: String,
    pub version: String,
}

pub struct InstallStateStore;

impl InstallStateStore {
    pub fn path(destination: &Path) -> PathBuf {
        destination.join(STATE_FILE_NAME)
    }

    /// `None` when the record is missing or unreadable; never an error.
    pub fn read(destination: &Path) -> Option<InstallState> {
        let path = Self::path(destination);
        let data = match fs::read_to_string(&path) {
            Ok(d) => d,
            Err(_) => return None,
        };
        match serde_json::from_str(&data) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "ignoring unreadable install state");
                None
            }
        }
    }

    /// Replace the record wholesale.
    pub fn write(destination: &Path, state: &InstallState) -> Result<()> {
        let path = Self::path(destination);
        let json = serde_json::to_string_pretty(state).map_err(|e| InstallError::Io {
            context: format!("serializing {}", path.display()),
            source: e.into(),
        })?;
        fs::write(&path, json).map_err(InstallError::io(format!("writing {}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InstallState {
        InstallState {
            arch: "x64".into(),
            extended: true,
            os: "linux".into(),
            version: "0.54.0".into(),
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        InstallStateStore::write(dir.path(), &sample()).unwrap();
        assert_eq!(InstallStateStore::read(dir.path()), Some(sample()));
    }

    #[test]
    fn writes_pretty_json_with_expected_keys() {
        let dir = tempfile::tempdir().unwrap();
        InstallStateStore::write(dir.path(), &sample()).unwrap();
        let raw = std::fs::read_to_string(dir.path().join(STATE_FILE_NAME)).unwrap();
        assert!(raw.contains("\n  \"os\": \"linux\""), "{raw}");
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["extended"], serde_json::Value::Bool(true));
        assert_eq!(value["version"], "0.54.0");
        assert_eq!(value["arch"], "x64");
    }

    #[test]
    fn write_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        InstallStateStore::write(dir.path(), &sample()).unwrap();
        let newer = InstallState {
            version: "0.120.0".into(),
            extended: false,
            ..sample()
        };
        InstallStateStore::write(dir.path(), &newer).unwrap();
        assert_eq!(InstallStateStore::read(dir.path()), Some(newer));
    }

    #[test]
    fn missing_or_truncated_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(InstallStateStore::read(dir.path()), None);
        std::fs::write(dir.path().join(STATE_FILE_NAME), "{\"os\": \"lin").unwrap();
        assert_eq!(InstallStateStore::read(dir.path()), None);
        std::fs::write(dir.path().join(STATE_FILE_NAME), "{\"os\": \"linux\"}").unwrap();
        assert_eq!(InstallStateStore::read(dir.path()), None);
        assert_eq!(InstallStateStore::read(&dir.path().join("nope")), None);
    }
}
