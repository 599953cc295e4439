use crate::metadata::MetadataError;
use crate::resolver::Variant;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop an install. None of these are retried.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("a hugo release for os=\"{os}\" and arch=\"{arch}\" is not known")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("a hugo {artifact} for version=\"{version}\" ({variant}), os=\"{os}\" and arch=\"{arch}\" is not known")]
    UnsupportedVersion {
        artifact: &'static str,
        version: String,
        variant: Variant,
        os: String,
        arch: String,
    },

    #[error("'{0}' is not a version number")]
    InvalidVersion(String),

    #[error("cannot build download URL from base \"{base}\": {detail}")]
    InvalidUrl { base: String, detail: String },

    #[error("download of \"{url}\" failed: {detail}")]
    Transport { url: String, detail: String },

    #[error("no checksum for \"{file}\" listed in \"{checksum_url}\"")]
    ChecksumNotFound { file: String, checksum_url: String },

    #[error("checksum mismatch for \"{file}\": expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("extracting \"{file}\" into {} failed: {detail}", destination.display())]
    Extraction {
        file: String,
        destination: PathBuf,
        detail: String,
    },

    #[error("health check of {} failed: {detail}", binary.display())]
    HealthCheck { binary: PathBuf, detail: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl InstallError {
    pub(crate) fn io(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| InstallError::Io { context, source }
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;
