//! The install pipeline.
//!
//! ```text
//! CheckingExisting ─┬─> Fetching -> Verifying -> Extracting ─┬─> HealthChecking -> Persisting -> Done
//!                   └────────────────── (skip) ──────────────┘
//! ```
//!
//! A matching `version.json` skips the network and the destination is left
//! alone, but the health check and the state write still run. `force`
//! bypasses the existing-install check. Any error ends the run; a half
//! cleaned destination is left as is and the next `force` run repairs it.

use crate::download::{Downloader, ProxyConfig};
use crate::error::{InstallError, Result};
use crate::extract::ArchiveExtractor;
use crate::health::ProcessRunner;
use crate::metadata::ReleaseMetadataStore;
use crate::platform::platform;
use crate::resolver::{ArtifactNameResolver, Variant};
use crate::state::{InstallState, InstallStateStore};
use fs_err as fs;
use indicatif::ProgressBar;
use reqwest::Url;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_DOWNLOAD_URL: &str = "https://github.com/gohugoio/hugo/releases/download/";
pub const DEFAULT_DESTINATION: &str = "bin/hugo";
pub const BINARY_NAME: &str = "hugo";

/// Everything one run needs, fixed before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub version: String,
    pub os: String,
    pub arch: String,
    pub extended: bool,
    pub destination: PathBuf,
    pub download_url: String,
    pub skip_checksum_check: bool,
    pub skip_health_check: bool,
    pub force: bool,
    pub proxy: ProxyConfig,
}

impl InstallRequest {
    pub fn variant(&self) -> Variant {
        Variant::from_extended(self.extended)
    }

    pub fn state(&self) -> InstallState {
        InstallState {
            arch: self.arch.clone(),
            extended: self.extended,
            os: self.os.clone(),
            version: self.version.clone(),
        }
    }

    pub fn binary_path(&self) -> PathBuf {
        self.destination.join(platform().final_binary_name(BINARY_NAME))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CheckingExisting,
    Fetching,
    Verifying,
    Extracting,
    HealthChecking,
    Persisting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::CheckingExisting => "checking for existing binary",
            Stage::Fetching => "downloading binary",
            Stage::Verifying => "verifying binary checksum",
            Stage::Extracting => "extracting binary to disk",
            Stage::HealthChecking => "verifying binary health",
            Stage::Persisting => "writing version info",
            Stage::Done => "done",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub request: InstallRequest,
    /// An identical install was found; nothing was downloaded.
    pub skipped: bool,
    pub binary_file: Option<String>,
    pub extracted: Vec<PathBuf>,
    pub health_output: Option<String>,
    pub stages: Vec<Stage>,
}

impl InstallOutcome {
    pub fn summary(&self) -> String {
        let r = &self.request;
        let mut out = format!(
            "Hugo is now available in \"{}\".\n\n\
             - Version       {}\n\
             - Extended      {}\n\
             - OS            {}\n\
             - Architecture  {}\n",
            r.destination.display(),
            r.version,
            if r.extended { "Yes" } else { "No" },
            r.os,
            r.arch
        );
        if let Some(line) = &self.health_output {
            out.push('\n');
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

pub struct InstallPipeline<'a> {
    resolver: ArtifactNameResolver<'a>,
    downloader: &'a dyn Downloader,
    extractor: &'a dyn ArchiveExtractor,
    runner: &'a dyn ProcessRunner,
    progress: Option<&'a ProgressBar>,
}

impl<'a> InstallPipeline<'a> {
    pub fn new(
        store: &'a ReleaseMetadataStore,
        downloader: &'a dyn Downloader,
        extractor: &'a dyn ArchiveExtractor,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            resolver: ArtifactNameResolver::new(store),
            downloader,
            extractor,
            runner,
            progress: None,
        }
    }

    pub fn with_progress(mut self, pb: &'a ProgressBar) -> Self {
        self.progress = Some(pb);
        self
    }

    pub fn run(&self, req: &InstallRequest) -> Result<InstallOutcome> {
        let _span = tracing::info_span!(
            "install",
            version = %req.version,
            os = %req.os,
            arch = %req.arch,
            extended = req.extended,
        )
        .entered();

        let mut outcome = InstallOutcome {
            request: req.clone(),
            skipped: false,
            binary_file: None,
            extracted: Vec::new(),
            health_output: None,
            stages: Vec::new(),
        };

        if !req.force {
            self.enter(&mut outcome, Stage::CheckingExisting);
            outcome.skipped = self.check_existing(req);
        }

        if !outcome.skipped {
            let binary_file = self.resolver.resolve_binary(
                &req.version,
                &req.os,
                &req.arch,
                req.variant(),
            )?;
            self.enter(&mut outcome, Stage::Fetching);
            prepare_destination(&req.destination)?;
            let bytes = self.download(req, &binary_file)?;

            if !req.skip_checksum_check {
                self.enter(&mut outcome, Stage::Verifying);
                self.verify_checksum(req, &bytes, &binary_file)?;
            }

            self.enter(&mut outcome, Stage::Extracting);
            outcome.extracted = self.extract(req, &bytes, &binary_file)?;
            outcome.binary_file = Some(binary_file);
        }

        if !req.skip_health_check {
            self.enter(&mut outcome, Stage::HealthChecking);
            outcome.health_output = self.health_check(req)?;
        }

        self.enter(&mut outcome, Stage::Persisting);
        InstallStateStore::write(&req.destination, &req.state())?;

        self.enter(&mut outcome, Stage::Done);
        Ok(outcome)
    }

    fn enter(&self, outcome: &mut InstallOutcome, stage: Stage) {
        tracing::info!(stage = ?stage, "{stage}");
        if let Some(pb) = self.progress {
            pb.set_message(format!("Hugo {}: {stage}", outcome.request.version));
        }
        outcome.stages.push(stage);
    }

    fn check_existing(&self, req: &InstallRequest) -> bool {
        let existing = InstallStateStore::read(&req.destination);
        let same = existing.as_ref() == Some(&req.state());
        if same {
            tracing::info!(destination = %req.destination.display(), "binary already exists");
        }
        same
    }

    fn download(&self, req: &InstallRequest, file: &str) -> Result<Vec<u8>> {
        let url = release_url(&req.download_url, &req.version, file)?;
        tracing::info!(url = %url, "downloading");
        self.downloader
            .fetch(url.as_str(), &req.proxy)
            .map_err(|e| InstallError::Transport {
                url: url.to_string(),
                detail: format!("{e:#}"),
            })
    }

    fn verify_checksum(&self, req: &InstallRequest, bytes: &[u8], binary_file: &str) -> Result<()> {
        let checksum_file = self
            .resolver
            .resolve_checksum_file(&req.version, req.variant())?;
        let checksum_url = release_url(&req.download_url, &req.version, &checksum_file)?;
        let raw = self.download(req, &checksum_file)?;
        let listing = String::from_utf8_lossy(&raw);
        let expected =
            find_checksum(&listing, binary_file).ok_or_else(|| InstallError::ChecksumNotFound {
                file: binary_file.to_string(),
                checksum_url: checksum_url.to_string(),
            })?;
        let actual = sha256_hex(bytes);
        if !expected.eq_ignore_ascii_case(&actual) {
            return Err(InstallError::ChecksumMismatch {
                file: binary_file.to_string(),
                expected: expected.to_string(),
                actual,
            });
        }
        tracing::debug!(digest = %actual, "checksum verified");
        Ok(())
    }

    fn extract(&self, req: &InstallRequest, bytes: &[u8], file: &str) -> Result<Vec<PathBuf>> {
        let failed = |e: anyhow::Error| InstallError::Extraction {
            file: file.to_string(),
            destination: req.destination.clone(),
            detail: format!("{e:#}"),
        };
        let written = self
            .extractor
            .extract(bytes, &req.destination)
            .map_err(failed)?;
        for rel in &written {
            platform()
                .make_executable(&req.destination.join(rel))
                .map_err(failed)?;
        }
        tracing::debug!(entries = written.len(), "extracted");
        Ok(written)
    }

    fn health_check(&self, req: &InstallRequest) -> Result<Option<String>> {
        let binary = req.binary_path();
        let output = self
            .runner
            .run(&binary, &["version"])
            .map_err(|e| InstallError::HealthCheck {
                binary: binary.clone(),
                detail: format!("{e:#}"),
            })?;
        if let Some(line) = &output {
            tracing::info!(output = %line, "health check passed");
        }
        Ok(output)
    }
}

fn prepare_destination(destination: &Path) -> Result<()> {
    if destination.exists() {
        fs::remove_dir_all(destination)
            .map_err(InstallError::io(format!("cleaning {}", destination.display())))?;
    }
    fs::create_dir_all(destination)
        .map_err(InstallError::io(format!("creating {}", destination.display())))
}

/// `<base>v<version>/<file>`, resolved the way a browser resolves a relative
/// link, so the base should end with a slash.
pub fn release_url(base: &str, version: &str, file: &str) -> Result<Url> {
    let invalid = |detail: String| InstallError::InvalidUrl {
        base: base.to_string(),
        detail,
    };
    Url::parse(base)
        .and_then(|b| b.join(&format!("v{version}/{file}")))
        .map_err(|e| invalid(e.to_string()))
}

/// Digest listed for `file` in a `sha256sum`-style listing.
pub fn find_checksum<'s>(listing: &'s str, file: &str) -> Option<&'s str> {
    listing.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let digest = parts.next()?;
        let name = parts.next()?.trim_start_matches('*');
        (name == file).then_some(digest)
    })
}

pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
