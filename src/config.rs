use crate::download::ProxyConfig;
use crate::pipeline::{InstallRequest, DEFAULT_DESTINATION, DEFAULT_DOWNLOAD_URL};
use crate::platforms::{detect_arch, detect_os, SUPPORTED_ARCH, SUPPORTED_OS};
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "hugo-installer.toml";

/// Optional project file. Every key can be overridden on the command line.
///
/// ```toml
/// [install]
/// version = "0.54.0"
/// extended = true
/// destination = "bin/hugo"
/// ```
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct InstallerConfig {
    #[serde(default)]
    pub install: InstallSection,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InstallSection {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub extended: Option<bool>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub http_proxy: Option<String>,
    #[serde(default)]
    pub https_proxy: Option<String>,
    #[serde(default)]
    pub skip_checksum_check: Option<bool>,
    #[serde(default)]
    pub skip_health_check: Option<bool>,
}

impl InstallerConfig {
    /// Load `path`; a missing file is an empty config unless it was asked for explicitly.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_FILE, false),
        };
        if !Path::new(path).exists() {
            if explicit {
                bail!("config file {path} not found");
            }
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        Self::parse(&data).with_context(|| format!("parsing {path}"))
    }

    pub fn parse(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }
}

/// Values given on the command line (or via proxy env vars).
#[derive(Debug, Clone, Default)]
pub struct InstallOverrides {
    pub version: Option<String>,
    pub destination: Option<String>,
    pub os: Option<String>,
    pub arch: Option<String>,
    pub extended: bool,
    pub download_url: Option<String>,
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub skip_checksum_check: bool,
    pub skip_health_check: bool,
    pub force: bool,
}

/// Merge flags over the config file over built-in defaults.
pub fn build_request(cli: InstallOverrides, cfg: &InstallerConfig) -> Result<InstallRequest> {
    let file = &cfg.install;
    let version = cli
        .version
        .or_else(|| file.version.clone())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("no hugo version given (pass VERSION or set install.version in {DEFAULT_CONFIG_FILE})"))?;
    let os = cli.os.unwrap_or_else(|| detect_os().to_string());
    let arch = cli.arch.unwrap_or_else(|| detect_arch().to_string());
    if !SUPPORTED_OS.contains(&os.as_str()) {
        bail!("unsupported os '{os}' (expected one of {})", SUPPORTED_OS.join(", "));
    }
    if !SUPPORTED_ARCH.contains(&arch.as_str()) {
        bail!("unsupported arch '{arch}' (expected one of {})", SUPPORTED_ARCH.join(", "));
    }
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    Ok(InstallRequest {
        version,
        os,
        arch,
        extended: cli.extended || file.extended.unwrap_or(false),
        destination: PathBuf::from(
            cli.destination
                .or_else(|| file.destination.clone())
                .unwrap_or_else(|| DEFAULT_DESTINATION.to_string()),
        ),
        download_url: cli
            .download_url
            .or_else(|| file.download_url.clone())
            .unwrap_or_else(|| DEFAULT_DOWNLOAD_URL.to_string()),
        skip_checksum_check: cli.skip_checksum_check || file.skip_checksum_check.unwrap_or(false),
        skip_health_check: cli.skip_health_check || file.skip_health_check.unwrap_or(false),
        force: cli.force,
        proxy: ProxyConfig {
            http: non_empty(cli.http_proxy.or_else(|| file.http_proxy.clone())),
            https: non_empty(cli.https_proxy.or_else(|| file.https_proxy.clone())),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(version: &str) -> InstallOverrides {
        InstallOverrides {
            version: Some(version.into()),
            os: Some("linux".into()),
            arch: Some("x64".into()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_apply_without_config() {
        let req = build_request(overrides("0.54.0"), &InstallerConfig::default()).unwrap();
        assert_eq!(req.version, "0.54.0");
        assert_eq!(req.destination, PathBuf::from(DEFAULT_DESTINATION));
        assert_eq!(req.download_url, DEFAULT_DOWNLOAD_URL);
        assert!(!req.extended && !req.force && !req.skip_checksum_check);
        assert_eq!(req.proxy, ProxyConfig::default());
    }

    #[test]
    fn config_file_fills_gaps_and_flags_win() {
        let cfg = InstallerConfig::parse(
            r#"
            [install]
            version = "0.80.0"
            extended = true
            destination = "tools/hugo"
            https_proxy = "http://proxy:3128"
            "#,
        )
        .unwrap();
        let mut cli = overrides("0.54.0");
        cli.version = None;
        let req = build_request(cli, &cfg).unwrap();
        assert_eq!(req.version, "0.80.0");
        assert!(req.extended);
        assert_eq!(req.destination, PathBuf::from("tools/hugo"));
        assert_eq!(req.proxy.https.as_deref(), Some("http://proxy:3128"));

        let mut cli = overrides("0.54.0");
        cli.destination = Some("bin/h".into());
        let req = build_request(cli, &cfg).unwrap();
        assert_eq!(req.version, "0.54.0");
        assert_eq!(req.destination, PathBuf::from("bin/h"));
    }

    #[test]
    fn rejects_missing_version_and_unknown_platforms() {
        let mut cli = overrides("0.54.0");
        cli.version = None;
        assert!(build_request(cli, &InstallerConfig::default()).is_err());

        let mut cli = overrides("0.54.0");
        cli.os = Some("plan9".into());
        assert!(build_request(cli, &InstallerConfig::default()).is_err());

        let mut cli = overrides("0.54.0");
        cli.arch = Some("riscv64".into());
        assert!(build_request(cli, &InstallerConfig::default()).is_err());
    }

    #[test]
    fn empty_proxy_values_are_ignored() {
        let mut cli = overrides("0.54.0");
        cli.http_proxy = Some(String::new());
        let req = build_request(cli, &InstallerConfig::default()).unwrap();
        assert_eq!(req.proxy.http, None);
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        assert!(InstallerConfig::parse("[install]\nverison = \"0.1.0\"\n").is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        assert!(InstallerConfig::load(Some("/definitely/missing/hugo-installer.toml")).is_err());
    }
}
