use crate::platforms::{SUPPORTED_ARCH, SUPPORTED_OS};
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    version,
    name = "hugo-installer",
    about = "Install a pinned Hugo binary into your project, verified and cached"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config (defaults to ./hugo-installer.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Verbose logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download, verify and unpack Hugo into the destination folder.
    /// Examples:
    ///   hugo-installer install 0.54.0
    ///   hugo-installer install 0.120.0 --extended --destination bin/hugo
    ///   hugo-installer install --force          # version from hugo-installer.toml
    Install(InstallArgs),
    /// Print the release file names for a version without downloading anything
    Resolve(TargetArgs),
    /// Rebuild the release metadata table from the GitHub releases API
    GenerateMeta {
        /// Where to write the metadata document
        #[arg(long, default_value = "generated/hugo-releases-meta.json")]
        output: String,
        /// Releases API endpoint
        #[arg(long, default_value = crate::releases::GITHUB_RELEASES_URL)]
        api_url: String,
        /// GitHub token, raises the API rate limit
        #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Hugo version, exactly as named in the GitHub releases (e.g. 0.54.0)
    #[arg(value_name = "VERSION")]
    pub version: Option<String>,
    /// Operating system the binary will run on (auto-detected when omitted)
    #[arg(long, value_parser = PossibleValuesParser::new(SUPPORTED_OS.iter().copied()))]
    pub os: Option<String>,
    /// System architecture the binary will run on (auto-detected when omitted)
    #[arg(long, value_parser = PossibleValuesParser::new(SUPPORTED_ARCH.iter().copied()))]
    pub arch: Option<String>,
    /// Use the extended build of Hugo
    #[arg(long)]
    pub extended: bool,
    /// Release metadata document to use instead of the built-in one
    #[arg(long, value_name = "FILE")]
    pub metadata: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// Folder the binary is put into; add it to .gitignore
    #[arg(long)]
    pub destination: Option<String>,
    /// Base URL mirroring the GitHub release asset layout (keep the trailing slash)
    #[arg(long)]
    pub download_url: Option<String>,
    /// Proxy for plain HTTP downloads
    #[arg(long, env = "HTTP_PROXY")]
    pub http_proxy: Option<String>,
    /// Proxy for HTTPS downloads
    #[arg(long, env = "HTTPS_PROXY")]
    pub https_proxy: Option<String>,
    /// Skip the checksum verification of the downloaded archive
    #[arg(long)]
    pub skip_checksum_check: bool,
    /// Skip running `hugo version` after installing
    #[arg(long)]
    pub skip_health_check: bool,
    /// Reinstall even if the destination already holds this exact build
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_install_flags() {
        let cli = Cli::try_parse_from([
            "hugo-installer",
            "install",
            "0.54.0",
            "--extended",
            "--os",
            "linux",
            "--arch",
            "arm64",
            "--force",
            "--skip-health-check",
        ])
        .unwrap();
        let Commands::Install(args) = cli.command else {
            panic!("expected install");
        };
        assert_eq!(args.target.version.as_deref(), Some("0.54.0"));
        assert_eq!(args.target.os.as_deref(), Some("linux"));
        assert_eq!(args.target.arch.as_deref(), Some("arm64"));
        assert!(args.target.extended && args.force && args.skip_health_check);
        assert!(!args.skip_checksum_check);
    }

    #[test]
    fn rejects_unknown_os() {
        assert!(Cli::try_parse_from(["hugo-installer", "resolve", "0.54.0", "--os", "plan9"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
