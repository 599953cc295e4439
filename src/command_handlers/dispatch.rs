use crate::cli::Commands;
use crate::command_handlers::{generate, install, resolve};
use crate::config::InstallerConfig;
use anyhow::Result;

pub fn dispatch(cmd: Commands, cfg: &InstallerConfig) -> Result<()> {
    match cmd {
        Commands::Install(args) => install::run_install(args, cfg),
        Commands::Resolve(target) => resolve::print_names(target, cfg),
        Commands::GenerateMeta {
            output,
            api_url,
            token,
        } => generate::generate_meta(&output, &api_url, token.as_deref()),
    }
}
