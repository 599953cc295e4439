use crate::cli::InstallArgs;
use crate::config::{build_request, InstallOverrides, InstallerConfig};
use crate::download::HttpDownloader;
use crate::extract::AutoExtractor;
use crate::health::CommandRunner;
use crate::pipeline::InstallPipeline;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub fn run_install(args: InstallArgs, cfg: &InstallerConfig) -> Result<()> {
    let metadata = args.target.metadata;
    let overrides = InstallOverrides {
        version: args.target.version,
        destination: args.destination,
        os: args.target.os,
        arch: args.target.arch,
        extended: args.target.extended,
        download_url: args.download_url,
        http_proxy: args.http_proxy,
        https_proxy: args.https_proxy,
        skip_checksum_check: args.skip_checksum_check,
        skip_health_check: args.skip_health_check,
        force: args.force,
    };
    let request = build_request(overrides, cfg)?;
    let store = super::metadata_store(metadata.as_deref())?;

    println!();
    println!("Hugo Installer");
    println!();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));

    let (downloader, extractor, runner) = (HttpDownloader, AutoExtractor, CommandRunner);
    let result = InstallPipeline::new(store, &downloader, &extractor, &runner)
        .with_progress(&pb)
        .run(&request);
    match &result {
        Ok(outcome) if outcome.skipped => pb.finish_with_message("Binary already exists (skip)"),
        Ok(_) => pb.finish_with_message(format!("Installed hugo {}", request.version)),
        Err(e) => pb.finish_with_message(format!("FAILED: {e}")),
    }
    let outcome = result.with_context(|| {
        format!(
            "installing hugo {} ({}) for {}/{}",
            request.version,
            request.variant(),
            request.os,
            request.arch
        )
    })?;

    println!();
    print!("{}", outcome.summary());
    println!();
    println!("Success!");
    Ok(())
}
