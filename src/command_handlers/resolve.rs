use crate::cli::TargetArgs;
use crate::config::{build_request, InstallOverrides, InstallerConfig};
use crate::resolver::ArtifactNameResolver;
use anyhow::Result;

pub fn print_names(target: TargetArgs, cfg: &InstallerConfig) -> Result<()> {
    let store = super::metadata_store(target.metadata.as_deref())?;
    let request = build_request(
        InstallOverrides {
            version: target.version,
            os: target.os,
            arch: target.arch,
            extended: target.extended,
            ..Default::default()
        },
        cfg,
    )?;
    let resolver = ArtifactNameResolver::new(store);
    let variant = request.variant();
    let binary = resolver.resolve_binary(&request.version, &request.os, &request.arch, variant)?;
    println!("binary   {binary}");
    match resolver.resolve_checksum_file(&request.version, variant) {
        Ok(checksum) => println!("checksum {checksum}"),
        Err(e) => println!("checksum <none>: {e}"),
    }
    Ok(())
}
