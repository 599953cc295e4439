use crate::metadata::ReleaseMetadataStore;
use crate::releases;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::path::Path;

pub fn generate_meta(output: &str, api_url: &str, token: Option<&str>) -> Result<()> {
    println!("GENERATE HUGO RELEASES META");
    println!();

    println!("> Fetching Hugo release information from GitHub ...");
    let client = Client::new();
    let listing = releases::fetch_all(&client, api_url, token)?;
    let releases = releases::chronological(listing);
    tracing::info!(count = releases.len(), "fetched releases");

    println!("> Analyzing Hugo release binaries and checksums ...");
    let store = ReleaseMetadataStore::generate(&releases)?;
    for (os, arch) in store.platforms() {
        let rules = store.binary_table(os, arch).map(|t| t.len()).unwrap_or(0);
        tracing::debug!(os, arch, rules, "compressed binary history");
    }

    println!("> Writing hugo release meta to disk ...");
    store
        .save(Path::new(output))
        .with_context(|| format!("writing {output}"))?;

    println!();
    println!("Wrote {output} from {} releases", releases.len());
    Ok(())
}
