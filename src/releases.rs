use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;

pub const GITHUB_RELEASES_URL: &str = "https://api.github.com/repos/gohugoio/hugo/releases";
const PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    // "name" is missing on some older releases; the tag is always there.
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub name: String,
}

impl Release {
    pub fn version(&self) -> &str {
        self.tag_name.trim_start_matches('v')
    }

    pub fn asset_names(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|a| a.name.as_str())
    }
}

/// Fetch every release, newest first as the API returns them.
pub fn fetch_all(client: &Client, url: &str, token: Option<&str>) -> Result<Vec<Release>> {
    let mut out = Vec::new();
    for page in 1.. {
        let mut req = client
            .get(url)
            .query(&[("per_page", PAGE_SIZE), ("page", page)])
            .header("User-Agent", "hugo-installer")
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(t) = token {
            req = req.header("Authorization", format!("token {t}"));
        }
        let resp = req.send().with_context(|| format!("GET {url} page {page}"))?;
        if !resp.status().is_success() {
            return Err(anyhow!("listing releases failed {} (page {page})", resp.status()));
        }
        let batch: Vec<Release> = resp
            .json()
            .with_context(|| format!("parsing releases page {page}"))?;
        tracing::debug!(page, count = batch.len(), "fetched release page");
        let last = batch.len() < PAGE_SIZE;
        out.extend(batch);
        if last {
            break;
        }
    }
    Ok(out)
}

/// Reorder an API listing oldest-first, as history compression expects.
pub fn chronological(mut releases: Vec<Release>) -> Vec<Release> {
    releases.reverse();
    releases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_payload_and_strips_tag_prefix() {
        let json = r#"[
          { "tag_name": "v0.54.0", "name": "v0.54.0", "prerelease": false,
            "assets": [ { "name": "hugo_0.54.0_Linux-64bit.tar.gz", "size": 1 } ] },
          { "tag_name": "v0.16" }
        ]"#;
        let releases: Vec<Release> = serde_json::from_str(json).unwrap();
        assert_eq!(releases[0].version(), "0.54.0");
        assert_eq!(
            releases[0].asset_names().collect::<Vec<_>>(),
            vec!["hugo_0.54.0_Linux-64bit.tar.gz"]
        );
        assert_eq!(releases[1].version(), "0.16");
        assert_eq!(releases[1].asset_names().count(), 0);
    }

    #[test]
    fn chronological_reverses_api_order() {
        let releases = vec![
            Release { tag_name: "v0.2.0".into(), assets: vec![] },
            Release { tag_name: "v0.1.0".into(), assets: vec![] },
        ];
        let ordered = chronological(releases);
        assert_eq!(ordered[0].version(), "0.1.0");
    }
}
