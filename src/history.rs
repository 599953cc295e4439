//! Release history compression.
//!
//! Upstream has hundreds of releases but only changed its asset naming a
//! handful of times. [`compress`] walks the per-release observations
//! oldest-first and keeps a rule only where the observed value changes,
//! turning the full history into a small breakpoint table.

use crate::platforms::{arch_matcher, os_matcher};
use crate::template::Template;
use crate::threshold::{ThresholdError, VersionThresholdTable};
use crate::version::ReleaseVersion;
use serde::{Deserialize, Serialize};

/// Plain and extended upstream names, longest first so the extended
/// name is abstracted before its `hugo` prefix.
pub const VARIANT_NAMES: [&str; 2] = ["hugo_extended", "hugo"];

const ARCHIVE_SUFFIXES: [&str; 3] = [".tar.gz", ".tgz", ".zip"];

/// What a single release tells us about checksum file naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumPattern {
    pub pattern: Option<Template>,
    /// Per-variant checksum files are published (`hugo_extended_..._checksums.txt`).
    pub use_variant_specific_name: bool,
}

/// One observation per release, in chronological order.
#[derive(Debug, Clone)]
pub struct Sample<T> {
    pub version: ReleaseVersion,
    pub value: T,
}

/// Keep only the change points of a chronological series.
///
/// The first sample always opens a rule; every later sample whose value
/// differs from the last kept one opens another. Querying the result at any
/// sample's version yields that sample's value.
pub fn compress<T, I>(samples: I) -> Result<VersionThresholdTable<T>, ThresholdError>
where
    T: PartialEq,
    I: IntoIterator<Item = Sample<T>>,
{
    let mut table = VersionThresholdTable::new();
    for sample in samples {
        let changed = match table.rules().last() {
            Some(last) => last.value != sample.value,
            None => true,
        };
        if changed {
            table.push(sample.version, sample.value)?;
        }
    }
    Ok(table)
}

/// Pattern of the binary archive for `(os, arch)` in one release, if any.
pub fn observe_binary_pattern<'a, I>(
    asset_names: I,
    version: &str,
    os: &str,
    arch: &str,
) -> Option<Template>
where
    I: IntoIterator<Item = &'a str>,
{
    let (os_m, arch_m) = (os_matcher(os)?, arch_matcher(arch)?);
    let candidates = asset_names
        .into_iter()
        .filter(|name| os_m.matches(name) && arch_m.matches(name))
        .filter(|name| is_archive(name))
        .filter_map(|name| Template::abstract_from(name, &VARIANT_NAMES, version));
    dedup(candidates).into_iter().next()
}

/// Checksum file pattern for one release.
pub fn observe_checksum_pattern<'a, I>(asset_names: I, version: &str) -> ChecksumPattern
where
    I: IntoIterator<Item = &'a str>,
{
    let all: Vec<Template> = asset_names
        .into_iter()
        .filter(|name| name.to_ascii_lowercase().contains("checksums"))
        .filter_map(|name| Template::abstract_from(name, &VARIANT_NAMES, version))
        .collect();
    let use_variant_specific_name = all.len() > 1;
    ChecksumPattern {
        pattern: dedup(all).into_iter().next(),
        use_variant_specific_name,
    }
}

fn is_archive(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    !lower.ends_with(".deb") && ARCHIVE_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

fn dedup(items: impl IntoIterator<Item = Template>) -> Vec<Template> {
    let mut out: Vec<Template> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
