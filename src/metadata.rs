//! Release metadata: which file name patterns applied to which Hugo versions.
//!
//! The store is produced offline by `hugo-installer generate-meta` and shipped
//! inside the binary. Loading validates every table once so that resolution
//! can trust them afterwards.

use crate::history::{self, ChecksumPattern, Sample};
use crate::platforms::os_arch_combinations;
use crate::releases::Release;
use crate::template::Template;
use crate::threshold::{NamingRule, ThresholdError, VersionThresholdTable};
use crate::version::ReleaseVersion;
use anyhow::Context;
use chrono::{DateTime, Utc};
use fs_err as fs;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

static EMBEDDED_JSON: &str = include_str!("../generated/hugo-releases-meta.json");
static EMBEDDED: OnceCell<ReleaseMetadataStore> = OnceCell::new();

pub type BinaryTable = VersionThresholdTable<Option<Template>>;
pub type ChecksumTable = VersionThresholdTable<ChecksumPattern>;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("release metadata is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("release metadata contains unparseable version '{version}' in {table}")]
    InvalidVersion { table: String, version: String },
    #[error("release metadata table {table} is out of order: {source}")]
    Unordered {
        table: String,
        #[source]
        source: ThresholdError,
    },
    #[error("release metadata lists os=\"{os}\" arch=\"{arch}\" more than once")]
    DuplicatePlatform { os: String, arch: String },
}

#[derive(Debug, Clone)]
pub struct ReleaseMetadataStore {
    pub generated: Option<DateTime<Utc>>,
    binaries: BTreeMap<(String, String), BinaryTable>,
    checksums: ChecksumTable,
}

// ---------------- Document schema ----------------

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataDocument {
    #[serde(default)]
    generated: Option<DateTime<Utc>>,
    binaries: Vec<BinaryEntry>,
    checksum_file_pattern_history: Vec<ChecksumRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinaryEntry {
    os: String,
    arch: String,
    file_name_pattern_history: Vec<BinaryRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinaryRecord {
    version: String,
    file_name_pattern: Option<Template>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChecksumRecord {
    version: String,
    file_name_pattern: Option<Template>,
    #[serde(default)]
    use_specific_variant: bool,
}

// ---------------- Loading ----------------

impl ReleaseMetadataStore {
    /// The copy compiled into this binary, parsed on first use.
    pub fn embedded() -> Result<&'static Self, MetadataError> {
        EMBEDDED.get_or_try_init(|| Self::from_json(EMBEDDED_JSON))
    }

    pub fn from_json(data: &str) -> Result<Self, MetadataError> {
        let doc: MetadataDocument = serde_json::from_str(data)?;
        Self::from_document(doc)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data).with_context(|| format!("loading release metadata {}", path.display()))
    }

    fn from_document(doc: MetadataDocument) -> Result<Self, MetadataError> {
        let mut binaries = BTreeMap::new();
        for entry in doc.binaries {
            let table_name = format!("binaries[{}/{}]", entry.os, entry.arch);
            let rules = entry
                .file_name_pattern_history
                .into_iter()
                .map(|r| rule(&table_name, &r.version, r.file_name_pattern))
                .collect::<Result<Vec<_>, MetadataError>>()?;
            let table = table_from(&table_name, rules)?;
            let key = (entry.os, entry.arch);
            if binaries.contains_key(&key) {
                return Err(MetadataError::DuplicatePlatform {
                    os: key.0,
                    arch: key.1,
                });
            }
            binaries.insert(key, table);
        }

        let table_name = "checksumFilePatternHistory";
        let rules = doc
            .checksum_file_pattern_history
            .into_iter()
            .map(|r| {
                rule(
                    table_name,
                    &r.version,
                    ChecksumPattern {
                        pattern: r.file_name_pattern,
                        use_variant_specific_name: r.use_specific_variant,
                    },
                )
            })
            .collect::<Result<Vec<_>, MetadataError>>()?;
        let checksums = table_from(table_name, rules)?;

        Ok(Self {
            generated: doc.generated,
            binaries,
            checksums,
        })
    }

    pub fn binary_table(&self, os: &str, arch: &str) -> Option<&BinaryTable> {
        self.binaries.get(&(os.to_string(), arch.to_string()))
    }

    pub fn checksum_table(&self) -> &ChecksumTable {
        &self.checksums
    }

    pub fn platforms(&self) -> impl Iterator<Item = (&str, &str)> {
        self.binaries.keys().map(|(o, a)| (o.as_str(), a.as_str()))
    }

    // ---------------- Saving ----------------

    pub fn to_json(&self) -> Result<String, MetadataError> {
        let binaries = self
            .binaries
            .iter()
            .map(|((os, arch), table)| BinaryEntry {
                os: os.clone(),
                arch: arch.clone(),
                file_name_pattern_history: table
                    .rules()
                    .iter()
                    .map(|r| BinaryRecord {
                        version: r.effective_from.raw().to_string(),
                        file_name_pattern: r.value.clone(),
                    })
                    .collect(),
            })
            .collect();
        let checksum_file_pattern_history = self
            .checksums
            .rules()
            .iter()
            .map(|r| ChecksumRecord {
                version: r.effective_from.raw().to_string(),
                file_name_pattern: r.value.pattern.clone(),
                use_specific_variant: r.value.use_variant_specific_name,
            })
            .collect();
        let doc = MetadataDocument {
            generated: self.generated,
            binaries,
            checksum_file_pattern_history,
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, json + "\n")?;
        Ok(())
    }

    // ---------------- Generation ----------------

    /// Build the store from the upstream release list, given oldest-first.
    ///
    /// Releases whose tag does not contain a version are skipped.
    pub fn generate(releases: &[Release]) -> Result<Self, MetadataError> {
        let versioned: Vec<(ReleaseVersion, &Release)> = releases
            .iter()
            .filter_map(|r| ReleaseVersion::parse(r.version()).map(|v| (v, r)))
            .collect();

        let mut binaries = BTreeMap::new();
        for (os, arch) in os_arch_combinations() {
            let samples = versioned.iter().map(|(v, r)| Sample {
                version: v.clone(),
                value: history::observe_binary_pattern(r.asset_names(), v.raw(), os, arch),
            });
            let table = history::compress(samples).map_err(|source| MetadataError::Unordered {
                table: format!("binaries[{os}/{arch}]"),
                source,
            })?;
            binaries.insert((os.to_string(), arch.to_string()), table);
        }

        let samples = versioned.iter().map(|(v, r)| Sample {
            version: v.clone(),
            value: history::observe_checksum_pattern(r.asset_names(), v.raw()),
        });
        let checksums = history::compress(samples).map_err(|source| MetadataError::Unordered {
            table: "checksumFilePatternHistory".to_string(),
            source,
        })?;

        Ok(Self {
            generated: Some(Utc::now()),
            binaries,
            checksums,
        })
    }
}

fn rule<T>(table: &str, version: &str, value: T) -> Result<NamingRule<T>, MetadataError> {
    let effective_from =
        ReleaseVersion::parse(version).ok_or_else(|| MetadataError::InvalidVersion {
            table: table.to_string(),
            version: version.to_string(),
        })?;
    Ok(NamingRule {
        effective_from,
        value,
    })
}

fn table_from<T>(
    table: &str,
    rules: Vec<NamingRule<T>>,
) -> Result<VersionThresholdTable<T>, MetadataError> {
    VersionThresholdTable::from_rules(rules).map_err(|source| MetadataError::Unordered {
        table: table.to_string(),
        source,
    })
}
