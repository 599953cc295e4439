use crate::error::InstallError;
use crate::metadata::ReleaseMetadataStore;
use crate::version::ReleaseVersion;
use std::fmt;

/// Build flavour of the Hugo binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Standard,
    Extended,
}

impl Variant {
    pub fn from_extended(extended: bool) -> Self {
        if extended {
            Variant::Extended
        } else {
            Variant::Standard
        }
    }

    /// Name upstream uses as the asset file name prefix.
    pub fn asset_name(self) -> &'static str {
        match self {
            Variant::Standard => "hugo",
            Variant::Extended => "hugo_extended",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Standard => f.write_str("standard"),
            Variant::Extended => f.write_str("extended"),
        }
    }
}

/// Maps a release request onto the exact upstream file names. No I/O.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactNameResolver<'a> {
    store: &'a ReleaseMetadataStore,
}

impl<'a> ArtifactNameResolver<'a> {
    pub fn new(store: &'a ReleaseMetadataStore) -> Self {
        Self { store }
    }

    pub fn resolve_binary(
        &self,
        version: &str,
        os: &str,
        arch: &str,
        variant: Variant,
    ) -> Result<String, InstallError> {
        let table = self
            .store
            .binary_table(os, arch)
            .ok_or_else(|| InstallError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            })?;
        let unsupported = || InstallError::UnsupportedVersion {
            artifact: "binary",
            version: version.to_string(),
            variant,
            os: os.to_string(),
            arch: arch.to_string(),
        };
        let query = parse(version)?;
        let pattern = table
            .effective_rule_at(&query)
            .and_then(|rule| rule.value.as_ref())
            .ok_or_else(unsupported)?;
        // The literal request string goes into the name, not the coerced form.
        Ok(pattern.render(variant.asset_name(), version))
    }

    pub fn resolve_checksum_file(
        &self,
        version: &str,
        variant: Variant,
    ) -> Result<String, InstallError> {
        let query = parse(version)?;
        let rule = self
            .store
            .checksum_table()
            .effective_rule_at(&query)
            .map(|rule| &rule.value);
        let Some((pattern, specific)) = rule
            .and_then(|c| c.pattern.as_ref().map(|p| (p, c.use_variant_specific_name)))
        else {
            return Err(InstallError::UnsupportedVersion {
                artifact: "checksum file",
                version: version.to_string(),
                variant,
                os: "any".to_string(),
                arch: "any".to_string(),
            });
        };
        let name = if specific {
            variant.asset_name()
        } else {
            Variant::Standard.asset_name()
        };
        Ok(pattern.render(name, version))
    }
}

fn parse(version: &str) -> Result<ReleaseVersion, InstallError> {
    ReleaseVersion::parse(version).ok_or_else(|| InstallError::InvalidVersion(version.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: &str = r#"{
      "binaries": [
        { "os": "linux", "arch": "x64", "fileNamePatternHistory": [
          { "version": "0.11", "fileNamePattern": "{{variant}}_{{version}}_linux_amd64.tar.gz" },
          { "version": "0.17", "fileNamePattern": "{{variant}}_{{version}}_Linux-64bit.tar.gz" },
          { "version": "0.103.0", "fileNamePattern": "{{variant}}_{{version}}_linux-amd64.tar.gz" }
        ] },
        { "os": "linux", "arch": "x86", "fileNamePatternHistory": [
          { "version": "0.11", "fileNamePattern": "{{variant}}_{{version}}_linux_386.tar.gz" },
          { "version": "0.103.0", "fileNamePattern": null }
        ] }
      ],
      "checksumFilePatternHistory": [
        { "version": "0.11", "fileNamePattern": null, "useSpecificVariant": false },
        { "version": "0.18", "fileNamePattern": "{{variant}}_{{version}}_checksums.txt", "useSpecificVariant": false },
        { "version": "0.43", "fileNamePattern": "{{variant}}_{{version}}_checksums.txt", "useSpecificVariant": true }
      ]
    }"#;

    fn store() -> ReleaseMetadataStore {
        ReleaseMetadataStore::from_json(META).unwrap()
    }

    #[test]
    fn resolves_binary_per_era() {
        let s = store();
        let r = ArtifactNameResolver::new(&s);
        assert_eq!(
            r.resolve_binary("0.54.0", "linux", "x64", Variant::Standard).unwrap(),
            "hugo_0.54.0_Linux-64bit.tar.gz"
        );
        assert_eq!(
            r.resolve_binary("0.120.1", "linux", "x64", Variant::Extended).unwrap(),
            "hugo_extended_0.120.1_linux-amd64.tar.gz"
        );
        assert_eq!(
            r.resolve_binary("0.15", "linux", "x64", Variant::Standard).unwrap(),
            "hugo_0.15_linux_amd64.tar.gz"
        );
    }

    #[test]
    fn keeps_literal_version_in_file_name() {
        let s = store();
        let r = ArtifactNameResolver::new(&s);
        assert_eq!(
            r.resolve_binary("0.54.0+build5", "linux", "x64", Variant::Standard).unwrap(),
            "hugo_0.54.0+build5_Linux-64bit.tar.gz"
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let s = store();
        let r = ArtifactNameResolver::new(&s);
        let a = r.resolve_binary("0.80.0", "linux", "x64", Variant::Extended).unwrap();
        let b = r.resolve_binary("0.80.0", "linux", "x64", Variant::Extended).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_platform_and_dropped_versions_fail() {
        let s = store();
        let r = ArtifactNameResolver::new(&s);
        assert!(matches!(
            r.resolve_binary("0.54.0", "plan9", "x64", Variant::Standard),
            Err(InstallError::UnsupportedPlatform { .. })
        ));
        assert!(matches!(
            r.resolve_binary("0.110.0", "linux", "x86", Variant::Standard),
            Err(InstallError::UnsupportedVersion { .. })
        ));
        assert!(matches!(
            r.resolve_binary("0.10", "linux", "x64", Variant::Standard),
            Err(InstallError::UnsupportedVersion { .. })
        ));
        assert!(matches!(
            r.resolve_binary("latest", "linux", "x64", Variant::Standard),
            Err(InstallError::InvalidVersion(_))
        ));
    }

    #[test]
    fn checksum_variant_name_only_when_published_per_variant() {
        let s = store();
        let r = ArtifactNameResolver::new(&s);
        assert_eq!(
            r.resolve_checksum_file("0.30", Variant::Extended).unwrap(),
            "hugo_0.30_checksums.txt"
        );
        assert_eq!(
            r.resolve_checksum_file("0.54.0", Variant::Extended).unwrap(),
            "hugo_extended_0.54.0_checksums.txt"
        );
        assert_eq!(
            r.resolve_checksum_file("0.54.0", Variant::Standard).unwrap(),
            "hugo_0.54.0_checksums.txt"
        );
        assert!(matches!(
            r.resolve_checksum_file("0.12", Variant::Standard),
            Err(InstallError::UnsupportedVersion { .. })
        ));
    }
}
