use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::fmt;

// First run of up to three dot-separated numeric components, anywhere in the string.
static COERCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("static regex"));

/// Reduce a loosely formatted version string to strict `major.minor.patch`.
///
/// Prefixes (`v0.54.0`), suffixes, pre-release tags and build metadata are
/// ignored. Missing minor/patch components default to zero, so upstream tags
/// like `0.16` coerce to `0.16.0`.
pub fn coerce(raw: &str) -> Option<Version> {
    let caps = COERCE_RE.captures(raw)?;
    let part = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// A release version as written upstream, ordered by its coerced form.
#[derive(Debug, Clone)]
pub struct ReleaseVersion {
    raw: String,
    coerced: Version,
}

impl ReleaseVersion {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        coerce(raw).map(|coerced| Self {
            raw: raw.to_string(),
            coerced,
        })
    }

    /// The literal string, used for file names and URLs.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn coerced(&self) -> &Version {
        &self.coerced
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for ReleaseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.coerced == other.coerced
    }
}

impl Eq for ReleaseVersion {}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.coerced.cmp(&other.coerced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_partial_and_decorated_versions() {
        assert_eq!(coerce("0.16"), Some(Version::new(0, 16, 0)));
        assert_eq!(coerce("v0.54.0"), Some(Version::new(0, 54, 0)));
        assert_eq!(coerce("0.54.0+build5"), Some(Version::new(0, 54, 0)));
        assert_eq!(coerce("0.55.0-DEV"), Some(Version::new(0, 55, 0)));
        assert_eq!(coerce("hugo 1"), Some(Version::new(1, 0, 0)));
        assert_eq!(coerce("latest"), None);
    }

    #[test]
    fn orders_numerically_not_lexically() {
        let a = ReleaseVersion::parse("0.9").unwrap();
        let b = ReleaseVersion::parse("0.10").unwrap();
        let c = ReleaseVersion::parse("0.103.0").unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn build_metadata_compares_equal_but_keeps_raw() {
        let plain = ReleaseVersion::parse("0.54.0").unwrap();
        let build = ReleaseVersion::parse("0.54.0+build5").unwrap();
        assert_eq!(plain, build);
        assert_eq!(build.raw(), "0.54.0+build5");
        assert_eq!(build.to_string(), "0.54.0+build5");
    }
}
