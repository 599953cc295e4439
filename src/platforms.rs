use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

pub const SUPPORTED_OS: &[&str] = &["darwin", "freebsd", "linux", "openbsd", "win32"];
pub const SUPPORTED_ARCH: &[&str] = &["arm", "arm64", "x64", "x86"];

/// Matches release asset names for one OS or one architecture.
#[derive(Debug)]
pub struct AssetMatcher {
    include: Regex,
    exclude: Option<Regex>,
}

impl AssetMatcher {
    fn new(include: &str, exclude: Option<&str>) -> Self {
        let build = |p: &str| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .expect("static regex")
        };
        Self {
            include: build(include),
            exclude: exclude.map(build),
        }
    }

    pub fn matches(&self, asset_name: &str) -> bool {
        self.include.is_match(asset_name)
            && !self.exclude.as_ref().is_some_and(|ex| ex.is_match(asset_name))
    }
}

static OS_MATCHERS: Lazy<Vec<(&'static str, AssetMatcher)>> = Lazy::new(|| {
    vec![
        ("darwin", AssetMatcher::new("macos|darwin|osx", None)),
        ("freebsd", AssetMatcher::new("freebsd", None)),
        ("linux", AssetMatcher::new("linux", None)),
        ("openbsd", AssetMatcher::new("openbsd", None)),
        ("win32", AssetMatcher::new("windows", None)),
    ]
});

// macOS "universal" archives serve both Intel and Apple Silicon.
static ARCH_MATCHERS: Lazy<Vec<(&'static str, AssetMatcher)>> = Lazy::new(|| {
    vec![
        ("arm", AssetMatcher::new("arm", Some("arm64"))),
        ("arm64", AssetMatcher::new("arm64|aarch64|universal", None)),
        ("x64", AssetMatcher::new("64bit|amd64|x86_64|universal", Some("arm64"))),
        ("x86", AssetMatcher::new("32bit|386|i686", None)),
    ]
});

pub fn os_matcher(os: &str) -> Option<&'static AssetMatcher> {
    OS_MATCHERS.iter().find(|(k, _)| *k == os).map(|(_, m)| m)
}

pub fn arch_matcher(arch: &str) -> Option<&'static AssetMatcher> {
    ARCH_MATCHERS.iter().find(|(k, _)| *k == arch).map(|(_, m)| m)
}

/// Every (os, arch) pair the metadata generator analyses.
pub fn os_arch_combinations() -> Vec<(&'static str, &'static str)> {
    vec![
        ("darwin", "arm64"),
        ("darwin", "x64"),
        ("freebsd", "arm"),
        ("freebsd", "x64"),
        ("freebsd", "x86"),
        ("linux", "arm"),
        ("linux", "arm64"),
        ("linux", "x64"),
        ("linux", "x86"),
        ("openbsd", "arm"),
        ("openbsd", "x64"),
        ("openbsd", "x86"),
        ("win32", "arm64"),
        ("win32", "x64"),
        ("win32", "x86"),
    ]
}

pub fn detect_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

pub fn detect_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "x86" => "x86",
        "aarch64" => "arm64",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(os: &str, arch: &str, name: &str) -> bool {
        os_matcher(os).unwrap().matches(name) && arch_matcher(arch).unwrap().matches(name)
    }

    #[test]
    fn legacy_and_current_linux_names() {
        assert!(matches("linux", "x64", "hugo_0.54.0_Linux-64bit.tar.gz"));
        assert!(matches("linux", "x64", "hugo_0.120.0_linux-amd64.tar.gz"));
        assert!(!matches("linux", "x64", "hugo_0.120.0_linux-arm64.tar.gz"));
        assert!(matches("linux", "arm64", "hugo_0.54.0_Linux-ARM64.tar.gz"));
        assert!(matches("linux", "arm", "hugo_0.54.0_Linux-ARM.tar.gz"));
        assert!(!matches("linux", "arm", "hugo_0.54.0_Linux-ARM64.tar.gz"));
        assert!(matches("linux", "x86", "hugo_0.54.0_Linux-32bit.tar.gz"));
    }

    #[test]
    fn universal_darwin_serves_both_arches() {
        let name = "hugo_0.120.0_darwin-universal.tar.gz";
        assert!(matches("darwin", "x64", name));
        assert!(matches("darwin", "arm64", name));
        assert!(!matches("linux", "x64", name));
    }

    #[test]
    fn combinations_only_use_supported_values() {
        for (os, arch) in os_arch_combinations() {
            assert!(SUPPORTED_OS.contains(&os), "{os}");
            assert!(SUPPORTED_ARCH.contains(&arch), "{arch}");
        }
        assert!(os_matcher("solaris").is_none());
    }
}
