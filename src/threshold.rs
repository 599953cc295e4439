//! Version-threshold tables.
//!
//! A table is an oldest-to-newest list of [`NamingRule`]s, each saying "from
//! this version on, the value is X". The value in effect for a version is the
//! one attached to the greatest threshold that is not newer than it.

use crate::version::ReleaseVersion;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRule<T> {
    pub effective_from: ReleaseVersion,
    pub value: T,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("threshold {next} does not come after {previous}")]
    NotIncreasing { previous: String, next: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionThresholdTable<T> {
    rules: Vec<NamingRule<T>>,
}

impl<T> Default for VersionThresholdTable<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> VersionThresholdTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rules read oldest-first, rejecting any threshold that does
    /// not strictly follow its predecessor.
    pub fn from_rules(rules: Vec<NamingRule<T>>) -> Result<Self, ThresholdError> {
        let mut table = Self::new();
        for rule in rules {
            table.push(rule.effective_from, rule.value)?;
        }
        Ok(table)
    }

    pub fn push(&mut self, effective_from: ReleaseVersion, value: T) -> Result<(), ThresholdError> {
        if let Some(last) = self.rules.last() {
            if effective_from <= last.effective_from {
                return Err(ThresholdError::NotIncreasing {
                    previous: last.effective_from.to_string(),
                    next: effective_from.to_string(),
                });
            }
        }
        self.rules.push(NamingRule {
            effective_from,
            value,
        });
        Ok(())
    }

    /// The rule with the greatest threshold `<= version`, or `None` if the
    /// version predates all history. A later rule wins a tie.
    pub fn effective_rule_at(&self, version: &ReleaseVersion) -> Option<&NamingRule<T>> {
        let mut effective = None;
        for rule in &self.rules {
            if rule.effective_from <= *version {
                effective = Some(rule);
            }
        }
        effective
    }

    pub fn rules(&self) -> &[NamingRule<T>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ReleaseVersion {
        ReleaseVersion::parse(s).unwrap()
    }

    fn table() -> VersionThresholdTable<&'static str> {
        let mut t = VersionThresholdTable::new();
        t.push(v("0.20.0"), "A").unwrap();
        t.push(v("0.50.0"), "B").unwrap();
        t
    }

    #[test]
    fn picks_greatest_threshold_not_after_query() {
        let t = table();
        assert_eq!(t.effective_rule_at(&v("0.49.9")).map(|r| r.value), Some("A"));
        assert_eq!(t.effective_rule_at(&v("0.50.0")).map(|r| r.value), Some("B"));
        assert_eq!(t.effective_rule_at(&v("1.0.0")).map(|r| r.value), Some("B"));
        assert!(t.effective_rule_at(&v("0.10.0")).is_none());
    }

    #[test]
    fn coerced_forms_hit_the_same_rule() {
        let t = table();
        let a = t.effective_rule_at(&v("0.54.0")).unwrap();
        let b = t.effective_rule_at(&v("0.54.0+build5")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_non_increasing_thresholds() {
        let mut t = table();
        let err = t.push(v("0.50"), "C").unwrap_err();
        assert_eq!(
            err,
            ThresholdError::NotIncreasing {
                previous: "0.50.0".into(),
                next: "0.50".into()
            }
        );
        assert!(t.push(v("0.30.0"), "C").is_err());
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn empty_table_resolves_nothing() {
        let t: VersionThresholdTable<()> = VersionThresholdTable::new();
        assert!(t.is_empty());
        assert!(t.effective_rule_at(&v("0.1.0")).is_none());
    }
}
