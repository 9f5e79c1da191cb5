// ── Green hosting lookup ──
//
// The set of domains known to run on renewable power. Populated by the
// caller, usually from the greencheck API, and only ever read here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Domains hosted on green infrastructure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GreenDomainSet(HashSet<String>);

impl GreenDomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, domain: impl Into<String>) -> bool {
        self.0.insert(domain.into())
    }

    /// Whether `domain` is known to be green.
    pub fn check(&self, domain: &str) -> bool {
        self.0.contains(domain)
    }

    /// The subset of `domains` that are green, in input order.
    pub fn check_all<'a, I>(&self, domains: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        domains
            .into_iter()
            .filter(|d| self.check(d))
            .map(str::to_owned)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for GreenDomainSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for GreenDomainSet {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_single_domain() {
        let set: GreenDomainSet = ["www.thegreenwebfoundation.org"].into_iter().collect();
        assert!(set.check("www.thegreenwebfoundation.org"));
        assert!(!set.check("example.com"));
    }

    #[test]
    fn check_all_keeps_input_order() {
        let set: GreenDomainSet = ["b.org", "a.org"].into_iter().collect();
        let green = set.check_all(["a.org", "x.org", "b.org"]);
        assert_eq!(green, ["a.org", "b.org"]);
    }

    #[test]
    fn deserializes_from_a_plain_list() {
        let set: GreenDomainSet = serde_json::from_str(r#"["a.org", "a.org", "b.org"]"#)
            .unwrap_or_default();
        assert_eq!(set.len(), 2);
    }
}
