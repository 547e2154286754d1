//! Which target languages a task may be translated into.
//!
//! Languages belong to groups, and translation is offered between groups
//! that are explicitly paired. A target is available for a source when it
//! sits in a different group that is paired with the source's group.

use std::collections::{HashMap, HashSet};

use super::config::LanguagesConfig;

/// Lookup over configured language groups and group pairs.
#[derive(Debug, Clone, Default)]
pub struct LanguagePairing {
    /// Every known language code, in configured order
    languages: Vec<String>,
    group_of: HashMap<String, String>,
    pairs: Vec<(String, String)>,
}

impl LanguagePairing {
    /// Build from `(group, codes)` entries and unordered group pairs.
    pub fn new<G, P>(groups: G, pairs: P) -> Self
    where
        G: IntoIterator<Item = (String, Vec<String>)>,
        P: IntoIterator<Item = (String, String)>,
    {
        let mut languages = Vec::new();
        let mut group_of = HashMap::new();
        for (group, codes) in groups {
            for code in codes {
                if group_of.insert(code.clone(), group.clone()).is_none() {
                    languages.push(code);
                }
            }
        }

        Self {
            languages,
            group_of,
            pairs: pairs.into_iter().collect(),
        }
    }

    /// Group `code` belongs to, if it is a known language.
    pub fn group_of(&self, code: &str) -> Option<&str> {
        self.group_of.get(code).map(String::as_str)
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Target languages offered for `source`, in configured order.
    ///
    /// With no source every known language is offered. An unknown source
    /// has no group and so no targets.
    pub fn available_targets(&self, source: Option<&str>) -> Vec<&str> {
        let Some(source) = source.filter(|code| !code.is_empty()) else {
            return self.languages.iter().map(String::as_str).collect();
        };
        let Some(group) = self.group_of(source) else {
            return Vec::new();
        };

        let reachable: HashSet<&str> = self
            .pairs
            .iter()
            .filter(|(a, b)| a == group || b == group)
            .flat_map(|(a, b)| [a.as_str(), b.as_str()])
            .collect();

        self.languages
            .iter()
            .map(String::as_str)
            .filter(|code| {
                self.group_of(code)
                    .is_some_and(|inner| inner != group && reachable.contains(inner))
            })
            .collect()
    }

    /// Whether translating `source` into `target` is offered.
    pub fn is_supported(&self, source: &str, target: &str) -> bool {
        self.available_targets(Some(source)).contains(&target)
    }
}

impl From<&LanguagesConfig> for LanguagePairing {
    fn from(config: &LanguagesConfig) -> Self {
        Self::new(
            config
                .groups
                .iter()
                .map(|group| (group.name.clone(), group.languages.clone())),
            config.pairs.iter().cloned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairing() -> LanguagePairing {
        LanguagePairing::new(
            [
                ("en".to_string(), vec!["en-us".to_string(), "en-gb".to_string()]),
                ("es".to_string(), vec!["es".to_string()]),
                ("pt".to_string(), vec!["pt-br".to_string()]),
                ("ja".to_string(), vec!["ja".to_string()]),
            ],
            [
                ("en".to_string(), "es".to_string()),
                ("pt".to_string(), "en".to_string()),
            ],
        )
    }

    #[test]
    fn test_no_source_offers_every_language() {
        let pairing = pairing();
        assert_eq!(
            pairing.available_targets(None),
            vec!["en-us", "en-gb", "es", "pt-br", "ja"]
        );
        assert_eq!(pairing.available_targets(Some("")).len(), 5);
    }

    #[test]
    fn test_same_group_is_excluded() {
        let pairing = pairing();
        let targets = pairing.available_targets(Some("en-us"));
        assert!(!targets.contains(&"en-gb"));
        assert!(!targets.contains(&"en-us"));
        assert!(!pairing.is_supported("en-us", "en-gb"));
    }

    #[test]
    fn test_paired_groups_in_either_direction() {
        let pairing = pairing();
        assert_eq!(pairing.available_targets(Some("en-gb")), vec!["es", "pt-br"]);
        assert_eq!(pairing.available_targets(Some("es")), vec!["en-us", "en-gb"]);
        assert!(pairing.is_supported("pt-br", "en-us"));
        assert!(!pairing.is_supported("es", "pt-br"));
    }

    #[test]
    fn test_unpaired_or_unknown_source_has_no_targets() {
        let pairing = pairing();
        assert!(pairing.available_targets(Some("ja")).is_empty());
        assert!(pairing.available_targets(Some("xx")).is_empty());
        assert_eq!(pairing.group_of("pt-br"), Some("pt"));
    }

    #[test]
    fn test_from_yaml_config() {
        let config: LanguagesConfig = serde_yaml::from_str(
            "groups:\n  - name: en\n    languages: [en]\n  - name: fr\n    languages: [fr]\npairs:\n  - [fr, en]\n",
        )
        .unwrap();
        let pairing = LanguagePairing::from(&config);
        assert_eq!(pairing.available_targets(Some("en")), vec!["fr"]);
    }
}
