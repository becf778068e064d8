//! Matching tracker rows to scraped study guides.
//!
//! Matching is heuristic: a guide is chosen by keywords in the
//! certification name and the guide's source key, never by an explicit
//! identifier.

use crate::models::ScrapedGuide;
use serde::{Deserialize, Serialize};

/// Strategy mapping a certification name to at most one guide.
pub trait GuideMatcher {
    fn match_guide<'g>(&self, cert_name: &str, guides: &'g [ScrapedGuide])
        -> Option<&'g ScrapedGuide>;
}

/// One keyword rule: certifications whose name contains `name_contains`
/// take the first guide whose source key contains `key_contains`.
/// Both comparisons are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRule {
    pub name_contains: String,
    pub key_contains: String,
}

impl MatchRule {
    pub fn new(name_contains: &str, key_contains: &str) -> Self {
        Self {
            name_contains: name_contains.to_string(),
            key_contains: key_contains.to_string(),
        }
    }

    fn applies_to(&self, cert_name_lower: &str) -> bool {
        cert_name_lower.contains(&self.name_contains.to_lowercase())
    }

    fn accepts(&self, guide: &ScrapedGuide) -> bool {
        guide
            .source_key
            .to_lowercase()
            .contains(&self.key_contains.to_lowercase())
    }
}

/// The built-in rule table: Power BI certifications use the PL-300 guide.
pub fn default_rules() -> Vec<MatchRule> {
    vec![MatchRule::new("power bi", "pl300")]
}

/// Registry of keyword rules, tried in order.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    rules: Vec<MatchRule>,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl KeywordMatcher {
    pub fn new(rules: Vec<MatchRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }
}

impl GuideMatcher for KeywordMatcher {
    fn match_guide<'g>(
        &self,
        cert_name: &str,
        guides: &'g [ScrapedGuide],
    ) -> Option<&'g ScrapedGuide> {
        let name = cert_name.to_lowercase();
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(&name))
            .find_map(|rule| guides.iter().find(|g| rule.accepts(g)))
    }
}

/// Match with the built-in rules.
#[allow(dead_code)] // Convenience wrapper, the binary passes configured rules
pub fn match_guide<'g>(cert_name: &str, guides: &'g [ScrapedGuide]) -> Option<&'g ScrapedGuide> {
    KeywordMatcher::default().match_guide(cert_name, guides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn guide(key: &str) -> ScrapedGuide {
        ScrapedGuide {
            source_key: key.to_string(),
            certification_title: format!("Guide {}", key),
            source_url: format!("https://example.com/{}", key),
            scraped_date: String::new(),
            skills: vec!["Skill".to_string()],
            resources: Vec::new(),
            exam_details: BTreeMap::new(),
        }
    }

    #[test]
    fn test_power_bi_matches_pl300() {
        let guides = vec![guide("az900"), guide("pl300")];
        let matched = match_guide("Microsoft Power BI Data Analyst Professional", &guides);
        assert_eq!(matched.map(|g| g.source_key.as_str()), Some("pl300"));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let guides = vec![guide("PL300")];
        assert!(match_guide("POWER BI essentials", &guides).is_some());
    }

    #[test]
    fn test_azure_matches_nothing() {
        let guides = vec![guide("pl300"), guide("dp203"), guide("azure")];
        assert!(match_guide("Azure Data Engineer Associate", &guides).is_none());
    }

    #[test]
    fn test_power_bi_without_pl300_guide() {
        let guides = vec![guide("dp203")];
        assert!(match_guide("Microsoft Power BI Data Analyst Professional", &guides).is_none());
    }

    #[test]
    fn test_custom_rules_are_tried_in_order() {
        let matcher = KeywordMatcher::new(vec![
            MatchRule::new("azure data engineer", "dp203"),
            MatchRule::new("azure", "az900"),
        ]);
        let guides = vec![guide("az900"), guide("dp203")];

        let matched = matcher.match_guide("Azure Data Engineer Associate", &guides);
        assert_eq!(matched.map(|g| g.source_key.as_str()), Some("dp203"));

        let matched = matcher.match_guide("Azure Fundamentals", &guides);
        assert_eq!(matched.map(|g| g.source_key.as_str()), Some("az900"));
    }
}
