//! GHS hazard code classification.
//!
//! - [`rules`]: the ordered [`RuleTable`](rules::RuleTable) of exact-code and
//!   code-range rules, including the built-in table.
//! - [`classifier`]: maps a code set to its overall [`HazardLevel`].
//!
//! [`assess`] runs the whole pipeline on a JSON record: walk, extract, classify.

pub mod classifier;
pub mod rules;

use serde_json::Value;

use crate::extractor::CodeExtractor;
use crate::models::{HazardAssessment, HazardLevel};
use crate::walker::walk;

use classifier::{classify, classify_each};
use rules::RuleTable;

/// Extract every hazard code in `record` and classify the result.
pub fn assess(record: &Value, extractor: &CodeExtractor, rules: &RuleTable) -> HazardAssessment {
    let fragments = walk(record);
    let codes = extractor.extract(fragments.iter().copied());
    let level = classify(&codes, rules);

    tracing::debug!(
        fragments = fragments.len(),
        codes = codes.len(),
        %level,
        "assessed hazard record"
    );

    HazardAssessment {
        codes: classify_each(&codes, rules),
        level,
    }
}

/// Whether `level` reaches the configured failure threshold.
pub fn exceeds(level: HazardLevel, threshold: Option<HazardLevel>) -> bool {
    threshold.is_some_and(|t| level >= t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pubchem_record() -> Value {
        json!({
            "Record": {
                "RecordType": "CID",
                "RecordNumber": 2244,
                "Section": [{
                    "TOCHeading": "Safety and Hazards",
                    "Section": [{
                        "TOCHeading": "Hazards Identification",
                        "Section": [{
                            "TOCHeading": "GHS Classification",
                            "Information": [
                                { "ReferenceNumber": 1, "Name": "Pictogram(s)",
                                  "Value": { "StringWithMarkup": [{ "String": " ", "Markup": [] }] } },
                                { "ReferenceNumber": 1, "Name": "GHS Hazard Statements",
                                  "Value": { "StringWithMarkup": [
                                      { "String": "H302 (100%): Harmful if swallowed [Warning Acute toxicity, oral]" },
                                      { "String": "H315 (12%): Causes skin irritation" }
                                  ]}},
                                { "ReferenceNumber": 2, "Name": "GHS Hazard Statements",
                                  "Value": { "StringWithMarkup": [
                                      { "String": "H302: Harmful if swallowed" },
                                      { "String": "H370: Causes damage to organs" }
                                  ]}},
                                { "ReferenceNumber": 2, "Name": "Precautionary Statement Codes",
                                  "Value": { "StringWithMarkup": [{ "String": "P264, P270, P301+P312" }] } }
                            ]
                        }]
                    }]
                }]
            }
        })
    }

    #[test]
    fn test_assess_pubchem_record() {
        let extractor = CodeExtractor::new().unwrap();
        let assessment = assess(&pubchem_record(), &extractor, &RuleTable::builtin());
        assert_eq!(assessment.code_set().to_strings(), vec!["H302", "H315", "H370"]);
        assert_eq!(assessment.level, HazardLevel::Severe);
        assert_eq!(assessment.unclassified(), 0);
    }

    #[test]
    fn test_scenario_wrapped_record() {
        let doc = json!([{
            "Wrapper": {
                "Name": "GHS Hazard Statements",
                "Value": { "StringWithMarkup": [
                    { "String": "H302 Harmful if swallowed" },
                    { "String": "H410 Very toxic to aquatic life with long lasting effects" }
                ]}
            }
        }]);
        let rules =
            RuleTable::from_patterns([("H3xx", HazardLevel::High), ("H4xx", HazardLevel::Moderate)])
                .unwrap();
        let extractor = CodeExtractor::new().unwrap();

        assert_eq!(walk(&doc).len(), 2);
        let assessment = assess(&doc, &extractor, &rules);
        assert_eq!(assessment.code_set().to_strings(), vec!["H302", "H410"]);
        assert_eq!(assessment.level, HazardLevel::High);
    }

    #[test]
    fn test_empty_document() {
        let extractor = CodeExtractor::new().unwrap();
        let assessment = assess(&json!({}), &extractor, &RuleTable::builtin());
        assert!(assessment.codes.is_empty());
        assert_eq!(assessment.level, HazardLevel::None);
    }

    #[test]
    fn test_idempotent() {
        let extractor = CodeExtractor::new().unwrap();
        let rules = RuleTable::builtin();
        let record = pubchem_record();
        assert_eq!(assess(&record, &extractor, &rules), assess(&record, &extractor, &rules));
    }

    #[test]
    fn test_order_independent() {
        let extractor = CodeExtractor::new().unwrap();
        let rules = RuleTable::builtin();
        let a = json!({
            "first": { "Name": "GHS Hazard Statements",
                       "Value": { "StringWithMarkup": [{ "String": "H225" }, { "String": "H319" }] } },
            "second": [{ "Name": "GHS Hazard Statements",
                         "Value": { "StringWithMarkup": [{ "String": "H336" }] } }, 7, null]
        });
        let b = json!({
            "second": [null, 7, { "Name": "GHS Hazard Statements",
                                  "Value": { "StringWithMarkup": [{ "String": "H336" }] } }],
            "first": { "Value": { "StringWithMarkup": [{ "String": "H319" }, { "String": "H225" }] },
                       "Name": "GHS Hazard Statements" }
        });
        assert_eq!(assess(&a, &extractor, &rules), assess(&b, &extractor, &rules));
    }

    #[test]
    fn test_exceeds_threshold() {
        assert!(exceeds(HazardLevel::High, Some(HazardLevel::High)));
        assert!(exceeds(HazardLevel::Critical, Some(HazardLevel::Moderate)));
        assert!(!exceeds(HazardLevel::Low, Some(HazardLevel::Moderate)));
        assert!(!exceeds(HazardLevel::Critical, None));
    }
}
