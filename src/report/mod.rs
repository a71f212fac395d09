//! Report renderers for hazard assessments.
//!
//! - [`terminal`]: colored per-substance tables with a summary box; respects `--verbose` / `--quiet`.
//! - [`to_json`]: machine-readable output for `--report json`.

pub mod terminal;

use anyhow::Result;

use crate::models::SubstanceReport;

/// Serialize reports as pretty-printed JSON. Codes appear as canonical strings
/// in ascending order, levels in lowercase.
pub fn to_json(reports: &[SubstanceReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CodeLevel, HazardAssessment, HazardCode, HazardLevel, RecordSource};
    use serde_json::{json, Value};

    #[test]
    fn test_json_shape() {
        let reports = vec![
            SubstanceReport::assessed(
                "60628-96-8".to_string(),
                Some(6093),
                RecordSource::FullRecord,
                HazardAssessment {
                    codes: vec![
                        CodeLevel {
                            code: HazardCode::parse("H302").unwrap(),
                            level: Some(HazardLevel::Moderate),
                        },
                        CodeLevel {
                            code: HazardCode::parse("H999").unwrap(),
                            level: None,
                        },
                    ],
                    level: HazardLevel::Moderate,
                },
            ),
            SubstanceReport::failed("unknownium".to_string(), "lookup failed".to_string()),
        ];

        let value: Value = serde_json::from_str(&to_json(&reports).unwrap()).unwrap();
        assert_eq!(
            value[0],
            json!({
                "query": "60628-96-8",
                "cid": 6093,
                "source": "full_record",
                "codes": [
                    { "code": "H302", "level": "moderate" },
                    { "code": "H999", "level": null }
                ],
                "level": "moderate"
            })
        );
        assert_eq!(value[1]["error"], "lookup failed");
        assert_eq!(value[1]["level"], "none");
        assert_eq!(value[1]["source"], Value::Null);
    }
}
