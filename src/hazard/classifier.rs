use crate::hazard::rules::RuleTable;
use crate::models::{CodeLevel, HazardCodeSet, HazardLevel};

/// Classify a set of hazard codes into one overall level.
///
/// The result is the highest level among codes that match a rule. Codes with
/// no rule are ignored here; an empty set, or one where nothing matches,
/// yields [`HazardLevel::None`].
pub fn classify(codes: &HazardCodeSet, rules: &RuleTable) -> HazardLevel {
    codes
        .iter()
        .filter_map(|code| rules.level_of(code))
        .max()
        .unwrap_or(HazardLevel::None)
}

/// Level of each code in ascending code order. Unmatched codes are kept with
/// `level: None` so they still reach the report.
pub fn classify_each(codes: &HazardCodeSet, rules: &RuleTable) -> Vec<CodeLevel> {
    codes
        .iter()
        .map(|code| CodeLevel {
            code: code.clone(),
            level: rules.level_of(code),
        })
        .collect()
}
