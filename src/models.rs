use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A canonical GHS hazard statement code: `H`, three digits, optional letter suffix.
///
/// Ordering and equality follow the canonical string, so `H302 < H302a < H310`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct HazardCode(String);

impl HazardCode {
    /// Parse a complete code token. A lowercase leading `h` is accepted and
    /// upper-cased; the letter suffix keeps its case (`H350i`, `H360FD`).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let mut chars = raw.chars();
        if !matches!(chars.next(), Some('H' | 'h')) {
            return None;
        }
        let rest = chars.as_str();
        let digits = rest.as_bytes().get(..3)?;
        if !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        if !rest[3..].chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        Some(HazardCode(format!("H{}", rest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The three statement digits, e.g. `"302"` for `H302`.
    pub fn digits(&self) -> &str {
        &self.0[1..4]
    }
}

impl std::fmt::Display for HazardCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deduplicated hazard codes, always materialized in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HazardCodeSet(BTreeSet<HazardCode>);

impl HazardCodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the code was already present.
    pub fn insert(&mut self, code: HazardCode) -> bool {
        self.0.insert(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HazardCode> {
        self.0.iter()
    }

    pub fn is_subset(&self, other: &HazardCodeSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Canonical strings in ascending order.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|c| c.to_string()).collect()
    }
}

impl FromIterator<HazardCode> for HazardCodeSet {
    fn from_iter<I: IntoIterator<Item = HazardCode>>(iter: I) -> Self {
        HazardCodeSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a HazardCodeSet {
    type Item = &'a HazardCode;
    type IntoIter = std::collections::btree_set::Iter<'a, HazardCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Overall severity, totally ordered from `None` (lowest) to `Critical`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HazardLevel {
    #[default]
    None,
    Low,
    Moderate,
    High,
    Severe,
    Critical,
}

impl std::fmt::Display for HazardLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HazardLevel::None => write!(f, "NONE"),
            HazardLevel::Low => write!(f, "LOW"),
            HazardLevel::Moderate => write!(f, "MODERATE"),
            HazardLevel::High => write!(f, "HIGH"),
            HazardLevel::Severe => write!(f, "SEVERE"),
            HazardLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A reported code together with the level of the rule it matched, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeLevel {
    pub code: HazardCode,
    pub level: Option<HazardLevel>,
}

/// Result of running the extraction and classification pipeline on one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HazardAssessment {
    pub codes: Vec<CodeLevel>,
    pub level: HazardLevel,
}

impl HazardAssessment {
    pub fn code_set(&self) -> HazardCodeSet {
        self.codes.iter().map(|c| c.code.clone()).collect()
    }

    pub fn unclassified(&self) -> usize {
        self.codes.iter().filter(|c| c.level.is_none()).count()
    }
}

/// Where the hazard record for a substance came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// PubChem "Safety and Hazards" section.
    Heading,
    /// Full PubChem compound record, used when the section is missing.
    FullRecord,
    /// Local JSON document.
    File(PathBuf),
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSource::Heading => write!(f, "pubchem (safety and hazards)"),
            RecordSource::FullRecord => write!(f, "pubchem (full record)"),
            RecordSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One row of output: a queried substance and its assessment or lookup error.
#[derive(Debug, Clone, Serialize)]
pub struct SubstanceReport {
    pub query: String,
    pub cid: Option<u64>,
    pub source: Option<RecordSource>,
    pub codes: Vec<CodeLevel>,
    pub level: HazardLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubstanceReport {
    pub fn assessed(
        query: String,
        cid: Option<u64>,
        source: RecordSource,
        assessment: HazardAssessment,
    ) -> Self {
        SubstanceReport {
            query,
            cid,
            source: Some(source),
            codes: assessment.codes,
            level: assessment.level,
            error: None,
        }
    }

    pub fn failed(query: String, error: String) -> Self {
        SubstanceReport {
            query,
            cid: None,
            source: None,
            codes: Vec::new(),
            level: HazardLevel::None,
            error: Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
