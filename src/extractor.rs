use anyhow::Result;
use regex::Regex;

use crate::models::{HazardCode, HazardCodeSet};

/// Pulls hazard codes out of free-text hazard statements.
///
/// Only the first code in a fragment is used. PubChem writes one statement per
/// string (`"H302 (100%): Harmful if swallowed"`), so anything after the first
/// code is statement text, not another code.
pub struct CodeExtractor {
    pattern: Regex,
}

impl CodeExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"[Hh][0-9]{3}[A-Za-z]*")?,
        })
    }

    /// First code in `fragment`, if any.
    pub fn extract_code(&self, fragment: &str) -> Option<HazardCode> {
        let found = self.pattern.find(fragment)?;
        HazardCode::parse(found.as_str())
    }

    /// Collect the first code of every fragment into a sorted, deduplicated set.
    pub fn extract<'a, I>(&self, fragments: I) -> HazardCodeSet
    where
        I: IntoIterator<Item = &'a str>,
    {
        fragments
            .into_iter()
            .filter_map(|fragment| self.extract_code(fragment))
            .collect()
    }
}
