use anyhow::{bail, Result};

use crate::models::{HazardCode, HazardLevel};

const BUILTIN_EXACT: &[(&[&str], HazardLevel)] = &[
    // Fatal (acute tox. 1-2), unstable and mass-explosion explosives
    (&["H300", "H310", "H330", "H200", "H201", "H202"], HazardLevel::Critical),
    // CMR category 1A/1B, STOT single / repeated exposure 1
    (&["H340", "H350", "H350i", "H370", "H372"], HazardLevel::Severe),
    // Toxic, corrosive, aspiration, respiratory sensitization
    (&["H301", "H311", "H331", "H314", "H318", "H304", "H334"], HazardLevel::High),
    // Projection / fire hazards, pyrophoric, water-reactive
    (&["H203", "H250", "H260"], HazardLevel::High),
    // Harmful, eye irritation, skin sensitization, CMR category 2, STOT 2
    (
        &["H302", "H312", "H332", "H317", "H319", "H341", "H351", "H371", "H373"],
        HazardLevel::Moderate,
    ),
    // Acute / chronic aquatic 1
    (&["H400", "H410"], HazardLevel::Moderate),
    // Extremely / highly flammable, self-reactive, strong oxidizers
    (&["H220", "H224", "H225", "H240", "H241", "H271"], HazardLevel::Moderate),
    // May be harmful, skin irritation, STOT SE 3
    (
        &["H303", "H313", "H333", "H315", "H316", "H320", "H335", "H336"],
        HazardLevel::Low,
    ),
    // Chronic aquatic 2-4
    (&["H411", "H412", "H413"], HazardLevel::Low),
    // Flammable, combustible, corrosive to metals
    (&["H226", "H227", "H228", "H290"], HazardLevel::Low),
];

const BUILTIN_RANGES: &[(&str, HazardLevel)] = &[
    // Reproductive toxicity with F/D/f/d suffixes
    ("H360", HazardLevel::Severe),
    ("H361", HazardLevel::Moderate),
    ("H20x", HazardLevel::High),
    ("H2xx", HazardLevel::Low),
    ("H3xx", HazardLevel::Low),
    ("H4xx", HazardLevel::Low),
];

/// How a rule selects hazard codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeMatcher {
    /// Exactly this code, suffix included.
    Exact(HazardCode),
    /// Any code whose digits start with `prefix`, whatever its suffix.
    /// Written `H3xx`, `H30x` or `H360`.
    Range { prefix: String },
}

impl CodeMatcher {
    /// Parse a rule pattern.
    ///
    /// Patterns containing `x` wildcards are ranges; anything else must be a
    /// complete code and matches exactly.
    pub fn parse(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim();
        if trimmed.contains(['x', 'X']) {
            return Self::range(trimmed);
        }
        match HazardCode::parse(trimmed) {
            Some(code) => Ok(CodeMatcher::Exact(code)),
            None => bail!("invalid hazard code pattern '{}'", pattern),
        }
    }

    /// Parse a range pattern. `H360` is also accepted here and covers every
    /// suffixed variant of H360.
    pub fn range(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim();
        let body = match trimmed.strip_prefix(['H', 'h']) {
            Some(body) if body.len() == 3 => body,
            _ => bail!("invalid hazard code range '{}': expected H plus three digits or x", pattern),
        };

        let prefix: String = body
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let wildcards = &body[prefix.len()..];

        if prefix.is_empty() || !wildcards.chars().all(|c| c == 'x' || c == 'X') {
            bail!("invalid hazard code range '{}': wildcards must trail at least one digit", pattern);
        }

        Ok(CodeMatcher::Range { prefix })
    }

    pub fn matches(&self, code: &HazardCode) -> bool {
        match self {
            CodeMatcher::Exact(exact) => exact == code,
            CodeMatcher::Range { prefix } => code.digits().starts_with(prefix.as_str()),
        }
    }

    /// Sort key for configured rules: exact codes first, then narrower ranges.
    pub(crate) fn specificity(&self) -> usize {
        match self {
            CodeMatcher::Exact(_) => 0,
            CodeMatcher::Range { prefix } => 4 - prefix.len(),
        }
    }
}

impl std::fmt::Display for CodeMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeMatcher::Exact(code) => write!(f, "{}", code),
            CodeMatcher::Range { prefix } => {
                write!(f, "H{}{}", prefix, "x".repeat(3 - prefix.len()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRule {
    pub matcher: CodeMatcher,
    pub level: HazardLevel,
}

/// Ordered classification rules. The first rule that matches a code decides
/// its level.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<ClassificationRule>,
}

impl RuleTable {
    /// Build a table from `(pattern, level)` pairs, in order.
    pub fn from_patterns<'a, I>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, HazardLevel)>,
    {
        let rules = patterns
            .into_iter()
            .map(|(pattern, level)| {
                Ok(ClassificationRule {
                    matcher: CodeMatcher::parse(pattern)?,
                    level,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RuleTable { rules })
    }

    /// Built-in table grouped by GHS hazard category.
    ///
    /// Exact codes come first; the trailing ranges give every remaining
    /// statement of a class a floor level.
    pub fn builtin() -> Self {
        let mut rules = Vec::new();
        for (codes, level) in BUILTIN_EXACT {
            // Every entry is checked by `test_builtin_entries_parse`.
            rules.extend(codes.iter().filter_map(|code| HazardCode::parse(code)).map(|code| {
                ClassificationRule {
                    matcher: CodeMatcher::Exact(code),
                    level: *level,
                }
            }));
        }
        for (pattern, level) in BUILTIN_RANGES {
            if let Ok(matcher) = CodeMatcher::range(pattern) {
                rules.push(ClassificationRule {
                    matcher,
                    level: *level,
                });
            }
        }

        RuleTable { rules }
    }

    /// Level of the first rule matching `code`, or `None` if no rule applies.
    pub fn level_of(&self, code: &HazardCode) -> Option<HazardLevel> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(code))
            .map(|rule| rule.level)
    }

    /// Place `rules` ahead of the existing ones so they take precedence.
    pub fn prepend(&mut self, mut rules: Vec<ClassificationRule>) {
        rules.append(&mut self.rules);
        self.rules = rules;
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
