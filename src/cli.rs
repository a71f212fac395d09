use std::path::PathBuf;

use clap::Parser;

use ghs_checkr::models::HazardLevel;

#[derive(Parser, Debug)]
#[command(
    name = "ghs-checkr",
    about = "Look up GHS hazard statements for chemical substances and classify their severity",
    version
)]
pub struct Cli {
    /// CAS numbers or substance names to look up on PubChem
    #[arg(value_name = "IDENTIFIER")]
    pub identifiers: Vec<String>,

    /// Assess a saved PubChem JSON record instead of fetching one (repeatable)
    #[arg(long = "input", value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Config file [default: ./.ghs-checkr/config.toml, fallback ~/.config/ghs-checkr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Exit with code 1 when any substance reaches this level (overrides config)
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<LevelArg>,

    /// Show every code and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print one summary line per substance
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LevelArg {
    Low,
    Moderate,
    High,
    Severe,
    Critical,
}

impl From<LevelArg> for HazardLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Low => HazardLevel::Low,
            LevelArg::Moderate => HazardLevel::Moderate,
            LevelArg::High => HazardLevel::High,
            LevelArg::Severe => HazardLevel::Severe,
            LevelArg::Critical => HazardLevel::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifiers_and_flags() {
        let cli = Cli::parse_from([
            "ghs-checkr",
            "60628-96-8",
            "ethanol",
            "--report",
            "json",
            "--fail-on",
            "severe",
        ]);
        assert_eq!(cli.identifiers, vec!["60628-96-8", "ethanol"]);
        assert!(matches!(cli.report, ReportFormat::Json));
        assert_eq!(cli.fail_on.map(HazardLevel::from), Some(HazardLevel::Severe));
    }

    #[test]
    fn test_repeated_input() {
        let cli = Cli::parse_from(["ghs-checkr", "--input", "a.json", "--input", "b.json"]);
        assert!(cli.identifiers.is_empty());
        assert_eq!(cli.inputs.len(), 2);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["ghs-checkr", "-q", "-v", "x"]).is_err());
    }
}
