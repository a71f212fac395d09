//! `ghs-checkr`: look up GHS hazard statements and classify their severity.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config and build the classification table ([`load_config`]).
//! 3. Read local records (`--input`) and fetch identifiers from PubChem ([`registry`]).
//! 4. Walk each record for hazard statements, extract codes and classify them
//!    ([`hazard::assess`]).
//! 5. Render the requested report ([`report`]).
//! 6. Exit `0`, or `1` if a lookup failed or a substance reached `--fail-on`.

mod cli;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use ghs_checkr::config::load_config;
use ghs_checkr::extractor::CodeExtractor;
use ghs_checkr::hazard::{self, rules::RuleTable};
use ghs_checkr::models::{HazardLevel, RecordSource, SubstanceReport};
use ghs_checkr::registry::{self, pubchem::PubChemClient};
use ghs_checkr::report;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.identifiers.is_empty() && cli.inputs.is_empty() {
        eprintln!("Nothing to check: pass a CAS number or name, or --input FILE");
        std::process::exit(1);
    }

    let working_dir = std::env::current_dir()?;
    let config = load_config(&working_dir, cli.config.as_deref())?;
    let rules = config.classification.rule_table()?;
    let extractor = CodeExtractor::new()?;
    let fail_on: Option<HazardLevel> = cli
        .fail_on
        .map(Into::into)
        .or(config.classification.fail_on);

    tracing::debug!(rules = rules.len(), ?fail_on, "classification table ready");

    let mut reports = Vec::new();

    for path in &cli.inputs {
        let query = path.display().to_string();
        let report = match registry::read_local(path) {
            Ok(record) => SubstanceReport::assessed(
                query,
                None,
                RecordSource::File(path.clone()),
                hazard::assess(&record, &extractor, &rules),
            ),
            Err(e) => SubstanceReport::failed(query, format!("{:#}", e)),
        };
        reports.push(report);
    }

    if !cli.identifiers.is_empty() {
        let client = PubChemClient::new(&config.lookup)?;
        let fetched = lookup_all(
            &client,
            &cli.identifiers,
            config.lookup.concurrency,
            &extractor,
            &rules,
            cli.quiet,
        )
        .await;
        reports.extend(fetched);
    }

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&reports, cli.verbose, cli.quiet)?,
        ReportFormat::Json => println!("{}", report::to_json(&reports)?),
    }

    let failed = reports.iter().any(|r| r.is_failed());
    let exceeded = reports
        .iter()
        .any(|r| !r.is_failed() && hazard::exceeds(r.level, fail_on));

    if failed || exceeded {
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr; `warn` by default, `debug` with `--verbose`, `RUST_LOG` wins.
fn init_tracing(verbose: bool) {
    let default = if verbose { "ghs_checkr=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Fetch and assess every identifier, a few at a time. A failed lookup becomes
/// an error row and does not stop the others.
async fn lookup_all(
    client: &PubChemClient,
    identifiers: &[String],
    concurrency: usize,
    extractor: &CodeExtractor,
    rules: &RuleTable,
    quiet: bool,
) -> Vec<SubstanceReport> {
    use futures::future::join_all;

    let pb = if !quiet {
        let pb = ProgressBar::new(identifiers.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    } else {
        None
    };

    let mut reports = Vec::with_capacity(identifiers.len());

    for batch in identifiers.chunks(concurrency.max(1)) {
        let results = join_all(batch.iter().map(|id| client.lookup(id))).await;

        for (identifier, result) in batch.iter().zip(results) {
            let report = match result {
                Ok(record) => SubstanceReport::assessed(
                    identifier.clone(),
                    Some(record.cid),
                    record.source,
                    hazard::assess(&record.data, extractor, rules),
                ),
                Err(e) => {
                    tracing::debug!(error = ?e, "lookup failed");
                    if let Some(pb) = &pb {
                        pb.suspend(|| eprintln!("  {} {}", "✗".red(), e));
                    }
                    SubstanceReport::failed(identifier.clone(), e.to_string())
                }
            };
            reports.push(report);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    reports
}
