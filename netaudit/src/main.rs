use anyhow::Context;
use clap::Parser;
use netaudit::{audit_log, ResultsTarget};
use netaudit_rules::{ConfigLoader, ConfigValidator, RequestClassifier, RuleSet};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "netaudit")]
#[command(about = "Audit a captured NetLog against a network allowlist")]
struct Args {
    /// NetLog JSON file to audit
    #[arg(required_unless_present = "list_profiles")]
    log: Option<PathBuf>,

    /// Config file path
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Allowlist profile (defaults to audit.profile from config)
    #[arg(long, short = 'p')]
    profile: Option<String>,

    /// Where to write the audit results document
    #[arg(long, short = 'r', conflicts_with = "no_results")]
    results: Option<PathBuf>,

    /// Do not write an audit results document
    #[arg(long)]
    no_results: bool,

    /// List the available profiles and exit
    #[arg(long)]
    list_profiles: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("netaudit: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Returns whether the audit passed
fn run(args: Args) -> anyhow::Result<bool> {
    let config = ConfigLoader::load_with_priority(args.config.as_deref())
        .context("Failed to load configuration")?;
    ConfigValidator::validate(&config).context("Invalid configuration")?;

    if args.list_profiles {
        for (name, profile) in &config.rules.profiles {
            println!("{:<16} {}", name, profile.description);
        }
        return Ok(true);
    }

    let Some(log_path) = args.log else {
        anyhow::bail!("No NetLog file given");
    };

    let profile = args.profile.as_deref().unwrap_or(&config.audit.profile);
    tracing::info!("Auditing {} with profile {}", log_path.display(), profile);

    let rules = RuleSet::from_profile(profile, &config)?;
    let classifier = RequestClassifier::new(rules);

    let target = if args.no_results {
        ResultsTarget::Skip
    } else if let Some(path) = args.results {
        ResultsTarget::At(path)
    } else {
        ResultsTarget::Beside
    };

    let outcome = audit_log(&log_path, &classifier, &config.audit, &target)
        .with_context(|| format!("Audit of {} aborted", log_path.display()))?;
    let verdict = &outcome.verdict;

    tracing::info!(
        events = verdict.events_seen,
        requests = verdict.requests_classified,
        allowed = verdict.allowed,
        warnings = verdict.warnings.len(),
        failures = verdict.failures.len(),
        "Audit finished"
    );

    if !verdict.passed {
        eprintln!(
            "network-audit FAILED. Import {} in chrome://net-internals for more details.",
            log_path.display()
        );
        for url in &verdict.failures {
            eprintln!("  {}", url);
        }
    }

    Ok(verdict.passed)
}
