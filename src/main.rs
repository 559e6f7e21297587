mod analyze;
mod cli;
mod config;
mod error;
mod external;
mod output;
mod provider;
mod report;
mod scan;
mod types;

use crate::error::{GradeError, Result};
use crate::external::checkstyle::CheckstyleRunner;
use crate::external::gradle::GradleRunner;
use crate::external::{BuildRunner, StyleChecker};
use crate::provider::github::GitHubProvider;
use crate::provider::local::LocalProvider;
use crate::provider::RepositoryProvider;
use crate::scan::pom::StructuralValidator;
use crate::types::config::{CollectionSettings, WeightTable};
use crate::types::scoring::{Category, Module};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    /// Every repository was graded, but at least one with missing evidence.
    pub const DEGRADED: i32 = 1;
    pub const INVALID_CONFIG: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let cwd = std::env::current_dir()?;
    let loaded = config::load_config(&cwd, cli.config.as_deref())?;
    loaded.validate()?;
    let table = loaded.weight_table();

    match cli.command {
        cli::Commands::Weights => {
            print_weights(&table);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Grade(cmd) => grade(&cmd, &table, loaded.collection()),
    }
}

fn grade(cmd: &cli::GradeCommand, table: &WeightTable, settings: CollectionSettings) -> Result<i32> {
    let addresses = output::read_addresses(&cmd.list)?;
    info!(count = addresses.len(), list = %cmd.list.display(), "loaded repository list");

    let provider: Box<dyn RepositoryProvider> = match cmd.source {
        cli::SourceKind::Github => Box::new(GitHubProvider::new(
            &cmd.api_url,
            cmd.token.clone(),
            settings.timeout(),
        )?),
        cli::SourceKind::Local => {
            let root = cmd
                .checkouts
                .as_ref()
                .ok_or_else(|| GradeError::ConfigParse("--checkouts is required".to_string()))?;
            if !root.is_dir() {
                return Err(GradeError::PathNotFound(root.display().to_string()));
            }
            Box::new(LocalProvider::new(root, settings.timeout()))
        }
    };

    let checkstyle = match (&cmd.checkstyle_jar, &cmd.checkstyle_config) {
        (Some(jar), Some(style_config)) => {
            let runner = CheckstyleRunner::new(jar, style_config, settings.timeout());
            Some(match &cmd.java {
                Some(java) => runner.with_java(java),
                None => runner,
            })
        }
        _ => None,
    };
    let gradle = cmd
        .gradle
        .as_ref()
        .map(|gradle| GradleRunner::new(gradle, settings.timeout()));

    let validator = StructuralValidator;
    let collaborators = scan::Collaborators {
        provider: provider.as_ref(),
        schema_validator: &validator,
        style_checker: checkstyle.as_ref().map(|runner| runner as &dyn StyleChecker),
        build_runner: gradle.as_ref().map(|runner| runner as &dyn BuildRunner),
        settings,
    };

    let format = match cmd.format {
        cli::ReportFormat::Text => report::OutputFormat::Text,
        cli::ReportFormat::Json => report::OutputFormat::Json,
    };
    let mut writer = output::ResultsWriter::create(&cmd.output, format, cmd.clean)?;

    let total = addresses.len();
    let mut degraded = 0;
    for (index, address) in addresses.iter().enumerate() {
        info!("evaluating {address} ({}/{total})", index + 1);
        let record = scan::collect(address, &collaborators);
        let graded = analyze::evaluate(&record, table);
        writer.write_report(&graded, table)?;

        if !graded.evidence_gaps.is_empty() {
            degraded += 1;
        }
        println!("{address}: {}/{}", graded.breakdown.total(), table.top_mark);
    }

    let manifest = writer.finish()?;
    println!("graded {total} repositories into {}", manifest.display());

    if degraded > 0 {
        eprintln!("warning: {degraded} repositories were graded with missing evidence");
        Ok(exit_code::DEGRADED)
    } else {
        Ok(exit_code::SUCCESS)
    }
}

fn print_weights(table: &WeightTable) {
    println!("top mark: {}", table.top_mark);
    for category in Category::ALL {
        println!(
            "{}: {:.2}",
            category.as_str(),
            table.category_max(category)
        );
        if category.is_composite() {
            for module in category.leaves() {
                println!("  {}: {:.2}", module.as_str(), table.leaf_max(*module));
            }
        }
    }
    println!("bonuses:");
    for module in Module::ALL.into_iter().filter(|module| module.is_bonus()) {
        println!("  {}: {:.2}", module.as_str(), table.leaf_max(module));
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = if e.is_config() {
                exit_code::INVALID_CONFIG
            } else {
                exit_code::RUNTIME_FAILURE
            };
            std::process::exit(code);
        }
    }
}
