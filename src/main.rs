//! Labscan: lab-report parameter extraction, as a CLI and an HTTP API.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use labscan_lib::api;
use labscan_lib::api::types::CatalogEntry;
use labscan_lib::config::{self, ServerConfig};
use labscan_lib::models::enums::ExtractionProfile;
use labscan_lib::pipeline::extraction::{
    analyze_with_fallback, Catalog, DeterministicAnalyzer, ExternalResponseAnalyzer,
    ReportAnalyzer,
};

fn print_help() {
    println!("{}: lab report parameter extraction", config::APP_NAME);
    println!();
    println!("Usage: labscan [command]");
    println!();
    println!("Commands:");
    println!("  (none) | serve                          Start the HTTP API");
    println!("  analyze <file|-> [--profile <name>]     Analyze a report and print JSON");
    println!("          [--external <file>]             Prefer a saved analyzer response when valid");
    println!("  catalog [--profile <name>]              Print recognized parameters");
    println!("  help                                    Show this help message");
    println!();
    println!("Profiles: basic, comprehensive (default)");
    println!();
    println!("Environment:");
    println!("  LABSCAN_BIND_ADDR       Listen address (default {})", config::DEFAULT_BIND_ADDR);
    println!("  LABSCAN_PROFILE         Default profile for API requests");
    println!("  LABSCAN_MAX_TEXT_BYTES  Largest report text accepted over HTTP");
    println!("  RUST_LOG                Log filter (default {})", config::default_log_filter());
}

/// Options shared by the one-shot commands.
#[derive(Default)]
struct Options<'a> {
    profile: Option<ExtractionProfile>,
    external: Option<&'a str>,
    positional: Vec<&'a str>,
}

fn parse_options(args: &[String]) -> anyhow::Result<Options<'_>> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--profile" | "-p" => {
                let name = iter.next().context("--profile needs a value")?;
                options.profile = Some(name.to_lowercase().parse::<ExtractionProfile>()?);
            }
            "--external" | "-e" => {
                let path = iter.next().context("--external needs a file")?;
                options.external = Some(path.as_str());
            }
            other => match other.strip_prefix("--profile=") {
                Some(name) => {
                    options.profile = Some(name.to_lowercase().parse::<ExtractionProfile>()?)
                }
                None => options.positional.push(other),
            },
        }
    }

    Ok(options)
}

fn read_report(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read report from stdin")?;
        return Ok(text);
    }

    let bytes = std::fs::read(Path::new(source))
        .with_context(|| format!("Failed to read report file {source}"))?;
    // OCR dumps are not always clean UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn analyze(args: &[String]) -> anyhow::Result<()> {
    let options = parse_options(args)?;
    let source = match options.positional.as_slice() {
        [source] => *source,
        _ => anyhow::bail!(
            "Usage: labscan analyze <file|-> [--profile basic|comprehensive] [--external <file>]"
        ),
    };

    let text = read_report(source)?;
    let primary = match options.external {
        Some(path) => Some(ExternalResponseAnalyzer::new(read_report(path)?)),
        None => None,
    };
    let fallback = DeterministicAnalyzer::new(options.profile.unwrap_or_default());
    let analysis = analyze_with_fallback(
        primary.as_ref().map(|a| a as &dyn ReportAnalyzer),
        &fallback,
        &text,
    );

    info!(
        profile = %fallback.profile,
        source = analysis.source.as_str(),
        parameters = analysis.result.parameters.len(),
        score = analysis.result.health_score,
        "Report analyzed"
    );
    println!("{}", serde_json::to_string_pretty(&analysis.result)?);
    Ok(())
}

fn catalog(args: &[String]) -> anyhow::Result<()> {
    let options = parse_options(args)?;
    if !options.positional.is_empty() || options.external.is_some() {
        anyhow::bail!("Usage: labscan catalog [--profile basic|comprehensive]");
    }

    let entries: Vec<CatalogEntry> = Catalog::standard()
        .entries(options.profile.unwrap_or_default())
        .map(|entry| CatalogEntry::from(entry.definition))
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    labscan_lib::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "serve" => {}
            "analyze" => return analyze(&args[2..]),
            "catalog" => return catalog(&args[2..]),
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            "--version" | "-V" | "version" => {
                println!("{} {}", config::APP_NAME, config::APP_VERSION);
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'labscan help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ServerConfig::from_env()?;
    api::serve(config).await?;

    Ok(())
}
