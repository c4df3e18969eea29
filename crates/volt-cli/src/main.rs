//! Volt CLI - resolve company mentions and write enriched, validated records.

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use volt_cli::{config, input, output, Cli, Formatter};
use volt_enricher::{CancelFlag, Pipeline};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let formatter = Formatter::new(cli.report, !cli.no_color);
    if let Err(e) = run(cli, &formatter).await {
        eprintln!("{}", formatter.error(&format!("Error: {}", e)));
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for `--pretty`
fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli, formatter: &Formatter) -> volt_cli::Result<()> {
    let config = config::load(&cli)?;
    let mentions = input::read_mentions(&cli.input)?;
    let pipeline = Pipeline::from_config(config)?;

    let cancel = CancelFlag::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, letting in-flight lookups finish");
            signal.cancel();
        }
    });

    let result = pipeline.run(&mentions, &cancel).await?;

    output::write_companies(&cli.output, &result.companies)?;
    info!(
        "Wrote {} companies to {}",
        result.companies.len(),
        cli.output.display()
    );

    if cli.pretty {
        println!("{}", output::render_companies(&result.companies)?);
    }
    if let Some(report) = formatter.format_report(&result.report)? {
        eprintln!("{}", report);
    }

    Ok(())
}
