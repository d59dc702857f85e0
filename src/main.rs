use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use sov_agent::agent::{RunOutcome, SovAgent};
use sov_agent::analysis::share_of;
use sov_agent::config::{ApiKeys, SovConfig};
use sov_agent::{format_float, format_number, format_percent, Platform};

#[derive(Parser)]
#[command(name = "sov-agent", about = "Share of Voice analysis across YouTube and Google search")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Write the effective configuration to a TOML file.
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct RunArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Ignore API keys and use mock data for every platform.
    #[arg(long)]
    demo: bool,
    /// Restrict the run to these platforms (youtube, google); repeatable.
    #[arg(long = "platform")]
    platforms: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long, default_value = "config/sov.toml")]
    path: PathBuf,
    #[arg(long)]
    force: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    match cli.command {
        Some(Command::InitConfig(args)) => init_config(args),
        None => run_analysis(cli.run).await,
    }
}

async fn run_analysis(args: RunArgs) -> Result<(), String> {
    let (mut config, config_path) = SovConfig::load(args.config).map_err(|err| err.to_string())?;
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }
    if !args.platforms.is_empty() {
        let selected = parse_platforms(&args.platforms)?;
        config.search.youtube_enabled = selected.contains(&Platform::YouTube);
        config.search.google_enabled = selected.contains(&Platform::Google);
    }
    match config_path.as_deref() {
        Some(path) if path.exists() => tracing::info!(path = %path.display(), "loaded config"),
        _ => tracing::info!("using default config"),
    }

    let keys = if args.demo {
        ApiKeys::none()
    } else {
        ApiKeys::from_env()
    };

    let agent = SovAgent::new(config, keys);
    let outcome = agent.run().await.map_err(|err| err.to_string())?;
    print_summary(&outcome);
    Ok(())
}

fn print_summary(outcome: &RunOutcome) {
    let report = &outcome.report;
    println!(
        "Share of Voice for {} ({} mode, {} results across {} keywords)",
        report.brand,
        report.mode.label(),
        format_number(report.result_count() as f64),
        report.keywords.len()
    );

    for platform in &report.platform_sov {
        println!(
            "  {} [{}]: {}% weighted SoV",
            platform.platform.label(),
            platform.mode.label(),
            format_float(platform.share_of(&report.brand), 1)
        );
    }

    println!("Overall:");
    for share in &report.overall_sov {
        println!("  {}: {}%", share.brand, format_float(share.weighted_sov, 1));
    }

    if let Some(strongest) = report.cross_keyword_analysis.ranking.first() {
        println!(
            "Strongest keyword: {} ({}%)",
            strongest.keyword,
            format_float(strongest.sov, 1)
        );
    }
    for platform in &report.platform_sov {
        if let Some(sentiment) = platform
            .sentiment
            .iter()
            .find(|entry| entry.brand.eq_ignore_ascii_case(&report.brand) && entry.mentions > 0)
        {
            println!(
                "Positive mentions on {}: {}",
                platform.platform.label(),
                format_percent(sentiment.positive_ratio)
            );
        }
    }

    if let Some(forecast) = report
        .sov_forecast
        .brand_forecasts
        .iter()
        .find(|forecast| forecast.brand.eq_ignore_ascii_case(&report.brand))
    {
        println!(
            "Forecast ({} months): {}% (current {}%)",
            report.sov_forecast.months_ahead,
            format_float(forecast.predicted_sov, 1),
            format_float(share_of(&report.overall_sov, &report.brand), 1)
        );
    }

    if !report.realtime_alerts.is_empty() {
        println!("\nTop alerts:");
        for alert in report.realtime_alerts.iter().take(3) {
            println!("- [{}] {}", alert.priority.label(), alert.title);
        }
    }

    println!("\nResults: {}", outcome.results_path.display());
    if let Some(chart) = &outcome.chart_path {
        println!("Chart: {}", chart.display());
    }
}

fn parse_platforms(values: &[String]) -> Result<Vec<Platform>, String> {
    values
        .iter()
        .map(|value| value.parse::<Platform>().map_err(|err| err.to_string()))
        .collect()
}

fn init_config(args: InitConfigArgs) -> Result<(), String> {
    if args.path.exists() && !args.force {
        return Err(format!(
            "{} already exists (pass --force to overwrite)",
            args.path.display()
        ));
    }
    let (config, _) = SovConfig::load(None).map_err(|err| err.to_string())?;
    config.write(&args.path).map_err(|err| err.to_string())?;
    println!("Wrote {}", args.path.display());
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
