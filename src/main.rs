use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use binary_pass::config::{Config, ConfigOverrides};
use binary_pass::input::PlanDocument;
use binary_pass::output::csv::{cross_check_to_csv, report_to_csv};
use binary_pass::output::render_json;
use binary_pass::output::table::{
    render_averages_table, render_cross_check_table, render_eligible_table, render_items_table,
};
use binary_pass::planner::{CrossCheck, OptimizationReport, PlanRequest};
use binary_pass::server::run_server;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "binary-pass",
    about = "Choose which courses to take as Pass/Fail to maximize your average"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// Lowest grade that may be converted to Pass/Fail.
    #[arg(short, long)]
    threshold: Option<f64>,
    #[arg(short, long)]
    decimals: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find the best courses to convert.
    Plan {
        input: PathBuf,
        /// Overrides `passes_available` from the input file.
        #[arg(long)]
        passes: Option<i64>,
    },
    /// List the courses that qualify for conversion.
    Eligible {
        input: PathBuf,
        #[arg(long)]
        passes: Option<i64>,
    },
    /// Compare the planner with a full enumeration of every subset.
    Verify {
        input: PathBuf,
        #[arg(long)]
        passes: Option<i64>,
    },
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        pass_threshold: cli.threshold,
        decimals: cli.decimals,
    });
    let planner = config.planner();
    let decimals = config.output.decimals;

    match &cli.command {
        Commands::Plan { input, passes } => {
            let request = load_request(input, *passes, &config)?;
            let report = planner.plan(&request)?;
            info!(
                optimized = report.optimized_average,
                converted = report.chosen_identifiers.len(),
                "plan ready"
            );
            print_report(&report, &request, cli.output, decimals)?;
        }
        Commands::Eligible { input, passes } => {
            let request = load_request(input, *passes, &config)?;
            let candidates = planner.eligible(&request)?;
            let passes = usize::try_from(request.passes_available).unwrap_or(0);
            let pass_limit = candidates.pass_limit(passes);
            match cli.output {
                OutputFormat::Table => println!(
                    "{}",
                    render_eligible_table(
                        &request.current_items,
                        candidates.indices(),
                        pass_limit
                    )
                ),
                OutputFormat::Json => println!("{}", render_json(&candidates)?),
                OutputFormat::Csv => {
                    warn!("CSV output for eligible not implemented, using JSON");
                    println!("{}", render_json(&candidates)?);
                }
            }
        }
        Commands::Verify { input, passes } => {
            let request = load_request(input, *passes, &config)?;
            let check = planner.cross_check(&request, config.optimizer.exhaustive_candidate_cap)?;
            if !check.agrees {
                warn!(
                    greedy = check.greedy.average,
                    exhaustive = check.exhaustive.average,
                    "searches disagree"
                );
            }
            print_cross_check(&check, &request, cli.output, decimals)?;
        }
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let bind = format!("{host}:{port}");
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            return run_server(config, addr).await;
        }
        Commands::Config { init, show } => {
            return handle_config_command(*init, *show, &config, &config_path);
        }
    }

    Ok(())
}

fn load_request(input: &Path, passes: Option<i64>, config: &Config) -> Result<PlanRequest> {
    let mut document = PlanDocument::load(input)?;
    if let Some(passes) = passes {
        document.passes_available = passes;
    }
    Ok(document.into_request(config.grade_bounds())?)
}

fn handle_config_command(init: bool, show: bool, config: &Config, config_path: &Path) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_report(
    report: &OptimizationReport,
    request: &PlanRequest,
    format: OutputFormat,
    decimals: usize,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_items_table(report, &request.current_items));
            println!("{}", render_averages_table(report, decimals));
        }
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => println!(
            "{}",
            report_to_csv(report, &request.current_items, decimals)?
        ),
    }
    Ok(())
}

fn print_cross_check(
    check: &CrossCheck,
    request: &PlanRequest,
    format: OutputFormat,
    decimals: usize,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!(
            "{}",
            render_cross_check_table(check, &request.current_items, decimals)
        ),
        OutputFormat::Json => println!("{}", render_json(check)?),
        OutputFormat::Csv => println!("{}", cross_check_to_csv(check, decimals)?),
    }
    Ok(())
}
