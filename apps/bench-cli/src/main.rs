use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use db_infra::db::{ConnectionSettings, RuntimeEnv};
use storage_bench::{
    default_catalog, run_benchmarks, ReportSink, RunOptions, ScenarioConfig, SeaStore,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "storage_bench=info,db_infra=info,sqlx=warn,sea_orm=warn";

#[derive(Clone, ValueEnum)]
enum Env {
    Prod,
    Test,
}

#[derive(Parser)]
#[command(name = "storage-bench")]
#[command(about = "Compare storage strategies on the same data and write one report per dimension")]
struct Args {
    /// Directory the reports are written to
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,

    /// Runtime environment
    #[arg(short, long, value_enum, default_value = "prod")]
    env: Env,

    /// Only run these dimensions (repeatable)
    #[arg(long = "only", value_name = "DIMENSION")]
    only: Vec<String>,

    /// Rows inserted by the bulk-insert operation
    #[arg(long)]
    bulk_rows: Option<u32>,

    /// Number of single-row inserts
    #[arg(long)]
    single_rows: Option<u32>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let args = Args::parse();

    let env = match args.env {
        Env::Prod => RuntimeEnv::Prod,
        Env::Test => RuntimeEnv::Test,
    };

    let defaults = ScenarioConfig::default();
    let config = ScenarioConfig {
        bulk_rows: args.bulk_rows.unwrap_or(defaults.bulk_rows),
        single_rows: args.single_rows.unwrap_or(defaults.single_rows),
        ..defaults
    };
    let catalog = match default_catalog(&config) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Invalid scenario configuration: {e}");
            std::process::exit(1);
        }
    };

    let db_name = match ConnectionSettings::from_env(env) {
        Ok(settings) => settings.db_name,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let conn = match db_infra::connect(env).await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Connection failed: {e}");
            std::process::exit(1);
        }
    };

    match db_infra::database_exists(&conn, &db_name).await {
        Ok(true) => info!("preflight=ok db={}", db_name),
        Ok(false) => {
            eprintln!("Database '{db_name}' does not exist; create and seed it first");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Database check failed: {e}");
            std::process::exit(1);
        }
    }

    let store = SeaStore::new(conn);
    let sink = ReportSink::new(args.results_dir);
    let options = RunOptions { only: args.only };

    let summary = match run_benchmarks(&store, &catalog, &sink, &options).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Benchmark run aborted: {e}");
            std::process::exit(1);
        }
    };

    for path in &summary.written {
        println!("{}", path.display());
    }
    for (dimension, e) in &summary.failures {
        error!(dimension = %dimension, error = %e, "no report written");
        eprintln!("{dimension}: {e}");
    }
    if !summary.is_clean() {
        std::process::exit(1);
    }
}
