mod cli;
mod logging;

use clap::Parser;
use cnfdb_config::Loader;
use cnfdb_pipeline::Pipeline;
use figment::providers::Serialized;
use std::process::ExitCode;
use std::time::Instant;

const EXIT_PIPELINE: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Args::parse();
    logging::setup_logging(&args);
    let started = Instant::now();

    let mut loader = Loader::new().merge(Serialized::defaults(args.overrides()));
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    let config = match loader.load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:?}");
            return ExitCode::from(EXIT_CONFIG);
        },
    };

    let result = match Pipeline::from_config(&config) {
        Ok(pipeline) => {
            tracing::info!(url = %pipeline.base_url(), "building command-not-found database");
            pipeline.run().await
        },
        Err(err) => Err(err),
    };
    let code = match result {
        Ok(report) => {
            println!("OK, finished: {} rows written to {}", report.rows, report.path.display());
            ExitCode::SUCCESS
        },
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(EXIT_PIPELINE)
        },
    };
    if args.time {
        println!("Time elapsed: {:.3?}", started.elapsed());
    }
    code
}
