use crate::cli::Args;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

// Dependencies are only interesting when something is wrong.
const QUIET_DEPENDENCIES: &str = "sqlx=warn,hyper=warn,hyper_util=warn,reqwest=warn";

/// Install the global subscriber. `RUST_LOG` wins over `-v` when set.
pub fn setup_logging(args: &Args) {
    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},{QUIET_DEPENDENCIES}")));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(args.verbose > 0)
        .with_writer(std::io::stderr)
        .compact()
        .without_time()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("a tracing subscriber was already installed; keeping it");
    }
}
