mod aggregator;
mod cli;
mod columns;
mod dates;
mod error;
mod fmt;
mod loader;
mod models;
mod pipeline;
mod reports;
mod settings;
mod xlsx;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use error::HrError;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "error".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = if cli.help_full {
        cli::guide::run();
        Ok(())
    } else if cli.sample {
        cli::sample::run()
    } else if cli.init_config {
        cli::config::init()
    } else if let Some(file) = &cli.archivo {
        cli::process::run(file, cli.output.as_deref())
    } else {
        cli::guide::banner();
        Err(HrError::NoInput)
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}
