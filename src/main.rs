use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use nestegg::api::{Cli, run};

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose; stdout is reserved for JSON output.
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let today = chrono::Local::now().date_naive();
    match run(cli, today) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
