use authload_loadgen::config::Cli;
use authload_loadgen::coordinator::run_load;
use authload_loadgen::report::render_summary;
use clap::Parser;
use std::process;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_config().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(3);
    });

    for line in config.banner() {
        info!("{line}");
    }

    let outcome = run_load(&config).await.unwrap_or_else(|e| {
        eprintln!("Failed to start load: {e}");
        process::exit(3);
    });

    info!(
        "Ran {} iterations in {:.1} s",
        outcome.iterations,
        outcome.elapsed.as_secs_f64()
    );
    print!("{}", render_summary(&outcome.metrics.snapshot()));
}
