use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

/// Operate the SHELF book catalogue service
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API until interrupted
    Serve,
    /// Print the resolved settings as JSON
    Config,
    /// Check that the configured database answers a ping
    PingDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load SHELF settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => shelf_app::run(settings).await,
        Command::Config => print_config(&settings),
        Command::PingDb => ping_db(&settings).await,
    }
}

fn print_config(settings: &Settings) -> anyhow::Result<()> {
    let rendered =
        serde_json::to_string_pretty(settings).with_context(|| "failed to render settings")?;
    println!("{rendered}");
    Ok(())
}

async fn ping_db(settings: &Settings) -> anyhow::Result<()> {
    let store = shelf_db::connect(&settings.database).await?;
    println!("database '{}' is reachable", store.database_name());
    store.shutdown().await;
    Ok(())
}
