use anyhow::Context;
use shelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load SHELF settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        "shelf-app bootstrap starting"
    );

    shelf_app::run(settings).await?;

    tracing::info!("shelf-app shut down");
    Ok(())
}
