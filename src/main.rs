use anyhow::Context;
use bookcase_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookcase settings")?;
    bookcase_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        port = settings.server.port,
        "bookcase-app bootstrap starting"
    );

    bookcase_app::run(settings).await
}
