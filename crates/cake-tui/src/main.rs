mod action;
mod app;
mod app_state;
mod audio;
mod component;
mod components;
mod theme;
mod widgets;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = cake_core::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("bday.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress
    // low-level device probing noise from cpal internals.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug,cpal=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("bday log: {}", log_path.display());

    tracing::info!("bday starting…");

    let config = cake_core::config::Config::load().unwrap_or_default();

    let app = app::App::new(config);
    app.run().await?;

    Ok(())
}
