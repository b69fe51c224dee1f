use pgready_probe::config::Config;
use pgready_probe::http::HttpProbe;
use pgready_probe::pg::PostgresProbe;
use pgready_probe::retry::RetryPolicy;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configure logging from env var `PGREADY_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("PGREADY_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    // Append per-target overrides to keep sqlx internals quiet by default
    let combined_filter = format!("{},sqlx=warn", log_env);
    let env_filter = tracing_subscriber::EnvFilter::try_new(combined_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,sqlx=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();

    let config = Config::from_env()?;
    tracing::debug!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        max_retries = config.max_retries,
        "pgready: starting readiness probe"
    );

    let policy = RetryPolicy {
        max_attempts: config.max_retries,
        interval: config.retry_interval,
    };

    let mut ready = policy
        .wait_until_ready(&PostgresProbe::new(&config))
        .await?;

    // Optionally wait for the application endpoint once the database is up.
    if ready {
        if let Some(url) = &config.http_url {
            ready = policy.wait_until_ready(&HttpProbe::new(url.clone())).await?;
        }
    }

    if !ready {
        std::process::exit(1);
    }
    Ok(())
}
