use spotify_ingest::{
    IngestConfig, InvocationContext, InvocationResult, build_handler, parse_trigger,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();

    // Configure logging from env var `SPOTIFY_INGEST_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("SPOTIFY_INGEST_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    // Keep AWS SDK internals quiet unless asked for explicitly.
    let combined_filter = format!("{},aws_config=warn,aws_smithy_runtime=warn", log_env);
    let env_filter = tracing_subscriber::EnvFilter::try_new(combined_filter).unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,aws_config=warn,aws_smithy_runtime=warn")
    });
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!("spotify_ingest: log filter: {}", log_env);

    let event = parse_trigger(std::env::args().nth(1).as_deref());

    let result = match IngestConfig::from_env() {
        Ok(config) => match build_handler(&config).await {
            Ok(handler) => handler.handle(&event, &InvocationContext::new()).await,
            Err(e) => InvocationResult::from_error(&e),
        },
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration; aborting run");
            InvocationResult::from_error(&e)
        }
    };

    println!("{}", serde_json::to_string(&result)?);

    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
