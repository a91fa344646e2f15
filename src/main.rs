use clap::Parser;
use nearbite::application::recommend::RecommendRequest;
use nearbite::cli::commands::{Cli, Commands};
use nearbite::config::Settings;
use nearbite::domain::error::DomainError;
use nearbite::domain::values::source_mode::SourceMode;
use nearbite::NearBite;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let mut settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    if let Some(mode) = &cli.mode {
        match mode.parse::<SourceMode>() {
            Ok(m) => settings.mode = m,
            Err(e) => {
                tracing::error!(error = %e, "Invalid --mode");
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = run_command(settings, cli.command).await {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(std::env::var("NEARBITE_LOG").unwrap_or_else(|_| "info".into())))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("NEARBITE_LOG_JSON").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    // Logs go to stderr; stdout carries command output.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_command(mut settings: Settings, cmd: Commands) -> Result<(), DomainError> {
    match cmd {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                settings.bind = bind;
            }
            let app = Arc::new(NearBite::from_settings(&settings).await?);
            nearbite::server::serve(app, &settings.bind).await?;
        }
        Commands::Recommend { query, lat, lon, radius, k } => {
            let app = NearBite::from_settings(&settings).await?;
            let request = RecommendRequest::new(query, lat, lon).radius(radius).k(k);
            let results = app.recommend(&request).await?;
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "results": results }))?);
        }
        Commands::Chat { query, lat, lon, radius, k } => {
            let app = NearBite::from_settings(&settings).await?;
            let request = RecommendRequest::new(query, lat, lon).radius(radius).k(k);
            let response = app.chat(&request).await?;
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "response": response }))?);
        }
        Commands::Preprocess { csv, out } => {
            let out = out.unwrap_or_else(|| settings.data_dir.clone());
            let report = nearbite::preprocess(&settings, &csv, &out).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Info => {
            let app = NearBite::from_settings(&settings).await?;
            println!("{}", serde_json::to_string_pretty(app.info())?);
        }
    }
    Ok(())
}
