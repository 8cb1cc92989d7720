use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use meal_assistant::{
    config::Config,
    db::{create_redis_client, Cache, CacheStore, CacheWriterHandle},
    models::{FeedRequest, MealAssistantRequest},
    services::{
        audit::TracingAuditLog, credentials::AesGcmCredentialDecryptor,
        transport::ReqwestTransport,
    },
    MealAssistant,
};

/// One request read from stdin
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Command {
    Feed(FeedRequest),
    Prompt(MealAssistantRequest),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read request from stdin")?;
    let command: Command =
        serde_json::from_str(&input).context("Failed to parse request JSON")?;

    let mut assistant = MealAssistant::new(
        config.clone(),
        Arc::new(ReqwestTransport::new()),
        Arc::new(TracingAuditLog),
    );

    if let Some(decryptor) = AesGcmCredentialDecryptor::from_config(&config)? {
        assistant = assistant.with_decryptor(Arc::new(decryptor));
    } else {
        tracing::info!("CREDENTIAL_KEY not set, AI ranking disabled");
    }

    let mut writer_handle: Option<CacheWriterHandle> = None;
    if let Some(redis_url) = &config.redis_url {
        let client = create_redis_client(redis_url)?;
        let (cache, handle) = Cache::new(client);
        let cache: Arc<dyn CacheStore> = Arc::new(cache);
        assistant = assistant.with_cache(cache);
        writer_handle = Some(handle);
        tracing::info!("Feed caching enabled");
    }

    let output = match command {
        Command::Feed(request) => {
            let mut rng = StdRng::from_entropy();
            let feed = assistant
                .recommend_feed(&request, Utc::now(), &mut rng)
                .await?;
            serde_json::to_string_pretty(&feed)?
        }
        Command::Prompt(request) => {
            let response = assistant.suggest_for_prompt(&request, Utc::now()).await;
            serde_json::to_string_pretty(&response)?
        }
    };

    println!("{}", output);

    if let Some(handle) = writer_handle {
        handle.shutdown().await;
    }

    Ok(())
}
