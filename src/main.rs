use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediacast::db::{self, unix_now};
use mediacast::{DatabaseConfig, PodcastStore};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediacast=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Database location from environment or default
    let config = DatabaseConfig::from_env();

    let db = db::init_database(&config)
        .await
        .expect("Failed to initialize database");

    let store = PodcastStore::new();

    let summaries = store
        .summaries(&db, unix_now())
        .await
        .expect("Failed to list podcasts");

    if summaries.is_empty() {
        tracing::info!("No podcasts found.");
        return;
    }

    tracing::info!("Loaded {} podcasts", summaries.len());
    for summary in &summaries {
        match serde_json::to_string(summary) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!("Failed to encode podcast {}: {}", summary.slug, e),
        }
    }
}
