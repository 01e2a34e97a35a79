use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use blog_api::{
    auth::{Role, TokenProvider, UserRepository},
    config::AppConfig,
    create_router, db,
    summarizer::{DisabledSummarizer, OllamaSummarizer, Summarizer},
    AppState,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() {
    // Load .env before the filter so RUST_LOG can come from it
    dotenv::dotenv().ok();

    // RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("blog_api=debug,tower_http=info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Blog API - Starting...");

    if let Err(e) = run().await {
        tracing::error!("Blog API stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoxError> {
    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    db::run_migrations(&pool).await?;

    let tokens = Arc::new(TokenProvider::new(&config.jwt_secret, config.jwt_expiration)?);

    if let Some(username) = &config.bootstrap_admin_username {
        bootstrap_admin(&UserRepository::new(pool.clone()), username).await?;
    }

    let summarizer: Arc<dyn Summarizer> = match &config.ollama {
        Some(ollama) => {
            let client = OllamaSummarizer::new(ollama)?;
            tracing::info!("Summaries delegated to {}", client.endpoint());
            Arc::new(client)
        }
        None => {
            tracing::warn!("OLLAMA_API_URL not set; post summarization disabled");
            Arc::new(DisabledSummarizer)
        }
    };

    let state = AppState::new(pool, tokens, summarizer);
    let app = create_router(state, &config.cors_allowed_origins);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("Blog API is running on http://{}", config.addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Grant ROLE_ADMIN to an existing account so someone can moderate content
async fn bootstrap_admin(users: &UserRepository, username: &str) -> Result<(), BoxError> {
    match users.find_by_username_or_email(username).await? {
        Some(user) => {
            users.assign_role(user.id, Role::Admin).await?;
            tracing::info!("Granted {} to {}", Role::Admin, user.username);
        }
        None => {
            tracing::warn!("BOOTSTRAP_ADMIN_USERNAME '{}' does not match any user", username);
        }
    }
    Ok(())
}
