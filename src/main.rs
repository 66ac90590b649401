use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

use social_feed::AppState;
use social_feed::config::{AppConfig, StoreBackend};
use social_feed::database::Database;
use social_feed::middleware::auth::TokenVerifier;
use social_feed::middleware::not_found::not_found;
use social_feed::post::post_service::PostService;
use social_feed::post::post_store::{MemoryPostStore, MongoPostStore, PostStore};
use social_feed::user::store::{MemoryUserStore, MongoUserStore, UserStore};
use social_feed::utils::helpers::init_service_name;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::other(e)
    })?;

    init_service_name(config.service_name.clone());

    let (database, posts, users) = match config.store_backend {
        StoreBackend::Mongo => {
            let database = Database::init(&config).await.map_err(|e| {
                error!("Failed to connect to MongoDB: {}", e);
                std::io::Error::other(e)
            })?;
            let db = database.database();
            let posts: Arc<dyn PostStore> = Arc::new(MongoPostStore::new(&db));
            let users: Arc<dyn UserStore> = Arc::new(MongoUserStore::new(&db));
            (Some(database), posts, users)
        }
        StoreBackend::Memory => {
            info!("Using in-memory stores; data is lost on exit");
            warn!("The in-memory user store starts empty: creating posts or comments returns 401 until profiles are inserted");
            let posts: Arc<dyn PostStore> = Arc::new(MemoryPostStore::new());
            let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
            (None, posts, users)
        }
    };

    let state = AppState::new(
        PostService::new(posts, users),
        TokenVerifier::from_config(&config),
    );

    info!("Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, not_found))
            .configure(|cfg| state.configure(cfg))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    if let Some(database) = database {
        database.shutdown().await;
    }

    info!("Server has stopped");

    Ok(())
}
