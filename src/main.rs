use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{info, warn};

use taskgate::{
    auth::{AuthMiddleware, IdentityService},
    config::Config,
    cors::build_cors,
    routes,
    store::{MemoryStore, PgStore, Store},
    tasks::TaskService,
};

async fn open_store(config: &Config) -> io::Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url)
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
            store
                .migrate()
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
            info!("Connected to PostgreSQL");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL is not set, using the in-memory store; data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    let store = open_store(&config).await?;

    let identity = web::Data::new(IdentityService::new(
        store.clone(),
        config.credentials,
        config.tokens.clone(),
    ));
    let tasks = web::Data::new(TaskService::new(store));
    let cors = config.cors.clone();

    info!("Starting TaskGate server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(identity.clone())
            .app_data(tasks.clone())
            .wrap(build_cors(cors.clone()))
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
