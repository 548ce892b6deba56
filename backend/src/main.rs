use actix_web::{web, App, HttpServer};
use clap::Parser;
use env_logger::Env;
use leads_backend::auth::JwtAuthenticator;
use leads_backend::config::Config;
use leads_backend::services;
use leads_backend::state::AppState;
use leads_backend::store::SqliteLeadStore;
use log::{info, warn};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::parse();

    let store = SqliteLeadStore::open(config.database_path())
        .map_err(io::Error::other)?;

    if config.jwt_secret.is_none() {
        warn!("JWT_SECRET is not set; authenticated endpoints will answer 500");
    }
    let auth = Arc::new(JwtAuthenticator::new(config.jwt_secret.clone()));
    let state = AppState::new(store, auth, config.max_upload_bytes);

    let (host, port) = config.bind_address();
    info!("API running on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(services::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
