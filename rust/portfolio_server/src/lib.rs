// src/lib.rs

pub mod analyzer;
pub mod config;
pub mod contact;
pub mod handlers;
pub mod keepalive;
pub mod mailer;
pub mod models;
pub mod report;

use actix_web::{middleware, web, App, HttpServer};
use config::{ConfigError, ServerConfig};
use mailer::{MailError, Mailer, SmtpMailer};
use quote_service::{Catalog, CatalogError, PriceSeriesFetcher, QuoteClient};
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not load ticker catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("could not set up mail transport: {0}")]
    Mail(#[from] MailError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shared by every worker.
pub struct AppState {
    pub fetcher: PriceSeriesFetcher,
    pub catalog: Catalog,
    pub mailer: Option<Arc<dyn Mailer>>,
    pub resume_path: Option<PathBuf>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self, StartupError> {
        let client = QuoteClient::new(
            config.provider_base_url.clone(),
            SecretString::from(config.api_key.expose_secret().to_string()),
        );

        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::embedded()?,
        };
        info!(tickers = catalog.len(), "ticker catalog loaded");

        let mailer: Option<Arc<dyn Mailer>> = match &config.mail {
            Some(settings) => {
                let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(settings)?);
                Some(mailer)
            }
            None => {
                warn!("CONTACT_EMAIL or CONTACT_EMAIL_PASSWORD not set, contact form disabled");
                None
            }
        };

        Ok(AppState {
            fetcher: PriceSeriesFetcher::new(Arc::new(client)),
            catalog,
            mailer,
            resume_path: config.resume_path.clone(),
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::about_page)
        .service(handlers::portfolio_page)
        .service(handlers::resume)
        .service(handlers::catalog)
        .service(handlers::performance)
        .service(handlers::contact)
        .service(handlers::health_check);
}

pub async fn run_server(config: ServerConfig) -> Result<(), StartupError> {
    let state = web::Data::new(AppState::from_config(&config)?);

    keepalive::start(config.keepalive_interval);

    info!(addr = %config.bind_addr, "starting portfolio server");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
