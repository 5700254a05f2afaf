use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use log::{error, info, warn};

use sales_backend::config::{LoadPolicy, ServerConfig};
use sales_backend::inference::load_model;
use sales_backend::routes::{self, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    info!("Starting sales prediction API");

    let config = ServerConfig::from_env()?;

    let model = match load_model(&config.model_path) {
        Ok(model) => {
            info!(
                "Model loaded from {} ({})",
                config.model_path.display(),
                model.kind()
            );
            Some(model)
        }
        Err(e) => match config.load_policy {
            LoadPolicy::Fatal => {
                error!("Cannot load model: {:#}", e);
                return Err(e.context("model load failed"));
            }
            LoadPolicy::Degraded => {
                warn!("Cannot load model, /predict will answer 500: {:#}", e);
                None
            }
        },
    };

    let state = web::Data::new(AppState::new(model, &config.model_path));
    let bind_address = config.bind_address();

    info!("Listening on http://{}", bind_address);
    info!("Workers: {}", config.workers);
    info!("Endpoints:");
    info!("   GET  /             - Service status");
    info!("   GET  /model-info   - Loaded model details");
    info!("   POST /predict      - Predict sales from budgets");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .wrap(cors)
            .app_data(state.clone())
            .configure(routes::configure)
            .default_service(web::route().to(routes::not_found))
    })
    .workers(config.workers)
    .bind(&bind_address)
    .with_context(|| format!("cannot bind {}", bind_address))?
    .run()
    .await?;

    Ok(())
}
