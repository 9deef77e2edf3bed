use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use quiz_portal::{
    app_state::AppState, config::Config, handlers, middleware::RequestIdMiddleware,
};

fn cors(config: &Config) -> Cors {
    match config.cors_allowed_origin.as_deref() {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .max_age(3600),
        None => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    config.log_summary();

    let state = AppState::new(config.clone()).map_err(std::io::Error::other)?;

    if config.seed_sample_quizzes {
        match state.catalog_service.seed_sample_quizzes() {
            Ok(true) => log::info!("✓ Sample quizzes seeded"),
            Ok(false) => {}
            Err(err) => log::warn!("Could not seed sample quizzes: {}", err),
        }
    }

    if config.backend_configured() {
        if state.sync_service.backend().check_status().await {
            log::info!("✓ Backend reachable");
        } else {
            log::warn!("Backend offline; serving local data");
        }
        match state.sync_service.sync_quizzes().await {
            Ok(report) => log::info!(
                "Quizzes synced: {} remote, {} local only, {} total",
                report.remote,
                report.local_only,
                report.total
            ),
            Err(err) => log::warn!("Startup quiz sync failed: {}", err),
        }
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    log::info!("Starting quiz portal on http://{}:{}", host, port);

    let data = web::Data::new(state);
    // One profile per process, so the running quiz lives in a single worker.
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(cors(&config))
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .workers(1)
    .bind((host, port))?
    .run()
    .await
}
