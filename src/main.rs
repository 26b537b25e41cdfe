use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use opensplit::server::{self, AppState};
use opensplit::settings::Settings;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = Settings::new().map_err(std::io::Error::other)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("opensplit={level}", level = settings.log_level))
        .init();

    tracing::info!("Listening on {}:{}", settings.bind, settings.port);

    let state = web::Data::new(AppState::default());
    let cors_origin = settings.cors_origin.clone();

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header(),
            None => Cors::permissive(),
        };
        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(server::configure)
    })
    .bind((settings.bind.as_str(), settings.port))?
    .run()
    .await
}
