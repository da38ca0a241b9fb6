use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use pow_forkchain::api::{self, AppState};
use pow_forkchain::config::Settings;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();
    let settings = Settings::from_env();

    let host = settings.host.clone();
    let port = settings.port;
    info!(
        "difficulty={} mine_timeout={:?}",
        settings.difficulty, settings.mine_timeout
    );
    println!("⛓️ Starting fork-choice sandbox at http://{host}:{port}");

    let state = web::Data::new(AppState::new(settings));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
