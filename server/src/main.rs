use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use tarefas_server::{configure, Store, DEFAULT_BIND};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let bind = std::env::var("TAREFAS_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let store = web::Data::new(Store::new());

    log::info!("serving /tarefas on {}", bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}
