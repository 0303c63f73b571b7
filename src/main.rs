use actix_web::{self, middleware::Logger, web, App, HttpResponse, HttpServer};
use std::sync::Arc;

use crate::{
    configs::{cors, init_logger, prepare_upload_dir},
    constants::Env,
    modules::image_upload::{route, ImageUploadService, LocalImageStore, UploadConfig},
};

mod api;
mod configs;
mod constants;
mod modules;
#[cfg(test)]
mod test;
mod utils;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[actix_web::get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(INDEX_HTML)
}

#[actix_web::get("/health")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let env = Env::from_env().map_err(|e| std::io::Error::other(e.to_string()))?;

    let upload_dir = prepare_upload_dir(&env.upload_dir)
        .await
        .map_err(|e| std::io::Error::other(format!("Upload directory error: {e}")))?;

    let store = LocalImageStore::new(upload_dir);
    let upload_service = ImageUploadService::new(Arc::new(store), UploadConfig::from_env(&env));
    let upload_service = web::Data::new(upload_service);

    log::info!("Starting server at http://{}:{}", env.ip, env.port);
    log::info!("Upload endpoint: {}/upload", env.public_url);
    log::info!("Images endpoint: {}/images", env.public_url);

    let app_env = env.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&app_env))
            .app_data(upload_service.clone())
            .service(index)
            .service(health_check)
            .configure(route::configure::<LocalImageStore>)
    })
    .bind((env.ip.as_str(), env.port))?
    .workers(env.workers)
    .run()
    .await
}
