use actix_web::web;

use crate::constants::UPLOADS_ROUTE;
use crate::modules::image_upload::repository::ImageStore;

pub fn configure<S>(cfg: &mut web::ServiceConfig)
where
    S: ImageStore + Send + Sync + 'static,
{
    cfg.service(
        web::resource("/upload")
            .route(web::post().to(crate::modules::image_upload::handle::upload_image::<S>)),
    )
    .service(
        web::resource("/images")
            .route(web::get().to(crate::modules::image_upload::handle::list_images::<S>)),
    )
    .service(
        // tail match, nested paths are checked segment by segment in the store
        web::resource(format!("{UPLOADS_ROUTE}/{{filename:.*}}"))
            .route(web::get().to(crate::modules::image_upload::handle::serve_upload::<S>))
            .route(web::head().to(crate::modules::image_upload::handle::serve_upload::<S>)),
    );
}
