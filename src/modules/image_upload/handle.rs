use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{
    http::header::{self, ContentDisposition},
    web, HttpResponse,
};
use futures_util::{stream, TryStreamExt};
use tokio::{fs::File, io::AsyncReadExt};

use crate::api::success::Success;
use crate::api::{error, success};
use crate::modules::image_upload::{
    model::NewImage,
    repository::ImageStore,
    schema::{ImageDescriptor, UploadResponse},
    service::ImageUploadService,
};

/// Upload image handler
pub async fn upload_image<S>(
    mut payload: Multipart,
    service: web::Data<ImageUploadService<S>>,
) -> Result<success::Success<UploadResponse>, error::Error>
where
    S: ImageStore + Send + Sync + 'static,
{
    let config = service.config();
    let mut image: Option<NewImage> = None;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let original_filename = field.content_disposition().and_then(client_filename);

        // Plain form fields are not files
        let Some(original_filename) = original_filename else {
            drain(&mut field).await?;
            continue;
        };

        if image.is_some() || field.name() != Some(config.field_name.as_str()) {
            log::debug!("Rejecting file part in field {:?}", field.name());
            return Err(error::Error::bad_request("Unexpected field"));
        }

        let mime_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        // Reject before reading any of the body
        if let Err(e) = service.validate_mime(&mime_type) {
            log::warn!("Rejected upload '{}' with type {}", original_filename, mime_type);
            return Err(e.into());
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            if bytes.len() + chunk.len() > config.max_file_size {
                log::warn!(
                    "Rejected upload '{}': over {} bytes",
                    original_filename,
                    config.max_file_size
                );
                return Err(error::Error::bad_request(config.max_size_message()));
            }
            bytes.extend_from_slice(&chunk);
        }

        image = Some(NewImage { original_filename, mime_type, bytes });
    }

    let image = image.ok_or_else(|| error::Error::bad_request("No file uploaded"))?;

    let result =
        service.upload_image(image).await.map_err(|e| e.into_api_error("Upload failed"))?;

    Ok(Success::ok(result).message("File uploaded successfully"))
}

/// List stored images handler
pub async fn list_images<S>(
    service: web::Data<ImageUploadService<S>>,
) -> Result<success::Success<Vec<ImageDescriptor>>, error::Error>
where
    S: ImageStore + Send + Sync + 'static,
{
    let images =
        service.list_images().await.map_err(|e| e.into_api_error("Failed to read images"))?;
    Ok(Success::ok(images))
}

/// Stream a stored file. Also answers HEAD, the server drops the body for those.
pub async fn serve_upload<S>(
    filename: web::Path<String>,
    service: web::Data<ImageUploadService<S>>,
) -> Result<HttpResponse, error::Error>
where
    S: ImageStore + Send + Sync + 'static,
{
    let (stored, content_type) =
        service.open(&filename).await.map_err(|e| e.into_api_error("Failed to read file"))?;

    let body = stream::try_unfold(stored.file, next_chunk);

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((header::CACHE_CONTROL, "public, max-age=0"))
        .no_chunking(stored.len)
        .streaming(body))
}

const READ_CHUNK_SIZE: usize = 64 * 1024;

async fn next_chunk(mut file: File) -> std::io::Result<Option<(web::Bytes, File)>> {
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    let read = file.read(&mut buf).await?;
    if read == 0 {
        return Ok(None);
    }
    buf.truncate(read);
    Ok(Some((web::Bytes::from(buf), file)))
}

/// Client file name from `filename`, or from `filename*` (RFC 5987) when that is all there is.
/// Empty names mean the part is not a file.
fn client_filename(cd: &ContentDisposition) -> Option<String> {
    cd.get_filename()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| {
            cd.get_filename_ext()
                .map(|ext| String::from_utf8_lossy(&ext.value).into_owned())
                .filter(|name| !name.is_empty())
        })
}

async fn drain(field: &mut Field) -> Result<(), error::Error> {
    while field.try_next().await.map_err(multipart_error)?.is_some() {}
    Ok(())
}

fn multipart_error(err: MultipartError) -> error::Error {
    match err {
        // Not a multipart request at all, so there is no file in it
        MultipartError::ContentTypeMissing
        | MultipartError::ContentTypeParse
        | MultipartError::ContentTypeIncompatible
        | MultipartError::BoundaryMissing => error::Error::bad_request("No file uploaded"),
        other => {
            log::warn!("Malformed multipart request: {}", other);
            error::Error::bad_request(other.to_string())
        }
    }
}
