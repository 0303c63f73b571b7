use std::path::Path;
use std::sync::Arc;

use crate::modules::image_upload::{
    model::UploadConfig, repository_fs::LocalImageStore, service::ImageUploadService,
};

pub const BOUNDARY: &str = "----upload-test-boundary";

/// Service backed by a fresh temporary storage directory. Keep the `TempDir` alive for the
/// duration of the test.
pub fn temp_service(
    config: UploadConfig,
) -> (tempfile::TempDir, ImageUploadService<LocalImageStore>) {
    let tmp = tempfile::tempdir().unwrap();
    let service = ImageUploadService::new(Arc::new(LocalImageStore::new(tmp.path())), config);
    (tmp, service)
}

pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

pub enum Part<'a> {
    File { field: &'a str, filename: &'a str, content_type: Option<&'a str>, bytes: &'a [u8] },
    /// File part whose name is only given as `filename*=UTF-8''<percent-encoded>`
    EncodedFile { field: &'a str, encoded_filename: &'a str, bytes: &'a [u8] },
    Text { field: &'a str, value: &'a str },
}

/// Encodes `parts` as a `multipart/form-data` body delimited by [`BOUNDARY`]
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File { field, filename, content_type, bytes } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; \
                         filename=\"{filename}\"\r\n"
                    )
                    .as_bytes(),
                );
                if let Some(ct) = content_type {
                    body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
            Part::EncodedFile { field, encoded_filename, bytes } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; \
                         filename*=UTF-8''{encoded_filename}\r\nContent-Type: image/png\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
            Part::Text { field, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
        }
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub fn image_part<'a>(filename: &'a str, bytes: &'a [u8]) -> Part<'a> {
    Part::File { field: "image", filename, content_type: Some("image/png"), bytes }
}
