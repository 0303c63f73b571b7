use rand::Rng;
use std::path::{Path, PathBuf};

use crate::constants::IMAGE_EXTENSIONS;

/// Extension of a client-supplied file name, kept only when it is plain ASCII alphanumerics.
pub fn preserved_extension(original_filename: &str) -> Option<&str> {
    Path::new(original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// `<field>-<unix millis>-<random 0..=1e9><.ext>`
pub fn generate_filename(field_name: &str, original_filename: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..=1_000_000_000);

    match preserved_extension(original_filename) {
        Some(ext) => format!("{field_name}-{millis}-{suffix}.{ext}"),
        None => format!("{field_name}-{millis}-{suffix}"),
    }
}

pub fn has_image_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
        .unwrap_or(false)
}

/// A name that refers to an entry directly inside the storage directory.
pub fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// `/`-separated path below the storage directory. Every segment has to be a plain name, so
/// `..`, empty segments and absolute paths are refused.
pub fn safe_relative_path(path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for segment in path.split('/') {
        if !is_plain_filename(segment) {
            return None;
        }
        relative.push(segment);
    }
    Some(relative)
}

pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.trim().to_ascii_lowercase().starts_with("image/")
}
