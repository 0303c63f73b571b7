use actix_cors::Cors;
use std::path::{Path, PathBuf};

use crate::api::error;
use crate::constants::Env;

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Creates the storage directory if needed and returns its absolute path.
pub async fn prepare_upload_dir(dir: &Path) -> Result<PathBuf, error::SystemError> {
    tokio::fs::create_dir_all(dir).await?;
    let absolute = tokio::fs::canonicalize(dir).await?;
    log::info!("Storing uploads in {}", absolute.display());
    Ok(absolute)
}

pub fn cors(env: &Env) -> Cors {
    let cors = Cors::default().allow_any_method().allow_any_header().max_age(3600);

    match env.cors_allowed_origin.as_deref() {
        Some(origin) => cors.allowed_origin(origin),
        None => cors.allow_any_origin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_prepare_upload_dir_creates_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("nested").join("uploads");

        let absolute = prepare_upload_dir(&target).await.unwrap();

        assert!(absolute.is_absolute());
        assert!(absolute.is_dir());
    }

    #[actix_web::test]
    async fn test_prepare_upload_dir_accepts_existing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let first = prepare_upload_dir(tmp.path()).await.unwrap();
        let second = prepare_upload_dir(tmp.path()).await.unwrap();
        assert_eq!(first, second);
    }
}
