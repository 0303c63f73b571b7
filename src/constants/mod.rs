use std::path::PathBuf;

use crate::api::error::SystemError;

/// Multipart field the upload form must use for the file part.
pub const UPLOAD_FIELD_NAME: &str = "image";

pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Extensions (lowercase, without the dot) that the listing exposes.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct Env {
    pub ip: String,
    pub port: u16,
    pub public_url: String,
    pub upload_dir: PathBuf,
    pub max_file_size: usize,
    pub workers: usize,
    pub cors_allowed_origin: Option<String>,
}

impl Env {
    pub fn from_env() -> Result<Self, SystemError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests don't have to touch the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SystemError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ip = lookup("IP").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("PORT", lookup("PORT"), 3001u16)?;

        let public_url = lookup("PUBLIC_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let upload_dir =
            lookup("UPLOAD_DIR").filter(|dir| !dir.is_empty()).unwrap_or_else(|| "uploads".into());

        let max_file_size =
            parse_or("MAX_FILE_SIZE", lookup("MAX_FILE_SIZE"), DEFAULT_MAX_FILE_SIZE)?;
        if max_file_size == 0 {
            return Err(SystemError::config("MAX_FILE_SIZE must be greater than zero"));
        }

        let workers = parse_or("WORKERS", lookup("WORKERS"), 2usize)?.max(1);
        let cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN").filter(|o| !o.is_empty());

        Ok(Env {
            ip,
            port,
            public_url,
            upload_dir: PathBuf::from(upload_dir),
            max_file_size,
            workers,
            cors_allowed_origin,
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, SystemError>
where
    T: std::str::FromStr,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|_| {
            SystemError::config(format!("{key} must be a valid number, got '{value}'"))
        }),
    }
}
