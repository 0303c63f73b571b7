use crate::constants::{self, Env};

/// Image accepted by validation, ready to be written to storage
#[derive(Debug, Clone)]
pub struct NewImage {
    pub original_filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Image upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub field_name: String,
    pub max_file_size: usize,
    /// Base of the URLs handed back to clients, e.g. `http://localhost:3001/uploads`
    pub base_url: String,
    /// How many fresh names to try when a generated name already exists on disk
    pub max_name_attempts: usize,
}

impl UploadConfig {
    pub fn from_env(env: &Env) -> Self {
        Self {
            max_file_size: env.max_file_size,
            base_url: format!("{}{}", env.public_url, constants::UPLOADS_ROUTE),
            ..Default::default()
        }
    }

    pub fn url_for(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url, filename)
    }

    pub fn max_size_message(&self) -> String {
        let mb = self.max_file_size as f64 / (1024.0 * 1024.0);
        if mb.fract() == 0.0 {
            format!("File too large. Maximum size is {}MB.", mb as u64)
        } else {
            format!("File too large. Maximum size is {} bytes.", self.max_file_size)
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            field_name: constants::UPLOAD_FIELD_NAME.to_string(),
            max_file_size: constants::DEFAULT_MAX_FILE_SIZE,
            base_url: format!("http://localhost:3001{}", constants::UPLOADS_ROUTE),
            max_name_attempts: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_message_in_megabytes() {
        let config = UploadConfig::default();
        assert_eq!(config.max_size_message(), "File too large. Maximum size is 10MB.");
    }

    #[test]
    fn test_size_message_falls_back_to_bytes() {
        let config = UploadConfig { max_file_size: 1500, ..Default::default() };
        assert_eq!(config.max_size_message(), "File too large. Maximum size is 1500 bytes.");
    }

    #[test]
    fn test_url_for() {
        let env = Env::from_lookup(|key| (key == "PORT").then(|| "4000".to_string())).unwrap();
        let config = UploadConfig::from_env(&env);
        assert_eq!(config.url_for("a.png"), "http://localhost:4000/uploads/a.png");
    }
}
