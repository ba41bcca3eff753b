//! Configuration module
//!
//! Runtime settings for the conversion API, read from the environment (and an
//! optional `.env` file) once at startup.

use std::env;
use std::path::PathBuf;

use crate::format::{ArchiveFormat, SupportedTypes};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8000;
const MAX_UPLOAD_SIZE_MB: usize = 100;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_upload_size_bytes: usize,
    /// Cap on in-flight requests, shared by every route
    pub http_concurrency_limit: usize,
    /// Formats accepted as uploads
    pub input_formats: Vec<ArchiveFormat>,
    /// Format produced by every conversion
    pub output_format: ArchiveFormat,
    /// Parent directory for per-request scratch directories (system temp dir when unset)
    pub scratch_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            server_port: PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            input_formats: ArchiveFormat::ALL.to_vec(),
            output_format: ArchiveFormat::Zip,
            scratch_dir: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be a valid number"))?;

        let http_concurrency_limit = env::var("HTTP_CONCURRENCY_LIMIT")
            .unwrap_or_else(|_| HTTP_CONCURRENCY_LIMIT.to_string())
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be a valid number"))?;

        let input_formats = env::var("INPUT_FORMATS")
            .unwrap_or_else(|_| "rar,zip,tar,tar.gz".to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<ArchiveFormat>, _>>()?;

        let output_format = env::var("OUTPUT_FORMAT")
            .unwrap_or_else(|_| "zip".to_string())
            .parse()?;

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            max_upload_size_bytes: upload_limit_bytes(max_upload_size_mb)?,
            http_concurrency_limit,
            input_formats,
            output_format,
            scratch_dir: env::var("SCRATCH_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        };

        Ok(config)
    }

    /// Validate configuration; fail fast on misconfiguration.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.supported_types().is_empty() {
            return Err(anyhow::anyhow!("INPUT_FORMATS must name at least one format"));
        }
        if !self.output_format.is_writable() {
            return Err(anyhow::anyhow!(
                "OUTPUT_FORMAT '{}' cannot be written",
                self.output_format
            ));
        }
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }
        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be greater than 0"));
        }
        if self.cors_origins.is_empty() {
            return Err(anyhow::anyhow!("CORS_ORIGINS must not be empty"));
        }
        if let Some(dir) = &self.scratch_dir {
            std::fs::create_dir_all(dir).map_err(|e| {
                anyhow::anyhow!("SCRATCH_DIR {} is not usable: {}", dir.display(), e)
            })?;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.server_port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    /// Root under which scratch directories are created.
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(env::temp_dir)
    }

    /// Media types accepted for upload, derived from the enabled input formats.
    pub fn supported_types(&self) -> SupportedTypes {
        SupportedTypes::new(&self.input_formats)
    }
}

fn upload_limit_bytes(megabytes: usize) -> Result<usize, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be a valid number"))
}
