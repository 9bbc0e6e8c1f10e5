//! Command line and environment configuration.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use gallery_common::GalleryResult;
use storage::cache_store::DEFAULT_CACHE_MAX_BYTES;
use storage::{ObjectStorageConfig, UrlMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UrlModeArg {
    Public,
    Signed,
}

impl From<UrlModeArg> for UrlMode {
    fn from(arg: UrlModeArg) -> Self {
        match arg {
            UrlModeArg::Public => UrlMode::Public,
            UrlModeArg::Signed => UrlMode::Signed,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "gallery-api")]
#[command(about = "Portfolio and team gallery API server")]
pub struct Args {
    /// Listen address
    #[arg(short, long, env = "GALLERY_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Log level
    #[arg(long, env = "GALLERY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// S3-compatible storage endpoint
    #[arg(long, env = "GALLERY_STORAGE_ENDPOINT", default_value = "")]
    pub storage_endpoint: String,

    /// Bucket holding the site assets
    #[arg(long, env = "GALLERY_BUCKET", default_value = "projects")]
    pub bucket: String,

    #[arg(long, env = "GALLERY_ACCESS_KEY", default_value = "", hide_env_values = true)]
    pub access_key: String,

    #[arg(long, env = "GALLERY_SECRET_KEY", default_value = "", hide_env_values = true)]
    pub secret_key: String,

    #[arg(long, env = "GALLERY_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Allow plain HTTP to the storage endpoint (local development)
    #[arg(long, env = "GALLERY_ALLOW_HTTP")]
    pub allow_http: bool,

    /// Override for the public URL prefix (e.g. a CDN)
    #[arg(long, env = "GALLERY_PUBLIC_BASE_URL")]
    pub public_base_url: Option<String>,

    /// Hand out public or signed image URLs
    #[arg(long, env = "GALLERY_URL_MODE", value_enum, default_value = "public")]
    pub url_mode: UrlModeArg,

    /// Lifetime of signed URLs in seconds
    #[arg(long, env = "GALLERY_SIGNED_URL_TTL_SECS", default_value_t = 21600)]
    pub signed_url_ttl_secs: u64,

    /// File backing the signed URL cache
    #[arg(long, env = "GALLERY_CACHE_PATH", default_value = "./data/url-cache.json")]
    pub cache_path: PathBuf,

    /// Size bound of the persisted URL cache in bytes
    #[arg(long, env = "GALLERY_CACHE_MAX_BYTES", default_value_t = DEFAULT_CACHE_MAX_BYTES)]
    pub cache_max_bytes: u64,
}

impl Args {
    pub fn storage_config(&self) -> ObjectStorageConfig {
        ObjectStorageConfig {
            endpoint: self.storage_endpoint.clone(),
            bucket: self.bucket.clone(),
            access_key_id: self.access_key.clone(),
            secret_access_key: self.secret_key.clone(),
            region: self.region.clone(),
            allow_http: self.allow_http,
            public_base_url: self.public_base_url.clone(),
            url_mode: self.url_mode.into(),
            signed_url_ttl_secs: self.signed_url_ttl_secs,
        }
    }

    /// Storage config, failing fast when credentials are missing.
    pub fn validated_storage_config(&self) -> GalleryResult<ObjectStorageConfig> {
        let config = self.storage_config();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_common::GalleryError;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from([
            "gallery-api",
            "--storage-endpoint",
            "https://storage.example.com",
            "--access-key",
            "key",
            "--secret-key",
            "secret",
        ])
        .unwrap();

        let config = args.validated_storage_config().unwrap();
        assert_eq!(config.bucket, "projects");
        assert_eq!(config.url_mode, UrlMode::Public);
        assert_eq!(config.signed_url_ttl_secs, 21600);
        assert_eq!(args.cache_max_bytes, DEFAULT_CACHE_MAX_BYTES);
    }

    #[test]
    fn test_signed_mode() {
        let args = Args::try_parse_from([
            "gallery-api",
            "--storage-endpoint",
            "https://storage.example.com",
            "--access-key",
            "key",
            "--secret-key",
            "secret",
            "--url-mode",
            "signed",
            "--signed-url-ttl-secs",
            "60",
        ])
        .unwrap();

        let config = args.storage_config();
        assert_eq!(config.url_mode, UrlMode::Signed);
        assert_eq!(config.signed_url_ttl().as_secs(), 60);
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let args = Args::try_parse_from(["gallery-api", "--storage-endpoint", "https://s3.test"])
            .unwrap();
        let err = args.validated_storage_config().unwrap_err();
        assert!(matches!(err, GalleryError::Configuration(_)));
    }
}
