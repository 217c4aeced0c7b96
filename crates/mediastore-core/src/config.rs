//! Configuration module
//!
//! Loads server, upload-limit and geocoder settings from the environment
//! (after `.env`), with defaults matching the public upload contract.

use std::env;
use std::time::Duration;

// Common constants
const DEFAULT_PORT: u16 = 8080;
const JWT_EXPIRY_HOURS: i64 = 24;
const MIB: u64 = 1024 * 1024;
const AVATAR_MAX_SIZE_MB: u64 = 5;
const GALLERY_MAX_SIZE_MB: u64 = 10;
const VIDEO_MAX_SIZE_MB: u64 = 500;
const GEOCODER_TIMEOUT_SECS: u64 = 5;
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_GEOCODER_USER_AGENT: &str = "MediaStoreBackend/1.0";
// Largest per-collection ceiling accepted from the environment (1 TiB).
const MAX_SIZE_MB: u64 = 1024 * 1024;

/// Whether an `ENVIRONMENT`/`APP_ENV` value names production.
pub fn is_production_environment(environment: &str) -> bool {
    let env = environment.trim().to_lowercase();
    env == "production" || env == "prod"
}

/// Resolve the public base URL used to build asset links.
///
/// An explicit `BASE_URL` wins; otherwise `http://localhost:<port>`, falling back
/// to port 8080 when no port is configured. A trailing slash is dropped.
pub fn resolve_base_url(base_url: Option<&str>, port: Option<&str>) -> String {
    if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }
    let port = port
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or("8080");
    format!("http://localhost:{}", port)
}

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub base_url: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
}

/// Per-collection ceilings and per-kind allow-lists, read once at startup.
#[derive(Clone, Debug)]
pub struct MediaLimitsConfig {
    pub avatar_max_bytes: u64,
    pub gallery_max_bytes: u64,
    pub video_max_bytes: u64,
    pub image_allowed_extensions: Vec<String>,
    pub video_allowed_extensions: Vec<String>,
}

impl Default for MediaLimitsConfig {
    fn default() -> Self {
        Self {
            avatar_max_bytes: AVATAR_MAX_SIZE_MB * MIB,
            gallery_max_bytes: GALLERY_MAX_SIZE_MB * MIB,
            video_max_bytes: VIDEO_MAX_SIZE_MB * MIB,
            image_allowed_extensions: split_list("png,jpg,jpeg,gif"),
            video_allowed_extensions: split_list("mp4,avi,mov,mkv,webm"),
        }
    }
}

impl MediaLimitsConfig {
    /// Largest ceiling across all collections.
    pub fn largest_ceiling(&self) -> u64 {
        self.avatar_max_bytes
            .max(self.gallery_max_bytes)
            .max(self.video_max_bytes)
    }
}

#[derive(Clone, Debug)]
pub struct GeocoderConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_GEOCODER_URL.to_string(),
            timeout: Duration::from_secs(GEOCODER_TIMEOUT_SECS),
            user_agent: DEFAULT_GEOCODER_USER_AGENT.to_string(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub upload_dir: String,
    pub media: MediaLimitsConfig,
    pub geocoder: GeocoderConfig,
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(raw: Option<String>, default: bool) -> bool {
    raw.map(|v| v.trim().to_lowercase())
        .and_then(|v| match v.as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_environment(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let port_raw = lookup("PORT");
        let server_port = match port_raw.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => p
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            _ => DEFAULT_PORT,
        };
        let base_url = resolve_base_url(lookup("BASE_URL").as_deref(), port_raw.as_deref());

        let size_mb = |key: &str, default: u64| -> Result<u64, anyhow::Error> {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(default)
                .checked_mul(MIB)
                .ok_or_else(|| anyhow::anyhow!("{} is too large", key))
        };

        let media = MediaLimitsConfig {
            avatar_max_bytes: size_mb("AVATAR_MAX_SIZE_MB", AVATAR_MAX_SIZE_MB)?,
            gallery_max_bytes: size_mb("GALLERY_MAX_SIZE_MB", GALLERY_MAX_SIZE_MB)?,
            video_max_bytes: size_mb("VIDEO_MAX_SIZE_MB", VIDEO_MAX_SIZE_MB)?,
            image_allowed_extensions: lookup("IMAGE_ALLOWED_EXTENSIONS")
                .map(|s| split_list(&s))
                .unwrap_or_else(|| MediaLimitsConfig::default().image_allowed_extensions),
            video_allowed_extensions: lookup("VIDEO_ALLOWED_EXTENSIONS")
                .map(|s| split_list(&s))
                .unwrap_or_else(|| MediaLimitsConfig::default().video_allowed_extensions),
        };

        let geocoder = GeocoderConfig {
            enabled: parse_bool(lookup("GEOCODING_ENABLED"), true),
            base_url: lookup("GEOCODER_URL")
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string()),
            timeout: Duration::from_secs(
                lookup("GEOCODER_TIMEOUT_SECS")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(GEOCODER_TIMEOUT_SECS),
            ),
            user_agent: lookup("GEOCODER_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_GEOCODER_USER_AGENT.to_string()),
        };

        let base = BaseConfig {
            server_port,
            base_url,
            cors_origins,
            jwt_secret: lookup("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: lookup("JWT_EXPIRY_HOURS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(JWT_EXPIRY_HOURS),
            environment,
        };

        Ok(Config {
            base,
            upload_dir: lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
            media,
            geocoder,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if self.upload_dir.trim().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_DIR must not be empty"));
        }

        if !self.base.base_url.starts_with("http://") && !self.base.base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!("BASE_URL must start with http:// or https://"));
        }

        if self.media.image_allowed_extensions.is_empty()
            || self.media.video_allowed_extensions.is_empty()
        {
            return Err(anyhow::anyhow!(
                "IMAGE_ALLOWED_EXTENSIONS and VIDEO_ALLOWED_EXTENSIONS must not be empty"
            ));
        }

        if self.media.avatar_max_bytes == 0
            || self.media.gallery_max_bytes == 0
            || self.media.video_max_bytes == 0
        {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }

        if self.media.largest_ceiling() > MAX_SIZE_MB * MIB {
            return Err(anyhow::anyhow!(
                "Upload size limits must not exceed {}MB",
                MAX_SIZE_MB
            ));
        }

        if self.geocoder.enabled && self.geocoder.timeout.is_zero() {
            return Err(anyhow::anyhow!(
                "GEOCODER_TIMEOUT_SECS must be greater than zero when geocoding is enabled"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.base.environment)
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn base_url(&self) -> &str {
        &self.base.base_url
    }

    pub fn jwt_secret(&self) -> &str {
        &self.base.jwt_secret
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_base_url_fallbacks() {
        assert_eq!(
            resolve_base_url(Some("https://cdn.example.com/"), Some("3000")),
            "https://cdn.example.com"
        );
        assert_eq!(resolve_base_url(None, Some("3000")), "http://localhost:3000");
        assert_eq!(resolve_base_url(None, None), "http://localhost:8080");
        assert_eq!(resolve_base_url(Some(""), Some("")), "http://localhost:8080");
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", SECRET)])).unwrap();
        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(config.upload_dir, "uploads");
        assert_eq!(config.media.avatar_max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.media.gallery_max_bytes, 10 * 1024 * 1024);
        assert_eq!(config.media.video_max_bytes, 500 * 1024 * 1024);
        assert_eq!(
            config.media.image_allowed_extensions,
            vec!["png", "jpg", "jpeg", "gif"]
        );
        assert_eq!(config.geocoder.timeout, Duration::from_secs(5));
        assert_eq!(config.geocoder.user_agent, "MediaStoreBackend/1.0");
        assert!(config.geocoder.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_port_feeds_base_url() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", SECRET), ("PORT", "9001")]))
            .unwrap();
        assert_eq!(config.server_port(), 9001);
        assert_eq!(config.base_url(), "http://localhost:9001");
    }

    #[test]
    fn test_missing_jwt_secret_is_error() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
    }

    #[test]
    fn test_short_jwt_secret_fails_validation() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "short")])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let result = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("ENVIRONMENT", "production"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_extension_lists_are_normalized() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("IMAGE_ALLOWED_EXTENSIONS", " .JPG, png ,,"),
            ("GEOCODING_ENABLED", "off"),
        ]))
        .unwrap();
        assert_eq!(config.media.image_allowed_extensions, vec!["jpg", "png"]);
        assert!(!config.geocoder.enabled);
    }

    #[test]
    fn test_oversized_limits_are_rejected() {
        // Would overflow u64 once converted to bytes.
        let result = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("VIDEO_MAX_SIZE_MB", "18446744073709551615"),
        ]));
        assert!(result.is_err());

        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("GALLERY_MAX_SIZE_MB", "2097152"),
        ]))
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_environment_names() {
        assert!(is_production_environment("production"));
        assert!(is_production_environment(" PROD "));
        assert!(!is_production_environment("staging"));
        assert!(!is_production_environment("development"));

        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("APP_ENV", "Prod"),
            ("CORS_ORIGINS", "https://app.example.com"),
        ]))
        .unwrap();
        assert!(config.is_production());
    }
}
