use std::{env, fmt::Display, path::PathBuf, str::FromStr};

/// Runtime configuration for the pickup order API.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: PathBuf,
    /// Echo the issued OTP back in the send-otp response (development aid).
    pub otp_in_response: bool,
    pub admin_credentials: Option<Credentials>,
}

/// Configuration for the gallery demo app.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub log_path: PathBuf,
    pub admin: Credentials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Self {
        let admin_credentials = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
                Some(Credentials { username, password })
            }
            _ => None,
        };

        Self {
            host: try_load("HOST", "0.0.0.0"),
            port: try_load("PORT", "5000"),
            database_url: try_load("DATABASE_URL", "mongodb://localhost:27017/pickup"),
            upload_dir: try_load("UPLOAD_DIR", "uploads"),
            otp_in_response: load_flag("OTP_IN_RESPONSE", true),
            admin_credentials,
        }
    }
}

impl GalleryConfig {
    pub fn from_env() -> Self {
        let username: String = try_load("GALLERY_ADMIN_USERNAME", "admin");
        let password = env::var("GALLERY_ADMIN_PASSWORD").unwrap_or_else(|_| {
            log::warn!("⚠️  GALLERY_ADMIN_PASSWORD not set, using insecure default");
            "admin".to_string()
        });

        Self {
            host: try_load("GALLERY_HOST", "0.0.0.0"),
            port: try_load("GALLERY_PORT", "3000"),
            upload_dir: try_load("GALLERY_UPLOAD_DIR", "gallery_uploads"),
            log_path: try_load("GALLERY_LOG", "gallery_uploads.jsonl"),
            admin: Credentials { username, password },
        }
    }
}

/// Reads `key` from the environment, falling back to `default` when it is
/// missing or does not parse.
fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        log::debug!("{} not set, using default: {}", key, default);
        default.to_string()
    });

    raw.parse().or_else(|e| {
        log::warn!("⚠️  Invalid {} value '{}': {}, using default: {}", key, raw, e, default);
        default.parse()
    })
    .unwrap_or_else(|_| unreachable!("default for {} must parse", key))
}

/// Reads a boolean switch. Accepts `1/0`, `true/false`, `yes/no` and
/// `on/off` in any case. A value that is set but unrecognised reads as `false`.
fn load_flag(key: &str, default: bool) -> bool {
    let raw = match env::var(key) {
        Ok(raw) => raw,
        Err(_) => {
            log::debug!("{} not set, using default: {}", key, default);
            return default;
        }
    };

    parse_flag(&raw).unwrap_or_else(|| {
        log::warn!("⚠️  Invalid {} value '{}', treating it as off", key, raw);
        false
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
