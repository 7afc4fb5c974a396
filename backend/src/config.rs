//! Runtime settings read from the environment.
//!
//! `.env` is loaded first (if present), so a local file can set any of:
//!
//! - `TEXTPREP_PORT`: HTTP port (default 3000)
//! - `TEXTPREP_QUIET`: `1` or `true` to stop printing progress
//! - `TEXTPREP_MAX_UPLOAD_BYTES`: multipart body limit (default 50 MiB)
//!
//! CLI flags take precedence over these values.

use std::env;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub quiet: bool,
    pub max_upload_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            quiet: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Settings {
    /// Load `.env`, then read the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("TEXTPREP_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            quiet: lookup("TEXTPREP_QUIET")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.quiet),
            max_upload_bytes: lookup("TEXTPREP_MAX_UPLOAD_BYTES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
        }
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.port, 3000);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("TEXTPREP_PORT", "8080"),
            ("TEXTPREP_QUIET", "TRUE"),
            ("TEXTPREP_MAX_UPLOAD_BYTES", "1024"),
        ]));
        assert_eq!(settings.port, 8080);
        assert!(settings.quiet);
        assert_eq!(settings.max_upload_bytes, 1024);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let settings = Settings::from_lookup(lookup(&[("TEXTPREP_PORT", "http"), ("TEXTPREP_QUIET", "0")]));
        assert_eq!(settings.port, DEFAULT_PORT);
        assert!(!settings.quiet);
    }

    #[test]
    fn test_cli_port_wins() {
        let settings = Settings::default().with_port(Some(4000));
        assert_eq!(settings.port, 4000);
        assert_eq!(Settings::default().with_port(None).port, DEFAULT_PORT);
    }
}
