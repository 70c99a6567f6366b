use std::path::PathBuf;
use std::time::Duration;

use casa_client::ClientConfig;
use casa_core::validation::IdFormat;

use crate::error::AdminError;

/// Controller-layer configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// REST backend base URL (default: `http://localhost:3333`).
    pub api_url: String,
    /// JSON file standing in for browser local storage.
    pub token_path: PathBuf,
    /// Per-request HTTP timeout (default: 30s).
    pub request_timeout: Duration,
    /// Quiet period before a search refetch fires (default: 500ms).
    pub search_debounce: Duration,
    /// Id shape required on attendance submit.
    pub id_format: IdFormat,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3333".into(),
            token_path: PathBuf::from(".casa-apoio/storage.json"),
            request_timeout: Duration::from_secs(30),
            search_debounce: Duration::from_millis(500),
            id_format: IdFormat::Uuid,
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `CASA_API_URL`              | `http://localhost:3333`    |
    /// | `CASA_TOKEN_PATH`           | `.casa-apoio/storage.json` |
    /// | `CASA_REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `CASA_SEARCH_DEBOUNCE_MS`   | `500`                      |
    /// | `CASA_STRICT_IDS`           | `true`                     |
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, AdminError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AdminError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("CASA_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(AdminError::Config(format!(
                "CASA_API_URL must be an http(s) URL, got '{api_url}'"
            )));
        }

        let token_path = lookup("CASA_TOKEN_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.token_path);

        let request_timeout = match lookup("CASA_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("CASA_REQUEST_TIMEOUT_SECS", &raw)?),
            None => defaults.request_timeout,
        };

        let search_debounce = match lookup("CASA_SEARCH_DEBOUNCE_MS") {
            Some(raw) => Duration::from_millis(parse_number("CASA_SEARCH_DEBOUNCE_MS", &raw)?),
            None => defaults.search_debounce,
        };

        let id_format = match lookup("CASA_STRICT_IDS") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => IdFormat::Uuid,
                "false" | "0" | "no" => IdFormat::Opaque,
                other => {
                    return Err(AdminError::Config(format!(
                        "CASA_STRICT_IDS must be a boolean, got '{other}'"
                    )))
                }
            },
            None => defaults.id_format,
        };

        Ok(Self {
            api_url,
            token_path,
            request_timeout,
            search_debounce,
            id_format,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.clone()).with_timeout(self.request_timeout)
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64, AdminError> {
    raw.trim()
        .parse()
        .map_err(|_| AdminError::Config(format!("{key} must be a non-negative integer, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AdminConfig, AdminError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AdminConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url, "http://localhost:3333");
        assert_eq!(config.token_path, PathBuf::from(".casa-apoio/storage.json"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.search_debounce, Duration::from_millis(500));
        assert_eq!(config.id_format, IdFormat::Uuid);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("CASA_API_URL", "https://api.casa.org/"),
            ("CASA_REQUEST_TIMEOUT_SECS", "5"),
            ("CASA_SEARCH_DEBOUNCE_MS", "250"),
            ("CASA_STRICT_IDS", "false"),
        ])
        .unwrap();
        assert_eq!(config.search_debounce, Duration::from_millis(250));
        assert_eq!(config.id_format, IdFormat::Opaque);

        let client = config.client_config();
        assert_eq!(client.base_url, "https://api.casa.org");
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        assert_matches!(
            load(&[("CASA_REQUEST_TIMEOUT_SECS", "soon")]),
            Err(AdminError::Config(_))
        );
        assert_matches!(
            load(&[("CASA_STRICT_IDS", "maybe")]),
            Err(AdminError::Config(_))
        );
        assert_matches!(
            load(&[("CASA_API_URL", "localhost:3333")]),
            Err(AdminError::Config(_))
        );
    }
}
