use std::env;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// `API_KEY` (falling back to `GEMINI_API_KEY`), `GEMINI_MODEL`, `GEMINI_API_BASE`.
    pub fn from_env() -> Self {
        let api_key = non_empty_env("API_KEY").or_else(|| non_empty_env("GEMINI_API_KEY"));
        let model = non_empty_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let api_base = non_empty_env("GEMINI_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());

        GeminiConfig {
            api_key,
            model,
            api_base,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_body_bytes: Option<usize>,
    pub proxy_url: Option<String>,
    pub gemini: GeminiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: None,
            port: None,
            max_body_bytes: None,
            proxy_url: None,
            gemini: GeminiConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = non_empty_env("HOST");
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());
        let max_body_bytes = env::var("MAX_BODY_BYTES")
            .ok()
            .and_then(|value| value.parse().ok());
        let proxy_url = non_empty_env("ROOMGEN_PROXY_URL");

        Config {
            host,
            port,
            max_body_bytes,
            proxy_url,
            gemini: GeminiConfig::from_env(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = Some(bytes);
        self
    }

    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or("127.0.0.1")
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(8080)
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }

    pub fn proxy_url(&self) -> &str {
        self.proxy_url.as_deref().unwrap_or(DEFAULT_PROXY_URL)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.max_body_bytes(), 20 * 1024 * 1024);
        assert_eq!(config.proxy_url(), "http://127.0.0.1:8080");
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn endpoint_accepts_bare_and_prefixed_models() {
        let gemini = GeminiConfig::new().with_api_base("https://example.test/v1beta/");
        assert_eq!(
            gemini.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash-image-preview:generateContent"
        );
        let gemini = gemini.with_model("models/custom-image");
        assert_eq!(
            gemini.endpoint(),
            "https://example.test/v1beta/models/custom-image:generateContent"
        );
    }
}
