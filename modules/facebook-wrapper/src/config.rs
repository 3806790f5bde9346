use anyhow::{Context, Result};

/// Credentials and endpoint settings loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperConfig {
    pub access_token: String,
    pub application_namespace: Option<String>,
    pub app_id: Option<String>,
    /// Overrides the Graph base URL, e.g. to pin another API version.
    pub graph_url: Option<String>,
}

impl WrapperConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            application_namespace: None,
            app_id: None,
            graph_url: None,
        }
    }

    /// Load from the process environment, reading a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            access_token: optional("FACEBOOK_ACCESS_TOKEN")
                .context("FACEBOOK_ACCESS_TOKEN environment variable is required")?,
            application_namespace: optional("FACEBOOK_APP_NAMESPACE"),
            app_id: optional("FACEBOOK_APP_ID"),
            graph_url: optional("FACEBOOK_GRAPH_URL"),
        })
    }

    pub fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.chars().take(5).map(char::len_utf8).sum();
            format!("{}...({} chars)", &val[..n], val.len())
        }
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => preview(v),
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  FACEBOOK_ACCESS_TOKEN: {}", preview(&self.access_token));
        tracing::info!("  FACEBOOK_APP_NAMESPACE: {}", preview_opt(&self.application_namespace));
        tracing::info!("  FACEBOOK_APP_ID: {}", preview_opt(&self.app_id));
        tracing::info!(
            "  FACEBOOK_GRAPH_URL: {}",
            self.graph_url.as_deref().unwrap_or("<default>")
        );
    }
}
