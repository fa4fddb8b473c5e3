use std::env;

use crate::recovery::ReconciliationPolicy;

/// Behaviour switches for a `CommentStore`, fixed when the store is built.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    pub policy: ReconciliationPolicy,
    /// Substitute the canned thread when a load fails.
    #[cfg(feature = "dev-fallback")]
    pub sample_fallback: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub store: StoreOptions,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let policy = env::var("LUNCHEON_RECONCILE")
            .unwrap_or_else(|_| "resync".to_string())
            .parse::<ReconciliationPolicy>()
            .map_err(|e| anyhow::anyhow!("Invalid LUNCHEON_RECONCILE: {}", e))?;

        Ok(Self {
            api_url: env::var("LUNCHEON_API_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            api_token: env::var("LUNCHEON_API_TOKEN").ok(),
            store: StoreOptions {
                policy,
                #[cfg(feature = "dev-fallback")]
                sample_fallback: env::var("LUNCHEON_SAMPLE_FALLBACK")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid LUNCHEON_SAMPLE_FALLBACK: {}", e))?,
            },
        })
    }
}
