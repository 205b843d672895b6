//! API key resolution.
//!
//! Keys are looked up on every call so a credential rotated by the user
//! takes effect on the next request without rebuilding the gateway.

/// Supplies the API key for the next request
pub trait CredentialSource: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// Reads the key from environment variables, first non-empty wins
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    vars: Vec<String>,
}

impl EnvCredentials {
    pub const DEFAULT_VARS: [&'static str; 2] = ["GEMINI_API_KEY", "API_KEY"];

    pub fn new() -> Self {
        Self::from_vars(Self::DEFAULT_VARS)
    }

    pub fn from_vars<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        self.vars.iter().find_map(|var| {
            std::env::var(var)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }
}

/// Fixed key, for embedding and tests
#[derive(Clone)]
pub struct StaticCredentials(String);

impl StaticCredentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticCredentials(***)")
    }
}

impl CredentialSource for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        Some(self.0.clone()).filter(|k| !k.trim().is_empty())
    }
}
