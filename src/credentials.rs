//! Twitter OAuth 1.0a credentials read from the process environment.

use std::fmt;
use thiserror::Error;

pub const CONSUMER_KEY_VAR: &str = "TWITTER_CONSUMER_KEY";
pub const CONSUMER_SECRET_VAR: &str = "TWITTER_CONSUMER_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "TWITTER_ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_VAR: &str = "TWITTER_ACCESS_TOKEN_SECRET";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
}

#[derive(Clone)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    access_token_secret: String,
}

impl Credentials {
    pub fn new(
        consumer_key: String,
        consumer_secret: String,
        access_token: String,
        access_token_secret: String,
    ) -> Self {
        Self {
            consumer_key,
            consumer_secret,
            access_token,
            access_token_secret,
        }
    }

    /// Read all four secrets from the environment.
    pub fn from_env() -> Result<Self, CredentialsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read all four secrets through `lookup`. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CredentialsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(CredentialsError::Missing(name))
        };

        Ok(Self {
            consumer_key: read(CONSUMER_KEY_VAR)?,
            consumer_secret: read(CONSUMER_SECRET_VAR)?,
            access_token: read(ACCESS_TOKEN_VAR)?,
            access_token_secret: read(ACCESS_TOKEN_SECRET_VAR)?,
        })
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn access_token_secret(&self) -> &str {
        &self.access_token_secret
    }
}

// Secrets must never reach the logs, even through `{:?}`.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_with(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reads_all_four_variables() {
        let env = env_with(&[
            (CONSUMER_KEY_VAR, "ck"),
            (CONSUMER_SECRET_VAR, "cs"),
            (ACCESS_TOKEN_VAR, "at"),
            (ACCESS_TOKEN_SECRET_VAR, "ats"),
        ]);
        let creds = Credentials::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(creds.consumer_key(), "ck");
        assert_eq!(creds.consumer_secret(), "cs");
        assert_eq!(creds.access_token(), "at");
        assert_eq!(creds.access_token_secret(), "ats");
    }

    #[test]
    fn missing_or_empty_variable_is_an_error() {
        let env = env_with(&[
            (CONSUMER_KEY_VAR, "ck"),
            (CONSUMER_SECRET_VAR, ""),
            (ACCESS_TOKEN_VAR, "at"),
        ]);
        let err = Credentials::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert_eq!(err, CredentialsError::Missing(CONSUMER_SECRET_VAR));
    }

    #[test]
    fn debug_output_is_redacted() {
        let creds = Credentials::new(
            "key-123".into(),
            "secret-456".into(),
            "token-789".into(),
            "token-secret-000".into(),
        );
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("key-123"));
        assert!(!shown.contains("secret-456"));
        assert!(!shown.contains("token-789"));
        assert!(!shown.contains("token-secret-000"));
        assert!(shown.contains("<redacted>"));
    }
}
