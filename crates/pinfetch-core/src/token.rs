//! Access token threaded explicitly through the pipeline.

use std::fmt;

use crate::error::FetchError;

/// Bearer token for the CI provider. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read the token from `var`. Unset or blank is `MissingToken`.
    pub fn from_env(var: &str) -> Result<Self, FetchError> {
        match std::env::var(var) {
            Ok(v) if !v.trim().is_empty() => Ok(Self(v.trim().to_string())),
            _ => Err(FetchError::MissingToken {
                var: var.to_string(),
            }),
        }
    }

    /// `Authorization` header line.
    pub(crate) fn header(&self) -> String {
        format!("Authorization: Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let t = AccessToken::new("ghp_secret");
        assert_eq!(format!("{:?}", t), "AccessToken(***)");
        assert_eq!(t.header(), "Authorization: Bearer ghp_secret");
    }

    #[test]
    fn unset_var_is_missing_token() {
        let err = AccessToken::from_env("PINFETCH_TEST_TOKEN_DEFINITELY_UNSET").unwrap_err();
        match err {
            FetchError::MissingToken { var } => {
                assert_eq!(var, "PINFETCH_TEST_TOKEN_DEFINITELY_UNSET")
            }
            other => panic!("expected MissingToken, got {other:?}"),
        }
    }
}
