//! Recipient tokens.

use std::fmt;
use std::str::FromStr;

/// Returned when a recipient token is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("recipient token must not be empty")]
pub struct EmptyToken;

/// Opaque address of one delivery endpoint, e.g. `ExponentPushToken[...]`.
///
/// Never empty. Duplicates are allowed and are dispatched independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipientToken(String);

impl RecipientToken {
    /// Create a token, rejecting the empty string.
    pub fn new(token: impl Into<String>) -> Result<Self, EmptyToken> {
        let token = token.into();
        if token.is_empty() {
            return Err(EmptyToken);
        }
        Ok(Self(token))
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecipientToken {
    type Error = EmptyToken;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecipientToken> for String {
    fn from(token: RecipientToken) -> Self {
        token.0
    }
}

impl FromStr for RecipientToken {
    type Err = EmptyToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RecipientToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipientToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        assert_eq!(RecipientToken::new(""), Err(EmptyToken));
        assert!(serde_json::from_str::<RecipientToken>(r#""""#).is_err());
    }

    #[test]
    fn test_keeps_token_verbatim() {
        let token: RecipientToken = serde_json::from_str(r#""ExponentPushToken[abc]""#).unwrap();
        assert_eq!(token.as_str(), "ExponentPushToken[abc]");
        assert_eq!(token.to_string(), "ExponentPushToken[abc]");
    }
}
