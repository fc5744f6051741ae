//! Tokens that make expense submission safe to retry.

use std::{fmt::Display, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// The number of random bytes in a token.
const TOKEN_BYTES: usize = 16;

/// A client-generated value attached to every expense submission.
///
/// The store allows at most one expense per token, so a submission that is
/// retried with the same token cannot create a second expense. A token is
/// 16 random bytes encoded as 32 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdempotencyToken(String);

impl IdempotencyToken {
    /// Create a new token from the operating system's secure random source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);

        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for IdempotencyToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The string is not 32 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a valid idempotency token")]
pub struct InvalidToken(pub String);

impl FromStr for IdempotencyToken {
    type Err = InvalidToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let is_lowercase_hex = s
            .bytes()
            .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte));

        if s.len() == TOKEN_BYTES * 2 && is_lowercase_hex {
            Ok(Self(s.to_owned()))
        } else {
            Err(InvalidToken(s.to_owned()))
        }
    }
}

impl TryFrom<String> for IdempotencyToken {
    type Error = InvalidToken;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IdempotencyToken> for String {
    fn from(value: IdempotencyToken) -> Self {
        value.0
    }
}

impl ToSql for IdempotencyToken {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for IdempotencyToken {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
