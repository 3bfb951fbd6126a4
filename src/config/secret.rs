//! Credential wrappers for the PostgreSQL connection string and the Pub/Sub
//! access token
//!
//! Both are held as [`SecretString`]: zeroized on drop, redacted in `Debug`
//! output, and readable only through `expose_secret()`.
//!
//! ```rust
//! use ledgerline::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("ya29.token".to_string());
//! assert_eq!(token.expose_secret().as_ref(), "ya29.token");
//! assert!(!format!("{token:?}").contains("ya29"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Credential text, wiped from memory when dropped
#[derive(Clone, Debug, Zeroize, Serialize, Deserialize)]
#[serde(transparent)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Secret string used for credentials in [`LedgerlineConfig`](super::LedgerlineConfig)
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string read from the environment or a config file
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
