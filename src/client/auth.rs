//! Request signing for the exchange API
//!
//! HMAC-SHA256 over the sorted query string, hex encoded. Credentials come
//! from the environment only.

use crate::error::{JournalError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

pub const API_KEY_ENV: &str = "BYBIT_API_KEY";
pub const API_SECRET_ENV: &str = "BYBIT_API_SECRET";

/// Signer holding the account's API credentials.
#[derive(Clone)]
pub struct RequestSigner {
    api_key: String,
    api_secret: String,
}

impl RequestSigner {
    pub fn new(api_key: String, api_secret: String) -> Result<Self> {
        if api_key.is_empty() || api_secret.is_empty() {
            let missing = if api_key.is_empty() { "api key" } else { "api secret" };
            return Err(JournalError::Auth(format!("missing {missing}")));
        }

        Ok(Self { api_key, api_secret })
    }

    /// Read credentials from `BYBIT_API_KEY` / `BYBIT_API_SECRET`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        let api_secret = std::env::var(API_SECRET_ENV).unwrap_or_default();
        Self::new(api_key, api_secret)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Signature over the request parameters, joined `k=v&…` in key order.
    pub fn sign(&self, params: &BTreeMap<String, String>) -> String {
        let payload = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(payload.as_bytes());

        hex::encode(mac.finalize().into_bytes())
    }
}
