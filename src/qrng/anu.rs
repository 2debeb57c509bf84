//! ANU Quantum Random Number Generator backend
//!
//! Fetches `uint8` values from the Australian National University QRNG.
//! API documentation: https://qrng.anu.edu.au/contact/api-documentation/
//!
//! Two tiers:
//! - Free: https://qrng.anu.edu.au/API/jsonI.php (rate limited)
//! - Paid: https://api.quantumnumbers.anu.edu.au (requires API key)
//!
//! If an API key is provided, the paid endpoint is used automatically.

use crate::constants::api::{ANU_FREE_URL, ANU_MAX_BLOCK_SIZE, ANU_PAID_URL, HTTP_TIMEOUT_SECS};
use crate::error::{Error, Result};
use crate::qrng::QrngBackend;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// ANU QRNG backend
#[derive(Debug, Default)]
pub struct AnuBackend {
    api_key: Option<String>,
}

/// Which API tier is being used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnuTier {
    Free,
    Paid,
}

/// ANU API response for uint8 type
///
/// Example: `{"success": true, "type": "uint8", "length": "5", "data": [172, 216, 180, 138, 46]}`
#[derive(Debug, Deserialize)]
struct AnuResponse {
    success: bool,
    #[serde(default)]
    data: Option<Vec<u8>>,
    /// Present on error responses: `{"success": false, "message": "..."}`
    #[serde(default)]
    message: Option<String>,
}

impl AnuResponse {
    fn into_bytes(self) -> Result<Vec<u8>> {
        if !self.success {
            let msg = self.message.unwrap_or_else(|| "Unknown error".to_string());
            return Err(Error::Qrng(format!("ANU API error: {}", msg)));
        }

        self.data
            .ok_or_else(|| Error::Qrng("ANU API returned no data".to_string()))
    }
}

impl AnuBackend {
    pub fn new() -> Self {
        Self { api_key: None }
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
        }
    }

    /// Get which API tier is being used
    pub fn tier(&self) -> AnuTier {
        match &self.api_key {
            Some(key) if !key.is_empty() => AnuTier::Paid,
            _ => AnuTier::Free,
        }
    }

    fn request_url(&self, count: usize) -> String {
        let base = match self.tier() {
            AnuTier::Paid => ANU_PAID_URL,
            AnuTier::Free => ANU_FREE_URL,
        };
        format!("{}?length={}&type=uint8", base, count)
    }

    /// Fetch a single block of at most `ANU_MAX_BLOCK_SIZE` bytes
    fn fetch_block(&self, client: &reqwest::blocking::Client, count: usize) -> Result<Vec<u8>> {
        let url = self.request_url(count.min(ANU_MAX_BLOCK_SIZE));
        debug!(%url, "requesting ANU block");

        let mut request = client.get(&url);
        if let (AnuTier::Paid, Some(key)) = (self.tier(), &self.api_key) {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .map_err(|e| Error::Qrng(format!("ANU API request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Qrng(format!(
                "ANU API returned status: {}",
                response.status()
            )));
        }

        let body: AnuResponse = response
            .json()
            .map_err(|e| Error::Qrng(format!("Failed to parse ANU response: {}", e)))?;

        body.into_bytes()
    }
}

impl QrngBackend for AnuBackend {
    fn name(&self) -> &'static str {
        "anu"
    }

    fn description(&self) -> &'static str {
        "Australian National University Quantum Random Number Generator"
    }

    fn bytes(&self, count: usize) -> Result<Vec<u8>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(concat!("burst-cloud/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut result = Vec::with_capacity(count);
        while result.len() < count {
            let block = self.fetch_block(&client, count - result.len())?;
            if block.is_empty() {
                return Err(Error::Qrng("ANU API returned an empty block".to_string()));
            }
            result.extend(block);
        }
        result.truncate(count);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anu_backend_creation() {
        let backend = AnuBackend::new();
        assert_eq!(backend.name(), "anu");
        assert!(backend.api_key.is_none());
        assert!(backend.description().contains("Australian National University"));
    }

    #[test]
    fn test_anu_tier() {
        assert_eq!(AnuBackend::new().tier(), AnuTier::Free);
        assert_eq!(AnuBackend::with_api_key("").tier(), AnuTier::Free);
        assert_eq!(AnuBackend::with_api_key("my-api-key").tier(), AnuTier::Paid);
    }

    #[test]
    fn test_request_url() {
        let backend = AnuBackend::with_api_key("key");
        assert_eq!(
            backend.request_url(10),
            format!("{}?length=10&type=uint8", ANU_PAID_URL)
        );
        assert!(AnuBackend::new().request_url(5).starts_with(ANU_FREE_URL));
    }

    #[test]
    fn test_response_parsing() {
        let ok: AnuResponse = serde_json::from_str(
            r#"{"success": true, "type": "uint8", "length": "3", "data": [172, 216, 0]}"#,
        )
        .unwrap();
        assert_eq!(ok.into_bytes().unwrap(), vec![172, 216, 0]);

        let err: AnuResponse =
            serde_json::from_str(r#"{"success": false, "message": "Limit exceeded"}"#).unwrap();
        let msg = err.into_bytes().unwrap_err().to_string();
        assert!(msg.contains("Limit exceeded"));
    }

    #[test]
    fn test_zero_bytes_skips_network() {
        assert!(AnuBackend::new().bytes(0).unwrap().is_empty());
    }

    #[test]
    #[ignore = "Requires network access to ANU API"]
    fn test_anu_fetch_bytes() {
        let bytes = AnuBackend::new().bytes(10).unwrap();
        assert_eq!(bytes.len(), 10);
    }

    #[test]
    #[ignore = "Requires network access to ANU API"]
    fn test_anu_large_request() {
        let bytes = AnuBackend::new().bytes(2048).unwrap();
        assert_eq!(bytes.len(), 2048);
    }
}
