//! Remote logo fetching over http(s).

use agenda_traits::{ResourceError, ResourceProvider, SharedResourceData};
use agenda_types::is_remote_hint;
use reqwest::blocking::Client;
use std::sync::Arc;
use std::time::Duration;

/// Fetches remote resources with a blocking client.
///
/// Only `http://` and `https://` locations are accepted. Non-success status
/// codes are reported as `LoadFailed`.
#[derive(Debug, Clone)]
pub struct HttpResourceProvider {
    client: Client,
}

impl HttpResourceProvider {
    pub fn new(timeout: Duration) -> Result<Self, ResourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("agenda-builder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ResourceError::LoadFailed {
                location: "<http client>".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    fn check_location(&self, location: &str) -> Result<(), ResourceError> {
        if is_remote_hint(location) {
            Ok(())
        } else {
            Err(ResourceError::Unsupported {
                location: location.to_string(),
                provider: self.name(),
            })
        }
    }
}

impl ResourceProvider for HttpResourceProvider {
    fn load(&self, location: &str) -> Result<SharedResourceData, ResourceError> {
        self.check_location(location)?;
        log::info!("Fetching remote logo from {}", location);

        let failed = |message: String| ResourceError::LoadFailed {
            location: location.to_string(),
            message,
        };

        let response = self
            .client
            .get(location)
            .send()
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ResourceError::NotFound(location.to_string()));
        }
        if !status.is_success() {
            return Err(failed(format!("HTTP status {status}")));
        }

        let bytes = response.bytes().map_err(|e| failed(e.to_string()))?;
        Ok(Arc::new(bytes.to_vec()))
    }

    fn name(&self) -> &'static str {
        "HttpResourceProvider"
    }
}
