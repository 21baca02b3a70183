//! Client HTTP du service de features

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::WfsError;

/// Accès au service de features
///
/// La couture permet d'injecter un service factice dans les tests, la
/// chaîne de traitement ne connaît que l'URL et le corps brut.
pub trait FeatureService: Send + Sync {
    /// GET sur l'URL donnée, corps de réponse brut en retour
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, WfsError>> + Send;
}

/// Client réel fondé sur reqwest
#[derive(Debug, Clone)]
pub struct ReqwestService {
    client: reqwest::Client,
}

impl ReqwestService {
    pub fn new(timeout_secs: u64) -> Result<Self, WfsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| WfsError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl FeatureService for ReqwestService {
    async fn get(&self, url: &str) -> Result<Vec<u8>, WfsError> {
        debug!(url = %url, "Feature service request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WfsError::Http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(WfsError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| WfsError::Http(format!("Failed to read response: {}", e)))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Service factice : réponse en conserve, URLs demandées capturées
    pub struct MockFeatureService {
        pub response: Result<Vec<u8>, WfsError>,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockFeatureService {
        pub fn with_body(body: &str) -> Self {
            Self {
                response: Ok(body.as_bytes().to_vec()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                response: Err(WfsError::Http(message.to_string())),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requested_urls(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl FeatureService for MockFeatureService {
        async fn get(&self, url: &str) -> Result<Vec<u8>, WfsError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn test_mock_service_records_requests() {
        let mock = MockFeatureService::with_body("{}");
        let body = mock.get("http://example.org/wfs?x=1").await.unwrap();

        assert_eq!(body, b"{}");
        assert_eq!(mock.requested_urls(), vec!["http://example.org/wfs?x=1"]);
    }

    #[tokio::test]
    async fn test_mock_service_failure_propagates() {
        let mock = MockFeatureService::failing("connection refused");
        let err = mock.get("http://example.org/wfs").await.unwrap_err();

        assert!(matches!(err, WfsError::Http(_)));
    }
}
