//! HTTP client for the catalog console's admin API.

use std::sync::Arc;
use std::time::Duration;

use hyper::client::HttpConnector;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body, Client, Method, Request};
use hyper_rustls::HttpsConnector;
use rustls::{ClientConfig, OwnedTrustAnchor, RootCertStore};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;
use webpki_roots::TLS_SERVER_ROOTS;

use async_trait::async_trait;

use crate::backend::{DiscoveryError, DiscoveryResult, RegistryBackend};
use crate::snapshot::ServerSnapshot;
use crate::spec::{
    ConsoleEnvelope, EndpointSpecification, LoginResponse, ServerSpecification,
    ToolSpecification,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

type HyperClient = Client<HttpsConnector<HttpConnector>, Body>;

fn build_https_client() -> HyperClient {
    let mut roots = RootCertStore::empty();
    roots.add_trust_anchors(TLS_SERVER_ROOTS.iter().map(|anchor| {
        OwnedTrustAnchor::from_subject_spki_name_constraints(
            anchor.subject,
            anchor.spki,
            anchor.name_constraints,
        )
    }));

    let config = ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let mut http = HttpConnector::new();
    http.enforce_http(false);

    let connector = HttpsConnector::from((http, Arc::new(config)));

    Client::builder().build::<_, Body>(connector)
}

/// Configuration for a [`CatalogClient`].
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    namespace: String,
    timeout: Duration,
}

impl CatalogConfig {
    /// Creates a configuration for the given console address. An address
    /// without a scheme gets `http://` prepended.
    #[must_use]
    pub fn new(server_addr: impl Into<String>) -> Self {
        let mut base_url = server_addr.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            base_url = format!("http://{base_url}");
        }
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            username: None,
            password: None,
            namespace: String::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets console credentials, enabling the login handshake.
    #[must_use]
    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the namespace submitted with every request.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the normalized console base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidConfig`] when the base URL is empty
    /// or the timeout is zero.
    pub fn validate(&self) -> DiscoveryResult<()> {
        if self.base_url.trim().is_empty() || self.base_url.trim() == "http://" {
            return Err(DiscoveryError::InvalidConfig(
                "console address cannot be empty",
            ));
        }
        if self.timeout.is_zero() {
            return Err(DiscoveryError::InvalidConfig(
                "timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// HTTP implementation of [`RegistryBackend`] speaking the console's admin
/// API: optional form login for a bearer token, form-encoded specification
/// documents on registration, id-based deregistration, and paged listing.
pub struct CatalogClient {
    config: CatalogConfig,
    http: HyperClient,
    token: Mutex<Option<String>>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.config.base_url)
            .field("namespace", &self.config.namespace)
            .field("authenticated", &self.config.username.is_some())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Creates a client from the supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidConfig`] when the configuration does
    /// not validate.
    pub fn new(config: CatalogConfig) -> DiscoveryResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            http: build_https_client(),
            token: Mutex::new(None),
        })
    }

    async fn send(&self, request: Request<Body>) -> DiscoveryResult<(u16, Vec<u8>)> {
        let response = tokio::time::timeout(self.config.timeout, self.http.request(request))
            .await
            .map_err(|_| DiscoveryError::Timeout)?
            .map_err(|err| DiscoveryError::http(err.to_string()))?;

        let status = response.status().as_u16();
        let body = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(|err| DiscoveryError::http(err.to_string()))?;
        Ok((status, body.to_vec()))
    }

    /// Performs the login handshake when credentials are configured,
    /// returning the cached bearer token thereafter.
    async fn ensure_auth(&self) -> DiscoveryResult<Option<String>> {
        let (Some(username), Some(password)) = (&self.config.username, &self.config.password)
        else {
            return Ok(None);
        };

        let mut token = self.token.lock().await;
        if let Some(existing) = token.as_ref() {
            return Ok(Some(existing.clone()));
        }

        let body = form_encode(&[
            ("username", username.clone()),
            ("password", password.clone()),
        ]);
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("{}/auth/login", self.config.base_url))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Body::from(body))
            .map_err(|err| DiscoveryError::http(err.to_string()))?;

        let (status, bytes) = self.send(request).await?;
        if status != 200 {
            return Err(DiscoveryError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let login: LoginResponse = serde_json::from_slice(&bytes)
            .map_err(|err| DiscoveryError::decode(err.to_string()))?;
        debug!("catalog login succeeded");
        *token = Some(login.access_token.clone());
        Ok(Some(login.access_token))
    }

    fn authorized(
        &self,
        builder: hyper::http::request::Builder,
        token: Option<&String>,
    ) -> hyper::http::request::Builder {
        match token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }
}

#[async_trait]
impl RegistryBackend for CatalogClient {
    async fn register(&self, snapshot: &ServerSnapshot) -> DiscoveryResult<String> {
        let token = self.ensure_auth().await?;

        let server_spec = serde_json::to_string(&ServerSpecification::from_snapshot(snapshot))
            .map_err(|err| DiscoveryError::decode(err.to_string()))?;
        let tool_spec = serde_json::to_string(&ToolSpecification::from_snapshot(snapshot))
            .map_err(|err| DiscoveryError::decode(err.to_string()))?;

        let mut pairs = vec![
            ("namespaceId", self.config.namespace.clone()),
            ("serverSpecification", server_spec),
            ("toolSpecification", tool_spec),
        ];
        if let Some(endpoint) = EndpointSpecification::from_snapshot(snapshot) {
            let endpoint_spec = serde_json::to_string(&endpoint)
                .map_err(|err| DiscoveryError::decode(err.to_string()))?;
            pairs.push(("endpointSpecification", endpoint_spec));
        }

        let request = self
            .authorized(
                Request::builder()
                    .method(Method::POST)
                    .uri(format!("{}/admin/ai/mcp", self.config.base_url))
                    .header(CONTENT_TYPE, FORM_CONTENT_TYPE),
                token.as_ref(),
            )
            .body(Body::from(form_encode(&pairs)))
            .map_err(|err| DiscoveryError::http(err.to_string()))?;

        let (status, bytes) = self.send(request).await?;
        if status != 200 {
            return Err(DiscoveryError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let envelope: ConsoleEnvelope<String> = serde_json::from_slice(&bytes)
            .map_err(|err| DiscoveryError::decode(err.to_string()))?;
        if envelope.code != 200 {
            return Err(DiscoveryError::Console {
                code: envelope.code,
                message: envelope.message,
            });
        }

        Ok(envelope.data)
    }

    async fn deregister(&self, server_id: &str) -> DiscoveryResult<()> {
        let token = self.ensure_auth().await?;

        let query = form_encode(&[
            ("namespaceId", self.config.namespace.clone()),
            ("mcpId", server_id.to_owned()),
        ]);
        let request = self
            .authorized(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("{}/admin/ai/mcp?{query}", self.config.base_url)),
                token.as_ref(),
            )
            .body(Body::empty())
            .map_err(|err| DiscoveryError::http(err.to_string()))?;

        let (status, bytes) = self.send(request).await?;
        if status != 200 {
            return Err(DiscoveryError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(())
    }

    async fn list(
        &self,
        search: Option<&str>,
        page_no: u32,
        page_size: u32,
    ) -> DiscoveryResult<Value> {
        let token = self.ensure_auth().await?;

        let mut pairs = vec![("namespaceId", self.config.namespace.clone())];
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            pairs.push(("mcpName", search.to_owned()));
            pairs.push(("search", "blur".to_owned()));
        }
        pairs.push(("pageNo", page_no.to_string()));
        pairs.push(("pageSize", page_size.to_string()));

        let request = self
            .authorized(
                Request::builder().method(Method::GET).uri(format!(
                    "{}/admin/ai/mcp/list?{}",
                    self.config.base_url,
                    form_encode(&pairs)
                )),
                token.as_ref(),
            )
            .body(Body::empty())
            .map_err(|err| DiscoveryError::http(err.to_string()))?;

        let (status, bytes) = self.send(request).await?;
        if status != 200 {
            return Err(DiscoveryError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|err| DiscoveryError::decode(err.to_string()))
    }
}

fn form_encode(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn percent_encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            other => {
                encoded.push_str(&format!("%{other:02X}"));
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_scheme_and_loses_trailing_slash() {
        let config = CatalogConfig::new("192.168.1.10:8848/");
        assert_eq!(config.base_url(), "http://192.168.1.10:8848");

        let config = CatalogConfig::new("https://console.internal");
        assert_eq!(config.base_url(), "https://console.internal");
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let config = CatalogConfig::new("localhost:8848").with_timeout(Duration::ZERO);
        let err = config.validate().expect_err("should fail");
        assert!(matches!(err, DiscoveryError::InvalidConfig(_)));
    }

    #[test]
    fn empty_address_fails_validation() {
        let config = CatalogConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn form_encoding_escapes_reserved_bytes() {
        let encoded = form_encode(&[
            ("username", "ops admin".to_owned()),
            ("password", "p&ss=1".to_owned()),
        ]);
        assert_eq!(encoded, "username=ops%20admin&password=p%26ss%3D1");
    }
}
