// ABOUTME: HTTP/1.1 client for the Container Directory service.
// ABOUTME: One hyper connection per request, bounded by a configurable timeout.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::Uri;
use hyper_util::rt::TokioIo;
use snafu::ResultExt;
use std::time::Duration;
use tokio::net::TcpStream;

use super::error::{
    ConnectSnafu, DecodeSnafu, InvalidUrlSnafu, RequestSnafu, StatusSnafu, TimeoutSnafu,
    TransportSnafu,
};
use super::{ContainerDirectory, ContainerSnapshot, DirectoryError, Envelope, ExistsResult};
use crate::types::ContainerNumber;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Container Directory reached over plain HTTP.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    /// `host:port` to dial.
    address: String,
    /// Value for the `Host` header.
    authority: String,
    /// Path prefix of the base URL, without a trailing slash.
    base_path: String,
    timeout: Duration,
}

impl HttpDirectory {
    /// Create a client for a base URL such as `http://directory.local:8080/depot`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DirectoryError> {
        let uri: Uri = base_url.parse().map_err(|e: hyper::http::uri::InvalidUri| {
            DirectoryError::InvalidUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            }
        })?;

        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => {
                return InvalidUrlSnafu {
                    url: base_url,
                    reason: format!("unsupported scheme '{other}' (only http is supported)"),
                }
                .fail();
            }
            None => {
                return InvalidUrlSnafu {
                    url: base_url,
                    reason: "missing scheme",
                }
                .fail();
            }
        }

        let host = match uri.host() {
            Some(host) => host.to_string(),
            None => {
                return InvalidUrlSnafu {
                    url: base_url,
                    reason: "missing host",
                }
                .fail();
            }
        };
        let port = uri.port_u16().unwrap_or(80);
        let authority = match uri.port_u16() {
            Some(port) => format!("{host}:{port}"),
            None => host.clone(),
        };

        Ok(Self {
            address: format!("{host}:{port}"),
            authority,
            base_path: uri.path().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn container_path(&self, number: &ContainerNumber, endpoint: &str) -> String {
        format!(
            "{}/api/containers/{}/{}",
            self.base_path,
            urlencoding::encode(number.as_str()),
            endpoint
        )
    }

    async fn get_envelope(&self, path: &str) -> Result<Envelope, DirectoryError> {
        tracing::debug!("GET {}{}", self.authority, path);
        match tokio::time::timeout(self.timeout, self.fetch(path)).await {
            Ok(result) => result,
            Err(_elapsed) => TimeoutSnafu {
                path,
                seconds: self.timeout.as_secs(),
            }
            .fail(),
        }
    }

    async fn fetch(&self, path: &str) -> Result<Envelope, DirectoryError> {
        let stream = TcpStream::connect(&self.address).await.context(ConnectSnafu {
            address: self.address.as_str(),
        })?;
        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .context(TransportSnafu { path })?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("directory connection error: {}", e);
            }
        });

        let req = hyper::Request::builder()
            .method("GET")
            .uri(path)
            .header("Host", self.authority.as_str())
            .header("Accept", "application/json")
            .body(Empty::<Bytes>::new())
            .context(RequestSnafu { path })?;

        let resp = sender
            .send_request(req)
            .await
            .context(TransportSnafu { path })?;
        let status = resp.status();

        let body = resp
            .into_body()
            .collect()
            .await
            .context(TransportSnafu { path })?
            .to_bytes();

        if !status.is_success() {
            return StatusSnafu {
                path,
                status: status.as_u16(),
            }
            .fail();
        }

        serde_json::from_slice(&body).context(DecodeSnafu { path })
    }

    async fn get_snapshot(
        &self,
        number: &ContainerNumber,
        endpoint: &str,
    ) -> Result<Option<ContainerSnapshot>, DirectoryError> {
        let path = self.container_path(number, endpoint);
        let envelope = self.get_envelope(&path).await?;
        if !envelope.is_success {
            tracing::debug!(
                "directory declined {} for {}: {}",
                endpoint,
                number,
                envelope.message
            );
        }
        envelope
            .into_content()
            .context(DecodeSnafu { path: path.as_str() })
    }
}

#[async_trait]
impl ContainerDirectory for HttpDirectory {
    async fn check_exists(&self, number: &ContainerNumber) -> Result<ExistsResult, DirectoryError> {
        let path = self.container_path(number, "exists");
        self.get_envelope(&path).await.map(ExistsResult::from)
    }

    async fn get_container_with_repair_codes(
        &self,
        number: &ContainerNumber,
    ) -> Result<Option<ContainerSnapshot>, DirectoryError> {
        self.get_snapshot(number, "repair-codes").await
    }

    async fn get_container_cleaning_details(
        &self,
        number: &ContainerNumber,
    ) -> Result<Option<ContainerSnapshot>, DirectoryError> {
        self.get_snapshot(number, "cleaning-details").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base_url_with_port_and_path() {
        let dir = HttpDirectory::new("http://directory.local:8080/depot/", DEFAULT_TIMEOUT)
            .unwrap();
        assert_eq!(dir.address, "directory.local:8080");
        assert_eq!(dir.authority, "directory.local:8080");
        assert_eq!(dir.base_path, "/depot");
    }

    #[test]
    fn default_port_is_80() {
        let dir = HttpDirectory::new("http://directory.local", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(dir.address, "directory.local:80");
        assert_eq!(dir.authority, "directory.local");
        assert_eq!(dir.base_path, "");
    }

    #[test]
    fn rejects_https_and_missing_scheme() {
        assert!(HttpDirectory::new("https://directory.local", DEFAULT_TIMEOUT).is_err());
        assert!(HttpDirectory::new("directory.local", DEFAULT_TIMEOUT).is_err());
    }

    #[test]
    fn container_path_encodes_number() {
        let dir = HttpDirectory::new("http://localhost:9000/v1", DEFAULT_TIMEOUT).unwrap();
        let number = ContainerNumber::parse("EFGH0000002").unwrap();
        assert_eq!(
            dir.container_path(&number, "cleaning-details"),
            "/v1/api/containers/EFGH0000002/cleaning-details"
        );
    }
}
