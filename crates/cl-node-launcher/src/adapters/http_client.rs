//! Beacon Node REST Adapter
//!
//! Implements `BeaconNodeClient` over the standard beacon node HTTP API.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::LauncherConfig;
use crate::domain::{ClientError, HealthStatus, NodeIdentity};
use crate::ports::{BeaconClientFactory, BeaconNodeClient};

const HEALTH_PATH: &str = "/eth/v1/node/health";
const IDENTITY_PATH: &str = "/eth/v1/node/identity";

/// Envelope of beacon API JSON responses.
#[derive(Debug, Deserialize)]
struct DataResponse<T> {
    data: T,
}

/// reqwest-backed beacon node client.
#[derive(Debug, Clone)]
pub struct HttpBeaconClient {
    client: Client,
    base_url: String,
}

impl HttpBeaconClient {
    /// Client for `http://<ip>:<port>` sharing an existing connection pool.
    pub fn with_client(client: Client, ip: IpAddr, port: u16) -> Self {
        let base_url = match ip {
            IpAddr::V4(ip) => format!("http://{ip}:{port}"),
            IpAddr::V6(ip) => format!("http://[{ip}]:{port}"),
        };
        Self { client, base_url }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "beacon API request");
        self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_error(path, e))
    }
}

fn request_error(path: &str, e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout(path.to_string())
    } else {
        ClientError::Connection(format!("{path}: {e}"))
    }
}

/// Map a health endpoint status code onto [`HealthStatus`].
pub fn health_from_status(status: StatusCode) -> Result<HealthStatus, ClientError> {
    match status {
        StatusCode::OK => Ok(HealthStatus::Ready),
        StatusCode::PARTIAL_CONTENT => Ok(HealthStatus::Syncing),
        other => Err(ClientError::UnexpectedStatus {
            endpoint: HEALTH_PATH.to_string(),
            status: other.as_u16(),
        }),
    }
}

#[async_trait]
impl BeaconNodeClient for HttpBeaconClient {
    async fn get_health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.get(HEALTH_PATH).await?;
        health_from_status(response.status())
    }

    async fn get_node_identity(&self) -> Result<NodeIdentity, ClientError> {
        let response = self.get(IDENTITY_PATH).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint: IDENTITY_PATH.to_string(),
                status: status.as_u16(),
            });
        }

        let body: DataResponse<NodeIdentity> = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(body.data)
    }
}

/// Builds [`HttpBeaconClient`]s sharing one connection pool.
#[derive(Debug, Clone)]
pub struct HttpBeaconClientFactory {
    client: Client,
    request_timeout: Duration,
}

impl HttpBeaconClientFactory {
    /// Create a factory whose clients time out after `request_timeout`.
    pub fn new(request_timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(request_timeout)
            .build()
            .map_err(|e| ClientError::Connection(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            request_timeout,
        })
    }

    /// Create a factory using `[rest_client]` from the launcher config.
    pub fn from_config(config: &LauncherConfig) -> Result<Self, ClientError> {
        Self::new(config.request_timeout())
    }

    /// Per-request timeout applied to every client.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl BeaconClientFactory for HttpBeaconClientFactory {
    type Client = HttpBeaconClient;

    fn connect(&self, ip: IpAddr, port: u16) -> Self::Client {
        HttpBeaconClient::with_client(self.client.clone(), ip, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_health_status_mapping() {
        assert_eq!(health_from_status(StatusCode::OK), Ok(HealthStatus::Ready));
        assert_eq!(
            health_from_status(StatusCode::PARTIAL_CONTENT),
            Ok(HealthStatus::Syncing)
        );
        assert_eq!(
            health_from_status(StatusCode::SERVICE_UNAVAILABLE),
            Err(ClientError::UnexpectedStatus {
                endpoint: "/eth/v1/node/health".to_string(),
                status: 503,
            })
        );
    }

    #[test]
    fn test_base_url() {
        let factory = HttpBeaconClientFactory::new(Duration::from_secs(1)).unwrap();
        let v4 = factory.connect(IpAddr::V4(Ipv4Addr::new(172, 16, 0, 2)), 4000);
        assert_eq!(v4.base_url(), "http://172.16.0.2:4000");
        let v6 = factory.connect(IpAddr::V6(Ipv6Addr::LOCALHOST), 4000);
        assert_eq!(v6.base_url(), "http://[::1]:4000");
    }

    #[test]
    fn test_factory_from_config_uses_rest_timeout() {
        let mut config = LauncherConfig::default();
        assert_eq!(
            HttpBeaconClientFactory::from_config(&config)
                .unwrap()
                .request_timeout(),
            Duration::from_millis(5000)
        );

        config.rest_client.request_timeout_ms = 1234;
        let factory = HttpBeaconClientFactory::from_config(&config).unwrap();
        assert_eq!(factory.request_timeout(), Duration::from_millis(1234));
    }

    #[test]
    fn test_identity_envelope_decodes() {
        let body = r#"{
            "data": {
                "peer_id": "16Uiu2HAm",
                "enr": "enr:-xyz789",
                "p2p_addresses": ["/ip4/172.16.0.2/tcp/9000/p2p/16Uiu2HAm"],
                "discovery_addresses": ["/ip4/172.16.0.2/udp/9000/p2p/16Uiu2HAm"],
                "metadata": {"seq_number": "1", "attnets": "0x00"}
            }
        }"#;
        let decoded: DataResponse<NodeIdentity> = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.data.enr, "enr:-xyz789");
        assert_eq!(decoded.data.p2p_addresses.len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_node_is_client_error() {
        let factory = HttpBeaconClientFactory::new(Duration::from_millis(200)).unwrap();
        // Port 9 (discard) on localhost is not expected to run a beacon API.
        let client = factory.connect(IpAddr::V4(Ipv4Addr::LOCALHOST), 9);
        assert!(client.get_health().await.is_err());
    }
}
