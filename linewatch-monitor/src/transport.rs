//! The network seam used by the probe executor.
//!
//! A [`Transport`] issues one request against one endpoint path. The monitor
//! only cares whether that request succeeded and, if not, what the transport
//! said about it. [`HttpTransport`] talks to the real API; tests substitute
//! scripted transports.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

/// Base URL of the voice line API when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8060";

/// Issues health-check requests.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Request `endpoint` and report whether it answered successfully.
    ///
    /// `timeout` is advisory: the probe executor enforces it as well, so
    /// implementations that cannot honour it are still bounded.
    async fn get(&self, endpoint: &str, timeout: Duration) -> Result<(), TransportError>;

    /// Human-readable description of where requests go.
    fn description(&self) -> &str;
}

#[cfg(feature = "http")]
pub use http::{HttpTransport, HttpTransportBuilder};

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::Client;

    use super::{Transport, DEFAULT_BASE_URL};
    use crate::error::{MonitorError, TransportError};

    /// Transport that issues `GET` requests with reqwest.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: Client,
        base_url: String,
    }

    impl HttpTransport {
        /// Create a new builder for configuring the transport.
        pub fn builder() -> HttpTransportBuilder {
            HttpTransportBuilder::default()
        }

        /// The base URL requests are issued against.
        pub fn base_url(&self) -> &str {
            &self.base_url
        }

        fn url_for(&self, endpoint: &str) -> String {
            format!("{}{}", self.base_url, endpoint)
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn get(&self, endpoint: &str, timeout: Duration) -> Result<(), TransportError> {
            let response = self
                .client
                .get(self.url_for(endpoint))
                .timeout(timeout)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(TransportError::Status(response.status().as_u16()));
            }

            Ok(())
        }

        fn description(&self) -> &str {
            &self.base_url
        }
    }

    /// Builder for [`HttpTransport`].
    #[derive(Debug, Default)]
    pub struct HttpTransportBuilder {
        base_url: Option<String>,
    }

    impl HttpTransportBuilder {
        /// Set the API base URL (default: `http://localhost:8060`).
        pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
            self.base_url = Some(base_url.into());
            self
        }

        /// Build the transport.
        pub fn build(self) -> Result<HttpTransport, MonitorError> {
            let client = Client::builder()
                .build()
                .map_err(|e| MonitorError::Client(e.to_string()))?;

            let base_url = self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string();

            Ok(HttpTransport { client, base_url })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        /// Serve one canned HTTP response per connection.
        async fn serve(response: &'static str) -> String {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                loop {
                    let Ok((mut stream, _)) = listener.accept().await else {
                        break;
                    };
                    let mut buf = [0u8; 1024];
                    let _ = stream.read(&mut buf).await;
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                }
            });
            format!("http://{}", addr)
        }

        #[test]
        fn test_builder_defaults() {
            let transport = HttpTransport::builder().build().unwrap();
            assert_eq!(transport.base_url(), "http://localhost:8060");
        }

        #[test]
        fn test_builder_trims_trailing_slash() {
            let transport = HttpTransport::builder()
                .base_url("http://voice.local:8060/")
                .build()
                .unwrap();
            assert_eq!(transport.base_url(), "http://voice.local:8060");
            assert_eq!(
                transport.url_for("/scheduler/status"),
                "http://voice.local:8060/scheduler/status"
            );
        }

        #[tokio::test]
        async fn ok_response_is_success() {
            let base = serve(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
            )
            .await;
            let transport = HttpTransport::builder().base_url(base).build().unwrap();

            let result = transport.get("/", Duration::from_secs(2)).await;
            assert_eq!(result, Ok(()));
        }

        #[tokio::test]
        async fn server_error_reports_status() {
            let base = serve(
                "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            )
            .await;
            let transport = HttpTransport::builder().base_url(base).build().unwrap();

            let err = transport
                .get("/lines", Duration::from_secs(2))
                .await
                .unwrap_err();
            assert_eq!(err, TransportError::Status(503));
        }

        #[tokio::test]
        async fn closed_port_reports_connection_refused() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let transport = HttpTransport::builder()
                .base_url(format!("http://{}", addr))
                .build()
                .unwrap();

            let err = transport.get("/", Duration::from_secs(2)).await.unwrap_err();
            assert!(
                err.to_string().contains("ECONNREFUSED"),
                "unexpected error text: {}",
                err
            );
        }

        #[tokio::test]
        async fn unresolvable_host_reports_not_found() {
            let transport = HttpTransport::builder()
                .base_url("http://no-such-host.invalid:8060")
                .build()
                .unwrap();

            let err = transport.get("/", Duration::from_secs(5)).await.unwrap_err();
            let text = err.to_string();
            assert!(text.contains("ENOTFOUND"), "unexpected error text: {}", text);
            assert_eq!(
                crate::classify::classify(Some(&text)),
                linewatch_types::ErrorCategory::HostNotFound
            );
        }

        #[tokio::test]
        async fn silent_server_reports_timeout() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                let mut held = Vec::new();
                while let Ok((stream, _)) = listener.accept().await {
                    held.push(stream);
                }
            });

            let transport = HttpTransport::builder()
                .base_url(format!("http://{}", addr))
                .build()
                .unwrap();

            let err = transport
                .get("/", Duration::from_millis(100))
                .await
                .unwrap_err();
            assert!(
                err.to_string().contains("ETIMEDOUT"),
                "unexpected error text: {}",
                err
            );
        }
    }
}
