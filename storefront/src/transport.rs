//! Executes core-built requests over the network with ureq.

use sweets_core::{HttpMethod, HttpRequest, HttpResponse, Outcome, TransportError};

/// Executes one request. Implementations must return non-2xx responses as
/// data; only a failed round trip is an error.
pub trait Transport: Send + Sync + 'static {
    fn execute(&self, request: &HttpRequest) -> Outcome;
}

/// Blocking transport. No timeout and no retry: a hung request stays
/// outstanding until the server answers.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        // Status codes are data; the core decides what a 4xx means.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

// core/tests/integration.rs carries a copy of this mapping; change both.
impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Outcome {
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => {
                let mut builder = self.agent.get(&request.path);
                for (k, v) in &request.headers {
                    builder = builder.header(k.as_str(), v.as_str());
                }
                builder.call()
            }
            (HttpMethod::Post, body) => {
                let mut builder = self.agent.post(&request.path);
                for (k, v) in &request.headers {
                    builder = builder.header(k.as_str(), v.as_str());
                }
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| {
            tracing::warn!(method = request.method.as_str(), path = %request.path, error = %e, "request failed");
            TransportError(e.to_string())
        })?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError(e.to_string()))?;
        tracing::debug!(method = request.method.as_str(), path = %request.path, status, "request completed");
        Ok(HttpResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use mock_server::{Shop, DEFAULT_TOKEN};
    use sweets_core::{Credential, SweetsClient};

    use super::*;

    fn start_server() -> String {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::serve(listener, Shop::seeded(DEFAULT_TOKEN)).await
            })
            .unwrap();
        });

        format!("http://{addr}")
    }

    #[test]
    fn error_statuses_come_back_as_data() {
        let base = start_server();
        let client = SweetsClient::new(&base, Credential::bearer("wrong"));
        let response = UreqTransport::new().execute(&client.build_list_sweets()).unwrap();
        assert_eq!(response.status, 401);
        assert!(response.body.contains("Invalid token"));
    }

    #[test]
    fn headers_and_method_are_forwarded() {
        let base = start_server();
        let client = SweetsClient::new(&base, Credential::bearer(DEFAULT_TOKEN));
        let transport = UreqTransport::new();

        let response = transport.execute(&client.build_purchase_sweet(1)).unwrap();
        assert_eq!(response.status, 200);
        let sweet = client.parse_purchase_sweet(response).unwrap();
        assert_eq!(sweet.quantity, 9);
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let client = SweetsClient::new(&format!("http://{addr}"), Credential::bearer("t"));
        assert!(UreqTransport::new().execute(&client.build_list_sweets()).is_err());
    }
}
