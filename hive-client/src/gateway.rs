use crate::metrics::{MetricsCollector, RequestMetrics, RequestOutcome};
use crate::rpc::{RpcEnvelope, RpcRequest};
use crate::transport::Transport;
use rewarder_core::{CoreError, ErrorExt, HiveApiError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Status an API node answers with while it is temporarily out of service.
pub const UNAVAILABLE_STATUS: u16 = 502;

/// Sends JSON-RPC requests to the first configured endpoint that answers.
#[derive(Debug)]
pub struct EndpointGateway<T> {
    transport: T,
    endpoints: Vec<String>,
    metrics: Arc<MetricsCollector>,
}

impl<T: Transport> EndpointGateway<T> {
    pub fn new(transport: T, endpoints: Vec<String>) -> Self {
        Self {
            transport,
            endpoints,
            metrics: Arc::new(MetricsCollector::new()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        Arc::clone(&self.metrics)
    }

    /// Returns the `result` payload of the first endpoint that does not
    /// answer with [`UNAVAILABLE_STATUS`]. Transport failures propagate
    /// without trying the remaining endpoints.
    pub async fn send(&self, request: &RpcRequest) -> Result<serde_json::Value, CoreError> {
        if self.endpoints.is_empty() {
            return Err(HiveApiError::NoEndpointsConfigured.into());
        }

        let body = serde_json::to_string(request)?;
        let method = request.method.as_str();

        for endpoint in &self.endpoints {
            let start_time = Instant::now();
            debug!("Sending {} to {}", method, endpoint);

            let response = match self.transport.post_json(endpoint, body.clone()).await {
                Ok(response) => response,
                Err(e) => {
                    error!("Transport failure for {} at {}: {}", method, endpoint, e);
                    self.record(endpoint, method, None, start_time, RequestOutcome::Failed)
                        .await;
                    return Err(e);
                }
            };

            if response.status == UNAVAILABLE_STATUS {
                HiveApiError::EndpointUnavailable {
                    endpoint: endpoint.clone(),
                    status_code: response.status,
                }
                .log_warn();
                self.record(
                    endpoint,
                    method,
                    Some(response.status),
                    start_time,
                    RequestOutcome::Unavailable,
                )
                .await;
                continue;
            }

            let decoded =
                RpcEnvelope::decode(method, &response.body).and_then(|env| env.into_result(method));
            let outcome = if decoded.is_ok() {
                RequestOutcome::Success
            } else {
                RequestOutcome::Failed
            };
            self.record(endpoint, method, Some(response.status), start_time, outcome)
                .await;

            return decoded.map_err(|e| {
                error!("Undecodable response for {} from {}: {}", method, endpoint, e);
                CoreError::HiveApi(e)
            });
        }

        Err(HiveApiError::AllEndpointsFailed {
            attempted: self.endpoints.len(),
        }
        .into())
    }

    async fn record(
        &self,
        endpoint: &str,
        method: &str,
        status_code: Option<u16>,
        start_time: Instant,
        outcome: RequestOutcome,
    ) {
        self.metrics
            .record_request(RequestMetrics {
                endpoint: endpoint.to_string(),
                method: method.to_string(),
                status_code,
                response_time: start_time.elapsed(),
                outcome,
            })
            .await;
    }
}
