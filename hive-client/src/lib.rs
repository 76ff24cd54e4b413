pub mod api;
pub mod gateway;
pub mod metrics;
pub mod rpc;
pub mod transport;


pub use api::{HiveApi, RankedPostsQuery, GET_CONTENT_REPLIES, GET_RANKED_POSTS};
pub use gateway::EndpointGateway;
pub use metrics::{ApiMetrics, MetricsCollector, RequestMetrics, RequestOutcome};
pub use rpc::{RpcEnvelope, RpcErrorObject, RpcRequest};
pub use transport::{HttpTransport, Transport, TransportResponse};
