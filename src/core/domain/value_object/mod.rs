mod cluster_host;
mod cluster_port;
mod cluster_url;

pub use cluster_host::ClusterHost;
pub use cluster_port::{ClusterPort, DEFAULT_CLUSTER_PORT};
pub use cluster_url::ClusterUrl;
