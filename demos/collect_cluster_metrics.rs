//! Poll a Couchbase cluster and print one normalized event per cycle.
//!
//! ```text
//! COUCHBASE_ENDPOINT=http://localhost:8091 RUST_LOG=leeca_couchbase=debug \
//!     cargo run --example collect_cluster_metrics
//! ```

use leeca_couchbase::{ClusterMetricsClient, CollectorResult};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> CollectorResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let endpoint =
        std::env::var("COUCHBASE_ENDPOINT").unwrap_or_else(|_| "http://localhost:8091".to_string());

    let client = ClusterMetricsClient::builder()
        .endpoint(endpoint)
        .timeout(Duration::from_secs(5))
        .build()?;

    let mut ticker = tokio::time::interval(Duration::from_secs(10));
    for _ in 0..3 {
        ticker.tick().await;

        // A failed cycle is reported and retried on the next tick.
        match client.collect().await {
            Ok(assembled) => {
                println!("{}", assembled.event);
                for warning in &assembled.warnings {
                    eprintln!("warning: {}", warning);
                }
            }
            Err(e) => eprintln!("cycle failed: {}", e),
        }
    }

    Ok(())
}
