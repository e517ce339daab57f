mod core;
mod stats;

#[cfg(test)]
mod tests;

pub use crate::core::domain::{
    conversion::{BYTES_PER_MEGABYTE, Conversion, identity_bytes, identity_count, mb_to_bytes},
    error::{CollectorError, CollectorResult, ValidationError},
    model::{
        client_config::{ClientConfig, DEFAULT_STATUS_PATH, DEFAULT_TIMEOUT, RateLimitConfig},
        field_spec::{CLUSTER_FIELDS, FieldSpec},
        metric_event::{InsertConflict, MetricEvent, MetricValue},
        raw_status_document::{PathLookup, RawStatusDocument},
    },
    value_object::{ClusterHost, ClusterPort, ClusterUrl, DEFAULT_CLUSTER_PORT},
};
pub use crate::core::infrastructure::{api_client::ApiClient, status_fetcher::StatusFetcher};
pub use crate::stats::application::{
    response::assembled_event::{AssembledEvent, FieldWarning, FieldWarningReason},
    service::event_assembler::EventAssembler,
};

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A collector for the cluster-wide metrics of one Couchbase cluster
///
/// Each call to [`collect`](ClusterMetricsClient::collect) runs one cycle:
/// fetch the status document, decode it, and normalize it into a
/// [`MetricEvent`]. Only fetch and decode failures abort a cycle; fields
/// that cannot be resolved are left out of the event and reported as
/// [`FieldWarning`]s.
///
/// # Examples
///
/// ```no_run
/// use leeca_couchbase::{ClusterMetricsClient, CollectorResult};
///
/// #[tokio::main]
/// async fn main() -> CollectorResult<()> {
///     let client = ClusterMetricsClient::builder()
///         .host("cb.example.com")
///         .port(8091)
///         .build()?;
///
///     let assembled = client.collect().await?;
///     println!("{}", assembled.event);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ClusterMetricsClient {
    fetcher: Arc<dyn StatusFetcher>,
    assembler: EventAssembler,
}

/// Builder for ClusterMetricsClient configuration
#[derive(Debug, Default)]
pub struct ClusterMetricsClientBuilder {
    endpoint: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    secure: bool,
    config: ClientConfig,
    fields: Option<&'static [FieldSpec]>,
}

impl ClusterMetricsClientBuilder {
    /// Sets the full base URL (e.g. `http://localhost:8091`). Takes
    /// precedence over `host`, `port` and `secure`.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the REST port (default: 8091).
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Uses `https` instead of `http` when building the URL from parts.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the status path (default: `/pools/default`).
    pub fn status_path(mut self, path: impl Into<String>) -> Self {
        self.config.status_path = path.into();
        self
    }

    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.config.rate_limit = Some(rate_limit);
        self
    }

    /// Replaces the built-in field table.
    pub fn fields(mut self, fields: &'static [FieldSpec]) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Validates the configuration and builds the client.
    ///
    /// # Errors
    /// Returns `CollectorError::Validation` if neither an endpoint nor a
    /// host is set, or if any setting is invalid.
    pub fn build(self) -> CollectorResult<ClusterMetricsClient> {
        let base_url = match (self.endpoint, self.host) {
            (Some(endpoint), _) => ClusterUrl::parse(&endpoint)?,
            (None, Some(host)) => {
                let host = ClusterHost::new(host)?;
                let port = match self.port {
                    Some(port) => ClusterPort::new(port)?,
                    None => ClusterPort::default(),
                };
                ClusterUrl::new(&host, &port, self.secure)?
            }
            (None, None) => {
                return Err(ValidationError::Field {
                    field: "host".to_string(),
                    message: "Either an endpoint or a host is required".to_string(),
                }
                .into());
            }
        };

        let api_client = ApiClient::new(&base_url, &self.config)?;
        let assembler = self
            .fields
            .map(EventAssembler::with_fields)
            .unwrap_or_default();

        Ok(ClusterMetricsClient {
            fetcher: Arc::new(api_client),
            assembler,
        })
    }
}

impl ClusterMetricsClient {
    /// Creates a new builder for ClusterMetricsClient configuration
    pub fn builder() -> ClusterMetricsClientBuilder {
        ClusterMetricsClientBuilder::default()
    }

    /// Creates a client around any [`StatusFetcher`].
    pub fn with_fetcher(fetcher: Arc<dyn StatusFetcher>, assembler: EventAssembler) -> Self {
        Self { fetcher, assembler }
    }

    /// The target polled by this client.
    pub fn target(&self) -> String {
        self.fetcher.target()
    }

    pub fn assembler(&self) -> &EventAssembler {
        &self.assembler
    }

    /// Runs one collection cycle.
    ///
    /// # Returns
    ///
    /// * `Ok(AssembledEvent)` with a possibly partial event and its warnings
    /// * `Err(CollectorError)` if the cycle produced no event
    ///
    /// # Errors
    ///
    /// * `CollectorError::Fetch` if the request fails or returns a non-2xx status
    /// * `CollectorError::Decode` if the body is not a JSON object
    pub async fn collect(&self) -> CollectorResult<AssembledEvent> {
        let cluster = self.fetcher.target();

        let body = self.fetcher.fetch_status().await.inspect_err(|e| {
            warn!(cluster = %cluster, error = %e, "cluster status fetch failed");
        })?;

        let assembled = self.assembler.assemble_slice(&body).inspect_err(|e| {
            warn!(cluster = %cluster, error = %e, "cluster status could not be decoded");
        })?;

        if assembled.is_complete() {
            debug!(
                cluster = %cluster,
                leaves = assembled.event.leaf_count(),
                "collected cluster metrics"
            );
        } else {
            info!(
                cluster = %cluster,
                leaves = assembled.event.leaf_count(),
                skipped = assembled.warnings.len(),
                "collected partial cluster metrics"
            );
        }

        Ok(assembled)
    }
}
