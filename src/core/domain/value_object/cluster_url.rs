use crate::core::domain::{
    error::{CollectorResult, ValidationError},
    value_object::{cluster_host::ClusterHost, cluster_port::ClusterPort},
};
use std::collections::HashSet;
use std::fmt;
use url::Url;

/// Constraints for cluster base URLs
///
/// URLs must comply with RFC 3986 and use an HTTP scheme; the Couchbase
/// REST API is not reachable over anything else.
#[derive(Debug, Clone)]
pub struct ClusterUrlConfig {
    allowed_schemes: HashSet<String>,
    max_length: usize,
}

impl ClusterUrlConfig {
    fn validate_url(&self, url: &str) -> Result<Url, ValidationError> {
        if url.is_empty() {
            return Err(ValidationError::Field {
                field: "url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }

        if url.len() > self.max_length {
            return Err(ValidationError::Format(format!(
                "URL exceeds maximum length of {} characters",
                self.max_length
            )));
        }

        let parsed = Url::parse(url)
            .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

        if !self.allowed_schemes.contains(parsed.scheme()) {
            let mut schemes: Vec<&str> = self.allowed_schemes.iter().map(String::as_str).collect();
            schemes.sort_unstable();
            return Err(ValidationError::ConstraintViolation(format!(
                "Invalid scheme. Must be one of: {}",
                schemes.join(", ")
            )));
        }

        if parsed.host_str().is_none() {
            return Err(ValidationError::Field {
                field: "url".to_string(),
                message: "URL must contain a host".to_string(),
            });
        }

        Ok(parsed)
    }
}

impl Default for ClusterUrlConfig {
    fn default() -> Self {
        let mut schemes = HashSet::new();
        schemes.insert("https".to_string());
        schemes.insert("http".to_string());

        Self {
            allowed_schemes: schemes,
            max_length: 2083, // legacy browser URL length limit
        }
    }
}

/// A validated base URL of a cluster's REST API
///
/// # Examples
///
/// ```
/// use leeca_couchbase::{ClusterHost, ClusterPort, ClusterUrl};
///
/// let host = ClusterHost::new("cb.example.com").unwrap();
/// let port = ClusterPort::new(8091).unwrap();
/// let url = ClusterUrl::new(&host, &port, false).unwrap();
///
/// let status = url.with_path("/pools/default").unwrap();
/// assert_eq!(status.as_str(), "http://cb.example.com:8091/pools/default");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterUrl(Url);

impl ClusterUrl {
    /// Builds a base URL from its parts.
    ///
    /// # Errors
    /// Returns `CollectorError::Validation` if the resulting URL is invalid.
    pub fn new(host: &ClusterHost, port: &ClusterPort, secure: bool) -> CollectorResult<Self> {
        let scheme = if secure { "https" } else { "http" };
        Self::parse(&format!("{}://{}:{}/", scheme, host.authority(), port.get()))
    }

    /// Parses a full base URL such as `http://localhost:8091`.
    ///
    /// # Errors
    /// Returns `CollectorError::Validation` if the URL is malformed, has no
    /// host, or uses a scheme other than http/https.
    pub fn parse(url: &str) -> CollectorResult<Self> {
        let parsed = ClusterUrlConfig::default().validate_url(url)?;
        Ok(Self(parsed))
    }

    /// Joins `path` onto this URL, replacing any existing path.
    ///
    /// # Errors
    /// Returns `CollectorError::Validation` if the joined URL is invalid.
    pub fn with_path(&self, path: &str) -> CollectorResult<Self> {
        if path.starts_with("//") {
            return Err(ValidationError::Format(format!(
                "Path '{}' must not start with consecutive slashes",
                path
            ))
            .into());
        }
        let base = self.0.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Self::parse(&format!("{}/{}", base, path))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ClusterUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
