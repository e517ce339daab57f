use crate::core::domain::error::{CollectorResult, ValidationError};
use std::fmt;
use std::net::IpAddr;

/// Constraints applied to cluster host names (RFC 1035).
#[derive(Debug, Clone)]
pub struct ClusterHostConfig {
    max_hostname_length: usize,
    max_label_length: usize,
}

impl ClusterHostConfig {
    fn validate_label(&self, label: &str) -> Result<(), ValidationError> {
        if label.is_empty() || label.len() > self.max_label_length {
            return Err(ValidationError::Format(format!(
                "Label must be between 1 and {} characters",
                self.max_label_length
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ValidationError::Format(
                "Label can only contain alphanumeric characters and hyphens".to_string(),
            ));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(ValidationError::Format(
                "Label cannot start or end with hyphen".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ClusterHostConfig {
    fn default() -> Self {
        Self {
            max_hostname_length: 253,
            max_label_length: 63,
        }
    }
}

/// A validated cluster host: a DNS name or an IP literal.
///
/// No resolution is attempted here; an unreachable host surfaces as a
/// fetch error on the first collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterHost(String);

impl ClusterHost {
    /// Creates a new host after validation.
    ///
    /// # Errors
    /// Returns `CollectorError::Validation` if the host is empty, too long,
    /// or not a valid host name or IP address.
    pub fn new(host: impl Into<String>) -> CollectorResult<Self> {
        let host = host.into();
        validate_host(&host, &ClusterHostConfig::default())?;
        Ok(Self(host))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the host as it must appear in a URL authority.
    pub fn authority(&self) -> String {
        match self.0.parse::<IpAddr>() {
            Ok(IpAddr::V6(_)) => format!("[{}]", self.0),
            _ => self.0.clone(),
        }
    }
}

impl fmt::Display for ClusterHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a host name or IP literal.
pub(crate) fn validate_host(
    value: &str,
    config: &ClusterHostConfig,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Field {
            field: "host".to_string(),
            message: "Host cannot be empty".to_string(),
        });
    }

    if value.parse::<IpAddr>().is_ok() {
        return Ok(());
    }

    if value.len() > config.max_hostname_length {
        return Err(ValidationError::ConstraintViolation(format!(
            "Host length exceeds maximum of {} characters",
            config.max_hostname_length
        )));
    }

    for label in value.split('.') {
        config.validate_label(label)?;
    }

    Ok(())
}
