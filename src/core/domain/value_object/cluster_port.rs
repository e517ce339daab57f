use crate::core::domain::error::{CollectorResult, ValidationError};

/// Port of the Couchbase REST API.
pub const DEFAULT_CLUSTER_PORT: u16 = 8091;

/// A validated cluster REST API port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterPort(u16);

impl ClusterPort {
    /// Creates a new port after validation.
    ///
    /// # Errors
    /// Returns `CollectorError::Validation` if the port is 0.
    pub fn new(port: u16) -> CollectorResult<Self> {
        validate_port(port)?;
        Ok(Self(port))
    }

    /// Returns the port number.
    pub fn get(&self) -> u16 {
        self.0
    }
}

impl Default for ClusterPort {
    fn default() -> Self {
        Self(DEFAULT_CLUSTER_PORT)
    }
}

/// Validates a port number.
pub(crate) fn validate_port(port: u16) -> Result<(), ValidationError> {
    if port == 0 {
        return Err(ValidationError::Field {
            field: "port".to_string(),
            message: "Port cannot be 0".to_string(),
        });
    }
    // All ports 1-65535 are valid.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_port_valid() {
        assert!(validate_port(8091).is_ok());
        assert!(validate_port(18091).is_ok());
        assert!(validate_port(65535).is_ok());
    }

    #[test]
    fn test_validate_port_invalid() {
        assert!(validate_port(0).is_err());
        assert!(ClusterPort::new(0).is_err());
    }

    #[test]
    fn test_port_default() {
        assert_eq!(ClusterPort::default().get(), 8091);
    }
}
