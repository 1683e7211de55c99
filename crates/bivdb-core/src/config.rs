//! Database configuration.

/// Configuration for a [`Database`](crate::Database).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Run insert's type, nullability and foreign key checks on the
    /// replacement value of an update.
    pub validate_updates: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            validate_updates: true,
        }
    }
}

impl DatabaseConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether updates are validated.
    pub fn validate_updates(mut self, validate: bool) -> Self {
        self.validate_updates = validate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert!(DatabaseConfig::new().validate_updates);
        assert!(!DatabaseConfig::new().validate_updates(false).validate_updates);
    }
}
