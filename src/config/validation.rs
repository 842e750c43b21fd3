//! Configuration validation.
//!
//! Returns every problem found, not just the first.

use thiserror::Error;

use crate::config::schema::AppConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("body_limit must be greater than zero")]
    ZeroBodyLimit,
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.body_limit == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn zero_body_limit_rejected() {
        let config = AppConfig {
            body_limit: 0,
            ..AppConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::ZeroBodyLimit])
        );
    }
}
