//! Configuration validation rules.

use super::schema::Config;

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.assistant.data_dir.trim().is_empty() {
        errors.push("assistant.data_dir must not be empty".to_string());
    }
    if config.assistant.model.trim().is_empty() {
        errors.push("assistant.model must not be empty".to_string());
    }
    if config.assistant.max_tokens == 0 {
        errors.push("assistant.max_tokens must be > 0".to_string());
    }
    if !(0.0..=2.0).contains(&config.assistant.temperature) {
        errors.push("assistant.temperature must be in [0.0, 2.0]".to_string());
    }
    if config.assistant.max_messages == 0 {
        errors.push("assistant.max_messages must be > 0".to_string());
    }

    if !(1..=10).contains(&config.tools.web.search.max_results) {
        errors.push("tools.web.search.max_results must be in 1..=10".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_defaults() {
        let config = Config::default();
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut config = Config::default();
        config.assistant.max_messages = 0;

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("max_messages"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_search_results() {
        let mut config = Config::default();
        config.tools.web.search.max_results = 25;

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }
}
