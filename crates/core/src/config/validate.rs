use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Seeded category names are not blank
/// - Seeded employees have both names
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config
        .reference
        .categories
        .iter()
        .any(|name| name.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(
            "reference.categories cannot contain blank names".to_string(),
        ));
    }

    for (idx, employee) in config.reference.employees.iter().enumerate() {
        if employee.first_name.trim().is_empty() || employee.last_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "reference.employees[{}] needs both first_name and last_name",
                idx
            )));
        }
    }

    Ok(())
}
