use super::ConfigError;

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 253;

/// Canonical ASCII form of a host name: trimmed, without the root dot,
/// IDNA-converted and label-checked.
pub fn normalize_host(input: &str) -> Result<String, ConfigError> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyHost);
    }

    let ascii = idna::domain_to_ascii(trimmed).map_err(|source| ConfigError::idna(trimmed, source))?;
    if ascii.is_empty() {
        return Err(ConfigError::EmptyHost);
    }
    if ascii.len() > MAX_NAME_LEN {
        return Err(ConfigError::invalid_host(
            trimmed,
            format!("length {} > {MAX_NAME_LEN}", ascii.len()),
        ));
    }

    for label in ascii.split('.') {
        check_label(trimmed, label)?;
    }
    Ok(ascii)
}

fn check_label(host: &str, label: &str) -> Result<(), ConfigError> {
    if label.is_empty() {
        return Err(ConfigError::invalid_host(host, "empty label"));
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(ConfigError::invalid_host(
            host,
            format!("label '{label}' length {} > {MAX_LABEL_LEN}", label.len()),
        ));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(ConfigError::invalid_host(
            host,
            format!("label '{label}' cannot start/end with '-'"),
        ));
    }
    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ConfigError::invalid_host(
            host,
            format!("label '{label}' has invalid chars"),
        ));
    }
    Ok(())
}
