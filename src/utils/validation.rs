//! Input validators shared by request builders

/// Validate that a URL is an absolute http(s) URL
pub fn validate_url(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| "URL must start with http:// or https://".to_string())?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err("URL must include a host".to_string());
    }

    Ok(())
}

/// Validate an email address: one `@`, non-empty local part, dotted domain
pub fn validate_email(email: &str) -> Result<(), String> {
    let invalid = || "value is not a valid email address".to_string();

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    Ok(())
}

/// Validate an ISO 4217 style currency code (three ASCII letters)
pub fn validate_currency(currency: &str) -> Result<(), String> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err("Currency must be a three-letter code such as usd".to_string())
    }
}

/// Whether `value` is a canonical 8-4-4-4-12 hex UUID (case-insensitive)
pub fn is_uuid(value: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

    let parts: Vec<&str> = value.split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(part, len)| part.len() == len && part.chars().all(|c| c.is_ascii_hexdigit()))
}
