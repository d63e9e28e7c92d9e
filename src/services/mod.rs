pub mod bootstrap_service;
pub mod category_service;
pub mod item_service;
pub mod user_service;

pub use bootstrap_service::BootstrapService;
pub use category_service::CategoryService;
pub use item_service::ItemService;
pub use user_service::UserService;

use crate::error::ApiError;

pub(crate) const MAX_NAME_LEN: usize = 100;
pub(crate) const MAX_DESCRIPTION_LEN: usize = 500;

/// Trim and validate a required name field (non-blank, at most 100 chars).
/// `label` names the resource in the message ("Category", "Item").
pub(crate) fn normalize_name(raw: Option<&str>, label: &str) -> Result<String, String> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(format!("{} name is required", label));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(format!(
            "{} name must be less than {} characters",
            label, MAX_NAME_LEN
        ));
    }
    Ok(trimmed.to_string())
}

/// Trim and validate an optional description (at most 500 chars). An explicit
/// empty string is a valid value.
pub(crate) fn normalize_description(raw: Option<&str>) -> Result<String, String> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(format!(
            "Description must be less than {} characters",
            MAX_DESCRIPTION_LEN
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate a 3- or 6-digit hex color string such as "#FFF" or "#1a2b3c".
pub(crate) fn validate_color(raw: &str) -> Result<String, String> {
    let digits = raw.strip_prefix('#').unwrap_or("");
    let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(raw.to_string())
    } else {
        Err("Invalid color format".to_string())
    }
}

/// Map a storage-layer unique-constraint violation to a resource-specific
/// Conflict. The unique index is the real uniqueness guard; the services'
/// pre-checks are only a fast path and can race.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> ApiError {
    match &err {
        sqlx::Error::Database(db_err)
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            ApiError::conflict(message)
        }
        _ => ApiError::from(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_required() {
        assert_eq!(normalize_name(Some("  Fruit  "), "Category").unwrap(), "Fruit");
        assert!(normalize_name(Some("   "), "Category").is_err());
        assert!(normalize_name(None, "Category").is_err());
    }

    #[test]
    fn name_length_is_bounded() {
        let long = "x".repeat(101);
        assert!(normalize_name(Some(long.as_str()), "Item").is_err());
        let ok = "x".repeat(100);
        assert_eq!(normalize_name(Some(ok.as_str()), "Item").unwrap(), ok);
    }

    #[test]
    fn description_allows_empty_but_bounds_length() {
        assert_eq!(normalize_description(Some("")).unwrap(), "");
        assert_eq!(normalize_description(None).unwrap(), "");
        let long = "x".repeat(501);
        assert!(normalize_description(Some(long.as_str())).is_err());
    }

    #[test]
    fn color_accepts_3_and_6_digit_hex() {
        assert!(validate_color("#FFF").is_ok());
        assert!(validate_color("#1a2b3c").is_ok());
        assert!(validate_color("#ffff").is_err());
        assert!(validate_color("#GGG").is_err());
        assert!(validate_color("FFFFFF").is_err());
        assert!(validate_color("").is_err());
    }
}
