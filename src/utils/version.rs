//! Crate version information

/// Crate version, taken from `Cargo.toml`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the crate version
pub fn get_version() -> &'static str {
    VERSION
}

/// User agent sent with every request
pub fn user_agent() -> String {
    format!("dm-api-rs/{}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_package() {
        assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_user_agent() {
        assert!(user_agent().starts_with("dm-api-rs/"));
        assert!(user_agent().ends_with(VERSION));
    }
}
