//! Crate version information

/// Crate version from Cargo metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version string reported by the server
pub fn get_version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_package() {
        assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
        assert!(!get_version().is_empty());
    }
}
