//! Environment variable parsing helpers
//!
//! Missing or unparsable values fall back to a default instead of panicking,
//! so configuration code never needs `unwrap()`.

use std::str::FromStr;

/// Parse an environment variable, falling back to `default`
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable; `None` if missing or invalid
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Read a comma-separated list, dropping empty entries
pub fn parse_env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Read a boolean flag. Accepts `1/0`, `true/false`, `yes/no`, `on/off`.
pub fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_parse_env_with_default() {
        std::env::remove_var("DB_POOL_TEST_PORT");
        let result: u16 = parse_env_with_default("DB_POOL_TEST_PORT", 3000);
        assert_eq!(result, 3000);

        std::env::set_var("DB_POOL_TEST_PORT", " 8080 ");
        let result: u16 = parse_env_with_default("DB_POOL_TEST_PORT", 3000);
        assert_eq!(result, 8080);

        std::env::set_var("DB_POOL_TEST_PORT", "not-a-port");
        let result: u16 = parse_env_with_default("DB_POOL_TEST_PORT", 3000);
        assert_eq!(result, 3000);
        std::env::remove_var("DB_POOL_TEST_PORT");
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_env_list() {
        std::env::set_var("DB_POOL_TEST_LIST", "a@example.com, ,b@example.com,");
        assert_eq!(
            parse_env_list("DB_POOL_TEST_LIST"),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
        std::env::remove_var("DB_POOL_TEST_LIST");
        assert!(parse_env_list("DB_POOL_TEST_LIST").is_empty());
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_env_bool() {
        std::env::set_var("DB_POOL_TEST_FLAG", "Yes");
        assert!(parse_env_bool("DB_POOL_TEST_FLAG", false));
        std::env::set_var("DB_POOL_TEST_FLAG", "off");
        assert!(!parse_env_bool("DB_POOL_TEST_FLAG", true));
        std::env::set_var("DB_POOL_TEST_FLAG", "maybe");
        assert!(parse_env_bool("DB_POOL_TEST_FLAG", true));
        std::env::remove_var("DB_POOL_TEST_FLAG");
    }
}
