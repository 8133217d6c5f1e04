//! Environment variable parsing with warn-level logging for invalid values.

use std::time::Duration;

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Non-empty string value of `var`, if set.
#[must_use]
pub fn env_non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Duration in whole seconds from `var`, falling back to `default_secs`.
#[must_use]
pub fn env_duration_secs(var: &str, default_secs: u64) -> Duration {
    Duration::from_secs(env_parse_with_default(var, default_secs))
}

#[cfg(test)]
mod tests {
    // SAFETY (all `unsafe` env mutation below): every test uses its own variable name.
    use super::*;

    #[test]
    fn test_env_parse_valid_value() {
        let var_name = "KOTOBA_TEST_ENV_PARSE_VALID_5521";
        unsafe { std::env::set_var(var_name, "42") };
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 42);
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn test_env_parse_invalid_value() {
        let var_name = "KOTOBA_TEST_ENV_PARSE_INVALID_5522";
        unsafe { std::env::set_var(var_name, "banana") };
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 10);
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn test_env_parse_missing_var() {
        let var_name = "KOTOBA_TEST_ENV_PARSE_MISSING_5523";
        unsafe { std::env::remove_var(var_name) };
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_env_non_empty_ignores_blank() {
        let var_name = "KOTOBA_TEST_ENV_NON_EMPTY_5524";
        unsafe { std::env::set_var(var_name, "   ") };
        assert_eq!(env_non_empty(var_name), None);
        unsafe { std::env::set_var(var_name, " key ") };
        assert_eq!(env_non_empty(var_name).as_deref(), Some("key"));
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn test_env_duration_secs() {
        let var_name = "KOTOBA_TEST_ENV_DURATION_5525";
        unsafe { std::env::set_var(var_name, "90") };
        assert_eq!(env_duration_secs(var_name, 5), Duration::from_secs(90));
        unsafe { std::env::remove_var(var_name) };
        assert_eq!(env_duration_secs(var_name, 5), Duration::from_secs(5));
    }
}
