//! Typed reads of `SHOWRUNNER_*` settings from the environment.

/// Reads `var` as a `T`, or `default` when unset. A value that does not parse
/// is reported at warn level and also yields `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    let Ok(raw) = std::env::var(var) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(var, value = %raw, default = %default, "ignoring unparsable setting");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VersionSource;

    #[test]
    fn parses_valid_source() {
        let var_name = "TEST_SHOWRUNNER_ENV_VALID_40311";
        unsafe { std::env::set_var(var_name, "ai") };
        let result = env_parse_with_default(var_name, VersionSource::Manual);
        assert_eq!(result, VersionSource::Ai);
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn invalid_value_falls_back() {
        let var_name = "TEST_SHOWRUNNER_ENV_INVALID_40312";
        unsafe { std::env::set_var(var_name, "maybe") };
        let result: bool = env_parse_with_default(var_name, true);
        assert!(result);
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let var_name = "TEST_SHOWRUNNER_ENV_PADDED_40314";
        unsafe { std::env::set_var(var_name, " import ") };
        let result = env_parse_with_default(var_name, VersionSource::Manual);
        assert_eq!(result, VersionSource::Import);
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn missing_var_falls_back() {
        let var_name = "TEST_SHOWRUNNER_ENV_MISSING_40313";
        unsafe { std::env::remove_var(var_name) };
        let result = env_parse_with_default(var_name, VersionSource::Import);
        assert_eq!(result, VersionSource::Import);
    }
}
