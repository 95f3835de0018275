//! Environment-driven tuning for property-test suites.
//!
//! CI raises the case count for nightly runs by exporting
//! [`PROPTEST_CASES_ENV_KEY`]; local runs keep each suite's default.

use std::env;

/// Environment variable overriding the number of cases per property.
pub const PROPTEST_CASES_ENV_KEY: &str = "RAMIFY_PROPTEST_CASES";

/// Resolved property-test settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
}

impl ProptestRunProfile {
    /// Loads the profile, falling back to `default_cases` when the override is
    /// absent or invalid.
    ///
    /// # Examples
    /// ```
    /// use ramify_test_support::proptest_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32) -> Self {
        let cases = match env::var(PROPTEST_CASES_ENV_KEY) {
            Ok(raw) => parse_cases(&raw).unwrap_or_else(|reason| {
                tracing::warn!(
                    env = PROPTEST_CASES_ENV_KEY,
                    raw = %raw,
                    reason = %reason,
                    "invalid property-test override; using default",
                );
                default_cases
            }),
            Err(_) => default_cases,
        };
        Self { cases }
    }

    /// Number of cases to run per property.
    #[must_use]
    #[rustfmt::skip]
    pub fn cases(&self) -> u32 { self.cases }
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == 0 {
        return Err("cases must be > 0".to_owned());
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvGuard {
        original: Option<String>,
    }

    impl EnvGuard {
        fn set(value: Option<&str>) -> Self {
            let original = env::var(PROPTEST_CASES_ENV_KEY).ok();
            // SAFETY: tests serialise environment access with ENV_LOCK.
            unsafe {
                match value {
                    Some(value) => env::set_var(PROPTEST_CASES_ENV_KEY, value),
                    None => env::remove_var(PROPTEST_CASES_ENV_KEY),
                }
            }
            Self { original }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: tests serialise environment access with ENV_LOCK.
            unsafe {
                match &self.original {
                    Some(value) => env::set_var(PROPTEST_CASES_ENV_KEY, value),
                    None => env::remove_var(PROPTEST_CASES_ENV_KEY),
                }
            }
        }
    }

    #[rstest]
    #[case(None, 64)]
    #[case(Some("1"), 1)]
    #[case(Some(" 250 "), 250)]
    #[case(Some("0"), 64)]
    #[case(Some("-3"), 64)]
    #[case(Some("many"), 64)]
    fn load_resolves_overrides(#[case] raw: Option<&str>, #[case] expected: u32) {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _guard = EnvGuard::set(raw);

        assert_eq!(ProptestRunProfile::load(64).cases(), expected);
    }
}
