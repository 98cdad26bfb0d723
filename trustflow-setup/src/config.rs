//! Environment-driven configuration for the setup binary.
//!
//! The service-role key grants full access to the project, so it is never
//! embedded in source; both it and the project URL come from the
//! environment (or a local `.env` file loaded by the binary).

use std::env;

use crate::errors::SetupError;

/// Default table used for the existence probe.
pub const DEFAULT_PROBE_TABLE: &str = "spaces";

/// Connection settings for the target Supabase project.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Project base URL, e.g. "https://xyz.supabase.co".
    pub base_url: String,
    /// Service-role key, sent as both `apikey` and bearer token.
    pub service_key: String,
    /// Table probed to decide whether the schema is applied.
    pub probe_table: String,
}

impl SetupConfig {
    /// Read configuration from the environment.
    ///
    /// `SUPABASE_URL` and `SUPABASE_SERVICE_KEY` are required;
    /// `SETUP_PROBE_TABLE` overrides the probed table.
    pub fn from_env() -> Result<Self, SetupError> {
        let base_url = required_var("SUPABASE_URL")?;
        let service_key = required_var("SUPABASE_SERVICE_KEY")?;
        let probe_table = env::var("SETUP_PROBE_TABLE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROBE_TABLE.to_string());

        Ok(Self {
            base_url,
            service_key,
            probe_table,
        })
    }
}

fn required_var(name: &'static str) -> Result<String, SetupError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(SetupError::MissingEnv { name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env_vars() {
        env::remove_var("SUPABASE_URL");
        env::remove_var("SUPABASE_SERVICE_KEY");
        env::remove_var("SETUP_PROBE_TABLE");
    }

    #[test]
    #[serial]
    fn from_env_reads_required_vars() {
        clear_env_vars();
        env::set_var("SUPABASE_URL", "https://xyz.supabase.co");
        env::set_var("SUPABASE_SERVICE_KEY", "service-key");

        let config = SetupConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://xyz.supabase.co");
        assert_eq!(config.service_key, "service-key");
        assert_eq!(config.probe_table, "spaces");
    }

    #[test]
    #[serial]
    fn from_env_honors_probe_table_override() {
        clear_env_vars();
        env::set_var("SUPABASE_URL", "https://xyz.supabase.co");
        env::set_var("SUPABASE_SERVICE_KEY", "service-key");
        env::set_var("SETUP_PROBE_TABLE", "testimonials");

        let config = SetupConfig::from_env().unwrap();
        assert_eq!(config.probe_table, "testimonials");
    }

    #[test]
    #[serial]
    fn missing_url_is_an_error() {
        clear_env_vars();
        env::set_var("SUPABASE_SERVICE_KEY", "service-key");

        let err = SetupConfig::from_env().unwrap_err();
        assert!(matches!(err, SetupError::MissingEnv { name: "SUPABASE_URL" }));
    }

    #[test]
    #[serial]
    fn empty_key_counts_as_missing() {
        clear_env_vars();
        env::set_var("SUPABASE_URL", "https://xyz.supabase.co");
        env::set_var("SUPABASE_SERVICE_KEY", "  ");

        let err = SetupConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            SetupError::MissingEnv {
                name: "SUPABASE_SERVICE_KEY"
            }
        ));
    }
}
