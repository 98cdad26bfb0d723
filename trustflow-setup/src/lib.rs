//! TrustFlow database setup flow.
//!
//! Provisions the Supabase backend for TrustFlow: probes whether the
//! schema is applied, surfaces manual setup instructions when it is not,
//! attempts one best-effort apply through the `exec_sql` RPC, and
//! re-probes to report the final state.
//!
//! The flow never fails: every probe or apply error is logged and folded
//! into the [`SetupReport`]. The operator instructions are the fallback
//! path, not an exception path.
//!
//! ## Usage
//!
//! ```ignore
//! use trustflow_setup::SetupFlow;
//! use supabase::ApiSource;
//!
//! let api = ApiSource::live(url, key).into_api();
//! let report = SetupFlow::new(api, url).run().await;
//! println!("{}", report.outcome());
//! ```

pub mod config;
pub mod errors;

use std::sync::Arc;

use supabase::SupabaseApi;
use tracing::{info, warn};

pub use config::SetupConfig;
pub use errors::SetupError;

/// Final state of a setup run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The schema was already applied; nothing was written.
    AlreadySetUp,
    /// The schema was missing and the re-probe confirms it is now applied.
    Completed,
    /// The schema is still missing; the operator has to apply it by hand.
    ManualActionRequired,
}

impl std::fmt::Display for SetupOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            SetupOutcome::AlreadySetUp => "database is already set up",
            SetupOutcome::Completed => "database setup completed",
            SetupOutcome::ManualActionRequired => {
                "database is not set up; manual action required"
            }
        };
        write!(f, "{}", message)
    }
}

/// What a setup run observed and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupReport {
    /// Result of the initial probe.
    pub probed_before: bool,
    /// Whether a remote apply was attempted.
    pub apply_attempted: bool,
    /// Whether the apply call itself reported success.
    pub apply_succeeded: bool,
    /// Result of the final probe; this alone decides the outcome.
    pub verified: bool,
}

impl SetupReport {
    pub fn outcome(&self) -> SetupOutcome {
        if self.probed_before {
            SetupOutcome::AlreadySetUp
        } else if self.verified {
            SetupOutcome::Completed
        } else {
            SetupOutcome::ManualActionRequired
        }
    }
}

/// The probe → instructions → apply → re-probe sequence.
pub struct SetupFlow {
    api: Arc<dyn SupabaseApi>,
    project_url: String,
    probe_table: String,
}

impl SetupFlow {
    pub fn new(api: Arc<dyn SupabaseApi>, project_url: impl Into<String>) -> Self {
        Self {
            api,
            project_url: project_url.into(),
            probe_table: config::DEFAULT_PROBE_TABLE.to_string(),
        }
    }

    /// Override the table used for the existence probe.
    pub fn with_probe_table(mut self, table: impl Into<String>) -> Self {
        self.probe_table = table.into();
        self
    }

    /// Run the full setup sequence. Never fails; the report captures
    /// everything the run observed.
    pub async fn run(&self) -> SetupReport {
        info!(table = %self.probe_table, "Checking if tables exist");
        let probed_before = self.verify_tables().await;

        if probed_before {
            info!("Database is already set up");
            return SetupReport {
                probed_before,
                apply_attempted: false,
                apply_succeeded: false,
                verified: true,
            };
        }

        warn!("Tables don't exist yet");
        println!("{}", manual_instructions(&self.project_url));

        info!("Attempting API-based setup");
        let apply_succeeded = self.apply_schema().await;

        info!("Re-checking tables");
        let verified = self.verify_tables().await;

        let report = SetupReport {
            probed_before,
            apply_attempted: true,
            apply_succeeded,
            verified,
        };
        info!(outcome = %report.outcome(), "Setup finished");
        report
    }

    /// Probe the configured table. Any failure reads as "not set up".
    async fn verify_tables(&self) -> bool {
        match self.api.probe_table(&self.probe_table).await {
            Ok(()) => {
                info!(table = %self.probe_table, "Table exists");
                true
            }
            Err(error) => {
                warn!(table = %self.probe_table, error = %error, "Table check failed");
                false
            }
        }
    }

    /// Send the whole schema through the `exec_sql` RPC, once.
    ///
    /// The RPC may not exist server-side; a failure here is expected and
    /// only logged. The re-probe decides what it meant.
    async fn apply_schema(&self) -> bool {
        info!(
            statements = schema::statements().len(),
            "Executing schema via RPC"
        );

        match self.api.exec_sql(schema::SQL_SCHEMA).await {
            Ok(()) => {
                info!("SQL executed successfully via RPC");
                true
            }
            Err(error) => {
                warn!(error = %error, "RPC setup failed");
                false
            }
        }
    }
}

/// Operator instructions for applying the schema by hand.
pub fn manual_instructions(project_url: &str) -> String {
    format!(
        "Please run the schema in the Supabase Dashboard:
  1. Go to https://supabase.com/dashboard
  2. Select the project behind {project_url}
  3. Open the SQL Editor
  4. Paste and run the schema below
{schema}",
        project_url = project_url,
        schema = schema::SQL_SCHEMA,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_prefers_already_set_up() {
        let report = SetupReport {
            probed_before: true,
            apply_attempted: false,
            apply_succeeded: false,
            verified: true,
        };
        assert_eq!(report.outcome(), SetupOutcome::AlreadySetUp);
    }

    #[test]
    fn outcome_is_decided_by_verification_not_apply() {
        let applied_but_unverified = SetupReport {
            probed_before: false,
            apply_attempted: true,
            apply_succeeded: true,
            verified: false,
        };
        assert_eq!(
            applied_but_unverified.outcome(),
            SetupOutcome::ManualActionRequired
        );

        let failed_apply_but_verified = SetupReport {
            probed_before: false,
            apply_attempted: true,
            apply_succeeded: false,
            verified: true,
        };
        assert_eq!(failed_apply_but_verified.outcome(), SetupOutcome::Completed);
    }

    #[test]
    fn instructions_reference_the_project_and_schema() {
        let text = manual_instructions("https://xyz.supabase.co");
        assert!(text.contains("https://supabase.com/dashboard"));
        assert!(text.contains("https://xyz.supabase.co"));
        assert!(text.contains("CREATE TABLE IF NOT EXISTS public.spaces"));
    }
}
