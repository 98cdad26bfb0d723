//! Integration tests for the setup flow.
//!
//! These run the real `SetupFlow` against `MockSupabaseApi` so the
//! probe/apply/re-probe sequencing can be asserted without a project.

use std::sync::Arc;

use supabase::{MockSupabaseApi, SupabaseApi};
use trustflow_setup::{SetupFlow, SetupOutcome};

const PROJECT_URL: &str = "https://example.supabase.co";

fn flow(api: &Arc<MockSupabaseApi>) -> SetupFlow {
    SetupFlow::new(api.clone() as Arc<dyn SupabaseApi>, PROJECT_URL)
}

#[tokio::test]
async fn already_set_up_performs_no_write() {
    let api = Arc::new(MockSupabaseApi::with_tables(["spaces", "testimonials"]));

    let report = flow(&api).run().await;

    assert_eq!(report.outcome(), SetupOutcome::AlreadySetUp);
    assert!(!report.apply_attempted);
    assert_eq!(api.probe_count(), 1);
    assert_eq!(api.exec_sql_count(), 0);
}

#[tokio::test]
async fn missing_schema_attempts_exactly_one_write() {
    // Stock project: no tables, no exec_sql RPC.
    let api = Arc::new(MockSupabaseApi::new());

    let report = flow(&api).run().await;

    assert_eq!(report.outcome(), SetupOutcome::ManualActionRequired);
    assert!(report.apply_attempted);
    assert!(!report.apply_succeeded);
    assert!(!report.verified);

    // One probe before, one after; exactly one write in between.
    assert_eq!(api.probe_count(), 2);
    assert_eq!(api.exec_sql_count(), 1);

    // The write carried the whole schema.
    let sent = api.last_exec_sql().unwrap();
    assert!(sent.contains("CREATE TABLE IF NOT EXISTS public.spaces"));
    assert!(sent.contains("CREATE TABLE IF NOT EXISTS public.testimonials"));
    assert!(sent.contains("ENABLE ROW LEVEL SECURITY"));
}

#[tokio::test]
async fn successful_apply_is_confirmed_by_the_reprobe() {
    let api = Arc::new(MockSupabaseApi::new());
    api.exec_sql_creates(["spaces", "testimonials"]);

    let report = flow(&api).run().await;

    assert_eq!(report.outcome(), SetupOutcome::Completed);
    assert!(report.apply_succeeded);
    assert!(report.verified);
    assert_eq!(api.exec_sql_count(), 1);
}

#[tokio::test]
async fn reprobe_decides_even_when_the_apply_failed() {
    // Schema exists but the first probe hits a transient failure; the
    // apply then fails (no RPC), and the re-probe finds the tables.
    let api = Arc::new(MockSupabaseApi::with_tables(["spaces", "testimonials"]));
    api.fail_probes(1);
    api.fail_exec_sql_with(404);

    let report = flow(&api).run().await;

    assert_eq!(report.outcome(), SetupOutcome::Completed);
    assert!(report.apply_attempted);
    assert!(!report.apply_succeeded);
    assert!(report.verified);
}

#[tokio::test]
async fn reprobe_decides_even_when_the_apply_claimed_success() {
    // The RPC answers 200 but the schema never landed (e.g. a stub
    // function). The re-probe, not the write, decides the outcome.
    let api = Arc::new(MockSupabaseApi::new());
    api.exec_sql_creates(["unrelated_table"]);

    let report = flow(&api).run().await;

    assert_eq!(report.outcome(), SetupOutcome::ManualActionRequired);
    assert!(report.apply_succeeded);
    assert!(!report.verified);
}

#[tokio::test]
async fn network_failures_never_escape_the_flow() {
    let api = Arc::new(MockSupabaseApi::with_tables(["spaces"]));
    api.set_offline(true);

    // `run` has no error path; completing at all is the property.
    let report = flow(&api).run().await;

    assert_eq!(report.outcome(), SetupOutcome::ManualActionRequired);
    assert_eq!(api.probe_count(), 2);
    assert_eq!(api.exec_sql_count(), 1);
}

#[tokio::test]
async fn custom_probe_table_is_used() {
    let api = Arc::new(MockSupabaseApi::with_tables(["testimonials"]));

    let report = flow(&api).with_probe_table("testimonials").run().await;

    assert_eq!(report.outcome(), SetupOutcome::AlreadySetUp);
    assert_eq!(api.exec_sql_count(), 0);
}
