//! Mock Supabase API for testing and local development.
//!
//! The mock keeps tables in memory and understands the small slice of
//! PostgREST query syntax the stores and the setup flow actually use
//! (`select=`, `{col}=eq.{val}`, `order=`, `limit=`). Probe and RPC calls
//! are recorded so tests can assert how many write attempts a flow made.
//!
//! # Example
//!
//! ```ignore
//! use supabase::{MockSupabaseApi, SupabaseApi};
//!
//! let api = MockSupabaseApi::new();
//! api.register_table("spaces");
//!
//! api.probe_table("spaces").await?;
//! assert_eq!(api.probe_count(), 1);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::{Result, SupabaseApi, SupabaseError};

/// How the mock answers `exec_sql` calls.
#[derive(Debug, Clone)]
enum ExecSqlBehavior {
    /// The RPC is not deployed server-side (the default, and the common
    /// case for a stock Supabase project).
    Missing,

    /// The RPC exists but fails with the given status.
    Fail { status: u16 },

    /// The RPC succeeds and registers the given tables, simulating a
    /// schema apply.
    CreateTables(Vec<String>),
}

struct MockTable {
    /// Column defaults merged into every inserted row.
    defaults: Value,
    rows: Vec<Value>,
}

/// Cascade rule applied on delete, mirroring `ON DELETE CASCADE`.
struct Cascade {
    parent: String,
    child: String,
    foreign_key: String,
}

/// In-memory Supabase API for tests.
pub struct MockSupabaseApi {
    tables: RwLock<HashMap<String, MockTable>>,
    exec_behavior: RwLock<ExecSqlBehavior>,
    cascades: RwLock<Vec<Cascade>>,
    offline: AtomicBool,
    forced_probe_failures: AtomicUsize,
    probe_calls: Mutex<Vec<String>>,
    exec_calls: Mutex<Vec<String>>,
}

impl MockSupabaseApi {
    /// Create a mock with no registered tables and no `exec_sql` RPC.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            exec_behavior: RwLock::new(ExecSqlBehavior::Missing),
            cascades: RwLock::new(Vec::new()),
            offline: AtomicBool::new(false),
            forced_probe_failures: AtomicUsize::new(0),
            probe_calls: Mutex::new(Vec::new()),
            exec_calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock with the given tables already registered.
    pub fn with_tables<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let api = Self::new();
        for table in tables {
            api.register_table(table);
        }
        api
    }

    /// Register an empty table.
    pub fn register_table(&self, name: impl Into<String>) {
        self.register_table_with_defaults(name, serde_json::json!({}));
    }

    /// Register a table whose inserts are completed with the given column
    /// defaults, the way the database fills omitted columns.
    pub fn register_table_with_defaults(&self, name: impl Into<String>, defaults: Value) {
        self.tables.write().unwrap().insert(
            name.into(),
            MockTable {
                defaults,
                rows: Vec::new(),
            },
        );
    }

    /// Make `exec_sql` succeed and register the given tables when called.
    pub fn exec_sql_creates<I, S>(&self, tables: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.exec_behavior.write().unwrap() =
            ExecSqlBehavior::CreateTables(tables.into_iter().map(Into::into).collect());
    }

    /// Make `exec_sql` fail with the given HTTP status.
    pub fn fail_exec_sql_with(&self, status: u16) {
        *self.exec_behavior.write().unwrap() = ExecSqlBehavior::Fail { status };
    }

    /// Declare an `ON DELETE CASCADE` relation between two tables.
    pub fn with_cascade(
        &self,
        parent: impl Into<String>,
        child: impl Into<String>,
        foreign_key: impl Into<String>,
    ) {
        self.cascades.write().unwrap().push(Cascade {
            parent: parent.into(),
            child: child.into(),
            foreign_key: foreign_key.into(),
        });
    }

    /// Simulate the project being unreachable: every call fails with a
    /// network error instead of a status.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make the next `count` probe calls fail with a network error, even
    /// when the table exists. Models transient flakes between a probe and
    /// a re-probe.
    pub fn fail_probes(&self, count: usize) {
        self.forced_probe_failures.store(count, Ordering::SeqCst);
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.read().unwrap().contains_key(name)
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .unwrap()
            .get(table)
            .map(|t| t.rows.len())
            .unwrap_or(0)
    }

    /// Number of probe calls made so far.
    pub fn probe_count(&self) -> usize {
        self.probe_calls.lock().unwrap().len()
    }

    /// Number of `exec_sql` calls made so far.
    pub fn exec_sql_count(&self) -> usize {
        self.exec_calls.lock().unwrap().len()
    }

    /// The SQL sent by the most recent `exec_sql` call.
    pub fn last_exec_sql(&self) -> Option<String> {
        self.exec_calls.lock().unwrap().last().cloned()
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(SupabaseError::Network("mock project is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn unknown_table(table: &str) -> SupabaseError {
        SupabaseError::Status {
            status: 404,
            body: format!("relation \"public.{}\" does not exist", table),
        }
    }
}

impl Default for MockSupabaseApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SupabaseApi for MockSupabaseApi {
    async fn probe_table(&self, table: &str) -> Result<()> {
        self.probe_calls.lock().unwrap().push(table.to_string());
        self.ensure_online()?;

        let forced = self
            .forced_probe_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if forced {
            return Err(SupabaseError::Network(
                "injected probe failure".to_string(),
            ));
        }

        if self.has_table(table) {
            Ok(())
        } else {
            Err(Self::unknown_table(table))
        }
    }

    async fn exec_sql(&self, sql: &str) -> Result<()> {
        self.exec_calls.lock().unwrap().push(sql.to_string());
        self.ensure_online()?;

        let behavior = self.exec_behavior.read().unwrap().clone();
        match behavior {
            ExecSqlBehavior::Missing => Err(SupabaseError::Status {
                status: 404,
                body: "Could not find the function public.exec_sql(query)".to_string(),
            }),
            ExecSqlBehavior::Fail { status } => Err(SupabaseError::Status {
                status,
                body: "exec_sql failed".to_string(),
            }),
            ExecSqlBehavior::CreateTables(tables) => {
                for table in tables {
                    if !self.has_table(&table) {
                        self.register_table(table);
                    }
                }
                Ok(())
            }
        }
    }

    async fn select_rows(&self, table: &str, query: &str) -> Result<Vec<Value>> {
        self.ensure_online()?;

        let parsed = ParsedQuery::parse(query);
        let tables = self.tables.read().unwrap();
        let mock_table = tables.get(table).ok_or_else(|| Self::unknown_table(table))?;

        let mut rows: Vec<Value> = mock_table
            .rows
            .iter()
            .filter(|row| parsed.matches(row))
            .cloned()
            .collect();

        if let Some((column, descending)) = &parsed.order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(column), b.get(column));
                if *descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        if let Some(limit) = parsed.limit {
            rows.truncate(limit);
        }

        Ok(rows.into_iter().map(|row| parsed.project(row)).collect())
    }

    async fn insert_row(&self, table: &str, row: Value) -> Result<Value> {
        self.ensure_online()?;

        let body = row
            .as_object()
            .ok_or_else(|| SupabaseError::UnexpectedBody("insert body must be an object".to_string()))?
            .clone();

        let mut tables = self.tables.write().unwrap();
        let mock_table = tables
            .get_mut(table)
            .ok_or_else(|| Self::unknown_table(table))?;

        // Start from column defaults, overlay the payload, generate the key.
        let mut stored = mock_table
            .defaults
            .as_object()
            .cloned()
            .unwrap_or_default();
        for (key, value) in body {
            stored.insert(key, value);
        }
        stored
            .entry("id".to_string())
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));

        let stored = Value::Object(stored);
        mock_table.rows.push(stored.clone());
        Ok(stored)
    }

    async fn update_rows(&self, table: &str, filter: &str, patch: Value) -> Result<()> {
        self.ensure_online()?;

        let patch = patch
            .as_object()
            .ok_or_else(|| SupabaseError::UnexpectedBody("patch body must be an object".to_string()))?
            .clone();
        let parsed = ParsedQuery::parse(filter);

        let mut tables = self.tables.write().unwrap();
        let mock_table = tables
            .get_mut(table)
            .ok_or_else(|| Self::unknown_table(table))?;

        for row in mock_table.rows.iter_mut().filter(|row| parsed.matches(row)) {
            if let Some(object) = row.as_object_mut() {
                for (key, value) in &patch {
                    object.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(())
    }

    async fn delete_rows(&self, table: &str, filter: &str) -> Result<()> {
        self.ensure_online()?;

        let parsed = ParsedQuery::parse(filter);

        let mut tables = self.tables.write().unwrap();
        let mock_table = tables
            .get_mut(table)
            .ok_or_else(|| Self::unknown_table(table))?;

        let (removed, kept): (Vec<Value>, Vec<Value>) = mock_table
            .rows
            .drain(..)
            .partition(|row| parsed.matches(row));
        mock_table.rows = kept;

        // Apply ON DELETE CASCADE rules for the removed parents.
        let cascades = self.cascades.read().unwrap();
        for cascade in cascades.iter().filter(|c| c.parent == table) {
            let parent_ids: Vec<String> = removed
                .iter()
                .filter_map(|row| row.get("id").map(value_as_filter_string))
                .collect();

            if let Some(child_table) = tables.get_mut(&cascade.child) {
                child_table.rows.retain(|row| {
                    row.get(&cascade.foreign_key)
                        .map(value_as_filter_string)
                        .map(|fk| !parent_ids.contains(&fk))
                        .unwrap_or(true)
                });
            }
        }

        Ok(())
    }
}

/// The slice of PostgREST query syntax the mock understands.
struct ParsedQuery {
    /// Projected columns; `None` means `*`.
    select: Option<Vec<String>>,
    /// `column=eq.value` filters.
    filters: Vec<(String, String)>,
    /// `order=column.asc|desc`
    order: Option<(String, bool)>,
    /// `limit=n`
    limit: Option<usize>,
}

impl ParsedQuery {
    fn parse(query: &str) -> Self {
        let mut parsed = Self {
            select: None,
            filters: Vec::new(),
            order: None,
            limit: None,
        };

        for part in query.split('&').filter(|p| !p.is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };

            match key {
                "select" => {
                    if value != "*" {
                        parsed.select =
                            Some(value.split(',').map(|c| c.trim().to_string()).collect());
                    }
                }
                "order" => {
                    let (column, direction) = value.split_once('.').unwrap_or((value, "asc"));
                    parsed.order = Some((column.to_string(), direction == "desc"));
                }
                "limit" => {
                    parsed.limit = value.parse().ok();
                }
                column => {
                    if let Some(expected) = value.strip_prefix("eq.") {
                        parsed.filters.push((column.to_string(), expected.to_string()));
                    }
                }
            }
        }

        parsed
    }

    fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|(column, expected)| {
            row.get(column)
                .map(|value| value_as_filter_string(value) == *expected)
                .unwrap_or(false)
        })
    }

    fn project(&self, row: Value) -> Value {
        match &self.select {
            None => row,
            Some(columns) => {
                let mut projected = serde_json::Map::new();
                for column in columns {
                    if let Some(value) = row.get(column) {
                        projected.insert(column.clone(), value.clone());
                    }
                }
                Value::Object(projected)
            }
        }
    }
}

/// Render a JSON value the way it appears in a PostgREST `eq.` filter.
fn value_as_filter_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        _ => std::cmp::Ordering::Equal,
    }
}
