//! SQLite schema DDL for the tables the export engine reads.
//!
//! Only the columns the export steps consume are declared; the store is
//! treated as a read-only snapshot for the duration of a run.

use rusqlite::Connection;

use crate::errors::ExportResult;

/// Core DDL statements: 10 CREATE TABLE + 7 CREATE INDEX.
///
/// Executed with `CREATE … IF NOT EXISTS` so they are safe to replay on an
/// already-initialised database.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    // ── tables (10) ─────────────────────────────────────────────────────
    "CREATE TABLE IF NOT EXISTS projects (
        uuid TEXT PRIMARY KEY,
        kee TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL
    );",
    "CREATE TABLE IF NOT EXISTS project_branches (
        uuid TEXT PRIMARY KEY,
        project_uuid TEXT NOT NULL REFERENCES projects(uuid),
        kee TEXT NOT NULL,
        branch_type TEXT NOT NULL,
        merge_branch_uuid TEXT,
        exclude_from_purge BOOLEAN NOT NULL DEFAULT FALSE,
        UNIQUE(project_uuid, kee)
    );",
    "CREATE TABLE IF NOT EXISTS components (
        uuid TEXT PRIMARY KEY,
        kee TEXT NOT NULL,
        branch_uuid TEXT NOT NULL REFERENCES project_branches(uuid),
        qualifier TEXT NOT NULL,
        enabled BOOLEAN NOT NULL DEFAULT TRUE
    );",
    "CREATE TABLE IF NOT EXISTS snapshots (
        uuid TEXT PRIMARY KEY,
        root_component_uuid TEXT NOT NULL REFERENCES project_branches(uuid),
        status TEXT NOT NULL DEFAULT 'U',
        created_at INTEGER NOT NULL
    );",
    "CREATE TABLE IF NOT EXISTS events (
        uuid TEXT PRIMARY KEY,
        analysis_uuid TEXT NOT NULL REFERENCES snapshots(uuid),
        component_uuid TEXT NOT NULL,
        name TEXT,
        category TEXT,
        description TEXT,
        event_data TEXT,
        event_date INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    );",
    "CREATE TABLE IF NOT EXISTS project_links (
        uuid TEXT PRIMARY KEY,
        project_uuid TEXT NOT NULL,
        link_type TEXT NOT NULL,
        name TEXT,
        href TEXT NOT NULL
    );",
    "CREATE TABLE IF NOT EXISTS metrics (
        uuid TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        short_name TEXT NOT NULL,
        enabled BOOLEAN NOT NULL DEFAULT TRUE
    );",
    "CREATE TABLE IF NOT EXISTS project_measures (
        uuid TEXT PRIMARY KEY,
        analysis_uuid TEXT NOT NULL REFERENCES snapshots(uuid),
        component_uuid TEXT NOT NULL,
        metric_uuid TEXT NOT NULL REFERENCES metrics(uuid),
        value REAL,
        text_value TEXT,
        alert_status TEXT,
        alert_text TEXT
    );",
    "CREATE TABLE IF NOT EXISTS properties (
        uuid TEXT PRIMARY KEY,
        prop_key TEXT NOT NULL,
        entity_uuid TEXT,
        user_uuid TEXT,
        text_value TEXT
    );",
    "CREATE TABLE IF NOT EXISTS new_code_periods (
        uuid TEXT PRIMARY KEY,
        project_uuid TEXT,
        branch_uuid TEXT,
        period_type TEXT NOT NULL,
        value TEXT,
        UNIQUE(project_uuid, branch_uuid)
    );",
    // ── indexes (7) ─────────────────────────────────────────────────────
    "CREATE INDEX IF NOT EXISTS idx_branches_project ON project_branches(project_uuid);",
    "CREATE INDEX IF NOT EXISTS idx_components_branch ON components(branch_uuid);",
    "CREATE INDEX IF NOT EXISTS idx_snapshots_root ON snapshots(root_component_uuid);",
    "CREATE INDEX IF NOT EXISTS idx_events_analysis ON events(analysis_uuid);",
    "CREATE INDEX IF NOT EXISTS idx_measures_analysis ON project_measures(analysis_uuid);",
    "CREATE INDEX IF NOT EXISTS idx_properties_entity ON properties(entity_uuid);",
    "CREATE INDEX IF NOT EXISTS idx_links_project ON project_links(project_uuid);",
];

/// Apply every DDL statement to `conn`.
pub fn init_schema(conn: &Connection) -> ExportResult<()> {
    for stmt in SCHEMA_STATEMENTS {
        conn.execute_batch(stmt)?;
    }
    Ok(())
}
