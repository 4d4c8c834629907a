//! Read-only SQLite data-access layer used by the export steps.
//!
//! Each `scroll_*` query is scoped to one project and streams rows into a
//! visitor one at a time, so a table with millions of rows is never
//! materialised. Rows come back in insertion order; steps never re-sort.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Params, Row};

use crate::errors::{ExportError, ExportResult};
use crate::models::{
    AnalysisStatus, ComponentRow, EventRow, LinkRow, MeasureRow, MetricRow, NewCodePeriodRow,
    PropertyRow,
};
use crate::project::{Branch, BranchType, ProjectHolder};
use crate::store::schema;

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

const EVENTS_SQL: &str = "\
    SELECT e.uuid, e.analysis_uuid, e.component_uuid, e.name, e.category, \
           e.description, e.event_data, e.event_date, e.created_at \
    FROM events e \
    JOIN snapshots s ON s.uuid = e.analysis_uuid \
    JOIN project_branches pb ON pb.uuid = s.root_component_uuid \
    WHERE pb.project_uuid = ?1 \
    ORDER BY e.rowid;";

const LINKS_SQL: &str = "\
    SELECT uuid, project_uuid, link_type, name, href \
    FROM project_links \
    WHERE project_uuid = ?1 \
    ORDER BY rowid;";

const MEASURES_SQL: &str = "\
    SELECT pm.analysis_uuid, s.status, pm.component_uuid, pm.metric_uuid, \
           m.name, m.enabled, pm.value, pm.text_value, pm.alert_status, pm.alert_text \
    FROM project_measures pm \
    JOIN snapshots s ON s.uuid = pm.analysis_uuid \
    JOIN project_branches pb ON pb.uuid = s.root_component_uuid \
    JOIN metrics m ON m.uuid = pm.metric_uuid \
    WHERE pb.project_uuid = ?1 \
    ORDER BY pm.rowid;";

const METRICS_SQL: &str = "\
    SELECT uuid, name, short_name, enabled \
    FROM metrics \
    ORDER BY rowid;";

// Project-level properties only: global rows have no entity, user rows
// carry a user uuid.
const SETTINGS_SQL: &str = "\
    SELECT prop_key, text_value \
    FROM properties \
    WHERE entity_uuid = ?1 AND user_uuid IS NULL \
    ORDER BY rowid;";

const NEW_CODE_PERIODS_SQL: &str = "\
    SELECT uuid, project_uuid, branch_uuid, period_type, value \
    FROM new_code_periods \
    WHERE project_uuid = ?1 \
    ORDER BY rowid;";

const COMPONENTS_SQL: &str = "\
    SELECT c.uuid, c.kee, c.enabled \
    FROM components c \
    JOIN project_branches pb ON pb.uuid = c.branch_uuid \
    WHERE pb.project_uuid = ?1 \
    ORDER BY c.rowid;";

// ---------------------------------------------------------------------------
// Row mappers
// ---------------------------------------------------------------------------

fn event_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        uuid: row.get(0)?,
        analysis_uuid: row.get(1)?,
        component_uuid: row.get(2)?,
        name: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        data: row.get(6)?,
        event_date: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn link_row(row: &Row<'_>) -> rusqlite::Result<LinkRow> {
    Ok(LinkRow {
        uuid: row.get(0)?,
        project_uuid: row.get(1)?,
        link_type: row.get(2)?,
        name: row.get(3)?,
        href: row.get(4)?,
    })
}

fn measure_row(row: &Row<'_>) -> rusqlite::Result<MeasureRow> {
    let status: String = row.get(1)?;
    Ok(MeasureRow {
        analysis_uuid: row.get(0)?,
        analysis_status: AnalysisStatus::from_code(&status),
        component_uuid: row.get(2)?,
        metric_uuid: row.get(3)?,
        metric_key: row.get(4)?,
        metric_enabled: row.get(5)?,
        value: row.get(6)?,
        text_value: row.get(7)?,
        alert_status: row.get(8)?,
        alert_text: row.get(9)?,
    })
}

fn metric_row(row: &Row<'_>) -> rusqlite::Result<MetricRow> {
    Ok(MetricRow {
        uuid: row.get(0)?,
        key: row.get(1)?,
        short_name: row.get(2)?,
        enabled: row.get(3)?,
    })
}

fn property_row(row: &Row<'_>) -> rusqlite::Result<PropertyRow> {
    Ok(PropertyRow {
        key: row.get(0)?,
        value: row.get(1)?,
    })
}

fn new_code_period_row(row: &Row<'_>) -> rusqlite::Result<NewCodePeriodRow> {
    Ok(NewCodePeriodRow {
        uuid: row.get(0)?,
        project_uuid: row.get(1)?,
        branch_uuid: row.get(2)?,
        period_type: row.get(3)?,
        value: row.get(4)?,
    })
}

fn component_row(row: &Row<'_>) -> rusqlite::Result<ComponentRow> {
    Ok(ComponentRow {
        uuid: row.get(0)?,
        key: row.get(1)?,
        enabled: row.get(2)?,
    })
}

// ---------------------------------------------------------------------------
// Database
// ---------------------------------------------------------------------------

/// Relational snapshot the export engine reads from.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the SQLite database at `path`.
    pub fn open(path: impl AsRef<Path>) -> ExportResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> ExportResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Create every table and index the engine reads.
    pub fn init_schema(&self) -> ExportResult<()> {
        schema::init_schema(&self.conn)
    }

    /// Raw connection, for seeding data outside an export run.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Stream every row of `sql` through `map` into `visit`, stopping at the
    /// first error from either side.
    fn scroll<T, P, M, F>(&self, sql: &str, params: P, map: M, mut visit: F) -> ExportResult<()>
    where
        P: Params,
        M: Fn(&Row<'_>) -> rusqlite::Result<T>,
        F: FnMut(T) -> ExportResult<()>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        while let Some(row) = rows.next()? {
            visit(map(row)?)?;
        }
        Ok(())
    }

    // -- project context -----------------------------------------------------

    /// Load the project row and its branches.
    pub fn load_project(&self, project_uuid: &str) -> ExportResult<ProjectHolder> {
        let project = self
            .conn
            .query_row(
                "SELECT uuid, kee, name FROM projects WHERE uuid = ?1;",
                params![project_uuid],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;
        let (uuid, key, name) =
            project.ok_or_else(|| ExportError::ProjectNotFound(project_uuid.to_string()))?;

        let mut branches = Vec::new();
        self.scroll(
            "SELECT uuid, kee, branch_type, merge_branch_uuid, exclude_from_purge \
             FROM project_branches WHERE project_uuid = ?1 ORDER BY rowid;",
            params![project_uuid],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, bool>(4)?,
                ))
            },
            |(uuid, key, type_code, merge_branch_uuid, excluded_from_purge)| {
                let branch_type = BranchType::from_code(&type_code).ok_or_else(|| {
                    ExportError::Database(format!(
                        "branch {uuid} has unknown type {type_code:?}"
                    ))
                })?;
                branches.push(Branch {
                    uuid,
                    key,
                    branch_type,
                    merge_branch_uuid,
                    excluded_from_purge,
                });
                Ok(())
            },
        )?;

        Ok(ProjectHolder::new(uuid, key, name, branches))
    }

    // -- scoped scrolls ------------------------------------------------------

    /// Components of every branch of the project.
    pub fn scroll_components<F>(&self, project: &ProjectHolder, visit: F) -> ExportResult<()>
    where
        F: FnMut(ComponentRow) -> ExportResult<()>,
    {
        self.scroll(COMPONENTS_SQL, params![project.uuid()], component_row, visit)
    }

    /// Events of any analysis of any branch of the project.
    pub fn scroll_events<F>(&self, project: &ProjectHolder, visit: F) -> ExportResult<()>
    where
        F: FnMut(EventRow) -> ExportResult<()>,
    {
        self.scroll(EVENTS_SQL, params![project.uuid()], event_row, visit)
    }

    pub fn scroll_links<F>(&self, project: &ProjectHolder, visit: F) -> ExportResult<()>
    where
        F: FnMut(LinkRow) -> ExportResult<()>,
    {
        self.scroll(LINKS_SQL, params![project.uuid()], link_row, visit)
    }

    /// Measures of any analysis of the project, whatever the analysis status
    /// or metric state. Filtering is left to the caller.
    pub fn scroll_measures<F>(&self, project: &ProjectHolder, visit: F) -> ExportResult<()>
    where
        F: FnMut(MeasureRow) -> ExportResult<()>,
    {
        self.scroll(MEASURES_SQL, params![project.uuid()], measure_row, visit)
    }

    pub fn scroll_metrics<F>(&self, visit: F) -> ExportResult<()>
    where
        F: FnMut(MetricRow) -> ExportResult<()>,
    {
        self.scroll(METRICS_SQL, [], metric_row, visit)
    }

    pub fn scroll_settings<F>(&self, project: &ProjectHolder, visit: F) -> ExportResult<()>
    where
        F: FnMut(PropertyRow) -> ExportResult<()>,
    {
        self.scroll(SETTINGS_SQL, params![project.uuid()], property_row, visit)
    }

    /// Project-level and branch-level new code periods of the project.
    pub fn scroll_new_code_periods<F>(&self, project: &ProjectHolder, visit: F) -> ExportResult<()>
    where
        F: FnMut(NewCodePeriodRow) -> ExportResult<()>,
    {
        self.scroll(
            NEW_CODE_PERIODS_SQL,
            params![project.uuid()],
            new_code_period_row,
            visit,
        )
    }
}
