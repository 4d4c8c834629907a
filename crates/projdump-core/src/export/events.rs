use crate::errors::ExportResult;
use crate::export::{ExportContext, ExportStep, StepSummary, StreamWriter};
use crate::models::{DumpKind, EventRecord};

/// Exports every event of every analysis of the project, whatever the
/// analysis status.
///
/// Events are selected by project, not by the registered component set, so
/// every component of the project must be registered before this step runs.
/// An event on an unregistered component fails the step with
/// [`ExportError::UnknownComponent`](crate::errors::ExportError::UnknownComponent).
pub struct ExportEventsStep;

impl ExportStep for ExportEventsStep {
    fn execute(&self, ctx: &mut ExportContext<'_>) -> ExportResult<StepSummary> {
        let components = ctx.components;
        let mut out = StreamWriter::new(&mut *ctx.writer, DumpKind::Events);

        ctx.db.scroll_events(ctx.project, |row| {
            let component_ref = components.get_ref(&row.component_uuid)?;
            out.write(EventRecord {
                uuid: row.uuid,
                analysis_uuid: row.analysis_uuid,
                component_ref,
                name: row.name.unwrap_or_default(),
                category: row.category.unwrap_or_default(),
                description: row.description,
                data: row.data,
                date: row.event_date,
                created_at: row.created_at,
            })
        })?;

        Ok(out.finish())
    }

    fn description(&self) -> &'static str {
        "Export events"
    }
}
