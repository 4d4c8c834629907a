use crate::errors::ExportResult;
use crate::export::{ExportContext, ExportStep, StepSummary, StreamWriter};
use crate::models::{DumpKind, NewCodePeriodRecord};

/// Exports the project-level new code period and the overrides of branches
/// that are excluded from purge. Overrides of purgeable branches are dropped.
pub struct ExportNewCodePeriodsStep;

impl ExportStep for ExportNewCodePeriodsStep {
    fn execute(&self, ctx: &mut ExportContext<'_>) -> ExportResult<StepSummary> {
        let project = ctx.project;
        let mut out = StreamWriter::new(&mut *ctx.writer, DumpKind::NewCodePeriods);

        ctx.db.scroll_new_code_periods(project, |row| {
            let keep = match row.branch_uuid.as_deref() {
                None => true,
                Some(branch_uuid) => project
                    .branch(branch_uuid)
                    .is_some_and(|b| b.excluded_from_purge),
            };
            if !keep {
                return Ok(());
            }
            out.write(NewCodePeriodRecord {
                uuid: row.uuid,
                project_uuid: row.project_uuid,
                branch_uuid: row.branch_uuid,
                period_type: row.period_type,
                value: row.value,
            })
        })?;

        Ok(out.finish())
    }

    fn description(&self) -> &'static str {
        "Export new code periods"
    }
}
