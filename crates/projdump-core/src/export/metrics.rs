use crate::errors::ExportResult;
use crate::export::{ExportContext, ExportStep, StepSummary, StreamWriter};
use crate::models::{DumpKind, MetricRecord};

/// Exports the metrics registered by earlier steps, and only those. Must run
/// after every step that can reference a metric.
pub struct ExportMetricsStep;

impl ExportStep for ExportMetricsStep {
    fn execute(&self, ctx: &mut ExportContext<'_>) -> ExportResult<StepSummary> {
        let refs = ctx.metrics.get_ref_by_uuid();
        let mut out = StreamWriter::new(&mut *ctx.writer, DumpKind::Metrics);

        ctx.db.scroll_metrics(|row| match refs.get(&row.uuid) {
            Some(&metric_ref) => out.write(MetricRecord {
                metric_ref,
                key: row.key,
                name: row.short_name,
            }),
            None => Ok(()),
        })?;

        Ok(out.finish())
    }

    fn description(&self) -> &'static str {
        "Export metrics"
    }
}
