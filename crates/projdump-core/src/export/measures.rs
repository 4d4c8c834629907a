use crate::errors::ExportResult;
use crate::export::{ExportContext, ExportStep, StepSummary, StreamWriter};
use crate::models::{AnalysisStatus, DumpKind, MeasureRecord};

/// Exports measures of processed analyses whose metric is enabled, and
/// registers each such metric so the metrics step exports it later.
pub struct ExportMeasuresStep;

impl ExportStep for ExportMeasuresStep {
    fn execute(&self, ctx: &mut ExportContext<'_>) -> ExportResult<StepSummary> {
        let components = ctx.components;
        let config = ctx.config;
        let metrics = &mut *ctx.metrics;
        let mut out = StreamWriter::new(&mut *ctx.writer, DumpKind::Measures);

        ctx.db.scroll_measures(ctx.project, |row| {
            if row.analysis_status != AnalysisStatus::Processed || !row.metric_enabled {
                return Ok(());
            }
            let component_ref = components.get_ref(&row.component_uuid)?;
            let metric_ref = metrics.add(&row.metric_uuid);
            // New code metrics carry their value as a variation.
            let (value, variation) = if config.is_new_code_metric(&row.metric_key) {
                (None, row.value)
            } else {
                (row.value, None)
            };
            out.write(MeasureRecord {
                analysis_uuid: row.analysis_uuid,
                component_ref,
                metric_ref,
                text_value: row.text_value.unwrap_or_default(),
                value,
                variation,
                alert_status: row.alert_status.unwrap_or_default(),
                alert_text: row.alert_text.unwrap_or_default(),
            })
        })?;

        Ok(out.finish())
    }

    fn description(&self) -> &'static str {
        "Export measures"
    }
}
