use crate::errors::ExportResult;
use crate::export::{ExportContext, ExportStep, StepSummary, StreamWriter};
use crate::models::{DumpKind, SettingRecord};

/// Exports the project's own settings, minus the environment specific keys
/// listed in the configuration.
pub struct ExportSettingsStep;

impl ExportStep for ExportSettingsStep {
    fn execute(&self, ctx: &mut ExportContext<'_>) -> ExportResult<StepSummary> {
        let config = ctx.config;
        let mut out = StreamWriter::new(&mut *ctx.writer, DumpKind::Settings);

        ctx.db.scroll_settings(ctx.project, |row| {
            if config.is_ignored_setting(&row.key) {
                return Ok(());
            }
            out.write(SettingRecord {
                key: row.key,
                value: row.value.unwrap_or_default(),
            })
        })?;

        Ok(out.finish())
    }

    fn description(&self) -> &'static str {
        "Export settings"
    }
}
