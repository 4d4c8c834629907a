//! Sequential driver for the export steps.

use crate::config::ExportConfig;
use crate::dump::DumpWriter;
use crate::errors::ExportResult;
use crate::export::{
    register_components, ExportContext, ExportEventsStep, ExportLinksStep, ExportMeasuresStep,
    ExportMetricsStep, ExportNewCodePeriodsStep, ExportSettingsStep, ExportStep, StepSummary,
};
use crate::repository::{ComponentRepository, MutableMetricRepository};
use crate::store::Database;

/// Outcome of one completed step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub description: &'static str,
    pub summary: StepSummary,
}

/// Outcome of a completed export run, in step order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub steps: Vec<StepReport>,
}

impl ExportReport {
    pub fn total(&self) -> u64 {
        self.steps.iter().map(|s| s.summary.count).sum()
    }
}

/// Ordered list of steps run one after the other against a shared context.
pub struct ExportPipeline {
    steps: Vec<Box<dyn ExportStep>>,
}

impl ExportPipeline {
    pub fn new(steps: Vec<Box<dyn ExportStep>>) -> Self {
        Self { steps }
    }

    /// The six project steps. Metrics comes after measures so every metric a
    /// measure references is registered by then.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(ExportEventsStep),
            Box::new(ExportLinksStep),
            Box::new(ExportMeasuresStep),
            Box::new(ExportMetricsStep),
            Box::new(ExportSettingsStep),
            Box::new(ExportNewCodePeriodsStep),
        ])
    }

    pub fn descriptions(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.description()).collect()
    }

    /// Run every step to completion in order, stopping at the first error.
    pub fn run(&self, ctx: &mut ExportContext<'_>) -> ExportResult<ExportReport> {
        tracing::info!(
            project = ctx.project.key(),
            steps = self.steps.len(),
            "project export started"
        );
        let mut report = ExportReport::default();
        for step in &self.steps {
            let span = tracing::info_span!("export_step", step = step.description());
            let _entered = span.enter();
            let summary = step.execute(ctx)?;
            report.steps.push(StepReport {
                description: step.description(),
                summary,
            });
        }
        tracing::info!(
            project = ctx.project.key(),
            records = report.total(),
            "project export finished"
        );
        Ok(report)
    }
}

/// Export one project: load it, register its components, and run the
/// standard pipeline with a fresh metric repository.
pub fn export_project(
    db: &Database,
    project_uuid: &str,
    config: &ExportConfig,
    writer: &mut dyn DumpWriter,
) -> ExportResult<ExportReport> {
    let project = db.load_project(project_uuid)?;
    let mut components = ComponentRepository::new();
    register_components(db, &project, &mut components)?;
    let mut metrics = MutableMetricRepository::new();

    let mut ctx = ExportContext {
        db,
        project: &project,
        config,
        components: &components,
        metrics: &mut metrics,
        writer,
    };
    ExportPipeline::standard().run(&mut ctx)
}
