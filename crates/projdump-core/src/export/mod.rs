//! Export steps and the pipeline driving them.
//!
//! Every step reads one record kind from the store, filters and transforms
//! it, and streams the result into the dump writer. The steps share one
//! [`ExportContext`] for the whole run; nothing in it is global.

pub mod components;
pub mod events;
pub mod links;
pub mod measures;
pub mod metrics;
pub mod new_code_periods;
pub mod pipeline;
pub mod settings;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;

use crate::config::ExportConfig;
use crate::dump::DumpWriter;
use crate::errors::{ExportError, ExportResult};
use crate::models::{DumpKind, DumpRecord};
use crate::project::ProjectHolder;
use crate::repository::{ComponentRepository, MutableMetricRepository};
use crate::store::Database;

pub use components::register_components;
pub use events::ExportEventsStep;
pub use links::ExportLinksStep;
pub use measures::ExportMeasuresStep;
pub use metrics::ExportMetricsStep;
pub use new_code_periods::ExportNewCodePeriodsStep;
pub use pipeline::{export_project, ExportPipeline, ExportReport, StepReport};
pub use settings::ExportSettingsStep;

/// State shared by all steps of one export run.
///
/// `components` is complete before the first step runs; `metrics` grows as
/// steps discover referenced metrics.
pub struct ExportContext<'a> {
    pub db: &'a Database,
    pub project: &'a ProjectHolder,
    pub config: &'a ExportConfig,
    pub components: &'a ComponentRepository,
    pub metrics: &'a mut MutableMetricRepository,
    pub writer: &'a mut dyn DumpWriter,
}

/// One unit of the export pipeline, responsible for a single record kind.
pub trait ExportStep {
    fn execute(&self, ctx: &mut ExportContext<'_>) -> ExportResult<StepSummary>;

    /// Fixed label reported to job progress tracking.
    fn description(&self) -> &'static str;
}

/// Number of records a step exported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepSummary {
    pub kind: DumpKind,
    pub count: u64,
}

impl fmt::Display for StepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} exported", self.count, self.kind.plural())
    }
}

/// Counts successful writes to one stream and turns the first write failure
/// into [`ExportError::StepFailed`] carrying that count.
pub(crate) struct StreamWriter<'w, W: DumpWriter + ?Sized> {
    writer: &'w mut W,
    kind: DumpKind,
    count: u64,
}

impl<'w, W: DumpWriter + ?Sized> StreamWriter<'w, W> {
    pub(crate) fn new(writer: &'w mut W, kind: DumpKind) -> Self {
        Self {
            writer,
            kind,
            count: 0,
        }
    }

    pub(crate) fn write(&mut self, record: impl Into<DumpRecord>) -> ExportResult<()> {
        let record = record.into();
        debug_assert_eq!(record.kind(), self.kind);
        self.writer
            .write(record)
            .map_err(|source| ExportError::StepFailed {
                kind: self.kind,
                processed: self.count,
                source,
            })?;
        self.count += 1;
        Ok(())
    }

    /// Log the summary line and return it.
    pub(crate) fn finish(self) -> StepSummary {
        let summary = StepSummary {
            kind: self.kind,
            count: self.count,
        };
        tracing::debug!("{summary}");
        summary
    }
}
