//! Test harness running steps against a seeded in-memory store.

use crate::config::ExportConfig;
use crate::dump::MemoryDumpWriter;
use crate::errors::ExportResult;
use crate::export::{register_components, ExportContext, ExportStep, StepSummary};
use crate::project::ProjectHolder;
use crate::repository::{ComponentRepository, MutableMetricRepository};
use crate::store::fixtures::Fixture;

pub(crate) struct Harness {
    pub fx: Fixture,
    pub project: ProjectHolder,
    pub config: ExportConfig,
    pub components: ComponentRepository,
    pub metrics: MutableMetricRepository,
    pub writer: MemoryDumpWriter,
}

impl Harness {
    /// Load `project_uuid` from `fx` and register its components.
    pub fn new(fx: Fixture, project_uuid: &str) -> Self {
        let project = fx.db.load_project(project_uuid).unwrap();
        let mut components = ComponentRepository::new();
        register_components(&fx.db, &project, &mut components).unwrap();
        Self {
            fx,
            project,
            config: ExportConfig::default(),
            components,
            metrics: MutableMetricRepository::new(),
            writer: MemoryDumpWriter::new(),
        }
    }

    /// Harness over the two-project fixture, exporting `P1`.
    pub fn p1() -> Self {
        Self::new(Fixture::two_projects(), "P1")
    }

    pub fn with_writer(mut self, writer: MemoryDumpWriter) -> Self {
        self.writer = writer;
        self
    }

    pub fn run(&mut self, step: &dyn ExportStep) -> ExportResult<StepSummary> {
        let mut ctx = ExportContext {
            db: &self.fx.db,
            project: &self.project,
            config: &self.config,
            components: &self.components,
            metrics: &mut self.metrics,
            writer: &mut self.writer,
        };
        step.execute(&mut ctx)
    }
}
