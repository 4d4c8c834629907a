use crate::errors::ExportResult;
use crate::export::{ExportContext, ExportStep, StepSummary, StreamWriter};
use crate::models::{DumpKind, LinkRecord};

/// Exports the project's links. Platform-provided links are exported
/// without a name; the importing side derives it from the type.
pub struct ExportLinksStep;

impl ExportStep for ExportLinksStep {
    fn execute(&self, ctx: &mut ExportContext<'_>) -> ExportResult<StepSummary> {
        let config = ctx.config;
        let mut out = StreamWriter::new(&mut *ctx.writer, DumpKind::Links);

        ctx.db.scroll_links(ctx.project, |row| {
            let name = if config.is_provided_link(&row.link_type) {
                String::new()
            } else {
                row.name.unwrap_or_default()
            };
            out.write(LinkRecord {
                uuid: row.uuid,
                project_uuid: row.project_uuid,
                name,
                href: row.href,
                link_type: row.link_type,
            })
        })?;

        Ok(out.finish())
    }

    fn description(&self) -> &'static str {
        "Export links"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::MemoryDumpWriter;
    use crate::export::testing::Harness;
    use crate::store::fixtures::Fixture;

    #[test]
    fn provided_links_lose_their_name() {
        let mut h = Harness::p1();
        let summary = h.run(&ExportLinksStep).unwrap();

        assert_eq!(summary.to_string(), "2 links exported");
        let links = h.writer.links();
        assert_eq!(links[0].uuid, "L1");
        assert_eq!(links[0].link_type, "scm");
        assert_eq!(links[0].name, "");
        assert_eq!(links[1].uuid, "L2");
        assert_eq!(links[1].name, "homepage");
        assert_eq!(links[1].href, "https://example.com/L2");
    }

    #[test]
    fn links_of_other_projects_are_not_exported() {
        let mut h = Harness::p1();
        h.run(&ExportLinksStep).unwrap();
        assert!(h.writer.links().iter().all(|l| l.project_uuid == "P1"));

        let mut h2 = Harness::new(Fixture::two_projects(), "P2");
        h2.run(&ExportLinksStep).unwrap();
        let uuids: Vec<&str> = h2.writer.links().iter().map(|l| l.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["L3"]);
    }

    #[test]
    fn custom_link_without_name_exports_empty_name() {
        let fx = Fixture::new();
        fx.project("P1", "p1");
        fx.link("L1", "P1", "custom", None);
        let mut h = Harness::new(fx, "P1");

        h.run(&ExportLinksStep).unwrap();
        assert_eq!(h.writer.links()[0].name, "");
    }

    #[test]
    fn no_links() {
        let fx = Fixture::new();
        fx.project("P1", "p1");
        let mut h = Harness::new(fx, "P1");

        assert_eq!(h.run(&ExportLinksStep).unwrap().to_string(), "0 links exported");
    }

    #[test]
    fn write_failure_reports_links_written_so_far() {
        let mut h = Harness::p1().with_writer(MemoryDumpWriter::new().fail_on(DumpKind::Links, 1));

        let err = h.run(&ExportLinksStep).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Link Export failed after processing 0 links successfully"
        );
    }
}
