//! Component registration, run once before any export step.

use crate::errors::ExportResult;
use crate::project::ProjectHolder;
use crate::repository::ComponentRepository;
use crate::store::Database;

/// Register the project itself as reference 0, then every component of its
/// branches in cursor order. Returns the number of registrations.
pub fn register_components(
    db: &Database,
    project: &ProjectHolder,
    repository: &mut ComponentRepository,
) -> ExportResult<u32> {
    let mut sequence: u32 = 0;
    repository.register(sequence, project.uuid(), true);
    sequence += 1;

    db.scroll_components(project, |row| {
        if row.uuid != project.uuid() {
            repository.register(sequence, row.uuid, row.enabled);
            sequence += 1;
        }
        Ok(())
    })?;

    tracing::debug!(project = project.key(), count = sequence, "components registered");
    Ok(sequence)
}
