//! Write-once registry of the components in scope for an export run.

use std::collections::HashMap;

use crate::errors::{ExportError, ExportResult};

#[derive(Clone, Copy, Debug)]
struct Registration {
    reference: u32,
    enabled: bool,
}

/// Maps component uuids to the integer references stored in the dump.
///
/// Populated once before any export step runs and only read afterwards.
#[derive(Debug, Default)]
pub struct ComponentRepository {
    by_uuid: HashMap<String, Registration>,
}

impl ComponentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `reference` for `uuid`. Callers assign references densely in
    /// registration order; registering a uuid twice is not supported.
    pub fn register(&mut self, reference: u32, uuid: impl Into<String>, enabled: bool) {
        self.by_uuid
            .insert(uuid.into(), Registration { reference, enabled });
    }

    /// Reference previously assigned to `uuid`.
    pub fn get_ref(&self, uuid: &str) -> ExportResult<u32> {
        self.by_uuid
            .get(uuid)
            .map(|r| r.reference)
            .ok_or_else(|| ExportError::UnknownComponent(uuid.to_string()))
    }

    pub fn is_enabled(&self, uuid: &str) -> ExportResult<bool> {
        self.by_uuid
            .get(uuid)
            .map(|r| r.enabled)
            .ok_or_else(|| ExportError::UnknownComponent(uuid.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_uuid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uuid.is_empty()
    }
}
