//! Lazily populated registry of the metrics referenced by exported data.

use indexmap::IndexMap;

/// Assigns dense references to metric uuids the first time a step sees them.
///
/// The metrics step exports exactly the uuids present here, so a metric that
/// no exported record points at never reaches the dump.
#[derive(Debug, Default)]
pub struct MutableMetricRepository {
    ref_by_uuid: IndexMap<String, u32>,
}

impl MutableMetricRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the reference of `uuid`, assigning the next one if unseen.
    pub fn add(&mut self, uuid: &str) -> u32 {
        if let Some(&reference) = self.ref_by_uuid.get(uuid) {
            return reference;
        }
        let reference = self.ref_by_uuid.len() as u32;
        self.ref_by_uuid.insert(uuid.to_string(), reference);
        reference
    }

    /// Current uuid to reference mapping, in assignment order.
    pub fn get_ref_by_uuid(&self) -> &IndexMap<String, u32> {
        &self.ref_by_uuid
    }

    pub fn len(&self) -> usize {
        self.ref_by_uuid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ref_by_uuid.is_empty()
    }
}
