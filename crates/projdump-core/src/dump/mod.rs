//! Append-only dump sinks, one logical stream per record kind.

pub mod file;
pub mod memory;

pub use file::FileDumpWriter;
pub use memory::MemoryDumpWriter;

use crate::errors::WriteError;
use crate::models::{DumpKind, DumpRecord};

/// Sink receiving the records produced by an export run.
///
/// Records already accepted stay in the dump when a later write fails; there
/// is no rollback.
pub trait DumpWriter {
    /// Append `record` to the stream of its kind.
    fn write(&mut self, record: DumpRecord) -> Result<(), WriteError>;

    /// Number of records successfully written to the stream of `kind`.
    fn written(&self, kind: DumpKind) -> u64;
}
