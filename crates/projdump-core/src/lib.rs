//! Project dump export engine.
//!
//! Serializes the state of one project (events, links, measures, metrics,
//! settings and new code periods) from a relational store into a dump made
//! of one append-only stream per record kind. Components and metrics are
//! referenced by dense integer references instead of uuids; components are
//! registered up front, metrics lazily as measures reference them.
//!
//! ```no_run
//! use projdump_core::config::ExportConfig;
//! use projdump_core::dump::FileDumpWriter;
//! use projdump_core::export::export_project;
//! use projdump_core::store::Database;
//!
//! # fn main() -> projdump_core::errors::ExportResult<()> {
//! let db = Database::open("snapshot.db")?;
//! let config = ExportConfig::load(None)?;
//! let mut writer = FileDumpWriter::create("dump/")?;
//! let report = export_project(&db, "AYz1-project-uuid", &config, &mut writer)?;
//! writer.finish("my-project")?;
//! println!("{} records exported", report.total());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dump;
pub mod errors;
pub mod export;
pub mod models;
pub mod project;
pub mod repository;
pub mod store;

pub use errors::{ExportError, ExportResult};
