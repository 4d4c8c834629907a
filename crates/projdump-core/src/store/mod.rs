pub mod database;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod schema;

pub use database::Database;
