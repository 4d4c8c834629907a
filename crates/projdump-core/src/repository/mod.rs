//! Run-scoped registries mapping stable uuids to dense dump references.

pub mod component;
pub mod metric;

pub use component::ComponentRepository;
pub use metric::MutableMetricRepository;
