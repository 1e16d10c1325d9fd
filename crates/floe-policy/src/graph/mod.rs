//! Model dependency graph: arena storage, manifest loading, cycle
//! detection, and lazily memoized downstream impact.

pub mod cycles;
pub mod impact;
pub mod manifest;
pub mod model;
pub mod types;

pub use cycles::{find_cycles, Cycle};
pub use manifest::{load_graph, GraphDocument};
pub use model::{GraphModel, GraphModelBuilder};
pub use types::{ColumnSpec, ModelId, ModelNode, SourceRef, TestRef};
