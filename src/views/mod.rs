pub mod registry;

pub use registry::{View, ViewKind, ViewRegistry, ViewSnapshot, ViewUpdate};
