//! Capability model descriptors and their registry.
//!
//! A capability model names an interface a task can offer (a data source);
//! a device model specializes one to a physical or logical device. Models
//! form an inheritance DAG and are registered once per name.

mod capability;
mod registry;

pub use capability::{CapabilityModel, ModelId, ModelKind, ModelRef, Provides};
pub use registry::ModelRegistry;
