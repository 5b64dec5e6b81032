//! Slot declarations and their paths.

mod path;

use crate::model::ModelId;

pub use path::SlotPath;

/// A named, possibly nested slot declared on a task model.
///
/// Declarations are immutable once made and are shared (not copied) with
/// subclasses through the task-model parent chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDeclaration {
    pub(crate) path: SlotPath,
    pub(crate) model: ModelId,
    pub(crate) slave_of: Option<SlotPath>,
}

impl SlotDeclaration {
    /// The full path of the slot within the task model.
    #[must_use]
    pub fn path(&self) -> &SlotPath {
        &self.path
    }

    /// The capability model the slot is bound to.
    #[must_use]
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// The parent slot this one is a slave of, if any.
    #[must_use]
    pub fn slave_of(&self) -> Option<&SlotPath> {
        self.slave_of.as_ref()
    }

    /// True when the slot sits at the root of the slot tree.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.slave_of.is_none()
    }
}
