//! Capability and device model descriptors.

use std::collections::BTreeSet;
use std::fmt;

/// Index of a capability model inside a [`crate::model::ModelRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelId(pub(crate) usize);

/// What kind of capability a model describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelKind {
    /// A plain data-source capability.
    DataSource,
    /// A device driver, optionally linked to the data-source model it
    /// provides.
    Device {
        /// The provided data-source model, once linked.
        provides: Option<ModelId>,
        /// Set while the device still waits for a same-named data source
        /// to be declared and auto-attached.
        auto_pending: bool,
    },
}

/// A named, inheritable descriptor of an interface a task can offer.
///
/// Models form an inheritance DAG through `parent` (and, for devices, the
/// `provides` link). The `fulfilled` set is the precomputed transitive
/// closure of every model this one fulfills, itself included, so that
/// fulfills checks are set membership rather than live graph traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityModel {
    pub(crate) name: String,
    pub(crate) kind: ModelKind,
    pub(crate) parent: Option<ModelId>,
    pub(crate) fulfilled: BTreeSet<ModelId>,
}

impl CapabilityModel {
    /// The globally unique model name within its namespace.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this model is a device driver.
    #[must_use]
    pub fn is_device(&self) -> bool {
        matches!(self.kind, ModelKind::Device { .. })
    }

    /// The direct parent model, if any.
    #[must_use]
    pub fn parent(&self) -> Option<ModelId> {
        self.parent
    }

    /// The data-source model this device provides, if linked.
    ///
    /// Always `None` for plain data-source models.
    #[must_use]
    pub fn provides(&self) -> Option<ModelId> {
        match self.kind {
            ModelKind::Device { provides, .. } => provides,
            ModelKind::DataSource => None,
        }
    }
}

impl fmt::Display for CapabilityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_device() {
            write!(f, "#<Device: {}>", self.name)
        } else {
            write!(f, "#<DataSource: {}>", self.name)
        }
    }
}

/// A capability model reference: either a registered name or an id.
///
/// Declaration calls accept both so callers can chain declarations without
/// holding on to ids.
#[derive(Debug, Clone, Copy)]
pub enum ModelRef<'a> {
    /// Look the model up by name.
    Name(&'a str),
    /// Use the model directly.
    Id(ModelId),
}

impl<'a> From<&'a str> for ModelRef<'a> {
    fn from(name: &'a str) -> Self {
        ModelRef::Name(name)
    }
}

impl From<ModelId> for ModelRef<'_> {
    fn from(id: ModelId) -> Self {
        ModelRef::Id(id)
    }
}

/// The `provides` policy of a device declaration.
#[derive(Debug, Clone, Copy, Default)]
pub enum Provides<'a> {
    /// Link to a same-named data-source model: immediately if one is
    /// registered, lazily when one is declared later.
    #[default]
    Auto,
    /// No linkage, ever. Permanently reserves the device's bare name in
    /// the data-source namespace.
    None,
    /// Link to an explicit data-source model.
    Source(ModelRef<'a>),
}
