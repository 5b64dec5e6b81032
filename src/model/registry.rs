//! Process catalogue of capability and device models.
//!
//! The registry is a plain value, passed by reference through the plan
//! construction context. It is append-only: re-declaring an existing,
//! compatible name returns the cached model. Parents must already be
//! registered when a model is declared, which keeps the inheritance DAG
//! acyclic by construction.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::model::capability::{CapabilityModel, ModelId, ModelKind, ModelRef, Provides};

/// Catalogue of capability models, keyed by exact name.
///
/// Data sources and devices live in separate namespaces; the same bare
/// name may denote both (the default device case), and the two are then
/// distinct models linked through `provides`.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: Vec<CapabilityModel>,
    sources: BTreeMap<String, ModelId>,
    devices: BTreeMap<String, ModelId>,
    /// Data-source names permanently blocked by a `provides: none` device.
    reserved: BTreeSet<String>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares (or retrieves) the data-source model `name`.
    ///
    /// Idempotent: if `name` is already registered and its lineage fulfills
    /// the requested `parent`, the cached model is returned. Declaring a
    /// data source whose name matches a device waiting for auto-linkage
    /// attaches this model as that device's provided source.
    ///
    /// # Errors
    ///
    /// `Error::ReservedSourceName` if a device claimed the name with
    /// `provides: none`; `Error::UnknownModel` if `parent` names nothing;
    /// `Error::IncompatibleModel` if `name` exists with an incompatible
    /// lineage.
    pub fn declare_data_source(
        &mut self,
        name: &str,
        parent: Option<ModelRef<'_>>,
    ) -> Result<ModelId> {
        let parent_id = match parent {
            Some(r) => Some(self.resolve_source(r)?),
            None => None,
        };

        if let Some(&existing) = self.sources.get(name) {
            if let Some(parent_id) = parent_id {
                if !self.fulfills(existing, parent_id) {
                    return Err(Error::IncompatibleModel {
                        name: name.to_string(),
                        parent: self.get(parent_id).name().to_string(),
                    });
                }
            }
            return Ok(existing);
        }
        if self.reserved.contains(name) {
            return Err(Error::ReservedSourceName(name.to_string()));
        }

        let mut fulfilled = match parent_id {
            Some(p) => self.get(p).fulfilled.clone(),
            None => BTreeSet::new(),
        };
        let id = ModelId(self.models.len());
        fulfilled.insert(id);
        self.models.push(CapabilityModel {
            name: name.to_string(),
            kind: ModelKind::DataSource,
            parent: parent_id,
            fulfilled,
        });
        self.sources.insert(name.to_string(), id);
        self.attach_pending_device(name, id);
        Ok(id)
    }

    /// Declares (or retrieves) the device model `name`.
    ///
    /// The `provides` policy controls linkage to a data-source model; see
    /// [`Provides`]. `Provides::None` permanently reserves the bare name
    /// in the data-source namespace.
    ///
    /// # Errors
    ///
    /// `Error::UnknownModel` if an explicit `provides` source names
    /// nothing; `Error::IncompatibleModel` if `name` exists with an
    /// incompatible linkage.
    pub fn declare_device(&mut self, name: &str, provides: Provides<'_>) -> Result<ModelId> {
        if let Some(&existing) = self.devices.get(name) {
            return self.check_device_redeclaration(existing, provides);
        }

        let (provides_id, auto_pending) = match provides {
            Provides::Auto => {
                let source = self.sources.get(name).copied();
                (source, source.is_none())
            }
            Provides::None => {
                // Reserving is only meaningful while no such source exists;
                // an already-registered one stays valid.
                if !self.sources.contains_key(name) {
                    self.reserved.insert(name.to_string());
                }
                (None, false)
            }
            Provides::Source(r) => (Some(self.resolve_source(r)?), false),
        };

        let mut fulfilled = match provides_id {
            Some(p) => self.get(p).fulfilled.clone(),
            None => BTreeSet::new(),
        };
        let id = ModelId(self.models.len());
        fulfilled.insert(id);
        self.models.push(CapabilityModel {
            name: name.to_string(),
            kind: ModelKind::Device { provides: provides_id, auto_pending },
            parent: provides_id,
            fulfilled,
        });
        self.devices.insert(name.to_string(), id);
        Ok(id)
    }

    /// Looks up the data-source model registered under `name`.
    #[must_use]
    pub fn data_source(&self, name: &str) -> Option<ModelId> {
        self.sources.get(name).copied()
    }

    /// Looks up the device model registered under `name`.
    #[must_use]
    pub fn device(&self, name: &str) -> Option<ModelId> {
        self.devices.get(name).copied()
    }

    /// Looks up `name` in the data-source namespace, then the device
    /// namespace.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ModelId> {
        self.data_source(name).or_else(|| self.device(name))
    }

    /// The model record behind an id.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this registry.
    #[must_use]
    pub fn get(&self, id: ModelId) -> &CapabilityModel {
        &self.models[id.0]
    }

    /// True iff model `a` fulfills model `b`: `b` is `a` itself or a
    /// transitive parent (inheritance or provides link) of `a`.
    #[must_use]
    pub fn fulfills(&self, a: ModelId, b: ModelId) -> bool {
        self.get(a).fulfilled.contains(&b)
    }

    /// The full set of models `id` fulfills, itself included.
    #[must_use]
    pub fn fulfilled_set(&self, id: ModelId) -> &BTreeSet<ModelId> {
        &self.get(id).fulfilled
    }

    /// All registered data-source models, in name order.
    pub fn each_data_source(&self) -> impl Iterator<Item = (&str, ModelId)> {
        self.sources.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// All registered device models, in name order.
    pub fn each_device(&self) -> impl Iterator<Item = (&str, ModelId)> {
        self.devices.iter().map(|(name, id)| (name.as_str(), *id))
    }

    fn resolve_source(&self, r: ModelRef<'_>) -> Result<ModelId> {
        match r {
            ModelRef::Id(id) => Ok(id),
            ModelRef::Name(name) => {
                self.lookup(name).ok_or_else(|| Error::UnknownModel(name.to_string()))
            }
        }
    }

    /// Completes the lazy `provides` linkage of a device whose bare name
    /// just got a data-source model.
    fn attach_pending_device(&mut self, name: &str, source: ModelId) {
        let Some(&device) = self.devices.get(name) else { return };
        let ModelKind::Device { provides: None, auto_pending: true } = self.models[device.0].kind
        else {
            return;
        };
        let inherited = self.get(source).fulfilled.clone();
        let model = &mut self.models[device.0];
        model.kind = ModelKind::Device { provides: Some(source), auto_pending: false };
        model.parent = Some(source);
        model.fulfilled.extend(inherited);
    }

    fn check_device_redeclaration(
        &self,
        existing: ModelId,
        provides: Provides<'_>,
    ) -> Result<ModelId> {
        match provides {
            Provides::Auto => Ok(existing),
            Provides::None => {
                if self.get(existing).provides().is_some() {
                    return Err(Error::IncompatibleModel {
                        name: self.get(existing).name().to_string(),
                        parent: "none".to_string(),
                    });
                }
                Ok(existing)
            }
            Provides::Source(r) => {
                let wanted = self.resolve_source(r)?;
                if !self.fulfills(existing, wanted) {
                    return Err(Error::IncompatibleModel {
                        name: self.get(existing).name().to_string(),
                        parent: self.get(wanted).name().to_string(),
                    });
                }
                Ok(existing)
            }
        }
    }
}
