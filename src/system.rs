//! The plan-construction context: registry plus task models.
//!
//! `SystemModel` bundles the capability-model registry with the arena of
//! task models and owns every declaration and slot-table operation.
//! Passing it by reference (instead of consulting process-wide globals)
//! keeps tests isolated and the declaration phase explicit.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::model::{ModelId, ModelRef, ModelRegistry, Provides};
use crate::slots::{SlotDeclaration, SlotPath};

/// Index of a task model inside a [`SystemModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskModelId(usize);

/// A task model: a named class-like record carrying its own slot
/// declarations and the arguments synthesized from its root slots.
///
/// Inheritance is an explicit parent pointer; subclasses see every
/// ancestor slot without copying it.
#[derive(Debug)]
pub struct TaskModel {
    name: String,
    parent: Option<TaskModelId>,
    slots: Vec<SlotDeclaration>,
    arguments: Vec<String>,
}

impl TaskModel {
    /// The task model's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent task model, if any.
    #[must_use]
    pub fn parent(&self) -> Option<TaskModelId> {
        self.parent
    }
}

/// Registry of capability models plus the task models declared against
/// them. All slot-table operations live here.
#[derive(Debug, Default)]
pub struct SystemModel {
    registry: ModelRegistry,
    tasks: Vec<TaskModel>,
    task_names: BTreeMap<String, TaskModelId>,
    /// Lazily created base task model per capability model.
    base_tasks: BTreeMap<ModelId, TaskModelId>,
}

impl SystemModel {
    /// Creates an empty system model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The capability-model registry.
    #[must_use]
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Declares (or retrieves) a data-source capability model.
    ///
    /// # Errors
    ///
    /// See [`ModelRegistry::declare_data_source`].
    pub fn declare_data_source(
        &mut self,
        name: &str,
        parent: Option<ModelRef<'_>>,
    ) -> Result<ModelId> {
        self.registry.declare_data_source(name, parent)
    }

    /// Declares (or retrieves) a device model.
    ///
    /// # Errors
    ///
    /// See [`ModelRegistry::declare_device`].
    pub fn declare_device(&mut self, name: &str, provides: Provides<'_>) -> Result<ModelId> {
        self.registry.declare_device(name, provides)
    }

    /// Declares a new task model, optionally inheriting another.
    ///
    /// # Errors
    ///
    /// `Error::DuplicateTask` if `name` is already declared.
    pub fn declare_task_model(
        &mut self,
        name: &str,
        parent: Option<TaskModelId>,
    ) -> Result<TaskModelId> {
        if self.task_names.contains_key(name) {
            return Err(Error::DuplicateTask(name.to_string()));
        }
        let id = TaskModelId(self.tasks.len());
        self.tasks.push(TaskModel {
            name: name.to_string(),
            parent,
            slots: Vec::new(),
            arguments: Vec::new(),
        });
        self.task_names.insert(name.to_string(), id);
        Ok(id)
    }

    /// The task model behind an id.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this system model.
    #[must_use]
    pub fn task(&self, id: TaskModelId) -> &TaskModel {
        &self.tasks[id.0]
    }

    /// Looks up a task model by name.
    #[must_use]
    pub fn task_by_name(&self, name: &str) -> Option<TaskModelId> {
        self.task_names.get(name).copied()
    }

    /// All declared task models, in declaration order.
    pub fn each_task(&self) -> impl Iterator<Item = (TaskModelId, &TaskModel)> {
        self.tasks.iter().enumerate().map(|(i, t)| (TaskModelId(i), t))
    }

    /// The base task model implementing a capability, created on first
    /// request with a single main slot of that capability.
    ///
    /// # Errors
    ///
    /// `Error::DuplicateTask` if the synthesized task name collides with
    /// a user declaration.
    pub fn base_task_model(&mut self, model: ModelId) -> Result<TaskModelId> {
        if let Some(&task) = self.base_tasks.get(&model) {
            return Ok(task);
        }
        let task_name = format!("{}_task", self.registry.get(model).name());
        let task = self.declare_task_model(&task_name, None)?;
        self.add_slot(task, model.into(), None, None)?;
        self.base_tasks.insert(model, task);
        Ok(task)
    }

    /// Declares a slot on `task`.
    ///
    /// The slot's segment defaults to the capability model's name and may
    /// be overridden with `rename`. With `slave_of`, the slot nests under
    /// an already-declared path and the full path becomes
    /// `<slave_of>.<segment>`. Root slots synthesize one instance argument
    /// named `<segment>_name`.
    ///
    /// # Errors
    ///
    /// `Error::UnknownModel` if `model` resolves to nothing;
    /// `Error::UnknownSlaveTarget` if `slave_of` names no declared path;
    /// `Error::DuplicateSlot` if the full path is already declared in the
    /// transitive slot table (overriding is only legal through
    /// [`SystemModel::upgrade_to_device`]).
    pub fn add_slot(
        &mut self,
        task: TaskModelId,
        model: ModelRef<'_>,
        rename: Option<&str>,
        slave_of: Option<&str>,
    ) -> Result<SlotPath> {
        let model = self.resolve_model(model)?;
        let segment = rename.unwrap_or_else(|| self.registry.get(model).name()).to_string();

        let (path, slave) = match slave_of {
            Some(target) => {
                let target = SlotPath::parse(target);
                if self.find_slot(task, &target).is_none() {
                    return Err(Error::UnknownSlaveTarget(target.to_string()));
                }
                (target.child(&segment), Some(target))
            }
            None => (SlotPath::root(&segment), None),
        };

        if self.find_slot(task, &path).is_some() {
            return Err(Error::DuplicateSlot {
                task: self.task(task).name.clone(),
                path: path.to_string(),
            });
        }

        self.tasks[task.0].slots.push(SlotDeclaration {
            path: path.clone(),
            model,
            slave_of: slave,
        });
        if path.is_root() {
            self.declare_argument(task, &format!("{segment}_name"));
        }
        Ok(path)
    }

    /// Declares `task` as a driver for the device `device_name`.
    ///
    /// Creates (or overrides) the root slot at `rename` (default: the
    /// device name) with the device model. This is the one legal
    /// re-declaration of an existing path: it is valid because the device
    /// model fulfills the data-source model previously occupying it.
    ///
    /// # Errors
    ///
    /// `Error::UnknownDevice` if no such device is registered;
    /// `Error::IncompatibleModel` if the device does not fulfill the model
    /// currently at the target path.
    pub fn upgrade_to_device(
        &mut self,
        task: TaskModelId,
        device_name: &str,
        rename: Option<&str>,
    ) -> Result<SlotPath> {
        let device =
            self.registry.device(device_name).ok_or_else(|| {
                Error::UnknownDevice(device_name.to_string())
            })?;
        let segment = rename.unwrap_or(device_name).to_string();
        let path = SlotPath::root(&segment);

        if let Some(prior) = self.find_slot(task, &path) {
            if !self.registry.fulfills(device, prior) {
                return Err(Error::IncompatibleModel {
                    name: device_name.to_string(),
                    parent: self.registry.get(prior).name().to_string(),
                });
            }
        }

        let declaration = SlotDeclaration { path: path.clone(), model: device, slave_of: None };
        let own = &mut self.tasks[task.0].slots;
        if let Some(existing) = own.iter_mut().find(|s| s.path == path) {
            *existing = declaration;
        } else {
            own.push(declaration);
        }
        self.declare_argument(task, &format!("{segment}_name"));
        Ok(path)
    }

    /// True iff `task` declares (or inherits) a slot at `path`.
    #[must_use]
    pub fn has_slot(&self, task: TaskModelId, path: &str) -> bool {
        self.find_slot(task, &SlotPath::parse(path)).is_some()
    }

    /// The capability model bound at `path`, if declared.
    #[must_use]
    pub fn model_at(&self, task: TaskModelId, path: &str) -> Option<ModelId> {
        self.find_slot(task, &SlotPath::parse(path))
    }

    /// Every slot visible on `task`: inherited first, then own, in
    /// declaration order. A path overridden by a device driver is reported
    /// once, with the overriding model.
    #[must_use]
    pub fn each_slot(&self, task: TaskModelId) -> Vec<(SlotPath, ModelId)> {
        let mut ordered: Vec<(SlotPath, ModelId)> = Vec::new();
        let mut index: BTreeMap<SlotPath, usize> = BTreeMap::new();
        for id in self.ancestry(task) {
            for slot in &self.tasks[id.0].slots {
                if let Some(&i) = index.get(&slot.path) {
                    ordered[i].1 = slot.model;
                } else {
                    index.insert(slot.path.clone(), ordered.len());
                    ordered.push((slot.path.clone(), slot.model));
                }
            }
        }
        ordered
    }

    /// The root slots of `task`, in declaration order.
    #[must_use]
    pub fn each_root_slot(&self, task: TaskModelId) -> Vec<(SlotPath, ModelId)> {
        self.each_slot(task).into_iter().filter(|(path, _)| path.is_root()).collect()
    }

    /// The direct children of `parent_path` on `task`, as
    /// `(segment, model)` pairs in declaration order.
    #[must_use]
    pub fn each_child_slot(&self, task: TaskModelId, parent_path: &str) -> Vec<(String, ModelId)> {
        let parent = SlotPath::parse(parent_path);
        self.each_slot(task)
            .into_iter()
            .filter(|(path, _)| path.parent().as_ref() == Some(&parent))
            .map(|(path, model)| (path.last().to_string(), model))
            .collect()
    }

    /// The instance arguments of `task`: one `<path>_name` per root slot,
    /// inherited first.
    #[must_use]
    pub fn arguments(&self, task: TaskModelId) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for id in self.ancestry(task) {
            for argument in &self.tasks[id.0].arguments {
                if seen.insert(argument.clone()) {
                    out.push(argument.clone());
                }
            }
        }
        out
    }

    /// True iff `task` fulfills the capability `model` through any of its
    /// slots.
    #[must_use]
    pub fn task_fulfills(&self, task: TaskModelId, model: ModelId) -> bool {
        self.each_slot(task).iter().any(|&(_, slot)| self.registry.fulfills(slot, model))
    }

    /// Every capability model `task` offers, transitively closed.
    #[must_use]
    pub fn offered_capabilities(&self, task: TaskModelId) -> BTreeSet<ModelId> {
        let mut set = BTreeSet::new();
        for (_, model) in self.each_slot(task) {
            set.extend(self.registry.fulfilled_set(model).iter().copied());
        }
        set
    }

    /// The host class-compatibility check: `a` is compatible with `b` when
    /// `b` is an ancestor of (or is) `a`, or when `a` offers every
    /// capability `b` offers.
    #[must_use]
    pub fn task_compatible(&self, a: TaskModelId, b: TaskModelId) -> bool {
        if self.ancestry(a).contains(&b) {
            return true;
        }
        self.offered_capabilities(a).is_superset(&self.offered_capabilities(b))
    }

    /// Resolves a model reference against the registry.
    pub(crate) fn resolve_model(&self, model: ModelRef<'_>) -> Result<ModelId> {
        match model {
            ModelRef::Id(id) => Ok(id),
            ModelRef::Name(name) => {
                self.registry.lookup(name).ok_or_else(|| Error::UnknownModel(name.to_string()))
            }
        }
    }

    /// The declaration governing `path`, searching own declarations
    /// (latest wins) and then the ancestor chain.
    #[must_use]
    pub fn declaration_at(&self, task: TaskModelId, path: &SlotPath) -> Option<&SlotDeclaration> {
        let mut current = Some(task);
        while let Some(id) = current {
            let model = &self.tasks[id.0];
            if let Some(slot) = model.slots.iter().rev().find(|s| &s.path == path) {
                return Some(slot);
            }
            current = model.parent;
        }
        None
    }

    /// The model at `path`, if declared.
    pub(crate) fn find_slot(&self, task: TaskModelId, path: &SlotPath) -> Option<ModelId> {
        self.declaration_at(task, path).map(SlotDeclaration::model)
    }

    /// The inheritance chain of `task`, most ancestral first.
    fn ancestry(&self, task: TaskModelId) -> Vec<TaskModelId> {
        let mut chain = Vec::new();
        let mut current = Some(task);
        while let Some(id) = current {
            chain.push(id);
            current = self.tasks[id.0].parent;
        }
        chain.reverse();
        chain
    }

    fn declare_argument(&mut self, task: TaskModelId, name: &str) {
        if !self.arguments(task).iter().any(|a| a == name) {
            self.tasks[task.0].arguments.push(name.to_string());
        }
    }
}
