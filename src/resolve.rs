//! Slot resolution: maps a capability-model query to a concrete slot path.

use crate::error::{Error, Result};
use crate::instance::TaskInstance;
use crate::model::ModelId;
use crate::slots::SlotPath;
use crate::system::{SystemModel, TaskModelId};

/// Resolves a capability query against a task model's slot table.
///
/// Candidate slots are those whose model fulfills `model`. An optional
/// `hint` narrows them: it matches a slot whose full path equals the hint
/// or whose path ends with the hint's segments. Without a hint, a single
/// candidate wins outright; with several, the unique *main* slot (a root
/// slot whose segment equals its model's name) breaks the tie. No other
/// heuristic applies, so resolution is independent of declaration order.
///
/// # Errors
///
/// `Error::NoMatchingSlot` when a hint matches no fulfilling slot;
/// `Error::AmbiguousSlot` when several equally valid candidates remain,
/// carrying every candidate path.
pub fn find_matching_source(
    system: &SystemModel,
    task: TaskModelId,
    model: ModelId,
    hint: Option<&str>,
) -> Result<SlotPath> {
    let registry = system.registry();
    let model_name = registry.get(model).name().to_string();
    let mut candidates: Vec<(SlotPath, ModelId)> = system
        .each_slot(task)
        .into_iter()
        .filter(|&(_, slot_model)| registry.fulfills(slot_model, model))
        .collect();

    if let Some(hint) = hint {
        candidates.retain(|(path, _)| path.matches_hint(hint));
        if candidates.is_empty() {
            return Err(Error::NoMatchingSlot { model: model_name, hint: hint.to_string() });
        }
        // An exact full-path hint beats suffix matches.
        if candidates.len() > 1 {
            if let Some(exact) = candidates.iter().position(|(path, _)| path.to_string() == hint) {
                return Ok(candidates[exact].0.clone());
            }
        }
    }

    if candidates.len() == 1 {
        return Ok(candidates[0].0.clone());
    }

    let main: Vec<usize> = (0..candidates.len())
        .filter(|&i| {
            let (path, slot_model) = &candidates[i];
            path.is_root() && path.root_segment() == registry.get(*slot_model).name()
        })
        .collect();
    if let [only] = main.as_slice() {
        return Ok(candidates[*only].0.clone());
    }

    Err(Error::AmbiguousSlot {
        model: model_name,
        candidates: candidates.iter().map(|(path, _)| path.to_string()).collect(),
    })
}

/// The concrete data-source name a slot selects on an instance.
///
/// Composes the bound value of the root slot's `<root>_name` argument with
/// the dotted suffix below the root: root argument `"front_stereo"` plus
/// path `"stereo.left"` yields `"front_stereo.left"`.
///
/// # Errors
///
/// `Error::UnknownSlot` when the instance's task model has no slot at
/// `path`; `Error::UnboundArgument` when the root argument is unset.
pub fn selected_data_source(
    system: &SystemModel,
    instance: &TaskInstance,
    path: &str,
) -> Result<String> {
    let path = SlotPath::parse(path);
    if system.find_slot(instance.model(), &path).is_none() {
        return Err(Error::UnknownSlot(path.to_string()));
    }
    let argument = format!("{}_name", path.root_segment());
    let root_value = instance
        .argument(&argument)
        .ok_or_else(|| Error::UnboundArgument(argument.clone()))?;
    Ok(format!("{root_value}{}", path.suffix_below_root()))
}
