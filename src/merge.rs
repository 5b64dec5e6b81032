//! Merge engine: unifies redundant task instances during plan
//! optimization.
//!
//! The merge is deliberately shallow: it compares bound argument values
//! structurally and copies what is missing. Reconciling differing
//! data-flow topologies between models of different runtime type is
//! explicitly unsupported and reported as a refusal, never guessed at.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::instance::TaskInstance;
use crate::system::SystemModel;
#[cfg(test)]
use crate::system::TaskModelId;

/// True iff `source` could be collapsed into `target`.
///
/// Requires the target's task model to be compatible with the source's
/// (same lineage, or offering every capability the source offers), every
/// argument bound on both sides to agree, and — when the models differ —
/// identical data-flow connection sets. Detecting reconcilable flow
/// differences is out of scope; a difference simply means "not
/// mergeable".
#[must_use]
pub fn can_merge(system: &SystemModel, target: &TaskInstance, source: &TaskInstance) -> bool {
    if !system.task_compatible(target.model(), source.model()) {
        return false;
    }
    for (name, value) in target.arguments() {
        if let Some(other) = source.argument(name) {
            if other != value {
                return false;
            }
        }
    }
    if target.model() != source.model() && target.flow_links() != source.flow_links() {
        return false;
    }
    true
}

/// Merges `source` into `target`, copying every argument bound on the
/// source and unset on the target. Idempotent.
///
/// # Errors
///
/// `Error::UnsupportedMerge` when the instances' models differ in runtime
/// type and their root-argument signatures or data-flow connection sets
/// differ: completing such a merge would mean reconciling data-flow
/// topology, which this engine refuses to attempt. Callers must treat the
/// refusal as "not mergeable" and keep both instances.
/// `Error::ConflictingArguments` when both sides bind the same argument
/// to different values.
pub fn merge(system: &SystemModel, target: &mut TaskInstance, source: &TaskInstance) -> Result<()> {
    if target.model() != source.model() {
        let target_args: BTreeSet<String> =
            system.arguments(target.model()).into_iter().collect();
        let source_args: BTreeSet<String> =
            system.arguments(source.model()).into_iter().collect();
        if target_args != source_args || target.flow_links() != source.flow_links() {
            return Err(Error::UnsupportedMerge {
                target: system.task(target.model()).name().to_string(),
                source: system.task(source.model()).name().to_string(),
            });
        }
    }

    for (name, value) in source.arguments() {
        match target.argument(name) {
            None => target.bind(name, value),
            Some(bound) if bound == value => {}
            Some(bound) => {
                return Err(Error::ConflictingArguments {
                    argument: name.clone(),
                    left: bound.to_string(),
                    right: value.clone(),
                })
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{FlowDirection, FlowLink};
    use crate::slots::SlotPath;

    fn stereo_system() -> (SystemModel, TaskModelId) {
        let mut sys = SystemModel::new();
        sys.declare_data_source("camera", None).unwrap();
        sys.declare_data_source("stereo", None).unwrap();
        let task = sys.declare_task_model("StereoCamera", None).unwrap();
        sys.add_slot(task, "stereo".into(), None, None).unwrap();
        sys.add_slot(task, "camera".into(), Some("left"), Some("stereo")).unwrap();
        sys.add_slot(task, "camera".into(), Some("right"), Some("stereo")).unwrap();
        (sys, task)
    }

    #[test]
    fn unset_arguments_merge_both_ways() {
        let (sys, task) = stereo_system();
        let bound = TaskInstance::new(task).with_argument("stereo_name", "front_stereo");
        let unbound = TaskInstance::new(task);

        assert!(can_merge(&sys, &bound, &unbound));
        assert!(can_merge(&sys, &unbound, &bound));
    }

    #[test]
    fn different_bound_values_block_the_merge() {
        let (sys, task) = stereo_system();
        let front = TaskInstance::new(task).with_argument("stereo_name", "front_stereo");
        let mut back = TaskInstance::new(task);
        back.bind("stereo_name", "back_stereo");

        assert!(!can_merge(&sys, &front, &back));
        assert!(!can_merge(&sys, &back, &front));

        let mut target = front.clone();
        let err = merge(&sys, &mut target, &back).unwrap_err();
        assert!(matches!(err, Error::ConflictingArguments { .. }));
    }

    #[test]
    fn merge_copies_missing_arguments_and_is_idempotent() {
        let (sys, task) = stereo_system();
        let source = TaskInstance::new(task).with_argument("stereo_name", "front_stereo");
        let mut target = TaskInstance::new(task);

        merge(&sys, &mut target, &source).unwrap();
        assert_eq!(target.argument("stereo_name"), Some("front_stereo"));

        merge(&sys, &mut target, &source).unwrap();
        assert_eq!(target.arguments().len(), 1);
        assert_eq!(target.argument("stereo_name"), Some("front_stereo"));
    }

    #[test]
    fn merge_works_in_either_direction_on_the_same_model() {
        let (sys, task) = stereo_system();
        let bound = TaskInstance::new(task).with_argument("stereo_name", "front_stereo");
        let mut unbound = TaskInstance::new(task);

        merge(&sys, &mut unbound, &bound).unwrap();
        assert_eq!(unbound.argument("stereo_name"), Some("front_stereo"));
    }

    #[test]
    fn differing_models_with_differing_topology_refuse_to_merge() {
        let (mut sys, stereo_task) = stereo_system();
        let camera_task = sys.declare_task_model("CameraDriver", None).unwrap();
        sys.add_slot(camera_task, "camera".into(), None, None).unwrap();

        let mut target = TaskInstance::new(stereo_task).with_argument("stereo_name", "front_stereo");
        let source = TaskInstance::new(camera_task).with_argument("camera_name", "front_stereo.left");

        // The stereo camera offers everything the bare camera offers, but
        // not the other way around.
        assert!(can_merge(&sys, &target, &source));
        assert!(!can_merge(&sys, &source, &target));

        // Folding the camera's bindings into the stereo camera would mean
        // rewiring data flow across different slot trees: refused.
        let err = merge(&sys, &mut target, &source).unwrap_err();
        assert!(matches!(err, Error::UnsupportedMerge { .. }));
        assert_eq!(target.argument("camera_name"), None);
    }

    #[test]
    fn differing_flow_links_block_merging_across_models() {
        let (mut sys, stereo_task) = stereo_system();
        let other_task = sys.declare_task_model("OtherStereo", None).unwrap();
        sys.add_slot(other_task, "stereo".into(), None, None).unwrap();
        sys.add_slot(other_task, "camera".into(), Some("left"), Some("stereo")).unwrap();
        sys.add_slot(other_task, "camera".into(), Some("right"), Some("stereo")).unwrap();

        let mut target = TaskInstance::new(stereo_task);
        let mut source = TaskInstance::new(other_task);
        source.add_flow_link(FlowLink {
            slot: SlotPath::root("stereo"),
            direction: FlowDirection::Source,
            peer: "dem_builder".to_string(),
            port: "cloud".to_string(),
        });

        assert!(!can_merge(&sys, &target, &source));
        let err = merge(&sys, &mut target, &source).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Unsupported);
    }
}
