//! Profile files: YAML declarations of models and task slot tables.
//!
//! A profile is the declarative front door to a [`SystemModel`]: it lists
//! data sources, devices, and task models with their slots and drivers,
//! and is replayed through the normal declaration calls so every mistake
//! surfaces through the same typed error taxonomy.
//!
//! ```yaml
//! data_sources:
//!   - name: image
//!   - name: stereocam
//! devices:
//!   - name: camera
//!     provides: image
//! tasks:
//!   - name: StereoCamera
//!     slots:
//!       - model: stereocam
//!         as: stereo
//!       - model: image
//!         as: left
//!         slave_of: stereo
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Provides;
use crate::system::SystemModel;

/// Declaration of one data-source capability model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceDecl {
    /// The globally unique model name.
    pub name: String,
    /// Parent model name, if the capability specializes another.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Declaration of one device model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDecl {
    /// The globally unique device name.
    pub name: String,
    /// Explicit provided data-source model name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides: Option<String>,
    /// When `provides` is absent: whether to auto-link a same-named data
    /// source. Setting this to `false` is the `provides: none` form and
    /// permanently reserves the bare name.
    #[serde(default = "default_true")]
    pub auto_provides: bool,
}

/// One slot declaration within a task model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDecl {
    /// The capability model the slot binds to.
    pub model: String,
    /// Slot segment name; defaults to the model name.
    #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
    /// Parent slot path this slot nests under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slave_of: Option<String>,
}

/// One device-driver declaration within a task model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverDecl {
    /// The device model being driven.
    pub device: String,
    /// Slot segment name; defaults to the device name.
    #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
}

/// Declaration of one task model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDecl {
    /// The task model's name.
    pub name: String,
    /// Name of the parent task model; must be declared earlier in the
    /// profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Slot declarations, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<SlotDecl>,
    /// Device-driver declarations, applied after the slots.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drivers: Vec<DriverDecl>,
}

/// A full profile document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Data-source model declarations.
    #[serde(default)]
    pub data_sources: Vec<DataSourceDecl>,
    /// Device model declarations.
    #[serde(default)]
    pub devices: Vec<DeviceDecl>,
    /// Task model declarations.
    #[serde(default)]
    pub tasks: Vec<TaskDecl>,
}

fn default_true() -> bool {
    true
}

impl Profile {
    /// Parses a profile from YAML text.
    ///
    /// # Errors
    ///
    /// Returns the YAML parse error as a string.
    pub fn parse(yaml: &str) -> std::result::Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("failed to parse profile: {e}"))
    }

    /// Replays the profile's declarations into a fresh [`SystemModel`].
    ///
    /// Declarations are applied in document order: data sources, then
    /// devices, then tasks (each task's slots before its drivers).
    ///
    /// # Errors
    ///
    /// The first declaration error encountered, with the categories of
    /// [`crate::Error`]. An unknown task `parent` surfaces as
    /// `Error::UnknownTask`.
    pub fn build(&self) -> Result<SystemModel> {
        let mut system = SystemModel::new();

        for source in &self.data_sources {
            let parent = source.parent.as_deref().map(Into::into);
            system.declare_data_source(&source.name, parent)?;
        }

        for device in &self.devices {
            let provides = match (&device.provides, device.auto_provides) {
                (Some(source), _) => Provides::Source(source.as_str().into()),
                (None, true) => Provides::Auto,
                (None, false) => Provides::None,
            };
            system.declare_device(&device.name, provides)?;
        }

        for task in &self.tasks {
            let parent = match &task.parent {
                Some(name) => Some(
                    system
                        .task_by_name(name)
                        .ok_or_else(|| Error::UnknownTask(name.clone()))?,
                ),
                None => None,
            };
            let id = system.declare_task_model(&task.name, parent)?;
            for slot in &task.slots {
                system.add_slot(
                    id,
                    slot.model.as_str().into(),
                    slot.rename.as_deref(),
                    slot.slave_of.as_deref(),
                )?;
            }
            for driver in &task.drivers {
                system.upgrade_to_device(id, &driver.device, driver.rename.as_deref())?;
            }
        }

        Ok(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEREO_PROFILE: &str = "
data_sources:
  - name: image
  - name: stereocam
devices:
  - name: camera
    provides: image
tasks:
  - name: StereoCamera
    slots:
      - model: stereocam
        as: stereo
      - model: image
        as: left
        slave_of: stereo
      - model: image
        as: right
        slave_of: stereo
  - name: CameraDriver
    drivers:
      - device: camera
";

    #[test]
    fn builds_the_declared_system() {
        let profile = Profile::parse(STEREO_PROFILE).unwrap();
        let system = profile.build().unwrap();

        let image = system.registry().data_source("image").unwrap();
        let camera = system.registry().device("camera").unwrap();
        assert!(system.registry().fulfills(camera, image));

        let stereo = system.task_by_name("StereoCamera").unwrap();
        assert!(system.has_slot(stereo, "stereo.left"));
        assert_eq!(system.arguments(stereo), vec!["stereo_name".to_string()]);

        let driver = system.task_by_name("CameraDriver").unwrap();
        assert_eq!(system.model_at(driver, "camera"), Some(camera));
    }

    #[test]
    fn task_parent_links_by_name() {
        let yaml = "
data_sources:
  - name: image
tasks:
  - name: Base
    slots:
      - model: image
        as: left_image
  - name: Derived
    parent: Base
";
        let system = Profile::parse(yaml).unwrap().build().unwrap();
        let derived = system.task_by_name("Derived").unwrap();
        assert!(system.has_slot(derived, "left_image"));
    }

    #[test]
    fn unknown_task_parent_fails() {
        let yaml = "
tasks:
  - name: Derived
    parent: Missing
";
        let err = Profile::parse(yaml).unwrap().build().unwrap_err();
        assert_eq!(err, Error::UnknownTask("Missing".to_string()));
    }

    #[test]
    fn disabled_auto_provides_creates_no_data_source() {
        let yaml = "
devices:
  - name: camera
    auto_provides: false
";
        let system = Profile::parse(yaml).unwrap().build().unwrap();
        assert!(system.registry().device("camera").is_some());
        assert_eq!(system.registry().data_source("camera"), None);
    }

    #[test]
    fn malformed_yaml_is_reported_as_a_parse_error() {
        let err = Profile::parse(": not yaml").unwrap_err();
        assert!(err.contains("failed to parse profile"));
    }

    #[test]
    fn serializes_back_to_equivalent_yaml() {
        let profile = Profile::parse(STEREO_PROFILE).unwrap();
        let yaml = serde_yaml::to_string(&profile).unwrap();
        let reparsed = Profile::parse(&yaml).unwrap();
        assert_eq!(profile, reparsed);
    }
}
