//! `capslot check` command.

use std::path::Path;

/// Execute the `check` command: load the profile and report the first
/// declaration error, labeled with its category.
///
/// # Errors
///
/// Returns an error string if the profile cannot be read or parsed, or
/// if a declaration fails.
pub fn run(profile: &Path) -> Result<(), String> {
    let parsed = super::load_profile(profile)?;
    match parsed.build() {
        Ok(system) => {
            let sources = system.registry().each_data_source().count();
            let devices = system.registry().each_device().count();
            let tasks = system.each_task().count();
            println!(
                "OK: {sources} data source(s), {devices} device(s), {tasks} task model(s)"
            );
            Ok(())
        }
        Err(err) => Err(format!("[{}] {err}", err.kind().label())),
    }
}
