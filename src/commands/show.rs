//! `capslot show` command.

use std::path::Path;

use crate::system::SystemModel;

/// Execute the `show` command: print every registered model and each
/// task model's slot table.
///
/// # Errors
///
/// Returns an error string if the profile cannot be loaded.
pub fn run(profile: &Path) -> Result<(), String> {
    let system = super::load_system(profile)?;
    print!("{}", render(&system));
    Ok(())
}

fn render(system: &SystemModel) -> String {
    let registry = system.registry();
    let mut lines = Vec::new();

    lines.push("Data sources:".to_string());
    let mut any = false;
    for (name, id) in registry.each_data_source() {
        any = true;
        match registry.get(id).parent() {
            Some(parent) => lines.push(format!("  {name} < {}", registry.get(parent).name())),
            None => lines.push(format!("  {name}")),
        }
    }
    if !any {
        lines.push("  (none)".to_string());
    }

    lines.push("Devices:".to_string());
    any = false;
    for (name, id) in registry.each_device() {
        any = true;
        match registry.get(id).provides() {
            Some(source) => {
                lines.push(format!("  {name} (provides {})", registry.get(source).name()));
            }
            None => lines.push(format!("  {name}")),
        }
    }
    if !any {
        lines.push("  (none)".to_string());
    }

    lines.push("Task models:".to_string());
    any = false;
    for (id, task) in system.each_task() {
        any = true;
        lines.push(format!("  {}", task.name()));
        for (path, model) in system.each_slot(id) {
            let model_name = registry.get(model).name();
            if path.is_root() {
                lines.push(format!("    {path}: {model_name} [{path}_name]"));
            } else {
                lines.push(format!("    {path}: {model_name}"));
            }
        }
    }
    if !any {
        lines.push("  (none)".to_string());
    }

    lines.push(String::new());
    lines.join("\n")
}
