//! `capslot resolve` command.

use std::path::Path;

use serde::Serialize;

use crate::error::Error;
use crate::resolve::find_matching_source;

/// Machine-readable resolution report emitted with `--json`.
#[derive(Debug, Serialize)]
struct ResolveReport<'a> {
    task: &'a str,
    capability: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    candidates: Vec<String>,
}

/// Execute the `resolve` command.
///
/// # Errors
///
/// Returns an error string if the profile cannot be loaded, the task or
/// capability is unknown, or resolution fails (the JSON report, when
/// requested, is printed before the failure is returned).
pub fn run(
    profile: &Path,
    task: &str,
    capability: &str,
    hint: Option<&str>,
    json: bool,
) -> Result<(), String> {
    let system = super::load_system(profile)?;
    let task_id = system.task_by_name(task).ok_or_else(|| {
        Error::UnknownTask(task.to_string()).to_string()
    })?;
    let model = system.registry().lookup(capability).ok_or_else(|| {
        Error::UnknownModel(capability.to_string()).to_string()
    })?;

    let mut report = ResolveReport {
        task,
        capability,
        hint,
        path: None,
        error: None,
        error_kind: None,
        candidates: Vec::new(),
    };

    match find_matching_source(&system, task_id, model, hint) {
        Ok(path) => {
            report.path = Some(path.to_string());
            if json {
                println!("{}", to_json(&report)?);
            } else {
                println!("{path}");
            }
            Ok(())
        }
        Err(err) => {
            report.error = Some(err.to_string());
            report.error_kind = Some(err.kind().label());
            if let Error::AmbiguousSlot { ref candidates, .. } = err {
                report.candidates.clone_from(candidates);
            }
            if json {
                println!("{}", to_json(&report)?);
            }
            Err(err.to_string())
        }
    }
}

fn to_json(report: &ResolveReport<'_>) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|e| format!("failed to encode report: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_empty_fields() {
        let report = ResolveReport {
            task: "Stereo",
            capability: "image",
            hint: None,
            path: Some("stereo.left".to_string()),
            error: None,
            error_kind: None,
            candidates: Vec::new(),
        };
        let json = to_json(&report).unwrap();
        assert!(json.contains("\"path\""));
        assert!(!json.contains("\"error\""));
        assert!(!json.contains("\"candidates\""));
    }

    #[test]
    fn ambiguity_report_lists_candidates() {
        let report = ResolveReport {
            task: "Stereo",
            capability: "image",
            hint: None,
            path: None,
            error: Some("ambiguous".to_string()),
            error_kind: Some("ambiguous"),
            candidates: vec!["stereo.left".to_string(), "stereo.right".to_string()],
        };
        let json = to_json(&report).unwrap();
        assert!(json.contains("stereo.left"));
        assert!(json.contains("stereo.right"));
    }
}
