/// Core trigger type definitions
///
/// A trigger pairs a URL path key with a local command. Triggers are
/// deserialized from the JSON config file at startup and never change after.

use serde::{Deserialize, Serialize};

/// One configured automation
///
/// Config file format: `{ "name": "deploy", "url": "deploy", "command": "/usr/local/bin/deploy" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerDefinition {
    /// Human-readable label, only used in logs (may be empty or repeated)
    #[serde(default)]
    pub name: String,
    /// Path key without the leading slash (e.g., "deploy")
    pub url: String,
    /// Executable to run, invoked directly with no arguments
    pub command: String,
}

impl TriggerDefinition {
    pub fn new(name: impl Into<String>, url: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            command: command.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_optional() {
        let trigger: TriggerDefinition =
            serde_json::from_str(r#"{"url": "backup", "command": "/usr/bin/backup"}"#).unwrap();

        assert_eq!(trigger.name, "");
        assert_eq!(trigger.url, "backup");
        assert_eq!(trigger.command, "/usr/bin/backup");
    }

    #[test]
    fn url_and_command_are_required() {
        assert!(serde_json::from_str::<TriggerDefinition>(r#"{"name": "x", "command": "/bin/true"}"#).is_err());
        assert!(serde_json::from_str::<TriggerDefinition>(r#"{"name": "x", "url": "x"}"#).is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let trigger: TriggerDefinition = serde_json::from_str(
            r#"{"name": "deploy", "url": "deploy", "command": "/bin/true", "comment": "prod"}"#,
        )
        .unwrap();

        assert_eq!(trigger, TriggerDefinition::new("deploy", "deploy", "/bin/true"));
    }
}
