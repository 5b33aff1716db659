//! Store configuration.

use serde::{Deserialize, Serialize};

fn default_guard_reads() -> bool {
    true
}

fn default_owner_label() -> String {
    "ui".to_string()
}

/// Construction-time options for a [`CurveStore`](crate::CurveStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Also assert the owner context on read accessors. Mutators are always
    /// guarded regardless of this flag.
    #[serde(default = "default_guard_reads")]
    pub guard_reads: bool,
    /// Name of the owner context, used in guard panics and logs.
    #[serde(default = "default_owner_label")]
    pub owner_label: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            guard_reads: default_guard_reads(),
            owner_label: default_owner_label(),
        }
    }
}

impl StoreConfig {
    pub fn with_guard_reads(mut self, guard_reads: bool) -> Self {
        self.guard_reads = guard_reads;
        self
    }

    pub fn with_owner_label(mut self, label: impl Into<String>) -> Self {
        self.owner_label = label.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert!(config.guard_reads);
        assert_eq!(config.owner_label, "ui");
    }

    #[test]
    fn fields_override_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"guard_reads": false, "owner_label": "main"}"#).unwrap();
        assert_eq!(
            config,
            StoreConfig::default()
                .with_guard_reads(false)
                .with_owner_label("main")
        );
    }
}
