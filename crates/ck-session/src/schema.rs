//! Session schema definitions.

use serde::{Deserialize, Serialize};

/// Persisted curve-level selection: a list of curve names plus the
/// show-all flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SessionDef {
    pub version: u32,
    #[serde(default)]
    pub selected_curves: Vec<String>,
    #[serde(default)]
    pub show_all: bool,
}

impl SessionDef {
    pub fn new(selected_curves: Vec<String>, show_all: bool) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            selected_curves,
            show_all,
        }
    }
}
