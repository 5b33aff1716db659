//! ck-session: session file format for curve-level selection.
//!
//! A session stores which curves the user chose to display (`selected_curves`)
//! and the show-all flag. Restoring goes through the store's normal setters,
//! so it works before or after the curve data itself is loaded.

pub mod migrate;
pub mod schema;
pub mod validate;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_session};

use std::path::Path;

use ck_store::CurveStore;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> SessionResult<SessionDef> {
    let content = std::fs::read_to_string(path)?;
    let mut session: SessionDef = serde_yaml::from_str(&content)?;
    session = migrate_to_latest(session)?;
    validate_session(&session)?;
    Ok(session)
}

pub fn save_yaml(path: &Path, session: &SessionDef) -> SessionResult<()> {
    validate_session(session)?;
    let content = serde_yaml::to_string(session)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> SessionResult<SessionDef> {
    let content = std::fs::read_to_string(path)?;
    let mut session: SessionDef = serde_json::from_str(&content)?;
    session = migrate_to_latest(session)?;
    validate_session(&session)?;
    Ok(session)
}

pub fn save_json(path: &Path, session: &SessionDef) -> SessionResult<()> {
    validate_session(session)?;
    let content = serde_json::to_string_pretty(session)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &Path) -> SessionResult<SessionDef> {
    if is_json(path) {
        load_json(path)
    } else {
        load_yaml(path)
    }
}

/// Save by extension: `.json` as JSON, anything else as YAML.
pub fn save(path: &Path, session: &SessionDef) -> SessionResult<()> {
    if is_json(path) {
        save_json(path, session)
    } else {
        save_yaml(path, session)
    }
}

/// Read the store's curve-level selection into a session definition.
/// Names come out sorted.
pub fn capture(store: &CurveStore) -> SessionDef {
    SessionDef::new(
        store.get_selected_curves().into_iter().collect(),
        store.get_show_all_curves(),
    )
}

/// Apply a session to the store inside one batch, so observers see a single
/// `selection_state_changed` carrying both fields.
pub fn restore(store: &CurveStore, session: &SessionDef) -> SessionResult<()> {
    validate_session(session)?;
    let missing = session
        .selected_curves
        .iter()
        .filter(|name| !store.has_curve(name))
        .count();
    tracing::debug!(
        selected = session.selected_curves.len(),
        missing,
        show_all = session.show_all,
        "restoring session selection"
    );
    store.transaction(|s| {
        s.set_selected_curves(session.selected_curves.iter().cloned());
        s.set_show_all_curves(session.show_all);
    });
    Ok(())
}
