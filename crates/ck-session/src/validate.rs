//! Session validation logic.

use crate::schema::SessionDef;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Duplicate curve name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// Structural checks only. Whether the named curves exist is not checked
/// here: a session may be restored before its curve data is loaded.
pub fn validate_session(session: &SessionDef) -> Result<(), ValidationError> {
    if session.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: session.version,
        });
    }

    let mut names = HashSet::new();
    for name in &session.selected_curves {
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "selected_curves".to_string(),
                value: format!("{name:?}"),
                reason: "curve name must not be blank".to_string(),
            });
        }
        if !names.insert(name) {
            return Err(ValidationError::DuplicateName {
                name: name.clone(),
                context: "selected_curves".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_empty_selection() {
        assert!(validate_session(&SessionDef::new(vec![], true)).is_ok());
    }

    #[test]
    fn rejects_duplicates() {
        let session = SessionDef::new(vec!["A".into(), "A".into()], false);
        assert_eq!(
            validate_session(&session),
            Err(ValidationError::DuplicateName {
                name: "A".to_string(),
                context: "selected_curves".to_string(),
            })
        );
    }

    #[test]
    fn rejects_blank_names() {
        let session = SessionDef::new(vec!["  ".into()], false);
        assert!(matches!(
            validate_session(&session),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_future_versions() {
        let mut session = SessionDef::new(vec![], false);
        session.version = 99;
        assert_eq!(
            validate_session(&session),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        );
    }
}
