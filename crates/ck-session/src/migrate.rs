//! Schema migration framework.

use crate::SessionError;
use crate::schema::SessionDef;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut session: SessionDef) -> Result<SessionDef, SessionError> {
    while session.version < LATEST_VERSION {
        session = migrate_one_version(session)?;
    }
    Ok(session)
}

fn migrate_one_version(session: SessionDef) -> Result<SessionDef, SessionError> {
    match session.version {
        0 => migrate_v0_to_v1(session),
        v => Err(SessionError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 files could list a curve more than once.
fn migrate_v0_to_v1(mut session: SessionDef) -> Result<SessionDef, SessionError> {
    let mut seen = std::collections::HashSet::new();
    session
        .selected_curves
        .retain(|name| seen.insert(name.clone()));
    session.version = 1;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v0_duplicates_are_dropped_keeping_first_order() {
        let session = SessionDef {
            version: 0,
            selected_curves: vec!["B".into(), "A".into(), "B".into()],
            show_all: true,
        };
        let migrated = migrate_to_latest(session).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert_eq!(migrated.selected_curves, vec!["B", "A"]);
        assert!(migrated.show_all);
    }

    #[test]
    fn latest_is_untouched() {
        let session = SessionDef::new(vec!["A".into()], false);
        assert_eq!(migrate_to_latest(session.clone()).unwrap(), session);
    }
}
