//! REST API module.
//!
//! Contains all API routes and handlers behind the auth layer. Handlers
//! return plain JSON entity bodies; failures map through [`AppError`].

mod quizzes;
mod streaks;
mod topics;

pub use quizzes::*;
pub use streaks::*;
pub use topics::*;

use crate::errors::AppError;
use crate::models::Owned;

/// Resolve a lookup to an entity the caller owns.
///
/// A missing entity and an entity owned by someone else produce the same
/// not-found error, so the API never leaks whether another user's data
/// exists.
pub fn ensure_owned<T: Owned>(
    entity: Option<T>,
    user_id: &str,
    what: &str,
) -> Result<T, AppError> {
    match entity {
        Some(e) if e.owner_id() == user_id => Ok(e),
        _ => Err(AppError::NotFound(format!("{} not found", what))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Note {
        owner: String,
    }

    impl Owned for Note {
        fn owner_id(&self) -> &str {
            &self.owner
        }
    }

    #[test]
    fn owner_gets_the_entity() {
        let note = Note {
            owner: "alice".to_string(),
        };
        assert!(ensure_owned(Some(note), "alice", "Note").is_ok());
    }

    #[test]
    fn non_owner_sees_not_found() {
        let note = Note {
            owner: "alice".to_string(),
        };
        let err = ensure_owned(Some(note), "bob", "Note").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn missing_entity_is_not_found() {
        let err = ensure_owned(None::<Note>, "alice", "Note").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
