//! Explicit session context.
//!
//! Every store call and every ledger is scoped to one user. The session is
//! built once from the CLI/config and handed down; nothing below `cli`
//! looks the user up on its own.

use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Session {
    user_id: String,
}

impl Session {
    pub fn new(user_id: &str) -> AppResult<Self> {
        let trimmed = user_id.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("user id must not be empty".into()));
        }
        if trimmed.contains('/') {
            return Err(AppError::Validation(format!(
                "user id '{}' must not contain '/'",
                trimmed
            )));
        }

        Ok(Self {
            user_id: trimmed.to_string(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// True when a change published by a store belongs to this session.
    pub fn owns(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_user_id() {
        let s = Session::new("  mason ").unwrap();
        assert_eq!(s.user_id(), "mason");
        assert!(s.owns("mason"));
    }

    #[test]
    fn rejects_blank_or_path_like_ids() {
        assert!(Session::new("   ").is_err());
        assert!(Session::new("a/b").is_err());
    }
}
