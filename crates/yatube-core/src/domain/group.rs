use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const TITLE_MAX_LEN: usize = 200;
pub const SLUG_MAX_LEN: usize = 100;

/// Group entity - a named category of posts identified by a unique slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    /// Create a new group, checking the title and slug limits.
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let slug = slug.into();

        if title.trim().is_empty() || title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "group title must be 1..={TITLE_MAX_LEN} characters"
            )));
        }
        if !Self::is_valid_slug(&slug) {
            return Err(DomainError::Validation(format!(
                "group slug must be 1..={SLUG_MAX_LEN} of [-a-zA-Z0-9_]"
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            slug,
            description: description.into(),
        })
    }

    pub fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug.len() <= SLUG_MAX_LEN
            && slug
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
