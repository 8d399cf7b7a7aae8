//! Projected videos.
//!
//! A projected video is the minimal view of one playlist entry that the
//! renamer needs: the display name and the identifier embedded in the
//! downloaded file's name.

use super::errors::MissingField;

/// Descriptor field holding the display name
pub const NAME_FIELD: &str = "name";

/// Descriptor field holding the identifier
pub const VALUE_FIELD: &str = "id.value";

/// One playlist entry reduced to what the renamer uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedVideo {
    /// Display name (unsanitized)
    pub name: String,

    /// Identifier token expected inside the downloaded file name
    pub value: String,
}

impl ProjectedVideo {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Both fields are present and non-empty
    pub fn is_usable(&self) -> bool {
        !self.name.is_empty() && !self.value.is_empty()
    }

    /// The first empty field, named as in the cache descriptor
    pub fn missing_field(&self) -> Option<MissingField> {
        let field = if self.name.is_empty() {
            NAME_FIELD
        } else if self.value.is_empty() {
            VALUE_FIELD
        } else {
            return None;
        };

        Some(MissingField {
            field,
            descriptor: format!("{:?}", self),
        })
    }
}

/// Result of projecting a cache entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    /// Usable videos, in input order
    pub videos: Vec<ProjectedVideo>,

    /// Number of descriptors dropped for a missing name or identifier
    pub dropped: usize,
}

impl Projection {
    /// Number of descriptors seen under `videos`
    pub fn total(&self) -> usize {
        self.videos.len() + self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}
