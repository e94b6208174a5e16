use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Group metadata.
///
/// A group carries no structural fields; its presence marks a prefix as a group.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug)]
pub struct GroupMetadata {
    /// The creation timestamp. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl GroupMetadata {
    /// Create group metadata stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            created: Some(Utc::now()),
        }
    }
}

impl Default for GroupMetadata {
    fn default() -> Self {
        Self::new()
    }
}
