use serde::{Deserialize, Serialize};

/// Server-assigned provider identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProviderId(pub i64);

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProviderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Canonical provider record as exchanged with the remote resource.
///
/// Transient edit state is deliberately not part of this record; the store
/// keeps it in a side map so a full-list replace from a poll cannot clobber
/// an in-progress edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub wait_time: i32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub show_wait_time: bool,
}

/// Payload for creating a provider; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProvider {
    pub name: String,
    pub wait_time: i32,
    pub visible: bool,
    pub show_wait_time: bool,
}

impl NewProvider {
    pub fn new(name: impl Into<String>, wait_time: i32) -> Self {
        Self {
            name: name.into(),
            wait_time,
            visible: true,
            show_wait_time: true,
        }
    }
}

/// One row of the public display projection.
///
/// `wait_time` is `None` when the provider opted out of showing it.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEntry {
    pub name: String,
    pub wait_time: Option<i32>,
}

fn default_true() -> bool {
    true
}
