//! Type definitions for the Trello board export document.
//!
//! Only the parts of the export that end up in the CSV are modelled; every other key
//! in the document is ignored by serde. The top-level `cards` array is the one thing a
//! document must carry to count as a board export. `lists`, `members` and `labels`
//! default to empty when absent.
//!
//! Example (trimmed):
//! ```json
//! {
//!   "name": "Roadmap",
//!   "lists":   [{ "id": "L1", "name": "To Do" }],
//!   "cards":   [{ "id": "C1", "name": "Ship it", "desc": "", "idList": "L1",
//!                 "idMembers": ["M1"], "idLabels": ["B1"],
//!                 "start": null, "due": "2024-03-01T12:00:00.000Z" }],
//!   "members": [{ "id": "M1", "fullName": "Ada Lovelace", "username": "ada" }],
//!   "labels":  [{ "id": "B1", "name": "", "color": "green" }]
//! }
//! ```
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Board {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub lists: Vec<List>,
    pub cards: Vec<Card>,
    #[serde(default, deserialize_with = "nullable")]
    pub members: Vec<Member>,
    #[serde(default, deserialize_with = "nullable")]
    pub labels: Vec<Label>,
}

/// A column on the board ("bucket").
#[derive(Debug, Clone, Default, Deserialize)]
pub struct List {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<String>,
}

impl Member {
    /// `fullName`, then `username`, then `email`. Blank values are skipped.
    pub fn display_name(&self) -> Option<&str> {
        [&self.full_name, &self.username, &self.email]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Label {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub color: Option<String>,
}

/// Shown for labels that have neither a name nor a color.
pub const UNNAMED_LABEL: &str = "unnamed";

impl Label {
    pub fn display_name(&self) -> &str {
        [&self.name, &self.color]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.is_empty())
            .unwrap_or(UNNAMED_LABEL)
    }
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default, deserialize_with = "nullable")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "string_ref")]
    pub id_list: Option<String>,
    #[serde(default, deserialize_with = "string_refs")]
    pub id_members: Vec<String>,
    #[serde(default, deserialize_with = "string_refs")]
    pub id_labels: Vec<String>,
    /// Label objects embedded in the card. Older exports carry these instead of `idLabels`.
    #[serde(default, deserialize_with = "nullable")]
    pub labels: Vec<Label>,
    /// Kept as raw JSON: a malformed date must never fail the whole document.
    #[serde(default)]
    pub start: Option<Value>,
    #[serde(default)]
    pub due: Option<Value>,
}

/// Treat an explicit `null` the same as a missing key.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A reference that is not a string cannot resolve, so it is read as absent.
fn string_ref<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Some(id),
        _ => None,
    })
}

/// Keep only the string entries of a reference array; anything else yields no ids.
fn string_refs<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(id) => Some(id),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Parse a board export from raw bytes.
pub fn parse_board(bytes: &[u8]) -> serde_json::Result<Board> {
    serde_json::from_slice(bytes)
}
