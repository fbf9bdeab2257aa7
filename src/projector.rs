use crate::board::{Board, Card};
use crate::resolver::References;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Separator used for the `Assigned To` and `Labels` columns.
pub const JOIN_SEPARATOR: &str = "; ";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One CSV row: the denormalized projection of a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatRecord {
    pub title: String,
    pub list: String,
    pub description: String,
    pub start_date: String,
    pub due_date: String,
    pub assigned_to: String,
    pub labels: String,
}

impl FlatRecord {
    /// Fields in column order.
    pub fn fields(&self) -> [&str; 7] {
        [
            &self.title,
            &self.list,
            &self.description,
            &self.start_date,
            &self.due_date,
            &self.assigned_to,
            &self.labels,
        ]
    }
}

/// Project every card of `board`, in document order.
pub fn project_board(board: &Board) -> Vec<FlatRecord> {
    let refs = References::from_board(board);
    board
        .cards
        .iter()
        .map(|card| project_card(card, &refs))
        .collect()
}

pub fn project_card(card: &Card, refs: &References<'_>) -> FlatRecord {
    let list = card
        .id_list
        .as_deref()
        .and_then(|id| refs.list(id))
        .unwrap_or_default();

    let assigned_to = join_names(card.id_members.iter().filter_map(|id| refs.member(id)));

    let labels = if card.id_labels.is_empty() {
        // Embedded label objects: prefer the board's entry, fall back to the copy on the card.
        join_names(
            card.labels
                .iter()
                .map(|l| refs.label(&l.id).unwrap_or_else(|| l.display_name())),
        )
    } else {
        join_names(card.id_labels.iter().filter_map(|id| refs.label(id)))
    };

    FlatRecord {
        title: card.name.clone().unwrap_or_default(),
        list: list.to_string(),
        description: card.desc.clone().unwrap_or_default(),
        start_date: format_date(card.start.as_ref()),
        due_date: format_date(card.due.as_ref()),
        assigned_to,
        labels,
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(JOIN_SEPARATOR)
}

// ISO 8601 date-times: `T` or space separator, seconds and fraction optional.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Render a card date as `YYYY-MM-DD`.
///
/// Accepts ISO 8601 timestamps with or without an offset (`Z` counts as UTC; the date is
/// taken in the timestamp's own offset), with `T` or a space between date and time and
/// with or without seconds, plus bare dates. Anything else, including non-string values,
/// yields `""`.
pub fn format_date(value: Option<&Value>) -> String {
    let Some(Value::String(raw)) = value else {
        return String::new();
    };
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DATE_FORMAT).to_string();
    }

    let zoned = match raw.strip_suffix(['Z', 'z']) {
        Some(local) => format!("{local}+00:00"),
        None => raw.to_string(),
    };
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(&zoned, f).ok())
    {
        return dt.format(DATE_FORMAT).to_string();
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
    {
        return dt.format(DATE_FORMAT).to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return d.format(DATE_FORMAT).to_string();
    }
    String::new()
}
