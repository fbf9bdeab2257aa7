use crate::board::Board;
use std::collections::HashMap;

/// Id → display-name lookups for one board, built once per file.
///
/// Lookups return `None` for unknown ids; callers degrade that to an empty field.
#[derive(Debug, Default)]
pub struct References<'a> {
    pub lists: HashMap<&'a str, &'a str>,
    pub members: HashMap<&'a str, &'a str>,
    pub labels: HashMap<&'a str, &'a str>,
}

impl<'a> References<'a> {
    pub fn from_board(board: &'a Board) -> Self {
        let lists = board
            .lists
            .iter()
            .filter(|l| !l.id.is_empty())
            .map(|l| (l.id.as_str(), l.name.as_str()))
            .collect();

        let members = board
            .members
            .iter()
            .filter(|m| !m.id.is_empty())
            .filter_map(|m| m.display_name().map(|name| (m.id.as_str(), name)))
            .collect();

        let labels = board
            .labels
            .iter()
            .filter(|l| !l.id.is_empty())
            .map(|l| (l.id.as_str(), l.display_name()))
            .collect();

        Self {
            lists,
            members,
            labels,
        }
    }

    pub fn list(&self, id: &str) -> Option<&'a str> {
        self.lists.get(id).copied()
    }

    pub fn member(&self, id: &str) -> Option<&'a str> {
        self.members.get(id).copied()
    }

    pub fn label(&self, id: &str) -> Option<&'a str> {
        self.labels.get(id).copied()
    }
}
