//! # trello-csv
//!
//! A CLI tool that converts [Trello](https://trello.com) board exports (JSON) into flat
//! CSV files, one row per card.
//!
//! ## What it does
//!
//! A board export is a single JSON document holding the board's lists, cards, members
//! and labels, with cards pointing at the others by id. This tool resolves those ids and
//! writes each card as a row with the columns
//!
//! `Title, List (Bucket), Description, Start Date, Due Date, Assigned To, Labels`
//!
//! Members and labels are joined with `; `, dates are reduced to `YYYY-MM-DD`. Ids that
//! point nowhere and dates that do not parse become empty fields; no card is ever dropped.
//!
//! ## Usage
//!
//! ```sh
//! # One board; writes "<board name>.csv" next to the export
//! trello-csv export.json
//!
//! # One board to an explicit file (replaced if it exists)
//! trello-csv export.json roadmap.csv
//!
//! # Every *.json in a directory, CSVs beside them or in a separate directory
//! trello-csv exports/
//! trello-csv exports/ csv/
//! ```
//!
//! Derived file names never overwrite: `Board.csv` becomes `Board_1.csv`, `Board_2.csv`, ….
//! Preferences can be persisted in `~/.config/trello-csv/config.toml`.
//!
//! The exit status is nonzero if any file failed; per-file errors go to stderr.

pub mod board;
pub mod error;
pub mod exporter;
pub mod output;
pub mod process;
pub mod projector;
pub mod resolver;
pub mod utils;

pub use error::ConvertError;
