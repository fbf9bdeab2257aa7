use crate::projector::FlatRecord;
use csv::WriterBuilder;
use std::io::{self, Write};

/// Column order of every generated file.
pub const HEADERS: [&str; 7] = [
    "Title",
    "List (Bucket)",
    "Description",
    "Start Date",
    "Due Date",
    "Assigned To",
    "Labels",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write a header row followed by one row per record, in order.
///
/// Fields are quoted only when they contain a comma, a quote or a line break;
/// embedded quotes are doubled. With `bom` set the output starts with a UTF-8
/// byte-order mark so spreadsheet tools pick the right encoding.
pub fn write_csv<W: Write>(writer: W, records: &[FlatRecord], bom: bool) -> io::Result<()> {
    let mut writer = writer;
    if bom {
        writer.write_all(UTF8_BOM)?;
    }

    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(HEADERS)?;
    for record in records {
        csv.write_record(record.fields())?;
    }
    csv.flush()?;
    Ok(())
}
