//! File-based persistence for the tape.
//!
//! Two formats: JSON Lines (`.jsonl`, one record per line) for full
//! fidelity, and a plain CSV trade dump for eyeballing a session.
//!
//! # Usage
//!
//! ```ignore
//! use darkbook::{persistence, FlushMode};
//! use std::path::Path;
//!
//! // Save the tape, wiping it afterwards
//! let records = book.flush_tape(FlushMode::Wipe);
//! persistence::save_tape(&records, Path::new("session.jsonl")).unwrap();
//! ```

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::tape::TapeRecord;

/// Save tape records to a file in JSON Lines format.
///
/// Each record is serialized as one JSON object per line.
pub fn save_tape(records: &[TapeRecord], path: &Path) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);

    for record in records {
        let json =
            serde_json::to_string(record).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        writeln!(writer, "{}", json)?;
    }

    writer.flush()?;
    Ok(())
}

/// Load tape records from a JSON Lines file.
///
/// Each line is parsed as one JSON record. Empty lines are skipped.
pub fn load_tape(path: &Path) -> io::Result<Vec<TapeRecord>> {
    let file = std::fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    let mut records = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: TapeRecord = serde_json::from_str(line).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {}: {}", line_num + 1, e),
            )
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Dump the executed trades to a CSV file.
///
/// Writes a `time, quantity, price` header and one row per trade, in tape
/// order. Cancellations are skipped.
pub fn dump_trades_csv(records: &[TapeRecord], path: &Path) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);

    writeln!(writer, "time, quantity, price")?;
    for record in records {
        if let TapeRecord::Trade(trade) = record {
            writeln!(writer, "{}, {}, {}", trade.time, trade.quantity, trade.price.0)?;
        }
    }

    writer.flush()?;
    Ok(())
}
