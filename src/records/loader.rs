//! CSV adapter for roster tables
//!
//! The engine itself is format-agnostic; this is the reader/writer the
//! command-line callers use.

use super::{CellValue, RecordTable, OUTPUT_COLUMNS};
use crate::error::EngineResult;
use csv::{Reader, Writer};
use std::path::Path;

/// Load a roster from a CSV file with a header row
pub fn load_table<P: AsRef<Path>>(path: P) -> EngineResult<RecordTable> {
    let reader = Reader::from_path(path)?;
    read_table(reader)
}

/// Load a roster from any reader (e.g., string buffer, network stream)
pub fn load_table_from_reader<R: std::io::Read>(reader: R) -> EngineResult<RecordTable> {
    read_table(Reader::from_reader(reader))
}

fn read_table<R: std::io::Read>(mut reader: Reader<R>) -> EngineResult<RecordTable> {
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let mut table = RecordTable::new(columns);

    for result in reader.records() {
        let row = result?;
        table.push_row(row.iter().map(CellValue::from_raw).collect())?;
    }

    Ok(table)
}

/// Write the augmented roster: input columns followed by [`OUTPUT_COLUMNS`]
pub fn write_table<W: std::io::Write>(writer: W, table: &RecordTable) -> EngineResult<()> {
    let mut writer = Writer::from_writer(writer);

    let header: Vec<&str> = table
        .columns
        .iter()
        .map(String::as_str)
        .chain(OUTPUT_COLUMNS.iter().copied())
        .collect();
    writer.write_record(&header)?;

    for record in &table.records {
        let outcome = &record.outcome;
        let mut row: Vec<String> = record.cells.iter().map(|c| c.to_string()).collect();
        row.push(format!("{:.2}", outcome.premium));
        row.push(outcome.plan_valid.to_string());
        row.push(outcome.eligible.to_string());
        row.push(outcome.applies.to_string());
        row.push(format!("{:.2}", outcome.benefit_amount));
        row.push(outcome.reason.clone());
        row.push(
            outcome
                .transition
                .map(|t| t.to_string())
                .unwrap_or_default(),
        );
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the augmented roster to a CSV file
pub fn write_table_to_path<P: AsRef<Path>>(path: P, table: &RecordTable) -> EngineResult<()> {
    let file = std::fs::File::create(path)?;
    write_table(file, table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "\
Titular,Parentesco,Estado Civil,Edad,Plan
100,Titular,Casado,40,P1
100,Esposa,Casado,38,P1
200,Titular,,,
";

    #[test]
    fn test_load_table_from_reader() {
        let table = load_table_from_reader(ROSTER.as_bytes()).expect("roster should load");
        assert_eq!(table.columns.len(), 5);
        assert_eq!(table.len(), 3);
        assert_eq!(table.records[1].cells[1], CellValue::Text("Esposa".into()));
        assert_eq!(table.records[2].cells[3], CellValue::Empty);
        assert_eq!(table.records[2].row, 2);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let ragged = "a,b\n1,2\n3\n";
        assert!(load_table_from_reader(ragged.as_bytes()).is_err());
    }

    #[test]
    fn test_write_table_appends_output_columns() {
        let mut table = load_table_from_reader(ROSTER.as_bytes()).unwrap();
        table.records[0].outcome.premium = 100.0;
        table.records[0].outcome.set_reason("no configured value");

        let mut buffer = Vec::new();
        write_table(&mut buffer, &table).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Titular,Parentesco,Estado Civil,Edad,Plan,premium,plan_valid,eligible,applies,benefit_amount,reason,transition"
        );
        assert_eq!(
            lines.next().unwrap(),
            "100,Titular,Casado,40,P1,100.00,false,false,false,0.00,no configured value,"
        );
    }
}
