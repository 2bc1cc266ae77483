use crate::domain::model::{NormalizedRecord, Record, RecordBatch};
use crate::utils::error::{EtlError, Result};

pub const DEFAULT_NA_VALUES: [&str; 10] = [
    "", "NA", "N/A", "n/a", "NULL", "null", "NaN", "nan", "None", "#N/A",
];

/// Parse a whole delimited file. Cells missing from short rows and cells
/// matching `na_values` become nulls. A row with more cells than the header
/// fails the load.
pub fn read_batch(
    path: &str,
    data: &[u8],
    delimiter: u8,
    na_values: &[String],
) -> Result<RecordBatch> {
    let load_error = |e: csv::Error| EtlError::LoadError {
        path: path.to_string(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(load_error)?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut records = Vec::new();

    for row in reader.records() {
        let row = row.map_err(load_error)?;
        if row.len() > headers.len() {
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            return Err(EtlError::LoadError {
                path: path.to_string(),
                message: format!(
                    "expected {} fields in line {}, saw {}",
                    headers.len(),
                    line,
                    row.len()
                ),
            });
        }

        let mut record = Record::new();
        for (i, header) in headers.iter().enumerate() {
            let value = row
                .get(i)
                .filter(|cell| !na_values.iter().any(|na| na.as_str() == *cell));
            record = record.with(header, value);
        }
        records.push(record);
    }

    tracing::debug!("Read {} records with columns {:?}", records.len(), headers);
    Ok(RecordBatch::new(headers, records))
}

fn writer(delimiter: u8) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

/// Clean rows under the fixed normalized header; nulls are empty cells.
pub fn write_clean(records: &[NormalizedRecord], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = writer(delimiter);
    writer.write_record(NormalizedRecord::HEADERS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    finish(writer)
}

/// Bad rows exactly as read, under the input file's own header.
pub fn write_bad(headers: &[String], records: &[Record], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = writer(delimiter);
    writer.write_record(headers)?;
    for record in records {
        writer.write_record(record.cells.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    finish(writer)
}
