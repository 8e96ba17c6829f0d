use crate::error::{AppError, AppResult};
use crate::models::SubsidyRecord;

/// CSV 表头，与 SubsidyRecord 字段顺序一致
pub const CSV_HEADER: [&str; 9] = [
    "province",
    "city",
    "county",
    "date_from",
    "date_to",
    "subsidy_type",
    "price",
    "unit",
    "备注",
];

/// Append-only list of the records entered in one session.
#[derive(Debug, Clone, Default)]
pub struct RecordCollector {
    records: Vec<SubsidyRecord>,
}

impl RecordCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: SubsidyRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[SubsidyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// UTF-8 CSV of all records in insertion order. The header row is always
    /// written, so an empty collector exports a header-only file.
    pub fn export(&self) -> AppResult<Vec<u8>> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(vec![]);

        csv_writer.write_record(CSV_HEADER)?;
        for record in &self.records {
            csv_writer.serialize(record)?;
        }

        csv_writer
            .into_inner()
            .map_err(|e| AppError::InternalError(format!("Failed to flush CSV: {e}")))
    }
}
