use serde_json::Value;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const CREATOR_COLUMN: &str = "token_creator";
pub const OTHER_CONTRACTS_COLUMN: &str = "other_contracts";

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Failed to serialize cell: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Rows of creator addresses as read from CSV. Cells are kept as the raw
/// strings found in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    address_column: usize,
}

impl CreatorTable {
    pub fn read_csv(path: impl AsRef<Path>, address_column: &str) -> Result<Self, TableError> {
        let path = path.as_ref();
        log::info!("Reading creator table from {}", path.display());
        let file = File::open(path).inspect_err(|e| log::error!("{}: {e}", path.display()))?;
        Self::from_reader(file, address_column)
    }

    pub fn from_reader<R: Read>(reader: R, address_column: &str) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let address_column = headers
            .iter()
            .position(|h| h == address_column)
            .ok_or_else(|| TableError::MissingColumn(address_column.to_string()))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(String::from).collect());
        }

        Ok(Self {
            headers,
            rows,
            address_column,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row[self.address_column].as_str())
    }
}

/// A creator table with one `other_contracts` value per row.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTable {
    table: CreatorTable,
    other_contracts: Vec<Option<Value>>,
}

impl EnrichedTable {
    pub(crate) fn new(table: CreatorTable, other_contracts: Vec<Option<Value>>) -> Self {
        debug_assert_eq!(table.len(), other_contracts.len());
        Self {
            table,
            other_contracts,
        }
    }

    pub fn table(&self) -> &CreatorTable {
        &self.table
    }

    pub fn other_contracts(&self) -> &[Option<Value>] {
        &self.other_contracts
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let path = path.as_ref();
        let file = File::create(path).inspect_err(|e| log::error!("{}: {e}", path.display()))?;
        self.to_writer(file)?;
        log::info!("Wrote {} rows to {}", self.table.len(), path.display());
        Ok(())
    }

    /// Writes a leading unnamed index column, the original columns, then
    /// `other_contracts` as compact JSON (empty when unresolved). An
    /// existing `other_contracts` column is overwritten in place.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut writer = csv::Writer::from_writer(writer);

        let existing = self
            .table
            .headers
            .iter()
            .position(|h| h == OTHER_CONTRACTS_COLUMN);

        let mut header = Vec::with_capacity(self.table.headers.len() + 2);
        header.push(String::new());
        header.extend(self.table.headers.iter().cloned());
        if existing.is_none() {
            header.push(OTHER_CONTRACTS_COLUMN.to_string());
        }
        writer.write_record(&header)?;

        for (i, (row, contracts)) in self
            .table
            .rows
            .iter()
            .zip(&self.other_contracts)
            .enumerate()
        {
            let cell = match contracts {
                Some(value) => serde_json::to_string(value)?,
                None => String::new(),
            };

            let mut record = Vec::with_capacity(header.len());
            record.push(i.to_string());
            record.extend(row.iter().cloned());
            match existing {
                Some(pos) => record[pos + 1] = cell,
                None => record.push(cell),
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}
