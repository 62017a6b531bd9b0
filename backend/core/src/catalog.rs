//! Reference catalog of known medicines.
//!
//! Loaded once at startup from the CSV dataset and shared read-only across
//! requests. Records keep their file order, which is also the tie-break order
//! of the matching policy.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::types::{normalize_name, CatalogRecord};

/// Column layout of the medicine dataset. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Name of medicine")]
    name: String,
    #[serde(rename = "Full Description", default)]
    full_description: String,
    #[serde(rename = "Side Effects", default)]
    side_effects: String,
}

/// Immutable, ordered medicine table with a case-insensitive name index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
    /// normalized name -> index of the first record with that name
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            index
                .entry(normalize_name(&record.normalized_name))
                .or_insert(i);
        }
        Self { records, index }
    }

    /// Load the catalog from a CSV file on disk.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open catalog file: {}", path.display()))?;
        let catalog = Self::from_reader(file)
            .with_context(|| format!("Failed to load catalog from: {}", path.display()))?;
        info!(path = %path.display(), records = catalog.len(), "Loaded medicine catalog");
        Ok(catalog)
    }

    /// Parse CSV with a header row from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut unnamed = 0usize;
        for (line, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            let row = row.with_context(|| format!("Malformed catalog row {}", line + 1))?;
            // A blank name can never be a match candidate.
            if row.name.trim().is_empty() {
                unnamed += 1;
                continue;
            }
            records.push(CatalogRecord::new(
                &row.name,
                row.full_description,
                row.side_effects,
            ));
        }
        if unnamed > 0 {
            warn!(skipped = unnamed, "Skipped catalog rows without a medicine name");
        }
        debug!(records = records.len(), "Parsed catalog rows");
        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in catalog order.
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    /// First record whose normalized name equals `name`, ignoring case and
    /// surrounding whitespace.
    pub fn find_by_name(&self, name: &str) -> Option<&CatalogRecord> {
        self.index
            .get(&normalize_name(name))
            .map(|&i| &self.records[i])
    }
}
