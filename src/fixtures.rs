// 📂 Fixtures - flat records from JSON and CSV files
//
// A dataset document holds a seed set plus the account books to assemble
// once the seed is in the registry.

use crate::dispatcher::{BuildPass, SeedSet};
use crate::entities::{AccountBook, Id};
use crate::error::BuildError;
use crate::views::AccountBookView;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Load any deserializable value from a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))
}

/// Load one view per CSV row; the header row names the view fields
pub fn load_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut records = Vec::new();
    for (row, result) in rdr.deserialize().enumerate() {
        let record: T = result.with_context(|| format!("Failed to deserialize CSV row {}", row + 1))?;
        records.push(record);
    }

    Ok(records)
}

// ============================================================================
// DATASET
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub seed: SeedSet,
    pub account_books: Vec<AccountBookView>,
}

impl Dataset {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        load_json(path)
    }

    /// Seed the pass, then assemble every account book in file order
    pub fn build_into(self, pass: &mut BuildPass<'_>) -> Result<Vec<Id<AccountBook>>, BuildError> {
        pass.seed(self.seed)?;

        let mut books = Vec::with_capacity(self.account_books.len());
        for view in self.account_books {
            books.push(pass.build_account_book(view)?);
        }
        Ok(books)
    }
}

// ============================================================================
// TESTS
// ============================================================================
