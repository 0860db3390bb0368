//! Airport metadata loading and listing.
//!
//! The airport mapping is a CSV file with at least `airport_id` and
//! `airport_name` columns, loaded once at process start and treated as
//! read-only afterwards.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single airport known to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    /// Numeric airport identifier as used by the delay model.
    pub airport_id: i64,
    /// Human-readable airport name.
    pub airport_name: String,
}

/// Collection of airports loaded from the mapping CSV.
#[derive(Debug, Clone, Default)]
pub struct AirportDirectory {
    airports: Vec<Airport>,
    source: Option<PathBuf>,
}

impl AirportDirectory {
    /// Load the airport mapping from a file path.
    ///
    /// A missing file is a fatal startup condition and yields
    /// [`Error::AirportsNotFound`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::AirportsNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = fs::File::open(path)?;
        let mut directory = Self::from_reader(file)?;
        directory.source = Some(path.to_path_buf());
        Ok(directory)
    }

    /// Load the airport mapping from a reader (e.g., file or in-memory buffer).
    ///
    /// Columns beyond `airport_id` and `airport_name` are ignored; a record
    /// missing either required column fails the whole load.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let mut airports = Vec::new();
        for record in csv_reader.deserialize::<Airport>() {
            airports.push(record?);
        }

        Ok(Self {
            airports,
            source: None,
        })
    }

    /// Number of airports in the directory.
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Whether the directory holds no airports.
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Iterate over airports in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Airport> {
        self.airports.iter()
    }

    /// Path the directory was loaded from, if it came from a file.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// All airports sorted ascending by name.
    ///
    /// The sort is stable and compares names with the string's own `Ord`
    /// (case-sensitive). No filtering, no pagination.
    pub fn sorted_by_name(&self) -> Vec<Airport> {
        let mut airports = self.airports.clone();
        airports.sort_by(|a, b| a.airport_name.cmp(&b.airport_name));
        airports
    }
}
