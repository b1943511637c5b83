//! File-based assumption loader
//!
//! Loads the reference life table (CSV) and model constants (JSON) from a
//! directory, by default data/.

use std::fs::File;
use std::path::Path;

use crate::error::{LevError, Result};

/// Default path to the assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data";

/// File names inside the assumptions directory
pub const LIFE_TABLE_FILE: &str = "reference_life_table.csv";
pub const CONSTANTS_FILE: &str = "model_constants.json";

/// Load life-table anchors from CSV
/// Returns Vec<(age, male_q, female_q)> in file order
pub fn load_life_table_anchors(path: &Path) -> Result<Vec<(usize, f64, f64)>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut anchors = Vec::new();

    for result in reader.records() {
        let record = result?;
        let age: usize = parse_field(&record, 0, "age")?;
        let male: f64 = parse_field(&record, 1, "male")?;
        let female: f64 = parse_field(&record, 2, "female")?;
        anchors.push((age, male, female));
    }

    log::info!("Loaded {} life-table anchors from {}", anchors.len(), path.display());
    Ok(anchors)
}

fn parse_field<T: std::str::FromStr>(record: &csv::StringRecord, idx: usize, column: &str) -> Result<T> {
    let raw = record
        .get(idx)
        .ok_or_else(|| LevError::InvalidLifeTable(format!("missing `{}` column", column)))?;
    raw.trim()
        .parse()
        .map_err(|_| LevError::InvalidLifeTable(format!("cannot parse `{}` value {:?}", column, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_anchors() {
        let path = Path::new(DEFAULT_ASSUMPTIONS_PATH).join(LIFE_TABLE_FILE);
        let anchors = load_life_table_anchors(&path).expect("Failed to load anchors");

        assert_eq!(anchors.first().map(|a| a.0), Some(0));
        assert_eq!(anchors.last().map(|a| a.0), Some(110));
        assert!(anchors.iter().all(|&(_, m, f)| m > 0.0 && f > 0.0));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_life_table_anchors(Path::new("data/does_not_exist.csv"));
        assert!(matches!(result, Err(LevError::Io(_))));
    }
}
