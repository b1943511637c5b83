//! Model assumptions: calibration constants and the baseline life table

mod constants;
mod life_table;
pub mod loader;

pub use constants::ModelConstants;
pub use life_table::{MortalityLookup, ReferenceLifeTable, MAX_TABLE_AGE, MISSING_DEATH_PROBABILITY};

use std::path::Path;

use crate::error::Result;

/// Container for all projection assumptions
#[derive(Debug, Clone, Default)]
pub struct Assumptions {
    pub constants: ModelConstants,
    pub life_table: ReferenceLifeTable,
}

impl Assumptions {
    /// Built-in calibration and reference life table
    pub fn default_calibration() -> Self {
        Self::default()
    }

    /// Load assumptions from the default location (data/)
    pub fn from_files() -> Result<Self> {
        Self::from_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from a specific directory
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self {
            constants: ModelConstants::from_json_path(&path.join(loader::CONSTANTS_FILE))?,
            life_table: ReferenceLifeTable::from_csv_path(&path.join(loader::LIFE_TABLE_FILE))?,
        })
    }
}
