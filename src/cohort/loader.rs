//! Load batches of simulation parameters from CSV

use super::{SimulationParameters, Sex, MEDIAN_QUANTILE};
use crate::error::{LevError, Result};
use csv::Reader;
use std::path::Path;

/// Raw CSV row; header `Id,Age,Sex,StartScore,TargetScore,HorizonYear,Optimism,CurrentYear,Protocol,Quantile`
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Id")]
    id: u32,
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "Sex")]
    sex: String,
    #[serde(rename = "StartScore")]
    start_score: u32,
    #[serde(rename = "TargetScore")]
    target_score: u32,
    #[serde(rename = "HorizonYear")]
    horizon_year: i32,
    #[serde(rename = "Optimism")]
    optimism: i32,
    #[serde(rename = "CurrentYear")]
    current_year: i32,
    #[serde(rename = "Protocol")]
    protocol: String,
    #[serde(rename = "Quantile", default)]
    quantile: Option<u32>,
}

impl CsvRow {
    fn into_params(self) -> Result<(u32, SimulationParameters)> {
        let sex: Sex = self.sex.parse()?;

        let is_protocol = match self.protocol.to_ascii_lowercase().as_str() {
            "y" | "yes" | "true" | "1" => true,
            "n" | "no" | "false" | "0" => false,
            _ => {
                return Err(LevError::InvalidParameter {
                    field: "is_protocol",
                    value: self.protocol,
                    reason: "expected Y/N",
                })
            }
        };

        let params = SimulationParameters {
            start_age: self.age,
            sex,
            start_score: self.start_score,
            target_score: self.target_score,
            horizon_year: self.horizon_year,
            optimism: self.optimism,
            current_year: self.current_year,
            is_protocol,
            progress_quantile: self.quantile.unwrap_or(MEDIAN_QUANTILE),
        };

        Ok((self.id, params))
    }
}

/// Load parameter sets from a CSV file, keyed by their `Id` column
pub fn load_parameters<P: AsRef<Path>>(path: P) -> Result<Vec<(u32, SimulationParameters)>> {
    let reader = Reader::from_path(path)?;
    collect_rows(reader)
}

/// Load parameter sets from any reader (e.g., string buffer)
pub fn load_parameters_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<(u32, SimulationParameters)>> {
    collect_rows(Reader::from_reader(reader))
}

fn collect_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<(u32, SimulationParameters)>> {
    let mut rows = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        rows.push(row.into_params()?);
    }

    log::info!("Loaded {} parameter sets", rows.len());
    Ok(rows)
}
