//! Gzip-compressed JSON calibration tables.
//!
//! A table file holds the two grid axes (`lognh`, `gamma`) at the top level
//! next to a tree of selectors whose leaves are `[lognh][gamma]` arrays of
//! ECFs in units of 1e11 cm^2/erg.

use crate::common::DataConfig;
use crate::domain::{Correction, EcfError, EcfResult, Mission};
use crate::numerics::{EcfGrid, GridAxis};
use flate2::read::GzDecoder;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const LOGNH_KEY: &str = "lognh";
pub const GAMMA_KEY: &str = "gamma";

#[derive(Debug, Deserialize)]
struct RawTable {
    lognh: Vec<f64>,
    gamma: Vec<f64>,
    #[serde(flatten)]
    entries: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct CalibrationTable {
    source: PathBuf,
    lognh: Vec<f64>,
    gamma: Vec<f64>,
    entries: Map<String, Value>,
}

impl CalibrationTable {
    pub fn load(path: &Path) -> EcfResult<Self> {
        let file = File::open(path).map_err(|source| {
            EcfError::data_load(
                "DATA.TABLE_OPEN",
                format!("failed to open calibration table '{}': {}", path.display(), source),
            )
        })?;
        let decoder = GzDecoder::new(BufReader::new(file));
        let raw: RawTable = serde_json::from_reader(decoder).map_err(|source| {
            EcfError::data_load(
                "DATA.TABLE_PARSE",
                format!(
                    "failed to decode calibration table '{}': {}",
                    path.display(),
                    source
                ),
            )
        })?;

        debug!(
            table = %path.display(),
            lognh_nodes = raw.lognh.len(),
            gamma_nodes = raw.gamma.len(),
            "loaded calibration table"
        );

        Ok(Self {
            source: path.to_path_buf(),
            lognh: raw.lognh,
            gamma: raw.gamma,
            entries: raw.entries,
        })
    }

    pub fn load_for(
        config: &DataConfig,
        mission: Mission,
        correction: Correction,
    ) -> EcfResult<Self> {
        Self::load(&config.table_path(mission, correction))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn lognh(&self) -> &[f64] {
        &self.lognh
    }

    pub fn gamma(&self) -> &[f64] {
        &self.gamma
    }

    /// Keys available one level below `selectors`.
    pub fn keys_at(&self, selectors: &[&str]) -> EcfResult<Vec<String>> {
        let node = self.walk(selectors)?;
        match node {
            Value::Object(map) => Ok(map.keys().cloned().collect()),
            _ => Ok(Vec::new()),
        }
    }

    /// Extracts the grid stored under `selectors`.
    pub fn grid(&self, selectors: &[&str]) -> EcfResult<EcfGrid> {
        let leaf = self.walk(selectors)?;
        let values: Vec<Vec<f64>> = Vec::<Vec<f64>>::deserialize(leaf).map_err(|source| {
            EcfError::data_load(
                "DATA.TABLE_ENTRY",
                format!(
                    "entry {} in '{}' is not a 2-D array of numbers: {}",
                    render_selectors(selectors),
                    self.source.display(),
                    source
                ),
            )
        })?;

        let grid = GridAxis::new(LOGNH_KEY, self.lognh.clone())
            .and_then(|rows| {
                GridAxis::new(GAMMA_KEY, self.gamma.clone())
                    .and_then(|columns| EcfGrid::new(rows, columns, values))
            })
            .map_err(|source| {
                EcfError::data_load(
                    "DATA.TABLE_GRID",
                    format!(
                        "entry {} in '{}' is not a valid grid: {}",
                        render_selectors(selectors),
                        self.source.display(),
                        source
                    ),
                )
            })?;

        debug!(
            table = %self.source.display(),
            entry = %render_selectors(selectors),
            "extracted ECF grid"
        );
        Ok(grid)
    }

    fn walk(&self, selectors: &[&str]) -> EcfResult<&Value> {
        let Some((first, rest)) = selectors.split_first() else {
            return Err(EcfError::internal(
                "INTERNAL.TABLE_SELECTORS",
                "table lookup requires at least one selector",
            ));
        };

        let mut node = self
            .entries
            .get(*first)
            .ok_or_else(|| self.missing_entry(&selectors[..1]))?;
        for (depth, selector) in rest.iter().enumerate() {
            node = node
                .get(*selector)
                .ok_or_else(|| self.missing_entry(&selectors[..depth + 2]))?;
        }
        Ok(node)
    }

    fn missing_entry(&self, selectors: &[&str]) -> EcfError {
        EcfError::data_load(
            "DATA.TABLE_ENTRY",
            format!(
                "calibration table '{}' has no entry {}",
                self.source.display(),
                render_selectors(selectors)
            ),
        )
    }
}

fn render_selectors(selectors: &[&str]) -> String {
    selectors
        .iter()
        .map(|selector| format!("[{}]", selector))
        .collect::<String>()
}

/// Absorbed and absorption-corrected grids for one instrument selection.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPair {
    absorbed: EcfGrid,
    corrected: EcfGrid,
}

impl GridPair {
    pub fn load(config: &DataConfig, mission: Mission, selectors: &[&str]) -> EcfResult<Self> {
        let absorbed =
            CalibrationTable::load_for(config, mission, Correction::Absorbed)?.grid(selectors)?;
        let corrected =
            CalibrationTable::load_for(config, mission, Correction::AbsorptionCorrected)?
                .grid(selectors)?;
        Ok(Self {
            absorbed,
            corrected,
        })
    }

    pub fn get(&self, correction: Correction) -> &EcfGrid {
        match correction {
            Correction::Absorbed => &self.absorbed,
            Correction::AbsorptionCorrected => &self.corrected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EcfErrorCategory;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_gz(path: &Path, payload: &[u8]) {
        let file = File::create(path).expect("table file should be created");
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(payload).expect("payload should compress");
        encoder.finish().expect("gzip stream should finish");
    }

    fn sample_table(temp: &TempDir) -> PathBuf {
        let path = temp.path().join("erosita_ecfs.json.gz");
        let document = json!({
            "lognh": [20.0, 21.0],
            "gamma": [1.0, 2.0, 3.0],
            "e1": {
                "SOFT": [[10.0, 11.0, 12.0], [8.0, 9.0, 10.0]],
                "BROKEN": [[1.0, 2.0]]
            }
        });
        write_gz(&path, document.to_string().as_bytes());
        path
    }

    #[test]
    fn nested_entries_become_grids() {
        let temp = TempDir::new().expect("tempdir should be created");
        let table = CalibrationTable::load(&sample_table(&temp)).unwrap();

        assert_eq!(table.lognh(), &[20.0, 21.0]);
        assert_eq!(table.keys_at(&["e1"]).unwrap(), vec!["BROKEN", "SOFT"]);

        let grid = table.grid(&["e1", "SOFT"]).unwrap();
        assert_eq!(grid.value_at(1, 2), Some(10.0));
        assert_eq!(grid.interpolate(20.5, 2.0).unwrap(), 10.0);
    }

    #[test]
    fn missing_entries_name_the_full_selector_path() {
        let temp = TempDir::new().expect("tempdir should be created");
        let table = CalibrationTable::load(&sample_table(&temp)).unwrap();

        let error = table.grid(&["e1", "HARD"]).expect_err("HARD is absent");
        assert_eq!(error.category(), EcfErrorCategory::DataLoad);
        assert_eq!(error.placeholder(), "DATA.TABLE_ENTRY");
        assert!(error.message().contains("[e1][HARD]"));

        let error = table.grid(&["e2", "SOFT"]).expect_err("e2 is absent");
        assert!(error.message().ends_with("[e2]"));
    }

    #[test]
    fn malformed_grids_are_load_errors() {
        let temp = TempDir::new().expect("tempdir should be created");
        let table = CalibrationTable::load(&sample_table(&temp)).unwrap();

        let error = table.grid(&["e1", "BROKEN"]).expect_err("shape mismatch");
        assert_eq!(error.placeholder(), "DATA.TABLE_GRID");

        let error = table.grid(&["e1"]).expect_err("object is not an array");
        assert_eq!(error.placeholder(), "DATA.TABLE_ENTRY");
    }

    #[test]
    fn missing_and_corrupt_files_fail_to_load() {
        let temp = TempDir::new().expect("tempdir should be created");

        let error = CalibrationTable::load(&temp.path().join("absent.json.gz"))
            .expect_err("file does not exist");
        assert_eq!(error.placeholder(), "DATA.TABLE_OPEN");
        assert_eq!(error.exit_code(), 3);

        let plain = temp.path().join("plain.json.gz");
        std::fs::write(&plain, b"{\"lognh\": []}").expect("plain file should be written");
        let error = CalibrationTable::load(&plain).expect_err("not gzip");
        assert_eq!(error.placeholder(), "DATA.TABLE_PARSE");

        let truncated = temp.path().join("truncated.json.gz");
        write_gz(&truncated, b"{\"lognh\": [20.0, 21.0], \"gamma\": [1.0");
        let error = CalibrationTable::load(&truncated).expect_err("truncated json");
        assert_eq!(error.category(), EcfErrorCategory::DataLoad);
    }
}
