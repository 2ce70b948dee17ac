//! Location of the calibration tables and estimator options.

use crate::domain::{BoundsPolicy, Correction, Mission};
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "ECFXA_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    data_dir: PathBuf,
}

impl DataConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// `data/` in the crate source tree, fixed at compile time. An installed
    /// binary only finds tables here while that source tree still exists.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Explicit path, then `ECFXA_DATA_DIR`, then the bundled tables.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }

        match std::env::var_os(DATA_DIR_ENV) {
            Some(value) if !value.is_empty() => Self::new(PathBuf::from(value)),
            _ => Self::bundled(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn table_path(&self, mission: Mission, correction: Correction) -> PathBuf {
        self.data_dir.join(table_file_name(mission, correction))
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::resolve(None)
    }
}

pub fn table_file_name(mission: Mission, correction: Correction) -> String {
    format!(
        "{}_{}.json.gz",
        mission.table_stem(),
        correction.table_suffix()
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EstimatorOptions {
    pub data: DataConfig,
    pub bounds: BoundsPolicy,
}

impl EstimatorOptions {
    pub fn new(data: DataConfig) -> Self {
        Self {
            data,
            bounds: BoundsPolicy::Reject,
        }
    }

    pub fn with_bounds(mut self, bounds: BoundsPolicy) -> Self {
        self.bounds = bounds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_follow_mission_and_correction() {
        assert_eq!(
            table_file_name(Mission::Erosita, Correction::Absorbed),
            "erosita_ecfs.json.gz"
        );
        assert_eq!(
            table_file_name(Mission::SwiftXrt, Correction::AbsorptionCorrected),
            "swift_abscorr_ecfs.json.gz"
        );
        assert_eq!(
            table_file_name(Mission::XmmEpic, Correction::Absorbed),
            "xmm_ecfs.json.gz"
        );
    }

    #[test]
    fn explicit_directory_wins() {
        let config = DataConfig::resolve(Some(Path::new("/tmp/tables")));
        assert_eq!(config.data_dir(), Path::new("/tmp/tables"));
        assert_eq!(
            config.table_path(Mission::XmmEpic, Correction::AbsorptionCorrected),
            Path::new("/tmp/tables/xmm_abscorr_ecfs.json.gz")
        );
    }

    #[test]
    fn bundled_directory_lives_in_the_crate() {
        let config = DataConfig::bundled();
        assert!(config.data_dir().ends_with("data"));
        assert!(config.data_dir().starts_with(env!("CARGO_MANIFEST_DIR")));
    }

    #[test]
    fn options_default_to_rejecting_out_of_range_queries() {
        let options = EstimatorOptions::new(DataConfig::bundled());
        assert_eq!(options.bounds, BoundsPolicy::Reject);
        assert_eq!(
            options.with_bounds(BoundsPolicy::Clamp).bounds,
            BoundsPolicy::Clamp
        );
    }
}
