//! Swift/XRT in windowed-timing and photon-counting modes.
//!
//! Tables are keyed by `[mode][epoch][grade][band]`; epochs follow the XRT
//! calibration releases.

use super::estimator::{EcfEstimator, EstimatorCore};
use crate::common::{EpochSpec, EstimatorOptions, resolve_epoch, start_of_day};
use crate::domain::{Ecf, EcfError, EcfResult, EnergyBand, Mission, SpectralQuery, find_band};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const SWIFT_BANDS: [EnergyBand; 6] = [
    EnergyBand::new("0", 0.3, 10.0),
    EnergyBand::new("1", 0.3, 1.0),
    EnergyBand::new("2", 1.0, 2.0),
    EnergyBand::new("3", 2.0, 10.0),
    EnergyBand::new("SOFT", 0.5, 2.0),
    EnergyBand::new("HARD", 2.0, 10.0),
];

pub const SWIFT_EPOCHS: [EpochSpec; 8] = [
    EpochSpec::closed("e1", "2004-12-01", "2007-01-01"),
    EpochSpec::closed("e2", "2007-01-01", "2007-08-31"),
    EpochSpec::closed("e3", "2007-08-31", "2009-01-01"),
    EpochSpec::closed("e4", "2009-01-01", "2011-01-01"),
    EpochSpec::closed("e5", "2011-01-01", "2013-01-01"),
    EpochSpec::closed("e6", "2013-01-01", "2013-12-12"),
    EpochSpec::closed("e7", "2013-12-12", "2021-01-01"),
    EpochSpec::ongoing("e8", "2021-01-01"),
];

const DEFAULT_EPOCH: &str = "e6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwiftMode {
    Wt,
    Pc,
}

impl SwiftMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wt => "wt",
            Self::Pc => "pc",
        }
    }

    pub const fn grades(self) -> &'static [&'static str] {
        match self {
            Self::Wt => &["0", "02"],
            Self::Pc => &["0", "04", "012"],
        }
    }
}

impl Display for SwiftMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for SwiftMode {
    type Err = EcfError;

    fn from_str(token: &str) -> EcfResult<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "wt" => Ok(Self::Wt),
            "pc" => Ok(Self::Pc),
            _ => Err(EcfError::configuration(
                "CONFIG.UNKNOWN_MODE",
                format!("unknown XRT mode '{}'; expected wt or pc", token),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwiftConfig {
    pub mode: SwiftMode,
    pub grade: String,
    pub band: String,
    pub observed_at: Option<NaiveDateTime>,
}

impl SwiftConfig {
    pub fn new(mode: SwiftMode) -> Self {
        Self {
            mode,
            grade: "0".to_string(),
            band: "SOFT".to_string(),
            observed_at: None,
        }
    }

    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = grade.into();
        self
    }

    pub fn with_band(mut self, band: impl Into<String>) -> Self {
        self.band = band.into();
        self
    }

    /// Observation at midnight of `date`.
    pub fn with_date(self, date: NaiveDate) -> Self {
        self.with_observed_at(start_of_day(date))
    }

    pub fn with_observed_at(mut self, observed_at: NaiveDateTime) -> Self {
        self.observed_at = Some(observed_at);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwiftXrt {
    mode: SwiftMode,
    grade: &'static str,
    core: EstimatorCore,
}

impl SwiftXrt {
    pub fn new(config: &SwiftConfig, options: &EstimatorOptions) -> EcfResult<Self> {
        let grade = parse_grade(config.mode, &config.grade)?;
        let band = find_band(&SWIFT_BANDS, Mission::SwiftXrt, &config.band)?;
        let epoch = resolve_epoch(
            &SWIFT_EPOCHS,
            Mission::SwiftXrt,
            config.observed_at,
            DEFAULT_EPOCH,
        )?;
        let selectors = [config.mode.as_str(), epoch, grade, band.name];
        let core = EstimatorCore::load(Mission::SwiftXrt, band, epoch, &selectors, options)?;
        Ok(Self {
            mode: config.mode,
            grade,
            core,
        })
    }

    pub fn mode(&self) -> SwiftMode {
        self.mode
    }

    pub fn grade(&self) -> &'static str {
        self.grade
    }
}

fn parse_grade(mode: SwiftMode, grade: &str) -> EcfResult<&'static str> {
    mode.grades()
        .iter()
        .copied()
        .find(|candidate| *candidate == grade)
        .ok_or_else(|| {
            EcfError::configuration(
                "CONFIG.UNKNOWN_GRADE",
                format!(
                    "unknown grade '{}' for XRT {} mode; expected one of {}",
                    grade,
                    mode,
                    mode.grades().join(", ")
                ),
            )
        })
}

impl EcfEstimator for SwiftXrt {
    fn mission(&self) -> Mission {
        Mission::SwiftXrt
    }

    fn band(&self) -> EnergyBand {
        self.core.band()
    }

    fn epoch(&self) -> &'static str {
        self.core.epoch()
    }

    fn selection(&self) -> String {
        format!("XRT/{}/grade {}", self.mode, self.grade)
    }

    fn estimate(&self, query: &SpectralQuery) -> EcfResult<Ecf> {
        self.core.evaluate(query)
    }
}
