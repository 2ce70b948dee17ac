//! eROSITA on board Spektr-RG.
//!
//! Tables are keyed by `[epoch][band]`. Bands cover the eRASS1 catalogue
//! bands, the upper-limit server bands and the two standard bands.

use super::estimator::{EcfEstimator, EstimatorCore};
use crate::common::{EpochSpec, EstimatorOptions, resolve_epoch, start_of_day};
use crate::domain::{Ecf, EcfResult, EnergyBand, Mission, SpectralQuery, find_band};
use chrono::{NaiveDate, NaiveDateTime};

pub const EROSITA_BANDS: [EnergyBand; 17] = [
    EnergyBand::new("1", 0.2, 2.3),
    EnergyBand::new("5", 0.5, 2.0),
    EnergyBand::new("P1", 0.2, 0.5),
    EnergyBand::new("P2", 0.5, 1.0),
    EnergyBand::new("P3", 1.0, 2.0),
    EnergyBand::new("P4", 2.0, 5.0),
    EnergyBand::new("P5", 5.0, 8.0),
    EnergyBand::new("P6", 4.0, 10.0),
    EnergyBand::new("P7", 5.1, 6.1),
    EnergyBand::new("P8", 6.2, 7.1),
    EnergyBand::new("P9", 7.2, 8.2),
    EnergyBand::new("021", 0.2, 0.6),
    EnergyBand::new("022", 0.6, 2.3),
    EnergyBand::new("023", 2.3, 5.0),
    EnergyBand::new("02e", 0.2, 5.0),
    EnergyBand::new("SOFT", 0.5, 2.0),
    EnergyBand::new("HARD", 2.0, 10.0),
];

pub const EROSITA_EPOCHS: [EpochSpec; 1] = [EpochSpec::ongoing("e1", "2019-10-17")];

const DEFAULT_EPOCH: &str = "e1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErositaConfig {
    pub band: String,
    pub observed_at: Option<NaiveDateTime>,
}

impl ErositaConfig {
    pub fn new(band: impl Into<String>) -> Self {
        Self {
            band: band.into(),
            observed_at: None,
        }
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

impl Default for ErositaConfig {
    fn default() -> Self {
        Self::new("SOFT")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Erosita {
    core: EstimatorCore,
}

impl Erosita {
    pub fn new(config: &ErositaConfig, options: &EstimatorOptions) -> EcfResult<Self> {
        let band = find_band(&EROSITA_BANDS, Mission::Erosita, &config.band)?;
        let epoch = resolve_epoch(
            &EROSITA_EPOCHS,
            Mission::Erosita,
            config.observed_at,
            DEFAULT_EPOCH,
        )?;
        let selectors = [epoch, band.name];
        let core = EstimatorCore::load(Mission::Erosita, band, epoch, &selectors, options)?;
        Ok(Self { core })
    }
}

impl EcfEstimator for Erosita {
    fn mission(&self) -> Mission {
        Mission::Erosita
    }

    fn band(&self) -> EnergyBand {
        self.core.band()
    }

    fn epoch(&self) -> &'static str {
        self.core.epoch()
    }

    fn selection(&self) -> String {
        "eROSITA".to_string()
    }

    fn estimate(&self, query: &SpectralQuery) -> EcfResult<Ecf> {
        self.core.evaluate(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DataConfig;
    use crate::domain::EcfErrorCategory;

    #[test]
    fn unknown_band_fails_before_touching_tables() {
        let options = EstimatorOptions::new(DataConfig::new("/nonexistent/ecfxa-tables"));
        let error = Erosita::new(&ErositaConfig::new("P10"), &options).expect_err("P10 is unknown");
        assert_eq!(error.category(), EcfErrorCategory::Configuration);
        assert_eq!(error.placeholder(), "CONFIG.UNKNOWN_BAND");
    }

    #[test]
    fn dates_before_first_light_are_rejected() {
        let options = EstimatorOptions::new(DataConfig::new("/nonexistent/ecfxa-tables"));
        let date = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        let error = Erosita::new(&ErositaConfig::new("SOFT").with_date(date), &options)
            .expect_err("eROSITA was not observing in 2018");
        assert_eq!(error.placeholder(), "CONFIG.DATE_OUT_OF_MISSION");
    }

    #[test]
    fn missing_tables_are_load_errors() {
        let options = EstimatorOptions::new(DataConfig::new("/nonexistent/ecfxa-tables"));
        let error = Erosita::new(&ErositaConfig::default(), &options).expect_err("no tables");
        assert_eq!(error.category(), EcfErrorCategory::DataLoad);
    }
}
