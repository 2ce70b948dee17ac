//! XMM-Newton EPIC cameras (pn, MOS1, MOS2).
//!
//! Tables are keyed by `[detector tag][epoch][mode][band][filter]`. Defaults
//! follow the serendipitous-catalogue conventions: full-frame pn in epoch e2,
//! imaging MOS in epoch e13.

use super::estimator::{EcfEstimator, EstimatorCore};
use crate::common::{EpochSpec, EstimatorOptions, resolve_epoch, start_of_day};
use crate::domain::{Ecf, EcfError, EcfResult, EnergyBand, Mission, SpectralQuery, find_band};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const XMM_BANDS: [EnergyBand; 11] = [
    EnergyBand::new("1", 0.2, 0.5),
    EnergyBand::new("2", 0.5, 1.0),
    EnergyBand::new("3", 1.0, 2.0),
    EnergyBand::new("4", 2.0, 4.5),
    EnergyBand::new("5", 4.5, 12.0),
    EnergyBand::new("6", 0.2, 2.0),
    EnergyBand::new("7", 2.0, 12.0),
    EnergyBand::new("8", 0.2, 12.0),
    EnergyBand::new("9", 0.5, 4.5),
    EnergyBand::new("SOFT", 0.5, 2.0),
    EnergyBand::new("HARD", 2.0, 10.0),
];

pub const XMM_EPN_EPOCHS: [EpochSpec; 4] = [
    EpochSpec::closed("e1", "1999-12-10", "2007-01-01"),
    EpochSpec::closed("e2", "2007-01-01", "2014-01-01"),
    EpochSpec::closed("e3", "2014-01-01", "2021-01-01"),
    EpochSpec::ongoing("e4", "2021-01-01"),
];

pub const XMM_EMOS_EPOCHS: [EpochSpec; 19] = [
    EpochSpec::closed("e1", "1999-12-10", "2000-10-03"),
    EpochSpec::closed("e2", "2000-10-03", "2001-04-22"),
    EpochSpec::closed("e3", "2001-04-22", "2001-11-07"),
    EpochSpec::closed("e4", "2001-11-07", "2002-05-26"),
    EpochSpec::closed("e5", "2002-05-26", "2002-11-05"),
    EpochSpec::closed("e6", "2002-11-05", "2004-01-14"),
    EpochSpec::closed("e7", "2004-01-14", "2005-02-14"),
    EpochSpec::closed("e8", "2005-02-14", "2006-03-22"),
    EpochSpec::closed("e9", "2006-03-22", "2007-04-24"),
    EpochSpec::closed("e10", "2007-04-24", "2008-05-28"),
    EpochSpec::closed("e11", "2008-05-28", "2009-07-01"),
    EpochSpec::closed("e12", "2009-07-01", "2010-08-03"),
    EpochSpec::closed("e13", "2010-08-03", "2011-09-07"),
    EpochSpec::closed("e14", "2011-09-07", "2013-04-27"),
    EpochSpec::closed("e15", "2013-04-27", "2014-12-16"),
    EpochSpec::closed("e16", "2014-12-16", "2016-08-05"),
    EpochSpec::closed("e17", "2016-08-05", "2018-03-26"),
    EpochSpec::closed("e18", "2018-03-26", "2019-11-14"),
    EpochSpec::ongoing("e19", "2019-11-14"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    Epn,
    Emos,
}

impl DetectorKind {
    pub const fn modes(self) -> &'static [&'static str] {
        match self {
            Self::Epn => &["ff", "ef", "sw", "lw"],
            Self::Emos => &["im"],
        }
    }

    pub const fn default_mode(self) -> &'static str {
        match self {
            Self::Epn => "ff",
            Self::Emos => "im",
        }
    }

    pub const fn default_epoch(self) -> &'static str {
        match self {
            Self::Epn => "e2",
            Self::Emos => "e13",
        }
    }

    pub const fn epochs(self) -> &'static [EpochSpec] {
        match self {
            Self::Epn => &XMM_EPN_EPOCHS,
            Self::Emos => &XMM_EMOS_EPOCHS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmmDetector {
    Epn,
    Emos1,
    Emos2,
}

impl XmmDetector {
    pub const ALL: [XmmDetector; 3] = [Self::Epn, Self::Emos1, Self::Emos2];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Epn => "EPN",
            Self::Emos1 => "EMOS1",
            Self::Emos2 => "EMOS2",
        }
    }

    pub const fn short(self) -> &'static str {
        match self {
            Self::Epn => "pn",
            Self::Emos1 => "mos1",
            Self::Emos2 => "mos2",
        }
    }

    /// Top-level key of the detector in the table files.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Epn => "PN",
            Self::Emos1 => "M1",
            Self::Emos2 => "M2",
        }
    }

    pub const fn kind(self) -> DetectorKind {
        match self {
            Self::Epn => DetectorKind::Epn,
            Self::Emos1 | Self::Emos2 => DetectorKind::Emos,
        }
    }
}

impl Display for XmmDetector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for XmmDetector {
    type Err = EcfError;

    fn from_str(token: &str) -> EcfResult<Self> {
        let normalized = token.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|detector| {
                detector.as_str().eq_ignore_ascii_case(normalized)
                    || detector.short().eq_ignore_ascii_case(normalized)
            })
            .ok_or_else(|| {
                EcfError::configuration(
                    "CONFIG.UNKNOWN_DETECTOR",
                    format!(
                        "unknown EPIC detector '{}'; expected EPN, EMOS1 or EMOS2",
                        token
                    ),
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmmFilter {
    Thin,
    Medium,
    Thick,
}

impl XmmFilter {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Thin => "Thin",
            Self::Medium => "Medium",
            Self::Thick => "Thick",
        }
    }
}

impl Display for XmmFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for XmmFilter {
    type Err = EcfError;

    /// `Thin1` and `Thin2` share the thin-filter response.
    fn from_str(token: &str) -> EcfResult<Self> {
        match token.trim() {
            "Thin" | "Thin1" | "Thin2" => Ok(Self::Thin),
            "Medium" => Ok(Self::Medium),
            "Thick" => Ok(Self::Thick),
            _ => Err(EcfError::configuration(
                "CONFIG.UNKNOWN_FILTER",
                format!(
                    "unknown EPIC filter '{}'; expected Thin, Medium or Thick",
                    token
                ),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmmConfig {
    pub detector: XmmDetector,
    pub filter: XmmFilter,
    pub band: String,
    pub mode: Option<String>,
    pub observed_at: Option<NaiveDateTime>,
}

impl XmmConfig {
    pub fn new(detector: XmmDetector, filter: XmmFilter) -> Self {
        Self {
            detector,
            filter,
            band: "SOFT".to_string(),
            mode: None,
            observed_at: None,
        }
    }

    pub fn with_band(mut self, band: impl Into<String>) -> Self {
        self.band = band.into();
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
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
pub struct XmmEpic {
    detector: XmmDetector,
    filter: XmmFilter,
    mode: &'static str,
    core: EstimatorCore,
}

impl XmmEpic {
    pub fn new(config: &XmmConfig, options: &EstimatorOptions) -> EcfResult<Self> {
        let kind = config.detector.kind();
        let mode = parse_mode(config.detector, config.mode.as_deref())?;
        let band = find_band(&XMM_BANDS, Mission::XmmEpic, &config.band)?;
        let epoch = resolve_epoch(
            kind.epochs(),
            Mission::XmmEpic,
            config.observed_at,
            kind.default_epoch(),
        )?;
        let selectors = [
            config.detector.tag(),
            epoch,
            mode,
            band.name,
            config.filter.as_str(),
        ];
        let core = EstimatorCore::load(Mission::XmmEpic, band, epoch, &selectors, options)?;
        Ok(Self {
            detector: config.detector,
            filter: config.filter,
            mode,
            core,
        })
    }

    pub fn detector(&self) -> XmmDetector {
        self.detector
    }

    pub fn filter(&self) -> XmmFilter {
        self.filter
    }

    pub fn mode(&self) -> &'static str {
        self.mode
    }
}

fn parse_mode(detector: XmmDetector, mode: Option<&str>) -> EcfResult<&'static str> {
    let kind = detector.kind();
    let Some(mode) = mode else {
        return Ok(kind.default_mode());
    };

    kind.modes()
        .iter()
        .copied()
        .find(|candidate| candidate.eq_ignore_ascii_case(mode.trim()))
        .ok_or_else(|| {
            EcfError::configuration(
                "CONFIG.UNKNOWN_MODE",
                format!(
                    "unknown mode '{}' for {}; expected one of {}",
                    mode,
                    detector,
                    kind.modes().join(", ")
                ),
            )
        })
}

impl EcfEstimator for XmmEpic {
    fn mission(&self) -> Mission {
        Mission::XmmEpic
    }

    fn band(&self) -> EnergyBand {
        self.core.band()
    }

    fn epoch(&self) -> &'static str {
        self.core.epoch()
    }

    fn selection(&self) -> String {
        format!("{}/{}/{}", self.detector, self.mode, self.filter)
    }

    fn estimate(&self, query: &SpectralQuery) -> EcfResult<Ecf> {
        self.core.evaluate(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{DataConfig, parse_observation_date, resolve_epoch_on};

    #[test]
    fn detectors_parse_by_name_or_short_name() {
        assert_eq!("EPN".parse::<XmmDetector>().unwrap(), XmmDetector::Epn);
        assert_eq!("mos2".parse::<XmmDetector>().unwrap(), XmmDetector::Emos2);
        assert_eq!(XmmDetector::Emos1.tag(), "M1");
        assert_eq!(XmmDetector::Emos1.kind(), DetectorKind::Emos);
        assert!("RGS1".parse::<XmmDetector>().is_err());
    }

    #[test]
    fn thin_filter_aliases_collapse() {
        for token in ["Thin", "Thin1", "Thin2"] {
            assert_eq!(token.parse::<XmmFilter>().unwrap(), XmmFilter::Thin);
        }
        let error = "Open".parse::<XmmFilter>().expect_err("Open is not tabulated");
        assert_eq!(error.placeholder(), "CONFIG.UNKNOWN_FILTER");
    }

    #[test]
    fn modes_default_per_detector_kind() {
        assert_eq!(parse_mode(XmmDetector::Epn, None).unwrap(), "ff");
        assert_eq!(parse_mode(XmmDetector::Emos2, None).unwrap(), "im");
        assert_eq!(parse_mode(XmmDetector::Epn, Some("SW")).unwrap(), "sw");

        let error = parse_mode(XmmDetector::Emos1, Some("ff")).expect_err("MOS has no ff");
        assert_eq!(error.placeholder(), "CONFIG.UNKNOWN_MODE");
    }

    #[test]
    fn mos_dates_map_onto_fine_grained_epochs() {
        let now = parse_observation_date("2025-01-01").unwrap();
        let date = parse_observation_date("2024-06-01").unwrap();
        assert_eq!(
            resolve_epoch_on(&XMM_EMOS_EPOCHS, Mission::XmmEpic, date, now).unwrap(),
            "e19"
        );
        assert_eq!(
            resolve_epoch_on(&XMM_EPN_EPOCHS, Mission::XmmEpic, date, now).unwrap(),
            "e4"
        );

        let early = parse_observation_date("2003-03-03").unwrap();
        assert_eq!(
            resolve_epoch_on(&XMM_EMOS_EPOCHS, Mission::XmmEpic, early, now).unwrap(),
            "e6"
        );
    }

    #[test]
    fn boundary_day_timestamps_use_the_later_epoch() {
        let now = parse_observation_date("2025-01-01").unwrap();
        let midnight = parse_observation_date("2014-01-01").unwrap();
        let morning = parse_observation_date("2014-01-01T08:30:00").unwrap();
        assert_eq!(
            resolve_epoch_on(&XMM_EPN_EPOCHS, Mission::XmmEpic, midnight, now).unwrap(),
            "e2"
        );
        assert_eq!(
            resolve_epoch_on(&XMM_EPN_EPOCHS, Mission::XmmEpic, morning, now).unwrap(),
            "e3"
        );

        let afternoon = parse_observation_date("2019-11-14T15:00:00").unwrap();
        assert_eq!(
            resolve_epoch_on(&XMM_EMOS_EPOCHS, Mission::XmmEpic, afternoon, now).unwrap(),
            "e19"
        );
    }

    #[test]
    fn configuration_errors_precede_table_loading() {
        let options = EstimatorOptions::new(DataConfig::new("/nonexistent/ecfxa-tables"));
        let config = XmmConfig::new(XmmDetector::Epn, XmmFilter::Medium).with_band("P3");
        let error = XmmEpic::new(&config, &options).expect_err("P3 is not an EPIC band");
        assert_eq!(error.placeholder(), "CONFIG.UNKNOWN_BAND");
    }
}
