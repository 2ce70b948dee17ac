pub mod errors;
mod quantity;

pub use errors::{EcfError, EcfErrorCategory, EcfResult};
pub use quantity::{CM2_PER_ERG, Ecf, EcfUnit, TABLE_SCALE};

use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Column density assumed when a query does not provide one (cm^-2).
pub const DEFAULT_NH: f64 = 3.0e20;
/// Photon index assumed when a query does not provide one.
pub const DEFAULT_GAMMA: f64 = 1.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mission {
    Erosita,
    SwiftXrt,
    XmmEpic,
}

impl Mission {
    pub const ALL: [Mission; 3] = [Self::Erosita, Self::SwiftXrt, Self::XmmEpic];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Erosita => "eROSITA",
            Self::SwiftXrt => "Swift/XRT",
            Self::XmmEpic => "XMM-Newton/EPIC",
        }
    }

    /// Stem shared by the two table files of the mission.
    pub const fn table_stem(self) -> &'static str {
        match self {
            Self::Erosita => "erosita",
            Self::SwiftXrt => "swift",
            Self::XmmEpic => "xmm",
        }
    }
}

impl Display for Mission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for Mission {
    type Err = EcfError;

    fn from_str(token: &str) -> EcfResult<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "erosita" | "ero" => Ok(Self::Erosita),
            "swift" | "xrt" | "swift/xrt" | "swiftxrt" => Ok(Self::SwiftXrt),
            "xmm" | "epic" | "xmm-newton" | "xmmepic" => Ok(Self::XmmEpic),
            _ => Err(EcfError::configuration(
                "CONFIG.UNKNOWN_MISSION",
                format!(
                    "unknown mission '{}'; expected one of erosita, swift, xmm",
                    token
                ),
            )),
        }
    }
}

/// Which of the two tables an ECF is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Correction {
    /// Observed (absorbed) flux.
    #[default]
    Absorbed,
    /// Flux corrected for absorption along the line of sight.
    AbsorptionCorrected,
}

impl Correction {
    pub const fn from_flag(abscorr: bool) -> Self {
        if abscorr {
            Self::AbsorptionCorrected
        } else {
            Self::Absorbed
        }
    }

    pub const fn table_suffix(self) -> &'static str {
        match self {
            Self::Absorbed => "ecfs",
            Self::AbsorptionCorrected => "abscorr_ecfs",
        }
    }
}

/// How queries outside the tabulated grid are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum BoundsPolicy {
    #[default]
    Reject,
    /// Pin the query to the nearest grid edge and log a warning.
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyBand {
    pub name: &'static str,
    pub emin_kev: f64,
    pub emax_kev: f64,
}

impl EnergyBand {
    pub const fn new(name: &'static str, emin_kev: f64, emax_kev: f64) -> Self {
        Self {
            name,
            emin_kev,
            emax_kev,
        }
    }
}

impl Display for EnergyBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}-{} keV)",
            self.name, self.emin_kev, self.emax_kev
        )
    }
}

pub fn find_band(bands: &[EnergyBand], mission: Mission, name: &str) -> EcfResult<EnergyBand> {
    bands
        .iter()
        .copied()
        .find(|band| band.name == name)
        .ok_or_else(|| {
            let known = bands
                .iter()
                .map(|band| band.name)
                .collect::<Vec<_>>()
                .join(", ");
            EcfError::configuration(
                "CONFIG.UNKNOWN_BAND",
                format!(
                    "unknown energy band '{}' for {}; expected one of {}",
                    name, mission, known
                ),
            )
        })
}

/// Spectral parameters of one ECF query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectralQuery {
    pub nh: f64,
    pub gamma: f64,
    pub correction: Correction,
}

impl SpectralQuery {
    pub const fn new(nh: f64, gamma: f64) -> Self {
        Self {
            nh,
            gamma,
            correction: Correction::Absorbed,
        }
    }

    pub const fn with_correction(mut self, correction: Correction) -> Self {
        self.correction = correction;
        self
    }

    pub fn log_nh(&self) -> EcfResult<f64> {
        if !self.nh.is_finite() || self.nh < 0.0 {
            return Err(EcfError::out_of_range(
                "RANGE.NH",
                format!(
                    "column density must be a finite non-negative number, got {}",
                    self.nh
                ),
            ));
        }
        Ok(self.nh.log10())
    }
}

impl Default for SpectralQuery {
    fn default() -> Self {
        Self::new(DEFAULT_NH, DEFAULT_GAMMA)
    }
}
