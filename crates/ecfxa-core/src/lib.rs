//! Energy conversion factors for X-ray missions.
//!
//! An estimator is built for one instrument selection (mission, band and the
//! mission's own selectors), loads its two calibration grids once, and turns
//! `(nh, gamma)` queries into ECFs in cm^2/erg by bilinear interpolation over
//! `(log10 nh, gamma)`.
//!
//! ```no_run
//! use ecfxa_core::common::EstimatorOptions;
//! use ecfxa_core::missions::{EcfEstimator, Erosita, ErositaConfig};
//!
//! let estimator = Erosita::new(&ErositaConfig::new("SOFT"), &EstimatorOptions::default())?;
//! let ecf = estimator.ecf(3e20, 2.0)?;
//! println!("{ecf}");
//! # Ok::<(), ecfxa_core::domain::EcfError>(())
//! ```

pub mod common;
pub mod domain;
pub mod missions;
pub mod numerics;
pub mod tables;

pub use domain::{
    BoundsPolicy, Correction, Ecf, EcfError, EcfErrorCategory, EcfResult, EnergyBand, Mission,
    SpectralQuery,
};
pub use missions::{EcfEstimator, MissionSelection, build_estimator};
