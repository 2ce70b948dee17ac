pub mod erosita;
pub mod swift;
pub mod xmm;

mod estimator;

pub use erosita::{EROSITA_BANDS, EROSITA_EPOCHS, Erosita, ErositaConfig};
pub use estimator::{EcfEstimator, EstimatorCore};
pub use swift::{SWIFT_BANDS, SWIFT_EPOCHS, SwiftConfig, SwiftMode, SwiftXrt};
pub use xmm::{
    DetectorKind, XMM_BANDS, XMM_EMOS_EPOCHS, XMM_EPN_EPOCHS, XmmConfig, XmmDetector, XmmEpic,
    XmmFilter,
};

use crate::common::{EpochSpec, EstimatorOptions};
use crate::domain::{EcfResult, EnergyBand, Mission};

/// Instrument selection for any supported mission.
#[derive(Debug, Clone, PartialEq)]
pub enum MissionSelection {
    Erosita(ErositaConfig),
    SwiftXrt(SwiftConfig),
    XmmEpic(XmmConfig),
}

impl MissionSelection {
    pub fn mission(&self) -> Mission {
        match self {
            Self::Erosita(_) => Mission::Erosita,
            Self::SwiftXrt(_) => Mission::SwiftXrt,
            Self::XmmEpic(_) => Mission::XmmEpic,
        }
    }
}

pub fn build_estimator(
    selection: &MissionSelection,
    options: &EstimatorOptions,
) -> EcfResult<Box<dyn EcfEstimator>> {
    Ok(match selection {
        MissionSelection::Erosita(config) => Box::new(Erosita::new(config, options)?),
        MissionSelection::SwiftXrt(config) => Box::new(SwiftXrt::new(config, options)?),
        MissionSelection::XmmEpic(config) => Box::new(XmmEpic::new(config, options)?),
    })
}

pub fn bands_for(mission: Mission) -> &'static [EnergyBand] {
    match mission {
        Mission::Erosita => &EROSITA_BANDS,
        Mission::SwiftXrt => &SWIFT_BANDS,
        Mission::XmmEpic => &XMM_BANDS,
    }
}

/// Epoch catalogues of a mission, labelled by the instrument they apply to.
pub fn epochs_for(mission: Mission) -> Vec<(&'static str, &'static [EpochSpec])> {
    match mission {
        Mission::Erosita => vec![("eROSITA", &EROSITA_EPOCHS as &[EpochSpec])],
        Mission::SwiftXrt => vec![("XRT", &SWIFT_EPOCHS as &[EpochSpec])],
        Mission::XmmEpic => vec![
            ("EPN", DetectorKind::Epn.epochs()),
            ("EMOS", DetectorKind::Emos.epochs()),
        ],
    }
}
