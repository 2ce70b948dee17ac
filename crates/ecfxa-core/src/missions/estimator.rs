use crate::common::EstimatorOptions;
use crate::domain::{BoundsPolicy, Ecf, EcfError, EcfResult, EnergyBand, Mission, SpectralQuery};
use crate::numerics::GridError;
use crate::tables::GridPair;
use tracing::warn;

pub trait EcfEstimator {
    fn mission(&self) -> Mission;

    fn band(&self) -> EnergyBand;

    fn epoch(&self) -> &'static str;

    /// Instrument selection rendered for reports, e.g. `EPN/ff/Medium`.
    fn selection(&self) -> String;

    fn estimate(&self, query: &SpectralQuery) -> EcfResult<Ecf>;

    fn ecf(&self, nh: f64, gamma: f64) -> EcfResult<Ecf> {
        self.estimate(&SpectralQuery::new(nh, gamma))
    }
}

/// Loaded grids plus the selection they were extracted for.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorCore {
    mission: Mission,
    band: EnergyBand,
    epoch: &'static str,
    grids: GridPair,
    bounds: BoundsPolicy,
}

impl EstimatorCore {
    pub fn load(
        mission: Mission,
        band: EnergyBand,
        epoch: &'static str,
        selectors: &[&str],
        options: &EstimatorOptions,
    ) -> EcfResult<Self> {
        let grids = GridPair::load(&options.data, mission, selectors)?;
        Ok(Self {
            mission,
            band,
            epoch,
            grids,
            bounds: options.bounds,
        })
    }

    pub fn mission(&self) -> Mission {
        self.mission
    }

    pub fn band(&self) -> EnergyBand {
        self.band
    }

    pub fn epoch(&self) -> &'static str {
        self.epoch
    }

    pub fn bounds(&self) -> BoundsPolicy {
        self.bounds
    }

    pub fn evaluate(&self, query: &SpectralQuery) -> EcfResult<Ecf> {
        let log_nh = query.log_nh()?;
        if !query.gamma.is_finite() {
            return Err(EcfError::out_of_range(
                "RANGE.GAMMA",
                format!("photon index must be finite, got {}", query.gamma),
            ));
        }

        let grid = self.grids.get(query.correction);
        let (x, y) = match self.bounds {
            BoundsPolicy::Reject => (log_nh, query.gamma),
            BoundsPolicy::Clamp => {
                let x = grid.rows().clamp(log_nh);
                let y = grid.columns().clamp(query.gamma);
                if x != log_nh || y != query.gamma {
                    warn!(
                        mission = %self.mission,
                        nh = query.nh,
                        gamma = query.gamma,
                        clamped_lognh = x,
                        clamped_gamma = y,
                        "query outside calibration grid; clamped to grid edge"
                    );
                }
                (x, y)
            }
        };

        let value = grid.interpolate(x, y).map_err(|error| match error {
            GridError::OutOfBounds { axis, .. } => EcfError::out_of_range(
                if axis == "gamma" {
                    "RANGE.GAMMA"
                } else {
                    "RANGE.LOGNH"
                },
                format!(
                    "{} {} query (nh={:e}, gamma={}) is outside the calibration grid: {}",
                    self.mission, self.band.name, query.nh, query.gamma, error
                ),
            ),
            other => EcfError::internal("INTERNAL.INTERPOLATION", other.to_string()),
        })?;

        Ok(Ecf::from_table_value(value))
    }
}
