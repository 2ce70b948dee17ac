use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Tables store ECFs in units of 1e11 cm^2/erg.
pub const TABLE_SCALE: f64 = 1.0e11;

/// 1 cm^2/erg expressed in m^2/J.
pub const CM2_PER_ERG: f64 = 1.0e3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EcfUnit {
    SquareCentimetrePerErg,
    SquareMetrePerJoule,
}

impl EcfUnit {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::SquareCentimetrePerErg => "cm2 / erg",
            Self::SquareMetrePerJoule => "m2 / J",
        }
    }
}

/// An energy conversion factor together with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ecf {
    value: f64,
    unit: EcfUnit,
}

impl Ecf {
    pub const fn cm2_per_erg(value: f64) -> Self {
        Self {
            value,
            unit: EcfUnit::SquareCentimetrePerErg,
        }
    }

    pub fn from_table_value(table_value: f64) -> Self {
        Self::cm2_per_erg(table_value * TABLE_SCALE)
    }

    pub const fn value(&self) -> f64 {
        self.value
    }

    pub const fn unit(&self) -> EcfUnit {
        self.unit
    }

    pub fn to_unit(self, unit: EcfUnit) -> Self {
        let value = match (self.unit, unit) {
            (EcfUnit::SquareCentimetrePerErg, EcfUnit::SquareMetrePerJoule) => {
                self.value * CM2_PER_ERG
            }
            (EcfUnit::SquareMetrePerJoule, EcfUnit::SquareCentimetrePerErg) => {
                self.value / CM2_PER_ERG
            }
            _ => self.value,
        };
        Self { value, unit }
    }

    /// Flux in erg/s/cm^2 for a count rate in counts/s.
    pub fn flux_from_rate(&self, count_rate: f64) -> f64 {
        count_rate / self.to_unit(EcfUnit::SquareCentimetrePerErg).value
    }
}

impl Display for Ecf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.8e} {}", self.value, self.unit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::{Ecf, EcfUnit};

    #[test]
    fn table_values_are_rescaled_to_cgs() {
        let ecf = Ecf::from_table_value(11.9);
        assert!((ecf.value() - 1.19e12).abs() < 1.0);
        assert_eq!(ecf.unit(), EcfUnit::SquareCentimetrePerErg);
    }

    #[test]
    fn si_conversion_round_trips() {
        let ecf = Ecf::cm2_per_erg(2.0e11);
        let si = ecf.to_unit(EcfUnit::SquareMetrePerJoule);
        assert_eq!(si.value(), 2.0e14);
        assert_eq!(si.to_unit(EcfUnit::SquareCentimetrePerErg).value(), 2.0e11);
    }

    #[test]
    fn display_carries_unit_symbol() {
        let rendered = Ecf::cm2_per_erg(1.19e12).to_string();
        assert_eq!(rendered, "1.19000000e12 cm2 / erg");
    }

    #[test]
    fn flux_divides_rate_by_ecf() {
        let ecf = Ecf::cm2_per_erg(1.0e11);
        assert_eq!(ecf.flux_from_rate(2.0), 2.0e-11);
    }
}
