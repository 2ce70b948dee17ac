use ecfxa_core::common::EpochSpec;
use ecfxa_core::domain::{Correction, Ecf, EnergyBand, Mission, SpectralQuery};
use ecfxa_core::missions::EcfEstimator;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EcfReport {
    mission: String,
    selection: String,
    band: EnergyBand,
    epoch: &'static str,
    nh: f64,
    gamma: f64,
    correction: Correction,
    ecf: f64,
    unit: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    count_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flux: Option<f64>,
}

impl EcfReport {
    pub(super) fn new(
        estimator: &dyn EcfEstimator,
        query: &SpectralQuery,
        ecf: Ecf,
        count_rate: Option<f64>,
    ) -> Self {
        Self {
            mission: estimator.mission().to_string(),
            selection: estimator.selection(),
            band: estimator.band(),
            epoch: estimator.epoch(),
            nh: query.nh,
            gamma: query.gamma,
            correction: query.correction,
            ecf: ecf.value(),
            unit: ecf.unit().symbol(),
            count_rate,
            flux: count_rate.map(|rate| ecf.flux_from_rate(rate)),
        }
    }
}

pub(super) fn render_human_report(report: &EcfReport) -> String {
    let correction = match report.correction {
        Correction::Absorbed => "absorbed",
        Correction::AbsorptionCorrected => "absorption corrected",
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} band {}, epoch {}",
        report.mission, report.selection, report.band, report.epoch
    );
    let _ = writeln!(
        out,
        "nh = {:e} cm^-2, gamma = {}, {}",
        report.nh, report.gamma, correction
    );
    let _ = writeln!(out, "ECF: {:.8e} {}", report.ecf, report.unit);
    if let (Some(rate), Some(flux)) = (report.count_rate, report.flux) {
        let _ = writeln!(out, "Flux: {:.6e} erg/s/cm2 ({} counts/s)", flux, rate);
    }
    out
}

pub(super) fn render_bands(mission: Mission, bands: &[EnergyBand]) -> String {
    let mut out = format!("{} energy bands:\n", mission);
    for band in bands {
        let _ = writeln!(
            out,
            "  {:<5} {:>5.1} - {:>5.1} keV",
            band.name, band.emin_kev, band.emax_kev
        );
    }
    out
}

pub(super) fn render_epochs(mission: Mission, catalogues: &[(&str, &[EpochSpec])]) -> String {
    let mut out = format!("{} calibration epochs:\n", mission);
    for (instrument, epochs) in catalogues {
        let _ = writeln!(out, "  {}:", instrument);
        for epoch in epochs.iter() {
            let _ = writeln!(
                out,
                "    {:<4} {} .. {}",
                epoch.name,
                epoch.start,
                epoch.end.unwrap_or("now")
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecfxa_core::missions::{EROSITA_BANDS, SWIFT_EPOCHS};

    fn sample_report(count_rate: Option<f64>) -> EcfReport {
        EcfReport {
            mission: "eROSITA".to_string(),
            selection: "eROSITA".to_string(),
            band: EnergyBand::new("SOFT", 0.5, 2.0),
            epoch: "e1",
            nh: 3.0e20,
            gamma: 2.0,
            correction: Correction::Absorbed,
            ecf: 1.19e12,
            unit: "cm2 / erg",
            count_rate,
            flux: count_rate.map(|rate| rate / 1.19e12),
        }
    }

    #[test]
    fn human_report_lists_selection_query_and_ecf() {
        let rendered = render_human_report(&sample_report(None));
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "eROSITA eROSITA band SOFT (0.5-2 keV), epoch e1");
        assert_eq!(lines[1], "nh = 3e20 cm^-2, gamma = 2, absorbed");
        assert_eq!(lines[2], "ECF: 1.19000000e12 cm2 / erg");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn flux_line_appears_with_a_count_rate() {
        let rendered = render_human_report(&sample_report(Some(1.19)));
        assert!(rendered.contains("Flux: 1.000000e-12 erg/s/cm2 (1.19 counts/s)"));
    }

    #[test]
    fn json_report_uses_camel_case_and_skips_missing_flux() {
        let value = serde_json::to_value(sample_report(None)).unwrap();
        assert_eq!(value["band"]["name"], "SOFT");
        assert_eq!(value["correction"], "Absorbed");
        assert!(value.get("flux").is_none());

        let value = serde_json::to_value(sample_report(Some(2.0))).unwrap();
        assert!(value.get("countRate").is_some());
    }

    #[test]
    fn listings_cover_every_catalogue_entry() {
        let bands = render_bands(Mission::Erosita, &EROSITA_BANDS);
        assert_eq!(bands.lines().count(), EROSITA_BANDS.len() + 1);
        assert!(bands.contains("P7      5.1 -   6.1 keV"));

        let epochs = render_epochs(Mission::SwiftXrt, &[("XRT", &SWIFT_EPOCHS[..])]);
        assert!(epochs.contains("e8   2021-01-01 .. now"));
        assert!(epochs.contains("e1   2004-12-01 .. 2007-01-01"));
    }
}
