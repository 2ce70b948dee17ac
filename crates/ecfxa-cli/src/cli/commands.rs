use super::CliError;
use super::report::{EcfReport, render_bands, render_epochs, render_human_report};
use anyhow::Context;
use chrono::NaiveDateTime;
use ecfxa_core::common::{DataConfig, EstimatorOptions, parse_observation_date};
use ecfxa_core::domain::{BoundsPolicy, Correction, DEFAULT_GAMMA, DEFAULT_NH, Mission, SpectralQuery};
use ecfxa_core::missions::{
    ErositaConfig, MissionSelection, SwiftConfig, SwiftMode, XmmConfig, XmmDetector, XmmFilter,
    bands_for, build_estimator, epochs_for,
};
use std::path::PathBuf;
use tracing::debug;

#[derive(clap::Args)]
pub(super) struct QueryArgs {
    /// Hydrogen column density in cm^-2
    #[arg(long, default_value_t = DEFAULT_NH, allow_negative_numbers = true)]
    nh: f64,

    /// Power-law photon index
    #[arg(long, default_value_t = DEFAULT_GAMMA, allow_negative_numbers = true)]
    gamma: f64,

    /// Use the absorption-corrected tables
    #[arg(long)]
    abscorr: bool,

    /// Clamp queries outside the calibration grid instead of failing
    #[arg(long)]
    clamp: bool,

    /// Count rate (counts/s) to convert into a flux
    #[arg(long)]
    rate: Option<f64>,

    /// Directory holding the calibration tables (overrides ECFXA_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl QueryArgs {
    fn options(&self) -> EstimatorOptions {
        let bounds = if self.clamp {
            BoundsPolicy::Clamp
        } else {
            BoundsPolicy::Reject
        };
        EstimatorOptions::new(DataConfig::resolve(self.data_dir.as_deref())).with_bounds(bounds)
    }

    fn query(&self) -> SpectralQuery {
        SpectralQuery::new(self.nh, self.gamma).with_correction(Correction::from_flag(self.abscorr))
    }
}

#[derive(clap::Args)]
pub(super) struct ErositaArgs {
    /// Energy band (see `ecfxa bands erosita`)
    #[arg(long, default_value = "SOFT")]
    band: String,

    /// Observation date (YYYY-MM-DD) or ISO timestamp
    #[arg(long)]
    date: Option<String>,

    #[command(flatten)]
    query: QueryArgs,
}

#[derive(clap::Args)]
pub(super) struct SwiftArgs {
    /// XRT read-out mode: wt or pc
    #[arg(long)]
    mode: String,

    /// Event grade selection
    #[arg(long, default_value = "0")]
    grade: String,

    /// Energy band (see `ecfxa bands swift`)
    #[arg(long, default_value = "SOFT")]
    band: String,

    /// Observation date (YYYY-MM-DD) or ISO timestamp
    #[arg(long)]
    date: Option<String>,

    #[command(flatten)]
    query: QueryArgs,
}

#[derive(clap::Args)]
pub(super) struct XmmArgs {
    /// EPIC camera: EPN, EMOS1 or EMOS2
    #[arg(long)]
    detector: String,

    /// Optical blocking filter: Thin, Medium or Thick
    #[arg(long)]
    filter: String,

    /// Read-out mode (defaults to ff for pn, im for MOS)
    #[arg(long)]
    mode: Option<String>,

    /// Energy band (see `ecfxa bands xmm`)
    #[arg(long, default_value = "SOFT")]
    band: String,

    /// Observation date (YYYY-MM-DD) or ISO timestamp
    #[arg(long)]
    date: Option<String>,

    #[command(flatten)]
    query: QueryArgs,
}

fn parse_date(date: Option<&str>) -> Result<Option<NaiveDateTime>, CliError> {
    date.map(parse_observation_date)
        .transpose()
        .map_err(CliError::from)
}

pub(super) fn run_erosita_command(args: ErositaArgs) -> Result<i32, CliError> {
    let mut config = ErositaConfig::new(args.band);
    config.observed_at = parse_date(args.date.as_deref())?;
    run_estimate(MissionSelection::Erosita(config), &args.query)
}

pub(super) fn run_swift_command(args: SwiftArgs) -> Result<i32, CliError> {
    let mode = args.mode.parse::<SwiftMode>()?;
    let mut config = SwiftConfig::new(mode)
        .with_grade(args.grade)
        .with_band(args.band);
    config.observed_at = parse_date(args.date.as_deref())?;
    run_estimate(MissionSelection::SwiftXrt(config), &args.query)
}

pub(super) fn run_xmm_command(args: XmmArgs) -> Result<i32, CliError> {
    let detector = args.detector.parse::<XmmDetector>()?;
    let filter = args.filter.parse::<XmmFilter>()?;
    let mut config = XmmConfig::new(detector, filter).with_band(args.band);
    config.mode = args.mode;
    config.observed_at = parse_date(args.date.as_deref())?;
    run_estimate(MissionSelection::XmmEpic(config), &args.query)
}

fn run_estimate(selection: MissionSelection, args: &QueryArgs) -> Result<i32, CliError> {
    let options = args.options();
    debug!(
        mission = %selection.mission(),
        data_dir = %options.data.data_dir().display(),
        "building estimator"
    );

    let estimator = build_estimator(&selection, &options)?;
    let query = args.query();
    let ecf = estimator.estimate(&query)?;
    let report = EcfReport::new(&*estimator, &query, ecf, args.rate);

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&report).context("failed to serialize ECF report")?;
        println!("{}", rendered);
    } else {
        print!("{}", render_human_report(&report));
    }
    Ok(0)
}

pub(super) fn run_bands_command(mission: &str) -> Result<i32, CliError> {
    let mission = mission.parse::<Mission>()?;
    print!("{}", render_bands(mission, bands_for(mission)));
    Ok(0)
}

pub(super) fn run_epochs_command(mission: &str) -> Result<i32, CliError> {
    let mission = mission.parse::<Mission>()?;
    print!("{}", render_epochs(mission, &epochs_for(mission)));
    Ok(0)
}
