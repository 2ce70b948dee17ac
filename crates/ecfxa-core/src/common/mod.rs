pub mod config;
pub mod epochs;

pub use config::{DATA_DIR_ENV, DataConfig, EstimatorOptions, table_file_name};
pub use epochs::{
    EpochSpec, parse_observation_date, resolve_epoch, resolve_epoch_on, start_of_day,
};
