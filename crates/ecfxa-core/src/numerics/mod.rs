pub mod grid;

pub use grid::{EcfGrid, GridAxis, GridError};
