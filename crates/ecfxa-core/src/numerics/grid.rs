//! Bilinear interpolation over a rectangular (log10 nh, gamma) grid.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("{axis} axis needs at least 2 nodes, got {len}")]
    TooFewNodes { axis: &'static str, len: usize },

    #[error("{axis} axis must be finite and strictly ascending (node {index} is {value})")]
    NotAscending {
        axis: &'static str,
        index: usize,
        value: f64,
    },

    #[error("table has {rows}x{columns} values, axes require {expected_rows}x{expected_columns}")]
    ShapeMismatch {
        rows: usize,
        columns: usize,
        expected_rows: usize,
        expected_columns: usize,
    },

    #[error("table value at [{row}][{column}] is not finite ({value})")]
    NonFiniteValue { row: usize, column: usize, value: f64 },

    #[error("{axis} = {value} is outside the tabulated range [{min}, {max}]")]
    OutOfBounds {
        axis: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridAxis {
    name: &'static str,
    nodes: Vec<f64>,
}

impl GridAxis {
    pub fn new(name: &'static str, nodes: Vec<f64>) -> Result<Self, GridError> {
        if nodes.len() < 2 {
            return Err(GridError::TooFewNodes {
                axis: name,
                len: nodes.len(),
            });
        }

        for (index, pair) in nodes.windows(2).enumerate() {
            if !pair[0].is_finite() || !pair[1].is_finite() || !(pair[1] > pair[0]) {
                return Err(GridError::NotAscending {
                    axis: name,
                    index: index + 1,
                    value: pair[1],
                });
            }
        }

        Ok(Self { name, nodes })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn min(&self) -> f64 {
        self.nodes[0]
    }

    pub fn max(&self) -> f64 {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min() && value <= self.max()
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min(), self.max())
    }

    /// Lower node index and fractional weight towards the next node.
    fn locate(&self, value: f64) -> Result<(usize, f64), GridError> {
        if !self.contains(value) {
            return Err(GridError::OutOfBounds {
                axis: self.name,
                value,
                min: self.min(),
                max: self.max(),
            });
        }

        let upper = self
            .nodes
            .partition_point(|node| *node <= value)
            .clamp(1, self.nodes.len() - 1);
        let lower = upper - 1;
        let weight = (value - self.nodes[lower]) / (self.nodes[upper] - self.nodes[lower]);
        Ok((lower, weight))
    }
}

/// ECF values tabulated on `rows` (log10 nh) by `columns` (gamma).
#[derive(Debug, Clone, PartialEq)]
pub struct EcfGrid {
    rows: GridAxis,
    columns: GridAxis,
    values: Vec<f64>,
}

impl EcfGrid {
    pub fn new(
        rows: GridAxis,
        columns: GridAxis,
        values: Vec<Vec<f64>>,
    ) -> Result<Self, GridError> {
        let shape_error = |observed_columns: usize| GridError::ShapeMismatch {
            rows: values.len(),
            columns: observed_columns,
            expected_rows: rows.len(),
            expected_columns: columns.len(),
        };

        if values.len() != rows.len() {
            let observed = values.first().map(Vec::len).unwrap_or(0);
            return Err(shape_error(observed));
        }
        if let Some(row) = values.iter().find(|row| row.len() != columns.len()) {
            return Err(shape_error(row.len()));
        }

        let mut flat = Vec::with_capacity(rows.len() * columns.len());
        for (row, row_values) in values.iter().enumerate() {
            for (column, value) in row_values.iter().copied().enumerate() {
                if !value.is_finite() {
                    return Err(GridError::NonFiniteValue { row, column, value });
                }
                flat.push(value);
            }
        }

        Ok(Self {
            rows,
            columns,
            values: flat,
        })
    }

    pub fn rows(&self) -> &GridAxis {
        &self.rows
    }

    pub fn columns(&self) -> &GridAxis {
        &self.columns
    }

    pub fn value_at(&self, row: usize, column: usize) -> Option<f64> {
        if row >= self.rows.len() || column >= self.columns.len() {
            return None;
        }
        Some(self.values[row * self.columns.len() + column])
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.rows.contains(x) && self.columns.contains(y)
    }

    pub fn interpolate(&self, x: f64, y: f64) -> Result<f64, GridError> {
        let (row, row_weight) = self.rows.locate(x)?;
        let (column, column_weight) = self.columns.locate(y)?;
        let width = self.columns.len();

        let q00 = self.values[row * width + column];
        let q01 = self.values[row * width + column + 1];
        let q10 = self.values[(row + 1) * width + column];
        let q11 = self.values[(row + 1) * width + column + 1];

        Ok(q00 * (1.0 - row_weight) * (1.0 - column_weight)
            + q10 * row_weight * (1.0 - column_weight)
            + q01 * (1.0 - row_weight) * column_weight
            + q11 * row_weight * column_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plane_grid() -> EcfGrid {
        let rows = GridAxis::new("lognh", vec![19.0, 20.0, 21.0, 22.5]).unwrap();
        let columns = GridAxis::new("gamma", vec![1.0, 1.5, 3.0]).unwrap();
        let values = rows
            .nodes()
            .iter()
            .map(|x| columns.nodes().iter().map(|y| 2.0 * x + y).collect())
            .collect();
        EcfGrid::new(rows, columns, values).unwrap()
    }

    #[test]
    fn grid_nodes_return_tabulated_values() {
        let grid = plane_grid();
        for (row, x) in grid.rows().nodes().iter().enumerate() {
            for (column, y) in grid.columns().nodes().iter().enumerate() {
                assert_eq!(
                    grid.interpolate(*x, *y).unwrap(),
                    grid.value_at(row, column).unwrap()
                );
            }
        }
    }

    #[test]
    fn planes_are_reproduced_between_nodes() {
        let grid = plane_grid();
        for (x, y) in [(19.5, 1.2), (20.47, 2.0), (22.0, 2.9), (21.0, 1.5)] {
            assert_relative_eq!(grid.interpolate(x, y).unwrap(), 2.0 * x + y, epsilon = 1e-12);
        }
    }

    #[test]
    fn bilinear_cross_term_is_interpolated() {
        let rows = GridAxis::new("x", vec![0.0, 1.0]).unwrap();
        let columns = GridAxis::new("y", vec![0.0, 1.0]).unwrap();
        let grid = EcfGrid::new(rows, columns, vec![vec![0.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_relative_eq!(grid.interpolate(0.5, 0.5).unwrap(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn out_of_bounds_queries_are_rejected() {
        let grid = plane_grid();
        assert!(matches!(
            grid.interpolate(18.9, 1.5),
            Err(GridError::OutOfBounds { axis: "lognh", .. })
        ));
        assert!(matches!(
            grid.interpolate(20.0, 3.01),
            Err(GridError::OutOfBounds { axis: "gamma", .. })
        ));
        assert!(grid.interpolate(f64::NAN, 1.5).is_err());
        assert!(grid.interpolate(f64::NEG_INFINITY, 1.5).is_err());
    }

    #[test]
    fn axes_must_be_strictly_ascending() {
        assert!(matches!(
            GridAxis::new("gamma", vec![1.0, 1.0, 2.0]),
            Err(GridError::NotAscending { index: 1, .. })
        ));
        assert!(matches!(
            GridAxis::new("gamma", vec![1.0]),
            Err(GridError::TooFewNodes { len: 1, .. })
        ));
        assert!(GridAxis::new("gamma", vec![1.0, f64::NAN]).is_err());
    }

    #[test]
    fn axes_reject_infinite_end_nodes() {
        assert!(matches!(
            GridAxis::new("lognh", vec![20.0, f64::INFINITY]),
            Err(GridError::NotAscending { index: 1, .. })
        ));
        assert!(matches!(
            GridAxis::new("lognh", vec![19.0, 20.0, f64::INFINITY]),
            Err(GridError::NotAscending { index: 2, .. })
        ));
        assert!(GridAxis::new("lognh", vec![f64::NEG_INFINITY, 20.0]).is_err());
    }

    #[test]
    fn shape_and_finiteness_are_validated() {
        let rows = GridAxis::new("lognh", vec![20.0, 21.0]).unwrap();
        let columns = GridAxis::new("gamma", vec![1.0, 2.0]).unwrap();

        let ragged = EcfGrid::new(rows.clone(), columns.clone(), vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(ragged, Err(GridError::ShapeMismatch { .. })));

        let short = EcfGrid::new(rows.clone(), columns.clone(), vec![vec![1.0, 2.0]]);
        assert!(matches!(short, Err(GridError::ShapeMismatch { .. })));

        let nan = EcfGrid::new(rows, columns, vec![vec![1.0, 2.0], vec![f64::NAN, 4.0]]);
        assert!(matches!(
            nan,
            Err(GridError::NonFiniteValue { row: 1, column: 0, .. })
        ));
    }

    #[test]
    fn clamp_pins_values_to_axis_edges() {
        let grid = plane_grid();
        assert_eq!(grid.rows().clamp(17.0), 19.0);
        assert_eq!(grid.columns().clamp(4.0), 3.0);
        assert_eq!(grid.columns().clamp(2.0), 2.0);
    }
}
