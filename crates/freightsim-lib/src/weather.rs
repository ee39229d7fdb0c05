//! Spatial weather-severity overlay on a coarse degree grid.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::{Error, Result};

/// Side length of a weather grid block in degrees.
pub const GRID_SIZE_DEG: f64 = 5.0;

/// Sparse severity grid keyed by degree block. Absent blocks read as
/// severity 0.
#[derive(Debug, Clone, Default)]
pub struct WeatherGrid {
    cells: HashMap<(i32, i32), f64>,
}

/// Serializable view of the grid, with `"lat,lon"` block keys matching the
/// wire format consumed by hosting services.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSnapshot {
    pub grid_size: f64,
    pub grid: BTreeMap<String, f64>,
}

impl WeatherGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid block containing a coordinate, as the block's south-west corner
    /// in whole degrees. Floor division keeps negative coordinates in the
    /// block below them (-1° falls in block -5, not 0).
    fn block_key(lat: f64, lon: f64) -> (i32, i32) {
        let lat_block = (lat / GRID_SIZE_DEG).floor() * GRID_SIZE_DEG;
        let lon_block = (lon / GRID_SIZE_DEG).floor() * GRID_SIZE_DEG;
        (lat_block as i32, lon_block as i32)
    }

    /// Upsert the severity of the block containing `(lat, lon)`.
    ///
    /// Severity outside [0, 1] (including NaN) is rejected before any
    /// mutation takes place.
    pub fn set_severity(&mut self, lat: f64, lon: f64, severity: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&severity) {
            return Err(Error::InvalidSeverity { value: severity });
        }
        self.cells.insert(Self::block_key(lat, lon), severity);
        Ok(())
    }

    /// Severity of the block containing `(lat, lon)`, defaulting to 0.
    pub fn severity_at(&self, lat: f64, lon: f64) -> f64 {
        self.cells
            .get(&Self::block_key(lat, lon))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn snapshot(&self) -> WeatherSnapshot {
        WeatherSnapshot {
            grid_size: GRID_SIZE_DEG,
            grid: self
                .cells
                .iter()
                .map(|((lat, lon), severity)| (format!("{lat},{lon}"), *severity))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_in_the_same_block_share_severity() {
        let mut grid = WeatherGrid::new();
        grid.set_severity(2.0, 3.0, 0.7).unwrap();
        assert_eq!(grid.severity_at(2.0, 3.0), 0.7);
        assert_eq!(grid.severity_at(4.9, 0.1), 0.7);
        assert_eq!(grid.severity_at(5.1, 3.0), 0.0);
    }

    #[test]
    fn negative_coordinates_floor_to_the_block_below() {
        let mut grid = WeatherGrid::new();
        grid.set_severity(-1.0, -1.0, 0.4).unwrap();
        assert_eq!(grid.severity_at(-4.9, -4.9), 0.4);
        assert_eq!(grid.severity_at(1.0, 1.0), 0.0);
    }

    #[test]
    fn rejects_out_of_range_severity_without_mutating() {
        let mut grid = WeatherGrid::new();
        grid.set_severity(10.0, 10.0, 0.5).unwrap();

        for bad in [-0.1, 1.1, f64::NAN] {
            let err = grid.set_severity(10.0, 10.0, bad).expect_err("rejected");
            assert!(matches!(err, Error::InvalidSeverity { .. }));
        }
        assert_eq!(grid.severity_at(10.0, 10.0), 0.5);
    }

    #[test]
    fn snapshot_uses_block_corner_keys() {
        let mut grid = WeatherGrid::new();
        grid.set_severity(7.3, -12.6, 1.0).unwrap();
        let snapshot = grid.snapshot();
        assert_eq!(snapshot.grid_size, GRID_SIZE_DEG);
        assert_eq!(snapshot.grid.get("5,-15"), Some(&1.0));
    }
}
