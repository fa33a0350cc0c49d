//! Folding a chronological day sequence into the 14x26 city grid.
//!
//! The calendar is naturally 52 weeks x 7 days. The city reshapes it into
//! 14 rows x 26 columns for a squarer footprint: each grid column takes
//! two calendar weeks, and the two weeks are stacked as the upper and lower
//! seven rows.

use bevy::prelude::*;

use crate::city::{GRID_CELLS, GRID_COLUMNS, GRID_ROWS};

/// Weeks per calendar row in the source sequence.
const WEEKS_PER_YEAR: usize = 52;

/// Anything that can be read as one day of activity.
pub trait DailyActivity {
    /// Count as supplied by the source; may be negative or non-finite.
    fn raw_count(&self) -> f64;
    fn date(&self) -> &str;
}

/// One sanitized day of activity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityRecord {
    pub count: u32,
    pub date: String,
}

impl DailyActivity for ActivityRecord {
    fn raw_count(&self) -> f64 {
        self.count as f64
    }

    fn date(&self) -> &str {
        &self.date
    }
}

/// Clamp a source count to a non-negative integer. Negative, NaN and
/// infinite counts become zero.
pub fn normalize_count(raw: f64) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        0
    } else {
        raw.trunc().min(u32::MAX as f64) as u32
    }
}

/// Index into the source sequence for grid cell `(row, col)`.
pub const fn source_index(row: usize, col: usize) -> usize {
    col * 2 + row / 7 + (row % 7) * WEEKS_PER_YEAR
}

/// Fixed 14x26 grid; cells without source data are `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityGrid {
    /// Row-major, `GRID_ROWS * GRID_COLUMNS` long.
    cells: Vec<Option<ActivityRecord>>,
}

impl ActivityGrid {
    /// Fold `days` (oldest first) into the grid.
    pub fn fold<D: DailyActivity>(days: &[D]) -> Self {
        let mut cells = Vec::with_capacity(GRID_CELLS);
        let mut clamped = 0usize;

        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLUMNS {
                let cell = days.get(source_index(row, col)).map(|day| {
                    let raw = day.raw_count();
                    let count = normalize_count(raw);
                    if count as f64 != raw.trunc() {
                        clamped += 1;
                    }
                    ActivityRecord {
                        count,
                        date: day.date().to_owned(),
                    }
                });
                cells.push(cell);
            }
        }

        if clamped > 0 {
            warn!("Clamped {} malformed contribution counts to zero", clamped);
        }

        let grid = Self { cells };
        debug!(
            "Folded {} days into grid: {} present, {} absent",
            days.len(),
            grid.present_count(),
            grid.absent_count()
        );
        grid
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&ActivityRecord> {
        if row >= GRID_ROWS || col >= GRID_COLUMNS {
            return None;
        }
        self.cells[row * GRID_COLUMNS + col].as_ref()
    }

    /// Present cells in row-major order as `(row, col, record)`.
    pub fn iter_present(&self) -> impl Iterator<Item = (usize, usize, &ActivityRecord)> {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.as_ref()
                .map(|record| (i / GRID_COLUMNS, i % GRID_COLUMNS, record))
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn absent_count(&self) -> usize {
        self.cells.len() - self.present_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RawDay(f64);

    impl DailyActivity for RawDay {
        fn raw_count(&self) -> f64 {
            self.0
        }

        fn date(&self) -> &str {
            "2024-01-01"
        }
    }

    fn year(len: usize) -> Vec<ActivityRecord> {
        (0..len)
            .map(|i| ActivityRecord {
                count: i as u32,
                date: format!("day-{i}"),
            })
            .collect()
    }

    #[test]
    fn full_year_maps_every_cell_verbatim() {
        let days = year(GRID_CELLS);
        let grid = ActivityGrid::fold(&days);
        assert_eq!(grid.cell_count(), 364);
        assert_eq!(grid.present_count(), 364);

        let mut seen = vec![false; GRID_CELLS];
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLUMNS {
                let index = col * 2 + row / 7 + (row % 7) * 52;
                assert_eq!(source_index(row, col), index);
                assert!(index < 364, "({row}, {col}) -> {index}");
                assert_eq!(grid.get(row, col).unwrap().count, index as u32);
                seen[index] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "fold is not a bijection");
    }

    #[test]
    fn short_sequence_leaves_gaps() {
        let grid = ActivityGrid::fold(&year(10));
        assert_eq!(grid.cell_count(), 364);
        assert_eq!(grid.present_count(), 10);
        assert_eq!(grid.absent_count(), 354);

        for (row, col, record) in grid.iter_present() {
            assert!(source_index(row, col) < 10);
            assert_eq!(record.count as usize, source_index(row, col));
        }
        // First ten days land in the top row, two columns per week pair.
        assert_eq!(grid.get(0, 0).unwrap().count, 0);
        assert_eq!(grid.get(7, 0).unwrap().count, 1);
        assert_eq!(grid.get(0, 1).unwrap().count, 2);
        assert!(grid.get(1, 0).is_none());
    }

    #[test]
    fn empty_and_oversized_inputs() {
        let empty: Vec<ActivityRecord> = Vec::new();
        let grid = ActivityGrid::fold(&empty);
        assert_eq!(grid.cell_count(), 364);
        assert_eq!(grid.present_count(), 0);

        let grid = ActivityGrid::fold(&year(371));
        assert_eq!(grid.present_count(), 364);
    }

    #[test]
    fn fold_is_deterministic() {
        let days = year(200);
        assert_eq!(ActivityGrid::fold(&days), ActivityGrid::fold(&days));
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let grid = ActivityGrid::fold(&year(364));
        assert!(grid.get(GRID_ROWS, 0).is_none());
        assert!(grid.get(0, GRID_COLUMNS).is_none());
    }

    #[test]
    fn malformed_counts_clamp_to_zero() {
        assert_eq!(normalize_count(-3.0), 0);
        assert_eq!(normalize_count(f64::NAN), 0);
        assert_eq!(normalize_count(f64::INFINITY), 0);
        assert_eq!(normalize_count(f64::NEG_INFINITY), 0);
        assert_eq!(normalize_count(2.7), 2);
        assert_eq!(normalize_count(1e20), u32::MAX);

        let days = [RawDay(-5.0), RawDay(f64::NAN), RawDay(7.0)];
        let grid = ActivityGrid::fold(&days);
        assert_eq!(grid.get(0, 0).unwrap().count, 0);
        assert_eq!(grid.get(7, 0).unwrap().count, 0);
        assert_eq!(grid.get(0, 1).unwrap().count, 7);
    }
}
