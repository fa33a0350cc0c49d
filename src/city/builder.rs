//! City model builder: turns an [`ActivityGrid`] into a [`CityModel`].
//!
//! Layout is deterministic. The grid footprint is centered on the origin,
//! the platform is sized from the same constants, and every present cell
//! becomes one box standing on the platform's top surface.

use bevy::prelude::*;

use crate::city::grid::{ActivityGrid, DailyActivity};
use crate::city::model::{BasePlatform, Building, CityModel, Slab};
use crate::city::scales::{color_of, darken, height_of};
use crate::city::window_texture::WindowTextureSynthesizer;
use crate::city::{CELL_DEPTH, CELL_SPACING, CELL_WIDTH};

/// Platform extent relative to the building footprint.
pub const PLATFORM_SCALE: f32 = 1.4;

/// Thickness of the lower platform slab.
pub const PLATFORM_THICKNESS: f32 = 0.15;

/// Upper slab extent relative to the lower slab.
const UPPER_SLAB_INSET: f32 = 0.95;

/// Darkening applied to the base color for building sides.
pub const SIDE_SHADE: f32 = 0.85;

/// Window rows per unit of building height.
const WINDOW_ROWS_PER_UNIT: f32 = 2.0;

const LOWER_SLAB_RGB: (u8, u8, u8) = (0xe6, 0xe0, 0xd8);
const UPPER_SLAB_RGB: (u8, u8, u8) = (0xf0, 0xeb, 0xe4);

/// Builds city models. Holds the window texture cache between builds.
#[derive(Default)]
pub struct CityModelBuilder {
    textures: WindowTextureSynthesizer,
}

impl CityModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_synthesizer(textures: WindowTextureSynthesizer) -> Self {
        Self { textures }
    }

    /// Fold `days` and build the model in one step.
    pub fn build_from_days<D: DailyActivity>(&mut self, days: &[D]) -> CityModel {
        self.build(&ActivityGrid::fold(days))
    }

    pub fn build(&mut self, grid: &ActivityGrid) -> CityModel {
        let buildings: Vec<Building> = grid
            .iter_present()
            .map(|(row, col, record)| {
                let height = height_of(record.count);
                let base_color = color_of(record.count);
                let center = cell_center(row, col);

                Building {
                    column: col,
                    row,
                    count: record.count,
                    date: record.date.clone(),
                    height,
                    position: center.extend(height / 2.0),
                    size: Vec3::new(CELL_WIDTH, CELL_DEPTH, height),
                    base_color,
                    side_color: darken(base_color, SIDE_SHADE),
                    texture: self.textures.synthesize(base_color),
                    vertical_tiles: vertical_tiles(height),
                }
            })
            .collect();

        debug!("Built city model with {} buildings", buildings.len());

        CityModel {
            platform: build_platform(),
            buildings,
        }
    }
}

/// Center of grid cell `(row, col)` on the XY plane.
pub fn cell_center(row: usize, col: usize) -> Vec2 {
    let start = -CityModel::footprint() / 2.0;
    Vec2::new(
        start.x + col as f32 * (CELL_WIDTH + CELL_SPACING) + CELL_WIDTH / 2.0,
        start.y + row as f32 * (CELL_DEPTH + CELL_SPACING) + CELL_DEPTH / 2.0,
    )
}

/// Window rows tiled up a building of `height`.
pub fn vertical_tiles(height: f32) -> u32 {
    ((height * WINDOW_ROWS_PER_UNIT).floor() as u32).max(1)
}

/// Decorative platform: a thick lower slab with a slightly smaller, thinner
/// slab on top. The upper slab's top face is at `z = 0`.
pub fn build_platform() -> BasePlatform {
    let extent = CityModel::footprint() * PLATFORM_SCALE;
    let upper_thickness = PLATFORM_THICKNESS / 2.0;

    let upper = Slab {
        center: Vec3::new(0.0, 0.0, -upper_thickness / 2.0),
        size: (extent * UPPER_SLAB_INSET).extend(upper_thickness),
        color: Srgba::rgb_u8(UPPER_SLAB_RGB.0, UPPER_SLAB_RGB.1, UPPER_SLAB_RGB.2),
        shininess: 40.0,
    };
    let lower = Slab {
        center: Vec3::new(0.0, 0.0, -upper_thickness - PLATFORM_THICKNESS / 2.0),
        size: extent.extend(PLATFORM_THICKNESS),
        color: Srgba::rgb_u8(LOWER_SLAB_RGB.0, LOWER_SLAB_RGB.1, LOWER_SLAB_RGB.2),
        shininess: 30.0,
    };

    BasePlatform { lower, upper }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::city::grid::ActivityRecord;
    use crate::city::model::{Face, FaceMaterial};
    use crate::city::scales::{FLOOR_HEIGHT, MAX_HEIGHT};
    use crate::city::{GRID_CELLS, GRID_COLUMNS, GRID_ROWS};

    fn days(counts: &[u32]) -> Vec<ActivityRecord> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| ActivityRecord {
                count,
                date: format!("{}", i + 1),
            })
            .collect()
    }

    #[test]
    fn empty_year_is_all_floor_slabs() {
        let model = CityModelBuilder::new().build_from_days(&days(&[0; GRID_CELLS]));
        assert_eq!(model.buildings.len(), 364);
        for b in &model.buildings {
            assert_eq!(b.height, FLOOR_HEIGHT);
            assert_eq!(b.base_color, color_of(0));
            assert_eq!(b.vertical_tiles, 1);
        }
    }

    #[test]
    fn saturated_day_is_tallest() {
        let mut counts = [0u32; GRID_CELLS];
        counts[0] = 30;
        let model = CityModelBuilder::new().build_from_days(&days(&counts));

        for b in &model.buildings {
            if (b.row, b.column) == (0, 0) {
                assert!((b.height - MAX_HEIGHT).abs() < 1e-5);
                assert_eq!(b.vertical_tiles, 3);
            } else {
                assert_eq!(b.height, FLOOR_HEIGHT);
            }
        }
    }

    #[test]
    fn short_input_builds_only_present_cells() {
        let model = CityModelBuilder::new().build_from_days(&days(&[1; 10]));
        assert_eq!(model.buildings.len(), 10);
    }

    #[test]
    fn build_is_idempotent() {
        let counts: Vec<u32> = (0..GRID_CELLS as u32).map(|i| (i * 7) % 23).collect();
        let grid = ActivityGrid::fold(&days(&counts));

        let mut builder = CityModelBuilder::new();
        let a = builder.build(&grid);
        let b = builder.build(&grid);
        let c = CityModelBuilder::new().build(&grid);
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn buildings_stand_on_platform_in_unique_cells() {
        let counts: Vec<u32> = (0..GRID_CELLS as u32).collect();
        let model = CityModelBuilder::new().build_from_days(&days(&counts));

        let mut centers = HashSet::new();
        for b in &model.buildings {
            assert!((b.position.z - b.height / 2.0).abs() < 1e-6);
            assert!(centers.insert((b.position.x.to_bits(), b.position.y.to_bits())));
        }
        assert_eq!(centers.len(), GRID_CELLS);
    }

    #[test]
    fn layout_is_centered() {
        let first = cell_center(0, 0);
        let last = cell_center(GRID_ROWS - 1, GRID_COLUMNS - 1);
        // Spacing trails the last cell, so the centers sit half a gap left
        // and down of the exact origin.
        let mid = (first + last) / 2.0;
        assert!((mid.x + CELL_SPACING / 2.0).abs() < 1e-5);
        assert!((mid.y + CELL_SPACING / 2.0).abs() < 1e-5);
        assert!((first.x - (-5.2 + 0.125)).abs() < 1e-5);
        assert!((first.y - (-2.8 + 0.125)).abs() < 1e-5);
    }

    #[test]
    fn platform_encloses_buildings() {
        let model = CityModelBuilder::new().build_from_days(&days(&[0; GRID_CELLS]));
        let platform = &model.platform;

        assert!((platform.lower.size.x - 10.4 * 1.4).abs() < 1e-4);
        assert!((platform.lower.size.y - 5.6 * 1.4).abs() < 1e-4);
        assert!(platform.upper.size.x < platform.lower.size.x);
        assert!(platform.upper.size.z < platform.lower.size.z);

        let upper_top = platform.upper.center.z + platform.upper.size.z / 2.0;
        let lower_top = platform.lower.center.z + platform.lower.size.z / 2.0;
        let upper_bottom = platform.upper.center.z - platform.upper.size.z / 2.0;
        assert!(upper_top.abs() < 1e-6);
        assert!((lower_top - upper_bottom).abs() < 1e-6);

        let (min, max) = model.bounds();
        assert!((min.x + platform.lower.size.x / 2.0).abs() < 1e-5);
        assert!((max.z - FLOOR_HEIGHT).abs() < 1e-6);
    }

    #[test]
    fn lateral_faces_carry_windows() {
        let model = CityModelBuilder::new().build_from_days(&days(&[12]));
        let b = &model.buildings[0];
        assert_eq!(b.side_color, darken(b.base_color, 0.85));

        for (face, material) in Face::ALL.into_iter().zip(b.face_materials()) {
            match (face, material) {
                (Face::Top, FaceMaterial::Flat { color }) => assert_eq!(color, b.base_color),
                (Face::Bottom, FaceMaterial::Flat { color }) => assert_eq!(color, b.side_color),
                (f, FaceMaterial::Windowed { tint, repeat, .. }) if f.is_lateral() => {
                    assert_eq!(tint, b.side_color);
                    assert_eq!(repeat, Vec2::new(1.0, b.vertical_tiles as f32));
                }
                (f, m) => panic!("unexpected material on {f:?}: {m:?}"),
            }
        }
    }

    #[test]
    fn missing_texture_falls_back_to_flat_walls() {
        let mut builder =
            CityModelBuilder::with_synthesizer(WindowTextureSynthesizer::with_surface_size(0));
        let model = builder.build_from_days(&days(&[3, 0, 9]));
        assert_eq!(model.buildings.len(), 3);

        for b in &model.buildings {
            assert!(b.texture.is_none());
            for face in Face::ALL.into_iter().filter(|f| f.is_lateral()) {
                assert_eq!(
                    b.face_material(face),
                    FaceMaterial::Flat { color: b.side_color }
                );
            }
        }
    }

    #[test]
    fn tile_factor_follows_height() {
        assert_eq!(vertical_tiles(0.05), 1);
        assert_eq!(vertical_tiles(0.49), 1);
        assert_eq!(vertical_tiles(1.0), 2);
        assert_eq!(vertical_tiles(1.5), 3);
    }

    #[test]
    fn stats_summarize_model() {
        let model = CityModelBuilder::new().build_from_days(&days(&[0, 4, 0, 9, 2]));
        let stats = model.stats();
        assert_eq!(stats.days, 5);
        assert_eq!(stats.active_days, 3);
        assert_eq!(stats.total, 15);
        assert_eq!(stats.busiest, Some(("4".to_string(), 9)));
        assert!((stats.tallest - height_of(9)).abs() < 1e-6);
    }
}
