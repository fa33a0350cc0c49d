//! Scene description produced by the city builder.
//!
//! The model is Z-up: X runs along grid columns, Y along grid rows, and Z
//! is building height. It is centered on the origin with the platform's top
//! surface at `z = 0`.

use std::sync::Arc;

use bevy::prelude::*;

use crate::city::window_texture::WindowTexture;
use crate::city::{CELL_DEPTH, CELL_SPACING, CELL_WIDTH, GRID_COLUMNS, GRID_ROWS};

/// Box faces in the order the renderer assigns materials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Right,
        Face::Left,
        Face::Top,
        Face::Bottom,
        Face::Front,
        Face::Back,
    ];

    pub fn is_lateral(self) -> bool {
        !matches!(self, Face::Top | Face::Bottom)
    }
}

/// Surface description for one face.
#[derive(Clone, Debug, PartialEq)]
pub enum FaceMaterial {
    /// Untextured, single color.
    Flat { color: Srgba },
    /// Window texture tinted by `tint`, tiled `repeat` times per axis.
    Windowed {
        tint: Srgba,
        texture: Arc<WindowTexture>,
        repeat: Vec2,
    },
}

/// A decorative platform slab.
#[derive(Clone, Debug, PartialEq)]
pub struct Slab {
    pub center: Vec3,
    pub size: Vec3,
    pub color: Srgba,
    /// Phong-style shininess, `0..=100`.
    pub shininess: f32,
}

/// Two stacked slabs under the buildings.
#[derive(Clone, Debug, PartialEq)]
pub struct BasePlatform {
    pub lower: Slab,
    pub upper: Slab,
}

/// One building, derived from one grid cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    pub column: usize,
    pub row: usize,
    pub count: u32,
    pub date: String,
    pub height: f32,
    /// Center of the box.
    pub position: Vec3,
    /// Full extents (width, depth, height).
    pub size: Vec3,
    pub base_color: Srgba,
    pub side_color: Srgba,
    /// `None` when no texture surface was available.
    pub texture: Option<Arc<WindowTexture>>,
    /// Rows of windows repeated up the lateral faces.
    pub vertical_tiles: u32,
}

impl Building {
    /// Material for `face`.
    pub fn face_material(&self, face: Face) -> FaceMaterial {
        match face {
            Face::Top => FaceMaterial::Flat {
                color: self.base_color,
            },
            Face::Bottom => FaceMaterial::Flat {
                color: self.side_color,
            },
            _ => match &self.texture {
                Some(texture) => FaceMaterial::Windowed {
                    tint: self.side_color,
                    texture: Arc::clone(texture),
                    repeat: Vec2::new(1.0, self.vertical_tiles as f32),
                },
                None => FaceMaterial::Flat {
                    color: self.side_color,
                },
            },
        }
    }

    /// Materials for all six faces, in [`Face::ALL`] order.
    pub fn face_materials(&self) -> [FaceMaterial; 6] {
        Face::ALL.map(|face| self.face_material(face))
    }
}

/// Complete generated city for one activity grid.
#[derive(Clone, Debug, PartialEq)]
pub struct CityModel {
    pub platform: BasePlatform,
    /// Row-major grid order.
    pub buildings: Vec<Building>,
}

impl CityModel {
    /// Width (X) and depth (Y) of the building grid including spacing.
    pub fn footprint() -> Vec2 {
        Vec2::new(
            (CELL_WIDTH + CELL_SPACING) * GRID_COLUMNS as f32,
            (CELL_DEPTH + CELL_SPACING) * GRID_ROWS as f32,
        )
    }

    /// Axis-aligned bounds of everything in the model as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let slabs = [&self.platform.lower, &self.platform.upper];
        let boxes = slabs
            .into_iter()
            .map(|s| (s.center, s.size))
            .chain(self.buildings.iter().map(|b| (b.position, b.size)));

        boxes.fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), (center, size)| {
                let half = size / 2.0;
                (min.min(center - half), max.max(center + half))
            },
        )
    }

    pub fn stats(&self) -> CityStats {
        let total = self.buildings.iter().map(|b| b.count as u64).sum();
        let busiest = self
            .buildings
            .iter()
            .max_by_key(|b| b.count)
            .filter(|b| b.count > 0)
            .map(|b| (b.date.clone(), b.count));
        let tallest = self
            .buildings
            .iter()
            .map(|b| b.height)
            .fold(0.0f32, f32::max);

        CityStats {
            days: self.buildings.len(),
            active_days: self.buildings.iter().filter(|b| b.count > 0).count(),
            total,
            busiest,
            tallest,
        }
    }
}

/// Summary numbers for display.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CityStats {
    pub days: usize,
    pub active_days: usize,
    pub total: u64,
    /// Date and count of the busiest day, if any day had activity.
    pub busiest: Option<(String, u32)>,
    pub tallest: f32,
}
