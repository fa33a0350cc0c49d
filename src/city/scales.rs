//! Count-to-visual mappings.
//!
//! Both scales are free functions with no state. Height uses a log
//! transform so a handful of busy days does not flatten the rest of the
//! skyline.

use bevy::prelude::*;

/// Height given to days with zero activity.
pub const FLOOR_HEIGHT: f32 = 0.05;

/// Tallest possible building.
pub const MAX_HEIGHT: f32 = 1.5;

/// Count at which height stops growing.
pub const HEIGHT_SATURATION_COUNT: u32 = 30;

/// Count at which color stops changing.
pub const COLOR_CEILING: u32 = 4;

/// Color stops for counts 0, 1, 2, 3 and 4+.
const COLOR_STOPS: [(u8, u8, u8); 5] = [
    (0xeb, 0xed, 0xf0), // very light gray
    (0xbe, 0xf5, 0xca), // pale green
    (0x7c, 0xe3, 0xa1), // light green
    (0x4f, 0xd0, 0x7b), // medium green
    (0x2f, 0xb3, 0x44), // saturated green
];

/// Color for a day with `count` contributions.
pub fn color_of(count: u32) -> Srgba {
    interpolate_stops(count.min(COLOR_CEILING) as f32)
}

/// Piecewise-linear interpolation over [`COLOR_STOPS`], clamped to the
/// domain `[0, 4]`. Channels are rounded to 8 bits.
fn interpolate_stops(value: f32) -> Srgba {
    let last = (COLOR_STOPS.len() - 1) as f32;
    let value = if value.is_finite() { value.clamp(0.0, last) } else { 0.0 };

    let lower = value.floor() as usize;
    let upper = (lower + 1).min(COLOR_STOPS.len() - 1);
    let t = value - lower as f32;

    let (r0, g0, b0) = COLOR_STOPS[lower];
    let (r1, g1, b1) = COLOR_STOPS[upper];
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;

    Srgba::rgb_u8(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Building height for a day with `count` contributions.
///
/// Zero maps to [`FLOOR_HEIGHT`]. Anything else maps `ln(count + 1)` from
/// `[0, ln(31)]` onto `[0, MAX_HEIGHT]`, clamped.
pub fn height_of(count: u32) -> f32 {
    if count == 0 {
        return FLOOR_HEIGHT;
    }

    let domain_max = (HEIGHT_SATURATION_COUNT as f32 + 1.0).ln();
    let t = (count as f32 + 1.0).ln() / domain_max;
    (t * MAX_HEIGHT).clamp(0.0, MAX_HEIGHT)
}

/// Multiply the RGB channels of `color` by `factor`, keeping alpha.
pub fn darken(color: Srgba, factor: f32) -> Srgba {
    Srgba::new(
        color.red * factor,
        color.green * factor,
        color.blue * factor,
        color.alpha,
    )
}
