//! Procedural "windows" texture for building walls.
//!
//! A small tileable bitmap: the wall color darkened for an ambient
//! occlusion look, with two rows of two light window blocks. The bitmap is
//! a pure function of the base color, so the synthesizer keeps a weak
//! per-color cache and hands out shared immutable textures.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use bevy::prelude::*;
use thiserror::Error;

use crate::city::scales::darken;

/// Edge length of the generated texture in pixels.
pub const TEXTURE_SIZE: u32 = 32;

/// Channel multiplier applied to the base color for the wall fill.
pub const WALL_SHADE: f32 = 0.85;

/// Edge length of one window block.
const WINDOW_SIZE: u32 = 8;

/// Top-left corners of the four window blocks.
const WINDOW_ORIGINS: [(u32, u32); 4] = [(4, 4), (20, 4), (4, 20), (20, 20)];

const WINDOW_RGB: [u8; 3] = [255, 255, 255];
const WINDOW_ALPHA: f32 = 0.9;

/// Largest surface the synthesizer will allocate.
const MAX_SURFACE_SIZE: u32 = 4096;

/// Smallest surface that still holds every window block.
const fn required_surface_size() -> u32 {
    let mut extent = 0;
    let mut i = 0;
    while i < WINDOW_ORIGINS.len() {
        let (x, y) = WINDOW_ORIGINS[i];
        let far = if x > y { x } else { y } + WINDOW_SIZE;
        if far > extent {
            extent = far;
        }
        i += 1;
    }
    extent
}

/// Reasons a drawing surface could not be acquired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    #[error("drawing surface has zero area ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },

    #[error("drawing surface {size}px exceeds the {max}px limit")]
    SurfaceTooLarge { size: u32, max: u32 },

    #[error("drawing surface {size}px cannot hold the window layout ({required}px needed)")]
    SurfaceTooSmall { size: u32, required: u32 },
}

/// How a texture behaves outside the `[0, 1]` UV range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
}

/// Opaque RGBA8 drawing surface.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptySurface { width, height });
        }
        let size = width.max(height);
        if size > MAX_SURFACE_SIZE {
            return Err(TextureError::SurfaceTooLarge {
                size,
                max: MAX_SURFACE_SIZE,
            });
        }

        Ok(Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        })
    }

    /// Paint every pixel with an opaque color.
    pub fn fill(&mut self, rgb: [u8; 3]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px[..3].copy_from_slice(&rgb);
            px[3] = 255;
        }
    }

    /// Source-over blend a translucent rectangle onto the canvas.
    /// The rectangle is clipped to the surface.
    pub fn blend_rect(&mut self, x: u32, y: u32, w: u32, h: u32, rgb: [u8; 3], alpha: f32) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);

        for py in y.min(self.height)..y_end {
            for px in x.min(self.width)..x_end {
                let idx = ((py * self.width + px) * 4) as usize;
                for c in 0..3 {
                    self.pixels[idx + c] = blend_channel(rgb[c], self.pixels[idx + c], alpha);
                }
                self.pixels[idx + 3] = 255;
            }
        }
    }

    fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

fn blend_channel(src: u8, dst: u8, alpha: f32) -> u8 {
    (src as f32 * alpha + dst as f32 * (1.0 - alpha))
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Convert a color to 8-bit sRGB channels.
pub fn to_rgb8(color: Srgba) -> [u8; 3] {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [q(color.red), q(color.green), q(color.blue)]
}

/// Immutable window texture bitmap.
#[derive(Debug, PartialEq)]
pub struct WindowTexture {
    pub base_color: Srgba,
    pub size: u32,
    /// Row-major RGBA8, sRGB encoded.
    pub pixels: Vec<u8>,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
}

impl WindowTexture {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.size + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

/// Paint the window texture for `base` onto a fresh `size`x`size` surface.
pub fn paint_window_texture(base: Srgba, size: u32) -> Result<WindowTexture, TextureError> {
    let mut canvas = Canvas::new(size, size)?;

    let required = required_surface_size();
    if size < required {
        return Err(TextureError::SurfaceTooSmall { size, required });
    }

    canvas.fill(to_rgb8(darken(base, WALL_SHADE)));
    for (x, y) in WINDOW_ORIGINS {
        canvas.blend_rect(x, y, WINDOW_SIZE, WINDOW_SIZE, WINDOW_RGB, WINDOW_ALPHA);
    }

    Ok(WindowTexture {
        base_color: base,
        size,
        pixels: canvas.into_pixels(),
        wrap_u: WrapMode::Repeat,
        wrap_v: WrapMode::Repeat,
    })
}

/// Produces window textures, reusing live ones for repeated colors.
///
/// The cache only holds weak references: once every building using a
/// texture is dropped the entry dies with it.
pub struct WindowTextureSynthesizer {
    surface_size: u32,
    cache: HashMap<[u8; 3], Weak<WindowTexture>>,
    warned: bool,
}

impl Default for WindowTextureSynthesizer {
    fn default() -> Self {
        Self::with_surface_size(TEXTURE_SIZE)
    }
}

impl WindowTextureSynthesizer {
    pub fn with_surface_size(surface_size: u32) -> Self {
        Self {
            surface_size,
            cache: HashMap::new(),
            warned: false,
        }
    }

    /// Texture for `base`, or `None` when no surface could be acquired.
    pub fn synthesize(&mut self, base: Srgba) -> Option<Arc<WindowTexture>> {
        let key = to_rgb8(base);
        if let Some(texture) = self.cache.get(&key).and_then(Weak::upgrade) {
            return Some(texture);
        }

        match paint_window_texture(base, self.surface_size) {
            Ok(texture) => {
                let texture = Arc::new(texture);
                self.cache.retain(|_, entry| entry.strong_count() > 0);
                self.cache.insert(key, Arc::downgrade(&texture));
                Some(texture)
            }
            Err(err) => {
                if !self.warned {
                    warn!("Window texture unavailable, using flat walls: {err}");
                    self.warned = true;
                }
                None
            }
        }
    }

    /// Number of cached entries that are still alive.
    pub fn live_entries(&self) -> usize {
        self.cache
            .values()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn green() -> Srgba {
        Srgba::rgb_u8(0x4f, 0xd0, 0x7b)
    }

    #[test]
    fn layout_requires_28_pixels() {
        assert_eq!(required_surface_size(), 28);
    }

    #[test]
    fn wall_and_windows_are_painted() {
        let tex = paint_window_texture(green(), TEXTURE_SIZE).unwrap();
        assert_eq!(tex.size, 32);
        assert_eq!(tex.pixels.len(), 32 * 32 * 4);
        assert_eq!(tex.wrap_u, WrapMode::Repeat);
        assert_eq!(tex.wrap_v, WrapMode::Repeat);

        let wall = to_rgb8(darken(green(), WALL_SHADE));
        let [r, g, b, a] = tex.pixel(0, 0);
        assert_eq!([r, g, b], wall);
        assert_eq!(a, 255);

        let window: Vec<u8> = wall
            .iter()
            .map(|&c| blend_channel(255, c, WINDOW_ALPHA))
            .collect();
        for (x, y) in WINDOW_ORIGINS {
            assert_eq!(tex.pixel(x, y)[..3], window[..]);
            assert_eq!(tex.pixel(x + 7, y + 7)[..3], window[..]);
            // Right and bottom edges are exclusive.
            assert_eq!(tex.pixel(x + 8, y)[..3], wall[..]);
            assert_eq!(tex.pixel(x, y + 8)[..3], wall[..]);
        }
        assert_eq!(tex.pixel(16, 16)[..3], wall[..]);
    }

    #[test]
    fn windows_are_light_on_dark_walls() {
        let tex = paint_window_texture(Srgba::BLACK, TEXTURE_SIZE).unwrap();
        assert_eq!(tex.pixel(0, 0), [0, 0, 0, 255]);
        let [r, g, b, _] = tex.pixel(5, 5);
        assert!(r >= 229 && g >= 229 && b >= 229);
    }

    #[test]
    fn painting_is_deterministic() {
        let a = paint_window_texture(green(), TEXTURE_SIZE).unwrap();
        let b = paint_window_texture(green(), TEXTURE_SIZE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unusable_surfaces_are_rejected() {
        assert_eq!(
            paint_window_texture(green(), 0),
            Err(TextureError::EmptySurface { width: 0, height: 0 })
        );
        assert_eq!(
            paint_window_texture(green(), 16),
            Err(TextureError::SurfaceTooSmall { size: 16, required: 28 })
        );
        assert!(matches!(
            paint_window_texture(green(), MAX_SURFACE_SIZE + 1),
            Err(TextureError::SurfaceTooLarge { .. })
        ));
    }

    #[test]
    fn cache_shares_live_textures() {
        let mut synth = WindowTextureSynthesizer::default();
        let a = synth.synthesize(green()).unwrap();
        let b = synth.synthesize(green()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let other = synth.synthesize(Srgba::rgb_u8(0xeb, 0xed, 0xf0)).unwrap();
        assert!(!Arc::ptr_eq(&a, &other));
        assert_eq!(synth.live_entries(), 2);
    }

    #[test]
    fn cache_entries_die_with_their_users() {
        let mut synth = WindowTextureSynthesizer::default();
        let first = synth.synthesize(green()).unwrap();
        let pixels = first.pixels.clone();
        drop(first);
        assert_eq!(synth.live_entries(), 0);

        let second = synth.synthesize(green()).unwrap();
        assert_eq!(synth.live_entries(), 1);
        assert_eq!(second.pixels, pixels);
    }

    #[test]
    fn failed_surface_degrades_to_none() {
        let mut synth = WindowTextureSynthesizer::with_surface_size(0);
        assert!(synth.synthesize(green()).is_none());
        assert!(synth.synthesize(green()).is_none());
        assert_eq!(synth.live_entries(), 0);
    }
}
