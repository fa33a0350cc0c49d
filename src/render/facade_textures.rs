//! GPU images for procedural facade textures.
//!
//! Converts the CPU-side [`WindowTexture`] bitmaps into Bevy [`Image`]s
//! with the sampler wrap modes the texture asks for.

use bevy::{
    image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor},
    prelude::*,
    render::{
        render_asset::RenderAssetUsages,
        render_resource::{Extent3d, TextureDimension, TextureFormat},
    },
};

use crate::city::window_texture::{WindowTexture, WrapMode};

fn address_mode(wrap: WrapMode) -> ImageAddressMode {
    match wrap {
        WrapMode::Repeat => ImageAddressMode::Repeat,
        WrapMode::ClampToEdge => ImageAddressMode::ClampToEdge,
    }
}

/// Create an sRGB image from a window texture.
pub fn window_image(texture: &WindowTexture) -> Image {
    let mut image = Image::new(
        Extent3d {
            width: texture.size,
            height: texture.size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        texture.pixels.clone(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );

    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: address_mode(texture.wrap_u),
        address_mode_v: address_mode(texture.wrap_v),
        ..default()
    });

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::window_texture::{paint_window_texture, TEXTURE_SIZE};

    #[test]
    fn image_matches_texture() {
        let texture = paint_window_texture(Srgba::rgb_u8(0x7c, 0xe3, 0xa1), TEXTURE_SIZE).unwrap();
        let image = window_image(&texture);

        assert_eq!(image.width(), TEXTURE_SIZE);
        assert_eq!(image.height(), TEXTURE_SIZE);
        assert_eq!(image.texture_descriptor.format, TextureFormat::Rgba8UnormSrgb);
        assert_eq!(image.data, texture.pixels);

        let ImageSampler::Descriptor(sampler) = &image.sampler else {
            panic!("expected an explicit sampler");
        };
        assert!(matches!(sampler.address_mode_u, ImageAddressMode::Repeat));
        assert!(matches!(sampler.address_mode_v, ImageAddressMode::Repeat));
    }
}
