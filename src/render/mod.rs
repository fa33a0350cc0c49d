//! Rendering: scene realization, facade images, lighting.

use bevy::prelude::*;

pub mod building_mesh;
pub mod city_scene;
pub mod facade_textures;

/// Converts unit light intensities into lux.
const LUX_PER_UNIT: f32 = 4_000.0;

/// Converts unit ambient intensity into Bevy's ambient brightness.
const AMBIENT_PER_UNIT: f32 = 500.0;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb_u8(0xf8, 0xfa, 0xf9)))
            .insert_resource(AmbientLight {
                color: Color::WHITE,
                brightness: 0.7 * AMBIENT_PER_UNIT,
            })
            .add_plugins(city_scene::CityScenePlugin)
            .add_systems(Startup, setup_lights);
    }
}

fn setup_lights(mut commands: Commands) {
    // Key light
    commands.spawn((
        DirectionalLight {
            illuminance: 0.9 * LUX_PER_UNIT,
            ..default()
        },
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Fill light
    commands.spawn((
        DirectionalLight {
            illuminance: 0.5 * LUX_PER_UNIT,
            ..default()
        },
        Transform::from_xyz(-5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
