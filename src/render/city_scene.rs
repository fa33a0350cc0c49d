//! Scene adapter: realizes a [`CityModel`] as entities and assets.
//!
//! Renderer assets are not reclaimed on their own once a model is
//! superseded, so the scene keeps exactly one live bundle. A new model is
//! realized in full, swapped in, and only then is the previous bundle
//! despawned and every asset it created removed. Bundles never share
//! assets, so releasing one cannot touch the other.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use bevy::{math::Affine2, prelude::*};

use crate::city::model::{Face, FaceMaterial, Slab};
use crate::city::window_texture::to_rgb8;
use crate::city::CityModel;
use crate::render::building_mesh::{lateral_shell, unit_box_faces};
use crate::render::facade_textures::window_image;

/// Phong-like shininess used for every building face.
const BUILDING_SHININESS: f32 = 50.0;

pub struct CityScenePlugin;

impl Plugin for CityScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CityScene>()
            .add_event::<CityModelReady>()
            .add_systems(Update, apply_city_models);
    }
}

/// A freshly built model waiting to be shown.
#[derive(Event)]
pub struct CityModelReady {
    pub model: CityModel,
}

/// Root of the realized city. Rotates the Z-up model into Bevy's Y-up world.
#[derive(Component)]
pub struct CityRoot;

/// One building in the scene.
#[derive(Component, Clone, Debug)]
pub struct CityBuilding {
    pub row: usize,
    pub column: usize,
    pub count: u32,
}

/// One slab of the base platform.
#[derive(Component)]
pub struct PlatformSlab;

/// The single live bundle, if any.
#[derive(Resource, Default)]
pub struct CityScene {
    current: Option<SceneBundle>,
    /// Number of models shown so far.
    pub generation: u64,
}

impl CityScene {
    pub fn current(&self) -> Option<&SceneBundle> {
        self.current.as_ref()
    }

    /// Install `next` and hand back the bundle it displaces.
    fn replace(&mut self, next: SceneBundle) -> Option<SceneBundle> {
        self.generation += 1;
        self.current.replace(next)
    }
}

/// Everything spawned and allocated for one model.
pub struct SceneBundle {
    pub root: Entity,
    assets: SceneAssets,
}

impl SceneBundle {
    pub fn building_count(&self) -> usize {
        self.assets.buildings.len()
    }

    fn release(
        self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        images: &mut Assets<Image>,
    ) {
        commands.entity(self.root).despawn_recursive();
        self.assets.release(meshes, materials, images);
    }
}

struct SlabPlacement {
    transform: Transform,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
}

struct BuildingPlacement {
    transform: Transform,
    marker: CityBuilding,
    /// Lateral shell, top cap, bottom cap.
    parts: [(Handle<Mesh>, Handle<StandardMaterial>); 3],
}

/// Assets created for one model plus where to place them.
pub struct SceneAssets {
    meshes: Vec<Handle<Mesh>>,
    materials: Vec<Handle<StandardMaterial>>,
    images: Vec<Handle<Image>>,
    slabs: Vec<SlabPlacement>,
    buildings: Vec<BuildingPlacement>,
}

/// Shininess (0..100) to roughness (1..0).
fn roughness(shininess: f32) -> f32 {
    (1.0 - shininess / 100.0).clamp(0.05, 1.0)
}

/// Deduplicates materials and images within one bundle.
struct MaterialCache<'a> {
    materials: &'a mut Assets<StandardMaterial>,
    images: &'a mut Assets<Image>,
    flat: HashMap<[u8; 3], Handle<StandardMaterial>>,
    windowed: HashMap<([u8; 3], [u8; 3], u32), Handle<StandardMaterial>>,
    textures: HashMap<[u8; 3], Handle<Image>>,
    created_materials: Vec<Handle<StandardMaterial>>,
    created_images: Vec<Handle<Image>>,
}

impl<'a> MaterialCache<'a> {
    fn new(materials: &'a mut Assets<StandardMaterial>, images: &'a mut Assets<Image>) -> Self {
        Self {
            materials,
            images,
            flat: HashMap::new(),
            windowed: HashMap::new(),
            textures: HashMap::new(),
            created_materials: Vec::new(),
            created_images: Vec::new(),
        }
    }

    fn add_material(&mut self, material: StandardMaterial) -> Handle<StandardMaterial> {
        let handle = self.materials.add(material);
        self.created_materials.push(handle.clone());
        handle
    }

    fn slab(&mut self, slab: &Slab) -> Handle<StandardMaterial> {
        self.add_material(StandardMaterial {
            base_color: slab.color.into(),
            perceptual_roughness: roughness(slab.shininess),
            ..default()
        })
    }

    fn face(&mut self, material: FaceMaterial) -> Handle<StandardMaterial> {
        match material {
            FaceMaterial::Flat { color } => {
                let key = to_rgb8(color);
                if let Some(handle) = self.flat.get(&key) {
                    return handle.clone();
                }
                let handle = self.add_material(StandardMaterial {
                    base_color: color.into(),
                    perceptual_roughness: roughness(BUILDING_SHININESS),
                    ..default()
                });
                self.flat.insert(key, handle.clone());
                handle
            }
            FaceMaterial::Windowed {
                tint,
                texture,
                repeat,
            } => {
                let texture_key = to_rgb8(texture.base_color);
                let key = (texture_key, to_rgb8(tint), repeat.y.to_bits());
                if let Some(handle) = self.windowed.get(&key) {
                    return handle.clone();
                }

                let image = match self.textures.get(&texture_key) {
                    Some(image) => image.clone(),
                    None => {
                        let image = self.images.add(window_image(&texture));
                        self.created_images.push(image.clone());
                        self.textures.insert(texture_key, image.clone());
                        image
                    }
                };

                let handle = self.add_material(StandardMaterial {
                    base_color: tint.into(),
                    base_color_texture: Some(image),
                    uv_transform: Affine2::from_scale(repeat),
                    perceptual_roughness: roughness(BUILDING_SHININESS),
                    ..default()
                });
                self.windowed.insert(key, handle.clone());
                handle
            }
        }
    }
}

impl SceneAssets {
    /// Allocate every mesh, material and image `model` needs.
    pub fn create(
        model: &CityModel,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        images: &mut Assets<Image>,
    ) -> Self {
        let shell = meshes.add(lateral_shell());
        let top = meshes.add(unit_box_faces(&[Face::Top]));
        let bottom = meshes.add(unit_box_faces(&[Face::Bottom]));
        let mut mesh_handles = vec![shell.clone(), top.clone(), bottom.clone()];

        let mut cache = MaterialCache::new(materials, images);

        let slabs = [&model.platform.lower, &model.platform.upper]
            .into_iter()
            .map(|slab| {
                let mesh = meshes.add(Cuboid::new(slab.size.x, slab.size.y, slab.size.z));
                mesh_handles.push(mesh.clone());
                SlabPlacement {
                    transform: Transform::from_translation(slab.center),
                    mesh,
                    material: cache.slab(slab),
                }
            })
            .collect();

        let buildings = model
            .buildings
            .iter()
            .map(|building| {
                let lateral = cache.face(building.face_material(Face::Right));
                let top_material = cache.face(building.face_material(Face::Top));
                let bottom_material = cache.face(building.face_material(Face::Bottom));

                BuildingPlacement {
                    transform: Transform::from_translation(building.position)
                        .with_scale(building.size),
                    marker: CityBuilding {
                        row: building.row,
                        column: building.column,
                        count: building.count,
                    },
                    parts: [
                        (shell.clone(), lateral),
                        (top.clone(), top_material),
                        (bottom.clone(), bottom_material),
                    ],
                }
            })
            .collect();

        let MaterialCache {
            created_materials,
            created_images,
            ..
        } = cache;

        Self {
            meshes: mesh_handles,
            materials: created_materials,
            images: created_images,
            slabs,
            buildings,
        }
    }

    /// Spawn the entity hierarchy and return its root.
    pub fn spawn(&self, commands: &mut Commands) -> Entity {
        commands
            .spawn((
                CityRoot,
                Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
                Visibility::default(),
            ))
            .with_children(|city| {
                for slab in &self.slabs {
                    city.spawn((
                        Mesh3d(slab.mesh.clone()),
                        MeshMaterial3d(slab.material.clone()),
                        slab.transform,
                        PlatformSlab,
                    ));
                }

                for building in &self.buildings {
                    city.spawn((
                        building.transform,
                        Visibility::default(),
                        building.marker.clone(),
                    ))
                    .with_children(|parts| {
                        for (mesh, material) in &building.parts {
                            parts.spawn((
                                Mesh3d(mesh.clone()),
                                MeshMaterial3d(material.clone()),
                                Transform::IDENTITY,
                            ));
                        }
                    });
                }
            })
            .id()
    }

    /// Remove every asset this bundle created.
    pub fn release(
        self,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        images: &mut Assets<Image>,
    ) {
        for handle in &self.meshes {
            meshes.remove(handle);
        }
        for handle in &self.materials {
            materials.remove(handle);
        }
        for handle in &self.images {
            images.remove(handle);
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

fn apply_city_models(
    mut commands: Commands,
    mut events: EventReader<CityModelReady>,
    mut scene: ResMut<CityScene>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    // Only the newest model matters when several arrive in one frame.
    let Some(ready) = events.read().last() else {
        return;
    };

    let assets = SceneAssets::create(&ready.model, &mut meshes, &mut materials, &mut images);
    info!(
        "Realizing city: {} buildings, {} meshes, {} materials, {} textures",
        ready.model.buildings.len(),
        assets.mesh_count(),
        assets.material_count(),
        assets.image_count()
    );

    let root = assets.spawn(&mut commands);
    if let Some(previous) = scene.replace(SceneBundle { root, assets }) {
        debug!("Releasing previous city bundle");
        previous.release(&mut commands, &mut meshes, &mut materials, &mut images);
    }
}
