//! Unit box meshes split by face group.
//!
//! Every building in a scene shares the same three unit meshes (lateral
//! shell, top cap, bottom cap) and is sized by its transform. Meshes are
//! in model space: Z up, extents `[-0.5, 0.5]` on every axis.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use crate::city::model::Face;

/// Outward normal and in-plane axes for a face. `u x v == normal`, so the
/// quads wind counter-clockwise seen from outside.
fn face_axes(face: Face) -> (Vec3, Vec3, Vec3) {
    match face {
        Face::Right => (Vec3::X, Vec3::Y, Vec3::Z),
        Face::Left => (Vec3::NEG_X, Vec3::NEG_Y, Vec3::Z),
        Face::Front => (Vec3::Y, Vec3::NEG_X, Vec3::Z),
        Face::Back => (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        Face::Top => (Vec3::Z, Vec3::X, Vec3::Y),
        Face::Bottom => (Vec3::NEG_Z, Vec3::X, Vec3::NEG_Y),
    }
}

/// Build a unit-box mesh containing only `faces`.
///
/// Lateral faces map V from the top edge (0) to the bottom edge (1) so a
/// repeated texture tiles upward from the ground.
pub fn unit_box_faces(faces: &[Face]) -> Mesh {
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(faces.len() * 4);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(faces.len() * 4);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(faces.len() * 4);
    let mut indices: Vec<u32> = Vec::with_capacity(faces.len() * 6);

    for &face in faces {
        let (n, u, v) = face_axes(face);
        let base = positions.len() as u32;

        let corners = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];
        for (su, sv) in corners {
            let p = n * 0.5 + u * su + v * sv;
            positions.push(p.to_array());
            normals.push(n.to_array());
            uvs.push([su + 0.5, 0.5 - sv]);
        }

        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}

/// The four lateral faces.
pub fn lateral_shell() -> Mesh {
    let faces: Vec<Face> = Face::ALL.into_iter().filter(|f| f.is_lateral()).collect();
    unit_box_faces(&faces)
}
