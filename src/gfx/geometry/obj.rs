//! Wavefront OBJ loading through `tobj`.

use std::path::Path;

use super::{face_normal, GeometryData};
use crate::error::{EditorError, Result};

/// Load every model in an OBJ file into a single [`GeometryData`].
///
/// Materials are ignored. Files without usable normals get averaged face
/// normals. With `swap_yz` the Y and Z coordinates are exchanged, for files
/// exported Z-up.
pub fn load_obj(path: impl AsRef<Path>, swap_yz: bool) -> Result<GeometryData> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| EditorError::MeshLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let mut data = GeometryData::new();
    for model in &models {
        let mesh = &model.mesh;
        let base = data.vertices.len() as u32;
        let positions: Vec<[f32; 3]> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();

        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect()
        } else {
            smooth_normals(&positions, &mesh.indices)
        };

        let tex_coords: Vec<[f32; 2]> = if mesh.texcoords.len() / 2 == positions.len() {
            mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect()
        } else {
            vec![[0.0, 0.0]; positions.len()]
        };

        data.vertices.extend(positions);
        data.normals.extend(normals);
        data.tex_coords.extend(tex_coords);
        data.indices.extend(mesh.indices.iter().map(|i| base + i));
    }

    if swap_yz {
        for v in data.vertices.iter_mut().chain(data.normals.iter_mut()) {
            v.swap(1, 2);
        }
    }

    log::info!(
        "Loaded {} ({} models, {} triangles)",
        path.display(),
        models.len(),
        data.triangle_count()
    );
    Ok(data)
}

/// Per-vertex normals averaged from the faces that share each vertex
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut sums = vec![[0.0f32; 3]; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let n = face_normal(positions[a], positions[b], positions[c]);
        for i in [a, b, c] {
            for k in 0..3 {
                sums[i][k] += n[k];
            }
        }
    }

    sums.into_iter()
        .map(|n| {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            if len > f32::EPSILON {
                [n[0] / len, n[1] / len, n[2] / len]
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}
