//! CPU-side resource loading.
//!
//! Every mesh and texture named by a layout is read and decoded here, before
//! any GL object exists. A single failure aborts startup, so the draw pass never
//! sees a partially loaded scene.

use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use image::DynamicImage;

use crate::layout::SceneLayout;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}:{line}: {message}")]
    Obj {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("mesh {0} contains no triangles")]
    EmptyMesh(PathBuf),
    #[error("failed to decode texture {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Triangle list with three parallel attribute arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
}

impl MeshData {
    /// Loads a Wavefront OBJ file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mesh = Self::parse_obj(&source).map_err(|(line, message)| AssetError::Obj {
            path: path.to_path_buf(),
            line,
            message,
        })?;
        if mesh.is_empty() {
            return Err(AssetError::EmptyMesh(path.to_path_buf()));
        }
        log::debug!("Loaded mesh {} ({} vertices)", path.display(), mesh.len());
        Ok(mesh)
    }

    /// Parses OBJ source into de-indexed triangles.
    ///
    /// Polygons are fanned into triangles. Faces without uv or normal references
    /// get zero vectors so the three arrays always have the same length.
    /// Errors carry the 1-based line number.
    pub fn parse_obj(source: &str) -> Result<Self, (usize, String)> {
        let mut positions = Vec::new();
        let mut uvs = Vec::new();
        let mut normals = Vec::new();
        let mut mesh = MeshData::default();

        for (number, line) in source.lines().enumerate() {
            let line_no = number + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(tag) = parts.next() else {
                continue;
            };
            let rest: Vec<&str> = parts.collect();

            match tag {
                "v" => positions.push(Vec3::from(parse_floats::<3>(&rest).map_err(|e| (line_no, e))?)),
                "vt" => uvs.push(Vec2::from(parse_floats::<2>(&rest).map_err(|e| (line_no, e))?)),
                "vn" => normals.push(Vec3::from(parse_floats::<3>(&rest).map_err(|e| (line_no, e))?)),
                "f" => {
                    if rest.len() < 3 {
                        return Err((line_no, format!("face needs 3 vertices, got {}", rest.len())));
                    }
                    let corners = rest
                        .iter()
                        .map(|corner| {
                            resolve_corner(corner, &positions, &uvs, &normals).map_err(|e| (line_no, e))
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    for i in 1..corners.len() - 1 {
                        for (position, uv, normal) in [corners[0], corners[i], corners[i + 1]] {
                            mesh.positions.push(position);
                            mesh.uvs.push(uv);
                            mesh.normals.push(normal);
                        }
                    }
                }
                // Groups, objects, materials and smoothing are irrelevant here.
                _ => {}
            }
        }

        Ok(mesh)
    }

    /// Number of vertices (three per triangle).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn parse_floats<const N: usize>(parts: &[&str]) -> Result<[f32; N], String> {
    if parts.len() < N {
        return Err(format!("expected {N} components, got {}", parts.len()));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("invalid number '{part}'"))?;
    }
    Ok(out)
}

/// Resolves an OBJ index (1-based, or negative relative to the end).
fn resolve_index(raw: &str, len: usize) -> Result<usize, String> {
    let index: i64 = raw.parse().map_err(|_| format!("invalid index '{raw}'"))?;
    let resolved = if index > 0 {
        index - 1
    } else if index < 0 {
        len as i64 + index
    } else {
        return Err("index 0 is not valid".to_string());
    };
    if resolved < 0 || resolved as usize >= len {
        return Err(format!("index {index} out of range ({len} entries)"));
    }
    Ok(resolved as usize)
}

fn resolve_corner(
    corner: &str,
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
) -> Result<(Vec3, Vec2, Vec3), String> {
    let mut refs = corner.split('/');
    let position = match refs.next() {
        Some(raw) if !raw.is_empty() => positions[resolve_index(raw, positions.len())?],
        _ => return Err(format!("face corner '{corner}' has no position")),
    };
    let uv = match refs.next() {
        Some(raw) if !raw.is_empty() => uvs[resolve_index(raw, uvs.len())?],
        _ => Vec2::ZERO,
    };
    let normal = match refs.next() {
        Some(raw) if !raw.is_empty() => normals[resolve_index(raw, normals.len())?],
        _ => Vec3::ZERO,
    };
    Ok((position, uv, normal))
}

/// A decoded texture image.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub image: DynamicImage,
}

impl TextureData {
    /// Reads and decodes an image file (BMP and PNG are supported).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| match source {
            image::ImageError::IoError(source) => AssetError::Io {
                path: path.to_path_buf(),
                source,
            },
            source => AssetError::Image {
                path: path.to_path_buf(),
                source,
            },
        })?;
        log::debug!(
            "Loaded texture {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self { image })
    }
}

/// Mesh and texture of one object.
#[derive(Debug, Clone)]
pub struct ObjectAssets {
    pub mesh: MeshData,
    pub texture: TextureData,
}

/// Everything a layout needs, loaded in object order.
#[derive(Debug, Clone)]
pub struct SceneAssets {
    pub objects: Vec<ObjectAssets>,
}

impl SceneAssets {
    /// Loads every object's mesh and texture, stopping at the first failure.
    pub fn load(layout: &SceneLayout) -> Result<Self, AssetError> {
        let start = std::time::Instant::now();
        let objects = layout
            .objects
            .iter()
            .map(|object| {
                Ok(ObjectAssets {
                    mesh: MeshData::load(layout.resolve(&object.mesh))?,
                    texture: TextureData::load(layout.resolve(&object.texture))?,
                })
            })
            .collect::<Result<Vec<_>, AssetError>>()?;
        log::info!("Loaded {} objects in {:?}", objects.len(), start.elapsed());
        Ok(Self { objects })
    }
}
