//! OBJ meshes and skybox faces from disk, with procedural stand-ins when
//! the asset tree is incomplete and placeholders are enabled.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use bv_core::config::AssetConfig;
use bv_core::error::{Error, Result};
use bv_core::scene::MeshId;

use crate::mesh::{compute_normals, MaterialData, MeshData, MeshPart};
use crate::vertex::Vertex;

/// Face files in +X, -X, +Y, -Y, +Z, -Z order.
pub const SKYBOX_FACES: [&str; 6] = [
    "textures/skybox_custom/oasisnight_rt.tga",
    "textures/skybox_custom/oasisnight_lf.tga",
    "textures/skybox_custom/oasisnight_up.tga",
    "textures/skybox_custom/oasisnight_dn.tga",
    "textures/skybox_custom/oasisnight_bk.tga",
    "textures/skybox_custom/oasisnight_ft.tga",
];

pub struct AssetLoader {
    root: PathBuf,
    placeholders: bool,
}

impl AssetLoader {
    pub fn new(config: &AssetConfig) -> Self {
        Self {
            root: config.root.clone(),
            placeholders: config.placeholders,
        }
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn load_mesh(&self, id: MeshId) -> Result<MeshData> {
        let path = self.resolve(id.asset_path());
        match load_obj(&path) {
            Ok(mesh) => {
                log::info!(
                    "Loaded {:?} from {} ({} vertices)",
                    id,
                    path.display(),
                    mesh.vertices.len()
                );
                Ok(mesh)
            }
            Err(err) if self.placeholders => {
                log::warn!("{err}; using a placeholder for {id:?}");
                let (min, max) = id.placeholder_bounds();
                Ok(MeshData::cuboid(min, max, placeholder_color(id)))
            }
            Err(err) => Err(err),
        }
    }

    pub fn load_skybox(&self) -> Result<[RgbaImage; 6]> {
        let mut faces = Vec::with_capacity(6);
        for relative in SKYBOX_FACES {
            let path = self.resolve(relative);
            match load_image(&path) {
                Ok(image) => faces.push(image),
                Err(err) if self.placeholders => {
                    log::warn!("{err}; using a flat skybox");
                    return Ok(placeholder_skybox());
                }
                Err(err) => return Err(err),
            }
        }

        let faces: [RgbaImage; 6] = faces
            .try_into()
            .map_err(|_| Error::RenderError("skybox needs six faces".to_string()))?;
        validate_faces(&faces)?;
        log::info!("Loaded skybox ({}px faces)", faces[0].width());
        Ok(faces)
    }
}

pub fn validate_faces(faces: &[RgbaImage; 6]) -> Result<()> {
    let (width, height) = faces[0].dimensions();
    if width != height {
        return Err(Error::RenderError(format!(
            "skybox faces must be square, got {width}x{height}"
        )));
    }
    if faces.iter().any(|f| f.dimensions() != (width, height)) {
        return Err(Error::RenderError(
            "skybox faces differ in size".to_string(),
        ));
    }
    Ok(())
}

fn load_image(path: &Path) -> Result<RgbaImage> {
    if !path.is_file() {
        return Err(Error::AssetNotFound(path.to_path_buf()));
    }
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| Error::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Load a triangulated, single-indexed OBJ plus its MTL materials.
pub fn load_obj(path: &Path) -> Result<MeshData> {
    if !path.is_file() {
        return Err(Error::AssetNotFound(path.to_path_buf()));
    }

    let (models, materials) =
        tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|e| Error::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let base_dir = path.parent().unwrap_or(Path::new("."));
    let mut mesh = MeshData::default();
    match materials {
        Ok(materials) => {
            for material in materials {
                mesh.materials.push(convert_material(&material, base_dir)?);
            }
        }
        Err(e) => log::warn!("{}: no materials ({e})", path.display()),
    }

    // Parts without a material share a trailing default one.
    let fallback = mesh.materials.len();
    let mut needs_fallback = false;

    for model in models {
        let m = model.mesh;
        let base = mesh.vertices.len() as u32;
        let count = m.positions.len() / 3;
        let has_normals = m.normals.len() == m.positions.len();

        let mut vertices: Vec<Vertex> = (0..count)
            .map(|i| Vertex {
                position: [m.positions[3 * i], m.positions[3 * i + 1], m.positions[3 * i + 2]],
                normal: if has_normals {
                    [m.normals[3 * i], m.normals[3 * i + 1], m.normals[3 * i + 2]]
                } else {
                    [0.0, 1.0, 0.0]
                },
                uv: if m.texcoords.len() >= 2 * count {
                    // OBJ puts v = 0 at the bottom of the image
                    [m.texcoords[2 * i], 1.0 - m.texcoords[2 * i + 1]]
                } else {
                    [0.0, 0.0]
                },
            })
            .collect();
        if !has_normals {
            compute_normals(&mut vertices, &m.indices);
        }

        let start = mesh.indices.len() as u32;
        mesh.vertices.extend(vertices);
        mesh.indices.extend(m.indices.iter().map(|i| base + i));
        let end = mesh.indices.len() as u32;

        let material = match m.material_id {
            Some(id) if id < fallback => id,
            _ => {
                needs_fallback = true;
                fallback
            }
        };
        if start < end {
            mesh.parts.push(MeshPart {
                indices: start..end,
                material,
            });
        }
    }

    if needs_fallback {
        mesh.materials.push(MaterialData::default());
    }
    if mesh.indices.is_empty() {
        return Err(Error::AssetLoad {
            path: path.to_path_buf(),
            reason: "mesh has no triangles".to_string(),
        });
    }

    Ok(mesh)
}

fn convert_material(material: &tobj::Material, base_dir: &Path) -> Result<MaterialData> {
    let [r, g, b] = material.diffuse.unwrap_or([1.0, 1.0, 1.0]);
    let alpha = material.dissolve.unwrap_or(1.0);

    let texture = match &material.diffuse_texture {
        Some(name) if !name.is_empty() => Some(load_image(&base_dir.join(name))?),
        _ => None,
    };
    // A texture already carries the surface color.
    let color = if texture.is_some() {
        [1.0, 1.0, 1.0, alpha]
    } else {
        [r, g, b, alpha]
    };

    Ok(MaterialData { color, texture })
}

pub fn placeholder_color(id: MeshId) -> [f32; 4] {
    match id {
        MeshId::Ground => [0.32, 0.40, 0.22, 1.0],
        MeshId::Tank1 | MeshId::Tank2 | MeshId::Tank3 => [0.36, 0.40, 0.26, 1.0],
        MeshId::Barracks => [0.52, 0.42, 0.30, 1.0],
        MeshId::Forest => [0.16, 0.32, 0.14, 1.0],
        MeshId::Dog => [0.45, 0.33, 0.22, 1.0],
        MeshId::Soldier => [0.30, 0.34, 0.24, 1.0],
        MeshId::M4 => [0.15, 0.15, 0.15, 1.0],
        MeshId::Barricade => [0.60, 0.55, 0.45, 1.0],
        MeshId::Lamp => [0.90, 0.85, 0.60, 1.0],
        MeshId::LightCube => [1.0, 1.0, 1.0, 1.0],
    }
}

/// One-pixel night sky: dark overhead, lighter toward the horizon.
pub fn placeholder_skybox() -> [RgbaImage; 6] {
    let face = |rgb: [u8; 3]| RgbaImage::from_pixel(1, 1, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
    let side = [38, 44, 72];
    [
        face(side),
        face(side),
        face([12, 14, 30]),
        face([20, 18, 16]),
        face(side),
        face(side),
    ]
}
