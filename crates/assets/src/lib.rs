//! Asset pipeline adapter: decodes the baked texture and the glTF scene bundle.
//!
//! Decoding is delegated to `image` and `gltf`; this crate only flattens the
//! result into [`LoadedModel`] so the kernel never sees file formats.
//!
//! # Layout
//! An asset directory holds `baked.jpg` and `portal.glb`. Meshes must be
//! exported without Draco compression; the importer rejects bundles that
//! require it.

use diorama_common::{LoadedModel, LoadedNode, MeshData, TextureData};
use glam::{Mat4, Vec3};
use std::path::Path;

/// File name of the baked lighting texture inside an asset directory.
pub const BAKED_TEXTURE_FILE: &str = "baked.jpg";
/// File name of the scene bundle inside an asset directory.
pub const MODEL_FILE: &str = "portal.glb";

/// Errors from asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("glTF import error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("glTF bundle has no scene")]
    NoScene,
    #[error("node {node:?} has a primitive without positions")]
    MissingPositions { node: String },
}

/// Decode the baked texture from a file. Rows stay in file order, which
/// matches glTF texture coordinates.
pub fn load_baked_texture(path: impl AsRef<Path>) -> Result<TextureData, AssetError> {
    let image = image::open(path.as_ref())?.to_rgba8();
    tracing::debug!(
        path = %path.as_ref().display(),
        width = image.width(),
        height = image.height(),
        "decoded baked texture"
    );
    Ok(to_texture(image))
}

fn to_texture(image: image::RgbaImage) -> TextureData {
    TextureData {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    }
}

/// Import every mesh node of a glTF/GLB file.
pub fn load_model(path: impl AsRef<Path>) -> Result<Vec<LoadedNode>, AssetError> {
    let (document, buffers, _images) = gltf::import(path.as_ref())?;
    let nodes = collect_nodes(&document, &buffers)?;
    tracing::debug!(path = %path.as_ref().display(), nodes = nodes.len(), "imported model");
    Ok(nodes)
}

/// Import every mesh node of an in-memory glTF/GLB bundle.
pub fn load_model_from_slice(bytes: &[u8]) -> Result<Vec<LoadedNode>, AssetError> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    collect_nodes(&document, &buffers)
}

/// Load `baked.jpg` and `portal.glb` from an asset directory.
pub fn load_portal_assets(dir: impl AsRef<Path>) -> Result<LoadedModel, AssetError> {
    let dir = dir.as_ref();
    tracing::info!(dir = %dir.display(), "loading portal assets");
    let baked_texture = load_baked_texture(dir.join(BAKED_TEXTURE_FILE))?;
    let nodes = load_model(dir.join(MODEL_FILE))?;
    Ok(LoadedModel {
        nodes,
        baked_texture,
    })
}

fn collect_nodes(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<LoadedNode>, AssetError> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(AssetError::NoScene)?;

    let mut out = Vec::new();
    for node in scene.nodes() {
        visit(&node, Mat4::IDENTITY, buffers, &mut out)?;
    }
    Ok(out)
}

/// Depth-first walk; node transforms are baked into positions.
fn visit(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<LoadedNode>,
) -> Result<(), AssetError> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    let name = node.name().unwrap_or_default();

    if let Some(mesh) = node.mesh() {
        let mut data = MeshData::default();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                tracing::warn!(node = name, mode = ?primitive.mode(), "skipping non-triangle primitive");
                continue;
            }
            let reader =
                primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or_else(|| AssetError::MissingPositions {
                    node: name.to_string(),
                })?
                .map(|p| world.transform_point3(Vec3::from_array(p)).to_array())
                .collect();
            let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
                Some(coords) => coords.into_f32().collect(),
                None => vec![[0.0, 0.0]; positions.len()],
            };
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            data.append(MeshData {
                positions,
                uvs,
                indices,
            });
        }
        out.push(LoadedNode {
            name: name.to_string(),
            mesh: data,
        });
    }

    for child in node.children() {
        visit(&child, world, buffers, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One triangle (positions, uvs, u16 indices) shared by two meshes:
    /// `baked` at the root, `portalLight` under a translated group, and
    /// `poleLightA` using positions only.
    const SCENE_JSON: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0, 1, 3] }],
        "nodes": [
            { "name": "baked", "mesh": 0 },
            { "name": "group", "translation": [0.0, 2.0, 0.0], "children": [2] },
            { "name": "portalLight", "mesh": 0, "translation": [1.0, 0.0, 0.0] },
            { "name": "poleLightA", "mesh": 1 }
        ],
        "meshes": [
            { "primitives": [{ "attributes": { "POSITION": 0, "TEXCOORD_0": 1 }, "indices": 2 }] },
            { "primitives": [{ "attributes": { "POSITION": 0 } }] }
        ],
        "buffers": [{
            "byteLength": 66,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAAAAAAAAAAAAIA/AAAAAAAAAAAAAIA/AAABAAIA"
        }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 60, "byteLength": 6 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC2" },
            { "bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    #[test]
    fn imports_named_mesh_nodes() {
        let nodes = load_model_from_slice(SCENE_JSON.as_bytes()).unwrap();
        let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["baked", "portalLight", "poleLightA"]);

        let baked = &nodes[0].mesh;
        assert_eq!(baked.indices, vec![0, 1, 2]);
        assert_eq!(baked.uvs, vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(baked.positions[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn parent_transforms_are_baked_in() {
        let nodes = load_model_from_slice(SCENE_JSON.as_bytes()).unwrap();
        let portal = &nodes[1].mesh;
        assert_eq!(portal.positions[0], [1.0, 2.0, 0.0]);
        assert_eq!(portal.positions[2], [1.0, 3.0, 0.0]);
    }

    #[test]
    fn missing_indices_and_uvs_are_filled() {
        let nodes = load_model_from_slice(SCENE_JSON.as_bytes()).unwrap();
        let pole = &nodes[2].mesh;
        assert_eq!(pole.indices, vec![0, 1, 2]);
        assert_eq!(pole.uvs, vec![[0.0, 0.0]; 3]);
    }

    #[test]
    fn garbage_is_a_gltf_error() {
        assert!(matches!(
            load_model_from_slice(b"not a model"),
            Err(AssetError::Gltf(_))
        ));
    }

    #[test]
    fn texture_keeps_row_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baked.png");
        let mut img = image::RgbaImage::new(2, 3);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 2, image::Rgba([0, 0, 255, 255]));
        img.save(&path).unwrap();

        let tex = load_baked_texture(&path).unwrap();
        assert_eq!((tex.width, tex.height), (2, 3));
        assert_eq!(&tex.rgba[0..4], &[255, 0, 0, 255]);
        assert_eq!(&tex.rgba[tex.rgba.len() - 4..], &[0, 0, 255, 255]);
    }

    #[test]
    fn loads_an_asset_directory() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbImage::from_pixel(4, 4, image::Rgb([200, 100, 50]))
            .save(dir.path().join(BAKED_TEXTURE_FILE))
            .unwrap();
        std::fs::write(dir.path().join(MODEL_FILE), SCENE_JSON).unwrap();

        let model = load_portal_assets(dir.path()).unwrap();
        assert_eq!(model.nodes.len(), 3);
        assert_eq!(model.baked_texture.width, 4);
        assert_eq!(model.baked_texture.rgba.len(), 4 * 4 * 4);
    }

    #[test]
    fn missing_texture_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MODEL_FILE), SCENE_JSON).unwrap();
        assert!(matches!(
            load_portal_assets(dir.path()),
            Err(AssetError::Image(_))
        ));
    }
}
