use diorama_kernel::{Diorama, MaterialKind};
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the diorama (scene, camera, uniforms, viewport) and
/// produces output. It never mutates it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Draw one frame of the current scene from the current camera.
    fn render(&mut self, diorama: &Diorama) -> Self::Output;
}

/// Text renderer for diagnostics.
///
/// Produces a human-readable dump of everything a frame would upload.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&mut self, diorama: &Diorama) -> String {
        let mut out = String::new();
        let viewport = diorama.viewport();
        let camera = diorama.camera();
        let portal = diorama.portal_uniforms();
        let fireflies = diorama.fireflies_uniforms();

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame {} (t={:.3}s) ===",
            diorama.frame(),
            diorama.elapsed()
        );
        let _ = writeln!(
            out,
            "Viewport: {}x{} ratio={} aspect={:.4}",
            viewport.width(),
            viewport.height(),
            viewport.pixel_ratio(),
            camera.aspect()
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) settling={}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.look_at.x,
            camera.look_at.y,
            camera.look_at.z,
            diorama.controls().is_settling()
        );
        let _ = writeln!(out, "Clear: {}", diorama.clear_color());
        let _ = writeln!(
            out,
            "Portal: time={:.3} start={} end={}",
            portal.time, portal.color_start, portal.color_end
        );
        let _ = writeln!(
            out,
            "Fireflies: count={} time={:.3} pixelRatio={} size={}",
            diorama.fireflies().len(),
            fireflies.time,
            fireflies.pixel_ratio,
            fireflies.point_size
        );

        let scene = diorama.scene();
        let status = if scene.is_loaded() { "loaded" } else { "pending" };
        let _ = writeln!(out, "Nodes: {} ({})", scene.nodes().len(), status);
        for node in scene.nodes() {
            let material = match node.material {
                MaterialKind::Baked => "baked",
                MaterialKind::PoleLight => "poleLight",
                MaterialKind::PortalLight => "portal",
            };
            let _ = writeln!(
                out,
                "  {} [{}] tris={}",
                node.name,
                material,
                node.mesh.triangle_count()
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_common::{LoadedModel, LoadedNode, MeshData, TextureData};
    use diorama_kernel::{DioramaConfig, SurfaceSize};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn diorama() -> Diorama {
        Diorama::new(
            &DioramaConfig::default(),
            SurfaceSize::new(800, 600, 1.0),
            &mut StdRng::seed_from_u64(5),
        )
    }

    #[test]
    fn text_renderer_before_assets() {
        let output = TextRenderer::new().render(&diorama());
        assert!(output.contains("Frame 0"));
        assert!(output.contains("Viewport: 800x600 ratio=1"));
        assert!(output.contains("start=#cd62cd end=#ffffff"));
        assert!(output.contains("Fireflies: count=30"));
        assert!(output.contains("Nodes: 0 (pending)"));
        assert!(output.contains("settling=false"));
    }

    #[test]
    fn text_renderer_lists_nodes() {
        let mut d = diorama();
        d.attach_loaded_nodes(LoadedModel {
            nodes: vec![
                LoadedNode {
                    name: "portalLight".into(),
                    mesh: MeshData {
                        positions: vec![[0.0; 3]; 3],
                        uvs: vec![[0.0; 2]; 3],
                        indices: vec![0, 1, 2],
                    },
                },
                LoadedNode {
                    name: "poleLightA".into(),
                    mesh: MeshData::default(),
                },
            ],
            baked_texture: TextureData::white(),
        });
        let output = TextRenderer::new().render(&d);
        assert!(output.contains("Nodes: 2 (loaded)"));
        assert!(output.contains("portalLight [portal] tris=1"));
        assert!(output.contains("poleLightA [poleLight] tris=0"));
    }
}
