use diorama_common::{LoadedModel, MeshData, Rgb, TextureData};

/// Node names the portal model is expected to contain.
pub const REQUIRED_NODES: [&str; 4] = ["baked", "poleLightA", "poleLightB", "portalLight"];

/// Which surface shading a node receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Textured with the baked lighting image.
    Baked,
    /// Flat emissive lamp color.
    PoleLight,
    /// Animated portal shader.
    PortalLight,
}

impl MaterialKind {
    /// Material for a node of the given name.
    pub fn for_node(name: &str) -> Self {
        match name {
            "poleLightA" | "poleLightB" => MaterialKind::PoleLight,
            "portalLight" => MaterialKind::PortalLight,
            _ => MaterialKind::Baked,
        }
    }
}

/// Flat color of the pole lamps.
pub fn pole_light_color() -> Rgb {
    Rgb::from_rgb8([0xff, 0xff, 0xe5])
}

/// A renderable node with its assigned material.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub material: MaterialKind,
    pub mesh: MeshData,
}

/// Result of attaching a loaded model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachReport {
    pub attached: usize,
    pub missing: Vec<&'static str>,
}

impl AttachReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Loaded nodes plus the baked texture.
///
/// Empty until the asset load completes; the frame loop renders whatever is
/// attached. `revision` changes on every attach so GPU backends know when to
/// re-upload.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    baked_texture: Option<TextureData>,
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a loaded model and wire materials by node name.
    ///
    /// Missing required nodes are reported and logged; the rest of the model
    /// is still attached.
    pub fn attach_loaded_nodes(&mut self, model: LoadedModel) -> AttachReport {
        self.nodes = model
            .nodes
            .into_iter()
            .map(|node| SceneNode {
                material: MaterialKind::for_node(&node.name),
                name: node.name,
                mesh: node.mesh,
            })
            .collect();
        self.baked_texture = Some(model.baked_texture);
        self.revision += 1;

        let missing: Vec<&'static str> = REQUIRED_NODES
            .iter()
            .copied()
            .filter(|name| self.node(name).is_none())
            .collect();
        for name in &missing {
            tracing::warn!(node = name, "scene is missing a named node; rendering without it");
        }
        tracing::info!(
            nodes = self.nodes.len(),
            revision = self.revision,
            "attached loaded scene"
        );

        AttachReport {
            attached: self.nodes.len(),
            missing,
        }
    }

    pub fn node(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn baked_texture(&self) -> Option<&TextureData> {
        self.baked_texture.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_loaded(&self) -> bool {
        self.revision > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_common::LoadedNode;

    fn model(names: &[&str]) -> LoadedModel {
        LoadedModel {
            nodes: names
                .iter()
                .map(|name| LoadedNode {
                    name: name.to_string(),
                    mesh: MeshData::default(),
                })
                .collect(),
            baked_texture: TextureData::white(),
        }
    }

    #[test]
    fn empty_until_attached() {
        let scene = Scene::new();
        assert!(!scene.is_loaded());
        assert!(scene.nodes().is_empty());
        assert!(scene.baked_texture().is_none());
    }

    #[test]
    fn materials_follow_node_names() {
        let mut scene = Scene::new();
        let report =
            scene.attach_loaded_nodes(model(&["baked", "poleLightA", "poleLightB", "portalLight", "rock"]));

        assert!(report.is_complete());
        assert_eq!(report.attached, 5);
        assert_eq!(scene.node("baked").unwrap().material, MaterialKind::Baked);
        assert_eq!(scene.node("rock").unwrap().material, MaterialKind::Baked);
        assert_eq!(scene.node("poleLightA").unwrap().material, MaterialKind::PoleLight);
        assert_eq!(scene.node("poleLightB").unwrap().material, MaterialKind::PoleLight);
        assert_eq!(
            scene.node("portalLight").unwrap().material,
            MaterialKind::PortalLight
        );
        assert!(scene.baked_texture().is_some());
    }

    #[test]
    fn missing_nodes_are_reported_not_fatal() {
        let mut scene = Scene::new();
        let report = scene.attach_loaded_nodes(model(&["baked", "poleLightB"]));
        assert_eq!(report.missing, vec!["poleLightA", "portalLight"]);
        assert_eq!(report.attached, 2);
        assert!(scene.is_loaded());
    }

    #[test]
    fn revision_bumps_per_attach() {
        let mut scene = Scene::new();
        scene.attach_loaded_nodes(model(&["baked"]));
        scene.attach_loaded_nodes(model(&["baked", "portalLight"]));
        assert_eq!(scene.revision(), 2);
        assert_eq!(scene.nodes().len(), 2);
    }

    #[test]
    fn pole_light_color_is_warm_white() {
        assert_eq!(pole_light_color().to_hex(), "#ffffe5");
    }
}
