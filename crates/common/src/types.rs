use glam::Vec3;

/// CPU-side triangle mesh with world-space positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append another mesh, rebasing its indices.
    pub fn append(&mut self, other: MeshData) {
        let base = self.positions.len() as u32;
        self.positions.extend(other.positions);
        self.uvs.extend(other.uvs);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    /// Axis-aligned bounds, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// A 1x1 opaque white texture.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }
}

/// A named node from the loaded scene bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedNode {
    pub name: String,
    pub mesh: MeshData,
}

/// Everything the asset pipeline produces for one diorama.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub nodes: Vec<LoadedNode>,
    pub baked_texture: TextureData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f32) -> MeshData {
        MeshData {
            positions: vec![[offset, 0.0, 0.0], [offset + 1.0, 0.0, 0.0], [offset, 1.0, 0.0]],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn append_rebases_indices() {
        let mut mesh = triangle(0.0);
        mesh.append(triangle(5.0));
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(&mesh.indices[3..], &[3, 4, 5]);
    }

    #[test]
    fn bounds_cover_all_positions() {
        let mut mesh = triangle(-2.0);
        mesh.append(triangle(3.0));
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(hi, Vec3::new(4.0, 1.0, 0.0));
        assert!(MeshData::default().bounds().is_none());
    }

    #[test]
    fn white_texture_is_one_pixel() {
        let t = TextureData::white();
        assert_eq!(t.rgba.len(), (t.width * t.height * 4) as usize);
    }
}
