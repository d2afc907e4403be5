//! Shared materials, referenced from actor bodies by [`MaterialId`].
//!
//! A material is fixed once the scene is built. Per-frame values (the shader
//! time, the spaceship's current texture) travel in the frame snapshot, so no
//! actor can leak state into another through a shared material.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Index into a [`MaterialTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

/// Index into a scene's texture list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Which shader program a material uses, with its constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shading {
    /// Vertices ripple along their normals with the shared time uniform.
    Asteroid {
        /// Peak displacement along the normal.
        displacement: f32,
        /// Fraction of the texture colour always shown.
        ambient: f32,
        /// Weight of the N·L term.
        diffuse: f32,
    },
    /// Spaceship hull.
    Spaceship {
        ambient: f32,
        diffuse: f32,
        metallic: f32,
    },
    /// Texture only, no lighting.
    Unlit,
}

/// Which faces the renderer discards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Culling {
    /// Normal outside-facing geometry.
    Back,
    /// Geometry seen from inside, like the starfield shell.
    Front,
}

/// Where a material's texture comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureBinding {
    /// Always the same texture.
    Fixed(TextureId),
    /// Whatever the spaceship texture cycle currently points at.
    ShipCycle,
}

/// An immutable material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Debug label.
    pub name: String,
    pub shading: Shading,
    pub texture: TextureBinding,
    pub culling: Culling,
}

/// All materials of a scene. Append-only while the scene is being built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialTable {
    materials: Vec<Material>,
}

impl MaterialTable {
    /// Add a material and return its handle.
    pub fn insert(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    /// Look up a material.
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    /// Iterate materials with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialId(i as u32), m))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Texture files a scene needs, indexed by [`TextureId`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureList {
    paths: Vec<PathBuf>,
}

impl TextureList {
    /// Register a path, reusing the handle if it was already registered.
    pub fn insert(&mut self, path: PathBuf) -> TextureId {
        if let Some(i) = self.paths.iter().position(|p| *p == path) {
            return TextureId(i as u32);
        }
        self.paths.push(path);
        TextureId(self.paths.len() as u32 - 1)
    }

    /// Path for a handle.
    pub fn path(&self, id: TextureId) -> Option<&PathBuf> {
        self.paths.get(id.0 as usize)
    }

    /// Iterate paths with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &PathBuf)> {
        self.paths
            .iter()
            .enumerate()
            .map(|(i, p)| (TextureId(i as u32), p))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
