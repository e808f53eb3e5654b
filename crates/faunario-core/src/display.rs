//! Presentation capabilities.
//!
//! The catalog core never draws anything. The browsing front-end plugs in
//! behind these two seams: a card-style catalog view fed by repository
//! results, and an opaque 3D viewer fed by a loaded mesh.

use crate::error::Result;
use crate::record::Animal;
use std::collections::BTreeMap;

/// A loaded 3D mesh: vertex positions plus triangle/quad faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<[f32; 3]>,
    /// Vertex indices per face; mixed triangle and quad faces are allowed.
    pub faces: Vec<Vec<u32>>,
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }
}

/// Card-grid catalog display driven by repository results.
pub trait CatalogView {
    /// Show the grouped catalog (region name to its animals).
    fn show_catalog(&mut self, grouped: &BTreeMap<String, Vec<Animal>>) -> Result<()>;

    /// Show one animal's detail card.
    fn show_detail(&mut self, animal: &Animal) -> Result<()>;
}

/// Opaque 3D rendering surface.
pub trait MeshViewer {
    /// Present the mesh in a viewport of the given pixel size.
    fn present(&mut self, mesh: &Mesh, viewport: (u32, u32)) -> Result<()>;
}
