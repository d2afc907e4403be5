//! CPU-side triangle meshes and the parametric primitives the scenes are
//! built from: subdivided dodecahedra for asteroids, cylinders and boxes for
//! the spaceship, and a UV sphere for the starfield shell.

pub mod mesh;
pub mod primitives;

pub use mesh::Mesh;
pub use primitives::{Primitive, cuboid, cylinder, dodecahedron, uv_sphere};
