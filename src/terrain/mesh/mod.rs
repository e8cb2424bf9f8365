// ============================================
// Terrain Mesh - Построение мешей чанков
// ============================================

mod builder;
mod indices;
mod primitives;
mod vertex;

pub use builder::ChunkMeshBuilder;
pub use indices::{MeshIndices, U16_VERTEX_LIMIT};
pub use primitives::{add_box, unit_cube};
pub use vertex::{vertex_bytes, TerrainVertex};
