// ============================================
// Assets Module - Модели, меши, материалы
// ============================================

mod library;
mod material;
mod mesh;

pub use library::{ModelLibrary, ModelStore, StoredMesh};
pub use material::Material;
pub use mesh::{MeshData, MeshHandle};
