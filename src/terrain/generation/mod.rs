// ============================================
// Terrain Generation - Процедурная генерация
// ============================================

mod height;
mod material;
mod noise;

pub use height::{HeightGrid, HeightSample, HeightfieldGenerator, NORMAL_STEP};
pub use material::{chunk_material, material_blend};
pub use noise::{hash_combine, hash_lattice, GradientNoise};
