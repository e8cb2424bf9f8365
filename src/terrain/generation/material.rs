// ============================================
// Chunk Material - Процедурный цвет чанка
// ============================================
// Цвет = LCH интерполяция между травой и песком,
// параметр берётся из хэша координаты и seed.

use crate::assets::Material;
use crate::color::{lerp_lch, Lch, Rgb};
use crate::terrain::chunk::ChunkCoord;

/// Концы градиента (#4F772D трава, #C2B280 песок)
const GRASS: Rgb = Rgb::new(0.309_803_93, 0.466_666_67, 0.176_470_59);
const SAND: Rgb = Rgb::new(0.760_784_3, 0.698_039_23, 0.501_960_8);

/// Параметр смешивания в [0, 1]
#[inline]
pub fn material_blend(coord: ChunkCoord, seed: u32) -> f32 {
    coord.hash_with_seed(seed) as f32 / u32::MAX as f32
}

/// Детерминированный материал чанка
pub fn chunk_material(coord: ChunkCoord, seed: u32) -> Material {
    let t = material_blend(coord, seed);
    let color = Rgb::from(lerp_lch(Lch::from(GRASS), Lch::from(SAND), t)).clamped();
    Material::matte(color)
}
