// ============================================
// Chunk Coord - Координата чанка на сетке
// ============================================

use std::fmt;

use ultraviolet::Vec2;

use crate::terrain::generation::hash_lattice;

/// Целочисленная позиция чанка (x, y); y соответствует мировой оси Z
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Центр чанка в мировых координатах (x, z)
    #[inline]
    pub fn world_origin(&self, chunk_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * chunk_size, self.y as f32 * chunk_size)
    }

    #[inline]
    pub fn hash_with_seed(&self, seed: u32) -> u32 {
        hash_lattice(self.x, self.y, seed)
    }

    /// Имя модели в библиотеке ассетов
    pub fn model_name(&self) -> String {
        format!("terrain/chunk_{}_{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
