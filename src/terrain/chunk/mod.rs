// ============================================
// Chunk Module - Координаты и записи чанков
// ============================================

mod key;
mod record;

pub use key::ChunkCoord;
pub use record::{Chunk, ChunkRole, ChunkTag};
