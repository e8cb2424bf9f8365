// ============================================
// Chunk Record - Загруженный чанк
// ============================================

use super::key::ChunkCoord;
use crate::assets::MeshHandle;
use crate::scene::Entity;

/// Готовый чанк. Создаётся после публикации в сцену и больше не меняется.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub model: String,
    pub mesh: MeshHandle,
    pub surface: Entity,
    pub marker: Entity,
}

/// Роль сущности чанка в сцене
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkRole {
    Surface,
    Marker,
}

/// Компонент-метка: к какому чанку относится сущность
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkTag {
    pub coord: ChunkCoord,
    pub role: ChunkRole,
}
