// ============================================
// Mesh Data - Буфер меша для библиотеки
// ============================================

use crate::terrain::mesh::{MeshIndices, TerrainVertex};

/// Стабильный идентификатор меша в библиотеке моделей
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u32);

/// Полностью заполненный меш: вершины + треугольники
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<TerrainVertex>,
    pub indices: MeshIndices,
}

impl MeshData {
    pub fn new(vertices: Vec<TerrainVertex>, indices: MeshIndices) -> Self {
        Self { vertices, indices }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Все индексы указывают на существующие вершины
    pub fn indices_in_range(&self) -> bool {
        let count = self.vertices.len() as u32;
        self.indices.iter().all(|i| i < count)
    }
}
