// ============================================
// Terrain Vertex - Структура вершины
// ============================================

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl TerrainVertex {
    /// Шаг вершины в буфере (байт)
    pub const STRIDE: usize = std::mem::size_of::<TerrainVertex>();

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }

    /// Все компоненты конечны
    pub fn is_finite(&self) -> bool {
        self.position
            .iter()
            .chain(self.normal.iter())
            .chain(self.uv.iter())
            .all(|v| v.is_finite())
    }
}

/// Сырые байты вершин для загрузки в буфер
pub fn vertex_bytes(vertices: &[TerrainVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}
