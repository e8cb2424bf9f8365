// ============================================
// Chunk Mesh Builder - Сетка высот -> меш
// ============================================
// (N+1)^2 вершин, 6*N^2 индексов, два треугольника на квад.
// Сетка центрирована: смещение -size/2 по X и Z,
// перенос чанка в мир делает трансформ сущности.

use crate::assets::MeshData;
use crate::terrain::generation::HeightGrid;

use super::indices::MeshIndices;
use super::vertex::TerrainVertex;

#[derive(Debug, Clone, Copy)]
pub struct ChunkMeshBuilder {
    cell_size: f32,
    height_scale: f32,
}

impl ChunkMeshBuilder {
    pub fn new(cell_size: f32, height_scale: f32) -> Self {
        Self { cell_size, height_scale }
    }

    /// Индексы квадов сетки N x N с обходом, дающим нормаль +Y
    pub fn grid_indices(resolution: u32) -> Vec<u32> {
        let n = resolution as usize;
        let side = n + 1;
        let mut indices = Vec::with_capacity(6 * n * n);

        for z in 0..n {
            for x in 0..n {
                let i0 = z * side + x;
                let i1 = i0 + 1;
                let i2 = i0 + side;
                let i3 = i2 + 1;
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3].map(|i| i as u32));
            }
        }
        indices
    }

    pub fn build(&self, grid: &HeightGrid) -> MeshData {
        let n = grid.resolution();
        let side = grid.side();
        let half = n as f32 * self.cell_size * 0.5;
        let uv_step = 1.0 / n.max(1) as f32;

        let mut vertices = Vec::with_capacity(side * side);
        for z in 0..side {
            for x in 0..side {
                let sample = match grid.get(x, z) {
                    Some(s) => s,
                    None => continue,
                };
                let height = sample.height * self.height_scale;
                vertices.push(TerrainVertex::new(
                    [
                        x as f32 * self.cell_size - half,
                        if height.is_finite() { height } else { 0.0 },
                        z as f32 * self.cell_size - half,
                    ],
                    [sample.normal.x, sample.normal.y, sample.normal.z],
                    [x as f32 * uv_step, z as f32 * uv_step],
                ));
            }
        }

        let indices = MeshIndices::from_u32(Self::grid_indices(n), vertices.len());
        MeshData::new(vertices, indices)
    }
}
