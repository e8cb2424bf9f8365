// ============================================
// Mesh Indices - Индексы с переменной шириной
// ============================================
// u16 пока хватает диапазона, иначе u32.

/// Максимум вершин, адресуемых u16 индексами
pub const U16_VERTEX_LIMIT: usize = u16::MAX as usize + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshIndices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl MeshIndices {
    /// Выбрать минимальную безопасную ширину для vertex_count вершин
    pub fn from_u32(indices: Vec<u32>, vertex_count: usize) -> Self {
        if vertex_count <= U16_VERTEX_LIMIT {
            MeshIndices::U16(indices.into_iter().map(|i| i as u16).collect())
        } else {
            MeshIndices::U32(indices)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MeshIndices::U16(v) => v.len(),
            MeshIndices::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            MeshIndices::U16(v) => v.get(i).map(|&x| x as u32),
            MeshIndices::U32(v) => v.get(i).copied(),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            MeshIndices::U16(v) => Box::new(v.iter().map(|&x| x as u32)),
            MeshIndices::U32(v) => Box::new(v.iter().copied()),
        }
    }

    /// Размер одного индекса в байтах
    pub fn stride(&self) -> usize {
        match self {
            MeshIndices::U16(_) => 2,
            MeshIndices::U32(_) => 4,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MeshIndices::U16(v) => bytemuck::cast_slice(v),
            MeshIndices::U32(v) => bytemuck::cast_slice(v),
        }
    }
}
