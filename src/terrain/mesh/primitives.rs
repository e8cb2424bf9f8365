// ============================================
// Mesh Primitives - Простые меши (маркер чанка)
// ============================================

use crate::assets::MeshData;

use super::indices::MeshIndices;
use super::vertex::TerrainVertex;

/// Добавить параллелепипед: 24 вершины (по 4 на грань), 36 индексов
pub fn add_box(
    vertices: &mut Vec<TerrainVertex>,
    indices: &mut Vec<u32>,
    min: [f32; 3],
    max: [f32; 3],
) {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;

    let corners = [
        [x0, y0, z0], // 0: left-bottom-back
        [x1, y0, z0], // 1: right-bottom-back
        [x1, y1, z0], // 2: right-top-back
        [x0, y1, z0], // 3: left-top-back
        [x0, y0, z1], // 4: left-bottom-front
        [x1, y0, z1], // 5: right-bottom-front
        [x1, y1, z1], // 6: right-top-front
        [x0, y1, z1], // 7: left-top-front
    ];

    // Обход против часовой стрелки снаружи
    let faces = [
        ([1, 0, 3, 2], [0.0, 0.0, -1.0]),
        ([4, 5, 6, 7], [0.0, 0.0, 1.0]),
        ([0, 4, 7, 3], [-1.0, 0.0, 0.0]),
        ([5, 1, 2, 6], [1.0, 0.0, 0.0]),
        ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
        ([3, 7, 6, 2], [0.0, 1.0, 0.0]),
    ];
    let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    for (face, normal) in faces {
        let base = vertices.len() as u32;

        for (corner, uv) in face.iter().zip(uvs) {
            vertices.push(TerrainVertex::new(corners[*corner], normal, uv));
        }

        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Единичный куб с центром в начале координат
pub fn unit_cube() -> MeshData {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    add_box(&mut vertices, &mut indices, [-0.5; 3], [0.5; 3]);

    let count = vertices.len();
    MeshData::new(vertices, MeshIndices::from_u32(indices, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultraviolet::Vec3;

    #[test]
    fn test_cube_counts() {
        let cube = unit_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.index_count(), 36);
        assert!(cube.indices_in_range());
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let cube = unit_cube();
        let idx: Vec<u32> = cube.indices.iter().collect();
        let vec = |a: [f32; 3]| Vec3::new(a[0], a[1], a[2]);
        for tri in idx.chunks(3) {
            let v = |i: u32| vec(cube.vertices[i as usize].position);
            let n = (v(tri[1]) - v(tri[0])).cross(v(tri[2]) - v(tri[0]));
            let expected = vec(cube.vertices[tri[0] as usize].normal);
            assert!(n.dot(expected) > 0.0, "triangle {:?} is wound inward", tri);
        }
    }
}
