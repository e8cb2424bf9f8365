// ============================================
// Terrain Module - Процедурный terrain
// ============================================

pub mod chunk;
pub mod generation;
pub mod mesh;
pub mod streaming;

pub use chunk::{Chunk, ChunkCoord, ChunkRole, ChunkTag};
pub use generation::{GradientNoise, HeightGrid, HeightSample, HeightfieldGenerator};
pub use mesh::{ChunkMeshBuilder, MeshIndices, TerrainVertex};
pub use streaming::{ChunkLoaderPool, ChunkWorkQueue, TerrainRoot, TerrainStreamer, WorkerState};
