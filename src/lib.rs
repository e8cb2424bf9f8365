// ============================================
// Terrain Stream - Потоковая генерация terrain
// ============================================
// Процедурные чанки генерируются в пуле воркеров и
// публикуются в общую сцену под одним мьютексом.
//
// Поток данных:
//   request_chunk -> ChunkWorkQueue -> воркер ChunkLoaderPool
//   -> HeightfieldGenerator -> ChunkMeshBuilder -> ModelStore
//   -> сущности сцены (под замком) -> список загруженных чанков

pub mod assets;
pub mod color;
pub mod error;
pub mod scene;
pub mod settings;
pub mod terrain;

// Re-exports
pub use assets::{Material, MeshData, MeshHandle, ModelLibrary, ModelStore};
pub use error::{AssetError, StreamError};
pub use scene::{Entity, Scene, SceneTransform, ShaderHandle};
pub use settings::{NoiseSettings, TerrainSettings};
pub use terrain::{
    Chunk, ChunkCoord, ChunkLoaderPool, ChunkMeshBuilder, ChunkTag, ChunkWorkQueue, GradientNoise,
    HeightSample, HeightfieldGenerator, TerrainRoot, TerrainStreamer, WorkerState,
};
