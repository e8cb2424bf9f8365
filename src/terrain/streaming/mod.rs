// ============================================
// Terrain Streaming - Фоновая загрузка чанков
// ============================================
// request -> ChunkWorkQueue -> ChunkLoaderPool -> ChunkPipeline -> Scene

mod pipeline;
mod pool;
mod queue;
mod streamer;

pub use pipeline::{ChunkPipeline, GeneratedChunk, SURFACE_MESH_NAME};
pub use pool::{ChunkLoaderPool, WorkerState};
pub use queue::ChunkWorkQueue;
pub use streamer::{TerrainRoot, TerrainStreamer};
