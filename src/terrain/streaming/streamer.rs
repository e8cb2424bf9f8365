// ============================================
// Terrain Streamer - Публичный API стриминга
// ============================================
// Владеет корневой сущностью terrain, очередью и пулом воркеров.
// Запросы не блокируют вызывающий поток; готовые чанки видны
// через loaded_chunks() или новые сущности сцены.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rayon::prelude::*;

use super::pipeline::ChunkPipeline;
use super::pool::{ChunkLoaderPool, WorkerState};
use super::queue::ChunkWorkQueue;
use crate::assets::{Material, MeshHandle, ModelStore};
use crate::color::Rgb;
use crate::error::StreamError;
use crate::scene::{Entity, Scene, SceneTransform, ShaderHandle};
use crate::settings::TerrainSettings;
use crate::terrain::chunk::{Chunk, ChunkCoord};
use crate::terrain::mesh::unit_cube;

/// Компонент-метка корня terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainRoot;

pub struct TerrainStreamer {
    queue: Arc<ChunkWorkQueue>,
    pipeline: Arc<ChunkPipeline>,
    pool: ChunkLoaderPool,
    root: Entity,
    marker_mesh: MeshHandle,
}

impl TerrainStreamer {
    /// Создать корень, зарегистрировать маркер и сразу запустить воркеров
    pub fn new(
        settings: TerrainSettings,
        origin: SceneTransform,
        scene: Arc<Mutex<Scene>>,
        models: Arc<dyn ModelStore>,
        shader: ShaderHandle,
    ) -> Result<Self, StreamError> {
        let settings = settings.sanitized();

        let root = {
            let mut scene = scene.lock().map_err(|_| StreamError::LockPoisoned)?;
            let root = scene.create_entity();
            origin.emplace_into(&mut scene, root);
            scene.emplace(root, TerrainRoot);
            root
        };

        let marker_model = format!("terrain/marker_{}", root.id());
        models.add_model(&marker_model)?;
        let marker_mesh = models.add_mesh_to_model(
            &marker_model,
            "cube",
            unit_cube(),
            Material::matte(Rgb::new(0.9, 0.2, 0.2)),
        )?;

        let workers = settings.worker_count();
        let pipeline = Arc::new(ChunkPipeline::new(
            settings,
            models,
            scene,
            root,
            marker_mesh,
            shader,
        ));
        let queue = Arc::new(ChunkWorkQueue::new());
        let pool = ChunkLoaderPool::start(workers, Arc::clone(&queue), Arc::clone(&pipeline))?;

        log::info!(
            "terrain streamer ready: {} workers, chunk {}x{} cells, seed {}",
            workers,
            pipeline.settings().resolution,
            pipeline.settings().resolution,
            pipeline.settings().noise.seed
        );

        Ok(Self { queue, pipeline, pool, root, marker_mesh })
    }

    /// Поставить чанк в очередь. false если он уже запрошен/загружен
    /// или стример остановлен.
    pub fn request_chunk(&self, x: i32, y: i32) -> bool {
        self.enqueue(ChunkCoord::new(x, y))
    }

    /// Поставить в очередь список чанков, вернуть число принятых
    pub fn request_chunks<I, C>(&self, coords: I) -> usize
    where
        I: IntoIterator<Item = C>,
        C: Into<ChunkCoord>,
    {
        coords
            .into_iter()
            .map(Into::<ChunkCoord>::into)
            .filter(|&coord| self.enqueue(coord))
            .count()
    }

    fn enqueue(&self, coord: ChunkCoord) -> bool {
        if !self.pipeline.track(coord) {
            log::trace!("chunk {} already requested", coord);
            return false;
        }
        if !self.queue.push(coord) {
            self.pipeline.forget(coord);
            return false;
        }
        true
    }

    /// Синхронно сгенерировать чанки параллельно (rayon) в вызывающем потоке
    pub fn generate_initial(&self, coords: &[ChunkCoord]) -> Vec<Chunk> {
        let fresh: Vec<ChunkCoord> = coords
            .iter()
            .copied()
            .filter(|&coord| self.pipeline.track(coord))
            .collect();

        let pipeline = &self.pipeline;
        let chunks: Vec<Chunk> = fresh
            .par_iter()
            .filter_map(|&coord| pipeline.process(coord))
            .collect();

        log::info!("initial terrain generated: {}/{} chunks", chunks.len(), fresh.len());
        chunks
    }

    pub fn root(&self) -> Entity {
        self.root
    }

    pub fn marker_mesh(&self) -> MeshHandle {
        self.marker_mesh
    }

    pub fn settings(&self) -> &TerrainSettings {
        self.pipeline.settings()
    }

    pub fn loaded_chunks(&self) -> Vec<Chunk> {
        self.pipeline.loaded_chunks()
    }

    pub fn loaded_count(&self) -> usize {
        self.pipeline.loaded_count()
    }

    pub fn is_loaded(&self, x: i32, y: i32) -> bool {
        self.pipeline.is_loaded(ChunkCoord::new(x, y))
    }

    /// Запросов в очереди
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn worker_states(&self) -> Vec<WorkerState> {
        self.pool.worker_states()
    }

    /// Ждать обработки всех запросов. false по таймауту.
    pub fn wait_until_idle(&self, timeout: Duration) -> bool {
        self.queue.wait_idle(timeout)
    }

    /// Остановить воркеров и дождаться их. Повторный вызов безопасен.
    pub fn shutdown(&mut self) {
        if !self.pool.is_running() {
            return;
        }
        self.pool.shutdown();
        self.pipeline.forget_unloaded();
        log::info!("terrain streamer stopped with {} chunks loaded", self.loaded_count());
    }
}

impl Drop for TerrainStreamer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
