// ============================================
// Chunk Pipeline - Генерация и публикация чанка
// ============================================
// generate: высоты -> меш -> материал (без общего изменяемого состояния)
// publish:  модель в библиотеку -> сущности в сцену под Mutex<Scene>

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ultraviolet::{Mat4, Vec3};

use crate::assets::{Material, MeshData, MeshHandle, ModelStore};
use crate::error::StreamError;
use crate::scene::{
    Entity, MeshComponent, Parent, Scene, SceneTransform, ShaderHandle, ShaderProgram, Transform,
};
use crate::settings::TerrainSettings;
use crate::terrain::chunk::{Chunk, ChunkCoord, ChunkRole, ChunkTag};
use crate::terrain::generation::{chunk_material, HeightfieldGenerator};
use crate::terrain::mesh::ChunkMeshBuilder;

/// Имя меша поверхности внутри модели чанка
pub const SURFACE_MESH_NAME: &str = "ground";

/// Результат генерации, ещё не опубликованный
pub struct GeneratedChunk {
    pub coord: ChunkCoord,
    pub mesh: MeshData,
    pub material: Material,
}

/// Общие для всех воркеров зависимости
pub struct ChunkPipeline {
    settings: TerrainSettings,
    generator: HeightfieldGenerator,
    mesher: ChunkMeshBuilder,
    material_seed: u32,
    models: Arc<dyn ModelStore>,
    scene: Arc<Mutex<Scene>>,
    root: Entity,
    marker_mesh: MeshHandle,
    shader: ShaderHandle,
    /// В очереди, в работе или загружены
    tracked: Mutex<HashSet<ChunkCoord>>,
    /// Число неудачных попыток: каждая попытка регистрирует модель под новым именем
    failed_attempts: Mutex<HashMap<ChunkCoord, u32>>,
    loaded: Mutex<Vec<Chunk>>,
}

impl ChunkPipeline {
    pub fn new(
        settings: TerrainSettings,
        models: Arc<dyn ModelStore>,
        scene: Arc<Mutex<Scene>>,
        root: Entity,
        marker_mesh: MeshHandle,
        shader: ShaderHandle,
    ) -> Self {
        let settings = settings.sanitized();
        let seed = settings.noise.seed;

        Self {
            generator: HeightfieldGenerator::from_settings(&settings),
            mesher: ChunkMeshBuilder::new(settings.cell_size, settings.height_scale),
            material_seed: (seed ^ (seed >> 32)) as u32,
            settings,
            models,
            scene,
            root,
            marker_mesh,
            shader,
            tracked: Mutex::new(HashSet::new()),
            failed_attempts: Mutex::new(HashMap::new()),
            loaded: Mutex::new(Vec::new()),
        }
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    pub fn generator(&self) -> &HeightfieldGenerator {
        &self.generator
    }

    /// Только вставка/удаление координат, poison не нарушает множество
    fn tracked(&self) -> MutexGuard<'_, HashSet<ChunkCoord>> {
        self.tracked.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn loaded(&self) -> MutexGuard<'_, Vec<Chunk>> {
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Запомнить координату. false если она уже запрошена или загружена.
    pub fn track(&self, coord: ChunkCoord) -> bool {
        self.tracked().insert(coord)
    }

    /// Снова разрешить запрос координаты (после ошибки или отмены)
    pub fn forget(&self, coord: ChunkCoord) {
        self.tracked().remove(&coord);
    }

    /// Отказаться от попытки: следующая получит новое имя модели,
    /// координата снова доступна для запроса
    pub fn abandon(&self, coord: ChunkCoord) {
        *self
            .failed_attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(coord)
            .or_insert(0) += 1;
        self.forget(coord);
    }

    /// Имя модели для текущей попытки ("terrain/chunk_x_y", затем "...#n")
    pub fn model_name(&self, coord: ChunkCoord) -> String {
        let attempt = self
            .failed_attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&coord)
            .copied()
            .unwrap_or(0);

        match attempt {
            0 => coord.model_name(),
            n => format!("{}#{}", coord.model_name(), n),
        }
    }

    /// Сбросить всё, что не успело загрузиться
    pub fn forget_unloaded(&self) {
        let loaded: HashSet<ChunkCoord> = self.loaded().iter().map(|c| c.coord).collect();
        self.tracked().retain(|coord| loaded.contains(coord));
    }

    pub fn loaded_chunks(&self) -> Vec<Chunk> {
        self.loaded().clone()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded().len()
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.loaded().iter().any(|c| c.coord == coord)
    }

    /// Шаг 1: высоты, меш, материал
    pub fn generate(&self, coord: ChunkCoord) -> GeneratedChunk {
        let grid = self
            .generator
            .sample_chunk(coord, self.settings.resolution, self.settings.cell_size);

        GeneratedChunk {
            coord,
            mesh: self.mesher.build(&grid),
            material: chunk_material(coord, self.material_seed),
        }
    }

    /// Шаг 2: регистрация модели и создание сущностей
    pub fn publish(&self, generated: GeneratedChunk) -> Result<Chunk, StreamError> {
        let coord = generated.coord;
        let model = self.model_name(coord);

        self.models.add_model(&model)?;
        let mesh = self.models.add_mesh_to_model(
            &model,
            SURFACE_MESH_NAME,
            generated.mesh,
            generated.material,
        )?;

        let center = coord.world_origin(self.settings.chunk_world_size());
        let surface_transform = SceneTransform::at(Vec3::new(center.x, 0.0, center.y));
        let marker_transform =
            SceneTransform::at(Vec3::new(center.x, self.settings.marker_height, center.y))
                .with_scale(self.settings.marker_scale);

        let (surface, marker) = {
            let mut scene = self.scene.lock().map_err(|_| StreamError::LockPoisoned)?;
            let root_world = scene
                .get::<Transform>(self.root)
                .map_or(Mat4::identity(), |t| t.world);

            let surface = self.spawn_child(
                &mut scene,
                root_world,
                surface_transform,
                mesh,
                ChunkTag { coord, role: ChunkRole::Surface },
            );
            let marker = self.spawn_child(
                &mut scene,
                root_world,
                marker_transform,
                self.marker_mesh,
                ChunkTag { coord, role: ChunkRole::Marker },
            );
            (surface, marker)
        };

        let chunk = Chunk { coord, model, mesh, surface, marker };
        self.loaded().push(chunk.clone());
        log::debug!("chunk {} published (surface {:?}, marker {:?})", coord, surface, marker);
        Ok(chunk)
    }

    /// generate + publish; ошибка логируется, попытка отбрасывается
    pub fn process(&self, coord: ChunkCoord) -> Option<Chunk> {
        let generated = self.generate(coord);
        self.finish(generated)
    }

    /// publish с обработкой ошибки
    pub fn finish(&self, generated: GeneratedChunk) -> Option<Chunk> {
        let coord = generated.coord;
        match self.publish(generated) {
            Ok(chunk) => Some(chunk),
            Err(e) => {
                log::error!("Failed to load chunk {}: {}", coord, e);
                self.abandon(coord);
                None
            }
        }
    }

    fn spawn_child(
        &self,
        scene: &mut Scene,
        root_world: Mat4,
        transform: SceneTransform,
        mesh: MeshHandle,
        tag: ChunkTag,
    ) -> Entity {
        let entity = scene.create_entity();
        transform.emplace_into(scene, entity);

        let local = transform.matrix();
        scene.emplace(entity, Transform { local, world: root_world * local });
        scene.emplace(entity, MeshComponent(mesh));
        scene.emplace(entity, ShaderProgram(self.shader));
        scene.emplace(entity, Parent(self.root));
        scene.emplace(entity, tag);
        entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ModelLibrary;
    use crate::error::AssetError;
    use crate::settings::NoiseSettings;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn pipeline(models: Arc<dyn ModelStore>) -> (ChunkPipeline, Arc<Mutex<Scene>>, Entity) {
        let scene = Arc::new(Mutex::new(Scene::new()));
        let root = {
            let mut s = scene.lock().unwrap();
            let root = s.create_entity();
            SceneTransform::at(Vec3::new(0.0, -10.0, 0.0)).emplace_into(&mut s, root);
            root
        };
        let settings = TerrainSettings {
            resolution: 4,
            noise: NoiseSettings { octaves: 2, ..Default::default() },
            ..Default::default()
        };
        let pipeline = ChunkPipeline::new(settings, models, Arc::clone(&scene), root, MeshHandle(999), ShaderHandle(1));
        (pipeline, scene, root)
    }

    #[test]
    fn test_publish_creates_two_parented_entities() {
        let lib = Arc::new(ModelLibrary::new());
        let (pipeline, scene, root) = pipeline(lib.clone());

        let chunk = pipeline.process(ChunkCoord::new(1, 2)).unwrap();
        assert_eq!(chunk.model, "terrain/chunk_1_2");
        assert!(lib.has_model("terrain/chunk_1_2"));
        assert!(pipeline.is_loaded(ChunkCoord::new(1, 2)));

        let scene = scene.lock().unwrap();
        for (entity, role) in [(chunk.surface, ChunkRole::Surface), (chunk.marker, ChunkRole::Marker)] {
            assert_eq!(scene.get::<Parent>(entity), Some(&Parent(root)));
            assert_eq!(scene.get::<ChunkTag>(entity).map(|t| t.role), Some(role));
            assert_eq!(scene.get::<ShaderProgram>(entity), Some(&ShaderProgram(ShaderHandle(1))));
        }
        assert_eq!(scene.get::<MeshComponent>(chunk.marker), Some(&MeshComponent(MeshHandle(999))));
        assert_eq!(scene.get::<MeshComponent>(chunk.surface), Some(&MeshComponent(chunk.mesh)));

        let world = scene.get::<Transform>(chunk.surface).unwrap().world;
        let p = world.transform_point3(Vec3::zero());
        assert!((p - Vec3::new(4.0, -10.0, 8.0)).mag() < 1e-4);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let (a, _, _) = pipeline(Arc::new(ModelLibrary::new()));
        let (b, _, _) = pipeline(Arc::new(ModelLibrary::new()));
        let ga = a.generate(ChunkCoord::new(-3, 5));
        let gb = b.generate(ChunkCoord::new(-3, 5));
        assert_eq!(ga.mesh, gb.mesh);
        assert_eq!(ga.material, gb.material);
    }

    #[test]
    fn test_failed_publish_releases_coordinate() {
        let lib = Arc::new(ModelLibrary::new());
        lib.add_model("terrain/chunk_0_0").unwrap();
        let (pipeline, scene, _) = pipeline(lib);

        assert!(pipeline.track(ChunkCoord::new(0, 0)));
        assert!(pipeline.process(ChunkCoord::new(0, 0)).is_none());
        assert!(pipeline.track(ChunkCoord::new(0, 0)));
        assert_eq!(pipeline.loaded_count(), 0);
        assert_eq!(scene.lock().unwrap().entity_count(), 1);

        let retried = pipeline.process(ChunkCoord::new(0, 0)).unwrap();
        assert_eq!(retried.model, "terrain/chunk_0_0#1");
        assert!(pipeline.is_loaded(ChunkCoord::new(0, 0)));
    }

    /// Первый add_mesh_to_model для каждой модели чанка (3, 3) падает
    struct MeshFailsOnce {
        inner: ModelLibrary,
        failed: AtomicBool,
    }

    impl ModelStore for MeshFailsOnce {
        fn add_model(&self, name: &str) -> Result<(), AssetError> {
            self.inner.add_model(name)
        }

        fn add_mesh_to_model(
            &self,
            model: &str,
            mesh_name: &str,
            mesh: MeshData,
            material: Material,
        ) -> Result<MeshHandle, AssetError> {
            if model.starts_with("terrain/chunk_3_3") && !self.failed.swap(true, Ordering::SeqCst) {
                return Err(AssetError::EmptyMesh(model.to_string()));
            }
            self.inner.add_mesh_to_model(model, mesh_name, mesh, material)
        }
    }

    #[test]
    fn test_retry_after_mesh_failure_loads() {
        let store = Arc::new(MeshFailsOnce { inner: ModelLibrary::new(), failed: AtomicBool::new(false) });
        let (pipeline, scene, _) = pipeline(store.clone());
        let coord = ChunkCoord::new(3, 3);

        assert!(pipeline.track(coord));
        assert!(pipeline.process(coord).is_none());
        assert!(store.inner.has_model("terrain/chunk_3_3"));
        assert!(!pipeline.is_loaded(coord));

        assert!(pipeline.track(coord));
        let chunk = pipeline.process(coord).unwrap();
        assert_eq!(chunk.model, "terrain/chunk_3_3#1");
        assert_eq!(store.inner.model_meshes("terrain/chunk_3_3#1"), Some(vec![chunk.mesh]));
        assert!(!pipeline.track(coord));
        assert_eq!(pipeline.loaded_count(), 1);
        assert_eq!(scene.lock().unwrap().entity_count(), 3);
    }
}
