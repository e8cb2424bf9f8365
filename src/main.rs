// ============================================
// Terrain Stream Demo - Стриминг сетки чанков
// ============================================
// Использование: terrain-stream [settings.json] [radius]

use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use terrain_stream::scene::update_transforms;
use terrain_stream::{
    ChunkCoord, ModelLibrary, Scene, SceneTransform, ShaderHandle, StreamError, TerrainSettings,
    TerrainStreamer,
};

const DEFAULT_RADIUS: i32 = 4;
const FRAME: Duration = Duration::from_millis(16);
const LOAD_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match TerrainSettings::from_file(&path).map_err(StreamError::Settings) {
            Ok(s) => s,
            Err(e) => {
                log::error!("{}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => TerrainSettings::default(),
    };
    let radius = args
        .next()
        .and_then(|r| r.parse::<i32>().ok())
        .unwrap_or(DEFAULT_RADIUS)
        .max(0);

    let scene = Arc::new(Mutex::new(Scene::new()));
    let models = Arc::new(ModelLibrary::new());

    let mut streamer = match TerrainStreamer::new(
        settings,
        SceneTransform::default(),
        Arc::clone(&scene),
        models.clone(),
        ShaderHandle(0),
    ) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Failed to start terrain streamer: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Центр синхронно, остальное в фоне
    let started = Instant::now();
    let preload = streamer.generate_initial(&[ChunkCoord::new(0, 0)]);
    log::info!("preloaded {} chunk(s) in {:?}", preload.len(), started.elapsed());

    let ring = (-radius..=radius).flat_map(|x| (-radius..=radius).map(move |y| (x, y)));
    let requested = streamer.request_chunks(ring);
    log::info!("requested {} chunks", requested);

    // "Кадры" рендера идут параллельно с воркерами
    let mut frames = 0u64;
    while !streamer.wait_until_idle(FRAME) {
        frames += 1;
        if let Ok(mut scene) = scene.lock() {
            if let Err(e) = update_transforms(&mut scene) {
                log::error!("transform update failed: {}", e);
            }
        }
        if started.elapsed() > LOAD_TIMEOUT {
            log::warn!("timed out with {} chunks pending", streamer.pending());
            break;
        }
    }

    if let Ok(mut scene) = scene.lock() {
        if let Err(e) = update_transforms(&mut scene) {
            log::error!("transform update failed: {}", e);
        }
        log::info!("scene entities: {}", scene.entity_count());
    }

    log::info!(
        "loaded {} chunks ({} models) in {:?} over {} frames",
        streamer.loaded_count(),
        models.model_count(),
        started.elapsed(),
        frames
    );

    streamer.shutdown();
    ExitCode::SUCCESS
}
