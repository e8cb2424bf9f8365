// ============================================
// Chunk Loader Pool - Потоки-воркеры загрузки
// ============================================
// Каждый воркер: Idle -> Generating -> Publishing -> Idle,
// при остановке очереди -> Stopped.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::pipeline::ChunkPipeline;
use super::queue::ChunkWorkQueue;
use crate::error::StreamError;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    Idle = 0,
    Generating = 1,
    Publishing = 2,
    Stopped = 3,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Idle,
            1 => WorkerState::Generating,
            2 => WorkerState::Publishing,
            _ => WorkerState::Stopped,
        }
    }
}

/// Состояние одного воркера, видимое снаружи
#[derive(Debug)]
struct WorkerSlot(AtomicU8);

impl WorkerSlot {
    fn new() -> Self {
        Self(AtomicU8::new(WorkerState::Idle as u8))
    }

    #[inline]
    fn set(&self, state: WorkerState) {
        self.0.store(state as u8, Ordering::Release);
    }

    #[inline]
    fn get(&self) -> WorkerState {
        WorkerState::from_u8(self.0.load(Ordering::Acquire))
    }
}

pub struct ChunkLoaderPool {
    queue: Arc<ChunkWorkQueue>,
    slots: Arc<Vec<WorkerSlot>>,
    workers: Vec<JoinHandle<()>>,
}

impl ChunkLoaderPool {
    /// Запустить `count` воркеров. При ошибке запуска уже созданные останавливаются.
    pub fn start(
        count: usize,
        queue: Arc<ChunkWorkQueue>,
        pipeline: Arc<ChunkPipeline>,
    ) -> Result<Self, StreamError> {
        let count = count.max(1);
        let slots: Arc<Vec<WorkerSlot>> = Arc::new((0..count).map(|_| WorkerSlot::new()).collect());
        let mut pool = Self {
            queue: Arc::clone(&queue),
            slots: Arc::clone(&slots),
            workers: Vec::with_capacity(count),
        };

        for index in 0..count {
            let queue = Arc::clone(&queue);
            let pipeline = Arc::clone(&pipeline);
            let slots = Arc::clone(&slots);

            let spawned = thread::Builder::new()
                .name(format!("terrain-worker-{}", index))
                .spawn(move || worker_loop(index, &queue, &pipeline, &slots[index]));

            match spawned {
                Ok(handle) => pool.workers.push(handle),
                Err(e) => {
                    log::error!("Failed to spawn terrain worker {}: {}", index, e);
                    pool.shutdown();
                    return Err(StreamError::Spawn(e));
                }
            }
        }

        log::info!("terrain loader pool started with {} workers", count);
        Ok(pool)
    }

    pub fn worker_count(&self) -> usize {
        self.slots.len()
    }

    pub fn worker_states(&self) -> Vec<WorkerState> {
        self.slots.iter().map(WorkerSlot::get).collect()
    }

    pub fn is_running(&self) -> bool {
        !self.workers.is_empty()
    }

    /// Сигнал остановки + join. Повторный вызов ничего не делает.
    pub fn shutdown(&mut self) {
        if self.workers.is_empty() {
            return;
        }

        let dropped = self.queue.shutdown();
        if dropped > 0 {
            log::debug!("{} queued chunk requests dropped on shutdown", dropped);
        }

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("terrain worker panicked");
            }
        }
        for slot in self.slots.iter() {
            slot.set(WorkerState::Stopped);
        }
    }
}

impl Drop for ChunkLoaderPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(index: usize, queue: &ChunkWorkQueue, pipeline: &ChunkPipeline, slot: &WorkerSlot) {
    log::debug!("terrain worker {} started", index);

    while let Some(coord) = queue.pop_blocking() {
        // Паника в пайплайне или хранилище не должна убивать воркера
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            slot.set(WorkerState::Generating);
            let generated = pipeline.generate(coord);

            slot.set(WorkerState::Publishing);
            pipeline.finish(generated);
        }));

        if outcome.is_err() {
            log::error!("terrain worker {} panicked while loading chunk {}", index, coord);
            pipeline.abandon(coord);
        }

        slot.set(WorkerState::Idle);
        queue.task_done();
    }

    slot.set(WorkerState::Stopped);
    log::debug!("terrain worker {} stopped", index);
}
