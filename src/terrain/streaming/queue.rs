// ============================================
// Chunk Work Queue - FIFO очередь запросов чанков
// ============================================
// Mutex + Condvar. push будит одного воркера, shutdown будит всех.
// in_flight считает взятые, но ещё не завершённые задачи,
// чтобы wait_idle мог дождаться полного опустошения.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::terrain::chunk::ChunkCoord;

#[derive(Default)]
struct QueueState {
    items: VecDeque<ChunkCoord>,
    in_flight: usize,
    shutdown: bool,
}

impl QueueState {
    #[inline]
    fn is_idle(&self) -> bool {
        self.items.is_empty() && self.in_flight == 0
    }
}

#[derive(Default)]
pub struct ChunkWorkQueue {
    state: Mutex<QueueState>,
    available: Condvar,
    idle: Condvar,
}

impl ChunkWorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Состояние очереди всегда согласовано, поэтому poison игнорируется
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Добавить запрос. false если очередь уже остановлена.
    pub fn push(&self, coord: ChunkCoord) -> bool {
        let mut state = self.lock();
        if state.shutdown {
            return false;
        }
        state.items.push_back(coord);
        drop(state);
        self.available.notify_one();
        true
    }

    /// Ждать задачу. None = очередь остановлена.
    pub fn pop_blocking(&self) -> Option<ChunkCoord> {
        let mut state = self.lock();
        loop {
            if state.shutdown {
                return None;
            }
            if let Some(coord) = state.items.pop_front() {
                state.in_flight += 1;
                return Some(coord);
            }
            state = self.available.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Отметить завершение задачи, полученной через pop_blocking
    pub fn task_done(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.is_idle() {
            self.idle.notify_all();
        }
    }

    /// Остановить очередь. Ожидающие запросы отбрасываются, возвращается их число.
    /// Повторный вызов безопасен.
    pub fn shutdown(&self) -> usize {
        let mut state = self.lock();
        state.shutdown = true;
        let dropped = state.items.len();
        state.items.clear();
        let idle = state.is_idle();
        drop(state);

        self.available.notify_all();
        if idle {
            self.idle.notify_all();
        }
        dropped
    }

    pub fn is_shutdown(&self) -> bool {
        self.lock().shutdown
    }

    /// Запросов в очереди (ещё не взятых воркерами)
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.lock().is_idle()
    }

    /// Ждать, пока очередь пуста и нет задач в работе. false по таймауту.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let state = self.lock();
        let (state, _) = self
            .idle
            .wait_timeout_while(state, timeout, |s| !s.is_idle())
            .unwrap_or_else(PoisonError::into_inner);
        state.is_idle()
    }
}
