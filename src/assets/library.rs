// ============================================
// Model Library - Потокобезопасное хранилище моделей
// ============================================
// Модель = именованный набор мешей. Воркеры регистрируют
// модели параллельно с разными именами; чтение не блокирует
// других читателей (RwLock).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use super::material::Material;
use super::mesh::{MeshData, MeshHandle};
use crate::error::AssetError;

/// Контракт хранилища ассетов, вызывается из потоков воркеров
pub trait ModelStore: Send + Sync {
    /// Зарегистрировать пустую модель
    fn add_model(&self, name: &str) -> Result<(), AssetError>;

    /// Добавить меш к модели, вернуть стабильный handle
    fn add_mesh_to_model(
        &self,
        model: &str,
        mesh_name: &str,
        mesh: MeshData,
        material: Material,
    ) -> Result<MeshHandle, AssetError>;
}

/// Меш внутри библиотеки
#[derive(Debug, Clone)]
pub struct StoredMesh {
    pub name: String,
    pub model: String,
    pub data: Arc<MeshData>,
    pub material: Material,
}

#[derive(Default)]
struct LibraryState {
    /// имя модели -> handle-ы её мешей
    models: HashMap<String, Vec<MeshHandle>>,
    meshes: HashMap<MeshHandle, StoredMesh>,
}

/// In-memory реализация ModelStore
pub struct ModelLibrary {
    state: RwLock<LibraryState>,
    next_handle: AtomicU32,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LibraryState::default()),
            next_handle: AtomicU32::new(0),
        }
    }

    pub fn model_count(&self) -> usize {
        self.state.read().map_or(0, |s| s.models.len())
    }

    pub fn mesh_count(&self) -> usize {
        self.state.read().map_or(0, |s| s.meshes.len())
    }

    pub fn has_model(&self, name: &str) -> bool {
        self.state.read().is_ok_and(|s| s.models.contains_key(name))
    }

    /// Handle-ы мешей модели в порядке добавления
    pub fn model_meshes(&self, name: &str) -> Option<Vec<MeshHandle>> {
        self.state.read().ok()?.models.get(name).cloned()
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<StoredMesh> {
        self.state.read().ok()?.meshes.get(&handle).cloned()
    }

    /// Имена моделей, отсортированные
    pub fn model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .state
            .read()
            .map(|s| s.models.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl Default for ModelLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelStore for ModelLibrary {
    fn add_model(&self, name: &str) -> Result<(), AssetError> {
        let mut state = self.state.write().map_err(|_| AssetError::LockPoisoned)?;
        if state.models.contains_key(name) {
            return Err(AssetError::DuplicateModel(name.to_string()));
        }
        state.models.insert(name.to_string(), Vec::new());
        Ok(())
    }

    fn add_mesh_to_model(
        &self,
        model: &str,
        mesh_name: &str,
        mesh: MeshData,
        material: Material,
    ) -> Result<MeshHandle, AssetError> {
        if mesh.is_empty() || !mesh.indices_in_range() {
            return Err(AssetError::EmptyMesh(model.to_string()));
        }

        let mut state = self.state.write().map_err(|_| AssetError::LockPoisoned)?;
        if !state.models.contains_key(model) {
            return Err(AssetError::UnknownModel(model.to_string()));
        }

        let handle = MeshHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        state.meshes.insert(
            handle,
            StoredMesh {
                name: mesh_name.to_string(),
                model: model.to_string(),
                data: Arc::new(mesh),
                material,
            },
        );
        if let Some(handles) = state.models.get_mut(model) {
            handles.push(handle);
        }
        Ok(handle)
    }
}
