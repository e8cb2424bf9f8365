// ============================================
// Errors - Ошибки подсистемы terrain
// ============================================

use std::fmt;

/// Ошибки хранилища моделей
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Модель с таким именем уже зарегистрирована
    DuplicateModel(String),
    /// Модель не найдена
    UnknownModel(String),
    /// Меш без вершин или индексов
    EmptyMesh(String),
    LockPoisoned,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::DuplicateModel(name) => write!(f, "model '{}' is already registered", name),
            AssetError::UnknownModel(name) => write!(f, "model '{}' is not registered", name),
            AssetError::EmptyMesh(name) => write!(f, "mesh for model '{}' is empty", name),
            AssetError::LockPoisoned => write!(f, "model library lock poisoned"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Ошибки стримера terrain
#[derive(Debug)]
pub enum StreamError {
    Asset(AssetError),
    /// Не удалось запустить поток воркера
    Spawn(std::io::Error),
    Settings(String),
    /// Циклическая иерархия parent-child в сцене
    CircularHierarchy,
    LockPoisoned,
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Asset(e) => write!(f, "asset error: {}", e),
            StreamError::Spawn(e) => write!(f, "failed to spawn worker thread: {}", e),
            StreamError::Settings(msg) => write!(f, "invalid terrain settings: {}", msg),
            StreamError::CircularHierarchy => write!(f, "entity parent-child hierarchy is circular"),
            StreamError::LockPoisoned => write!(f, "scene lock poisoned"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Asset(e) => Some(e),
            StreamError::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AssetError> for StreamError {
    fn from(e: AssetError) -> Self {
        StreamError::Asset(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_asset_error_converts_and_keeps_source() {
        let err: StreamError = AssetError::DuplicateModel("terrain/chunk_0_0".into()).into();
        assert!(err.to_string().contains("terrain/chunk_0_0"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_spawn_error_keeps_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::OutOfMemory, "no threads left");
        let err = StreamError::Spawn(io);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("no threads left"));
    }
}
