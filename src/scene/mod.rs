// ============================================
// Scene Module - Реестр сущностей
// ============================================
// Минимальный ECS: сущности, типизированные компоненты,
// системы трансформаций. Потокобезопасность обеспечивает
// внешний Mutex<Scene>.

mod components;
mod entity;
mod registry;
mod systems;

pub use components::{
    compose_matrix, MeshComponent, Orientation, Parent, Position, Scale, SceneTransform,
    ShaderHandle, ShaderProgram, Transform,
};
pub use entity::Entity;
pub use registry::{Component, Scene};
pub use systems::{calc_local_transforms, calc_world_transforms, update_transforms};
