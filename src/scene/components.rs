// ============================================
// Scene Components - Компоненты сущностей
// ============================================

use ultraviolet::{Mat4, Rotor3, Vec3, Vec4};

use crate::assets::MeshHandle;

use super::entity::Entity;
use super::registry::Scene;

/// Позиция относительно родителя
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec3);

/// Ориентация в градусах (yaw вокруг Y, pitch вокруг X, roll вокруг Z)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Orientation {
    pub fn rotor(&self) -> Rotor3 {
        Rotor3::from_euler_angles(
            self.roll.to_radians(),
            self.pitch.to_radians(),
            self.yaw.to_radians(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale(pub Vec3);

impl Scale {
    pub fn uniform(s: f32) -> Self {
        Self(Vec3::new(s, s, s))
    }
}

/// Кэш матриц: локальная (TRS) и мировая (с учётом родителей)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub local: Mat4,
    pub world: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            local: Mat4::identity(),
            world: Mat4::identity(),
        }
    }
}

/// Ссылка на меш в библиотеке моделей
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshComponent(pub MeshHandle);

/// Непрозрачный идентификатор скомпилированной шейдерной программы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram(pub ShaderHandle);

/// Родитель в иерархии трансформаций
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

/// Собирает TRS матрицу: translation * rotation * scale
pub fn compose_matrix(position: Vec3, rotation: Rotor3, scale: Vec3) -> Mat4 {
    let scale_matrix = Mat4::new(
        Vec4::new(scale.x, 0.0, 0.0, 0.0),
        Vec4::new(0.0, scale.y, 0.0, 0.0),
        Vec4::new(0.0, 0.0, scale.z, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    );
    Mat4::from_translation(position) * rotation.into_matrix().into_homogeneous() * scale_matrix
}

/// Набор пространственных компонентов для одной сущности
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    pub position: Vec3,
    pub orientation: Orientation,
    pub scale: Vec3,
}

impl Default for SceneTransform {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
            orientation: Orientation::default(),
            scale: Vec3::one(),
        }
    }
}

impl SceneTransform {
    pub fn at(position: Vec3) -> Self {
        Self { position, ..Default::default() }
    }

    pub fn with_scale(mut self, s: f32) -> Self {
        self.scale = Vec3::new(s, s, s);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        compose_matrix(self.position, self.orientation.rotor(), self.scale)
    }

    /// Добавить Position/Orientation/Scale/Transform к сущности
    pub fn emplace_into(&self, scene: &mut Scene, entity: Entity) -> bool {
        let matrix = self.matrix();
        scene.emplace(entity, Position(self.position))
            && scene.emplace(entity, self.orientation)
            && scene.emplace(entity, Scale(self.scale))
            && scene.emplace(entity, Transform { local: matrix, world: matrix })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_translates_scaled_point() {
        let m = compose_matrix(Vec3::new(1.0, 2.0, 3.0), Rotor3::identity(), Vec3::new(2.0, 2.0, 2.0));
        let p = m.transform_point3(Vec3::new(1.0, 1.0, 1.0));
        assert!((p - Vec3::new(3.0, 4.0, 5.0)).mag() < 1e-5);
    }

    #[test]
    fn test_scene_transform_emplaces_all_parts() {
        let mut scene = Scene::new();
        let e = scene.create_entity();
        assert!(SceneTransform::at(Vec3::new(0.0, 5.0, 0.0)).emplace_into(&mut scene, e));
        assert!(scene.has::<Position>(e));
        assert!(scene.has::<Orientation>(e));
        assert!(scene.has::<Scale>(e));
        let t = scene.get::<Transform>(e).unwrap();
        let origin = t.world.transform_point3(Vec3::zero());
        assert!((origin.y - 5.0).abs() < 1e-5);
    }
}
