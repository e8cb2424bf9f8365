// ============================================
// Transform Systems - Расчёт матриц сущностей
// ============================================
// 1. calc_local_transforms: Position/Orientation/Scale -> Transform.local
// 2. calc_world_transforms: обход цепочки Parent -> Transform.world

use std::collections::{HashMap, HashSet};

use ultraviolet::{Mat4, Rotor3, Vec3};

use super::components::{compose_matrix, Orientation, Parent, Position, Scale, Transform};
use super::entity::Entity;
use super::registry::Scene;
use crate::error::StreamError;

/// Пересчитать локальные матрицы всех сущностей с Transform
pub fn calc_local_transforms(scene: &mut Scene) {
    for entity in scene.entities_with::<Transform>() {
        let position = scene.get::<Position>(entity).map_or(Vec3::zero(), |p| p.0);
        let rotation = scene
            .get::<Orientation>(entity)
            .map_or(Rotor3::identity(), Orientation::rotor);
        let scale = scene.get::<Scale>(entity).map_or(Vec3::one(), |s| s.0);

        if let Some(transform) = scene.get_mut::<Transform>(entity) {
            transform.local = compose_matrix(position, rotation, scale);
        }
    }
}

/// Пересчитать мировые матрицы. Родитель без Transform считается корнем.
pub fn calc_world_transforms(scene: &mut Scene) -> Result<(), StreamError> {
    let entities = scene.entities_with::<Transform>();
    let mut resolved: HashMap<Entity, Mat4> = HashMap::with_capacity(entities.len());

    for &entity in &entities {
        resolve_world(scene, entity, &mut resolved, &mut HashSet::new())?;
    }

    for (entity, world) in resolved {
        if let Some(transform) = scene.get_mut::<Transform>(entity) {
            transform.world = world;
        }
    }
    Ok(())
}

/// Оба прохода подряд
pub fn update_transforms(scene: &mut Scene) -> Result<(), StreamError> {
    calc_local_transforms(scene);
    calc_world_transforms(scene)
}

fn resolve_world(
    scene: &Scene,
    entity: Entity,
    resolved: &mut HashMap<Entity, Mat4>,
    visiting: &mut HashSet<Entity>,
) -> Result<Mat4, StreamError> {
    if let Some(world) = resolved.get(&entity) {
        return Ok(*world);
    }
    if !visiting.insert(entity) {
        return Err(StreamError::CircularHierarchy);
    }

    let local = scene.get::<Transform>(entity).map_or(Mat4::identity(), |t| t.local);
    let world = match scene.get::<Parent>(entity) {
        Some(Parent(parent)) if scene.has::<Transform>(*parent) => {
            resolve_world(scene, *parent, resolved, visiting)? * local
        }
        _ => local,
    };

    visiting.remove(&entity);
    resolved.insert(entity, world);
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneTransform;

    fn spawn(scene: &mut Scene, position: Vec3) -> Entity {
        let e = scene.create_entity();
        SceneTransform::at(position).emplace_into(scene, e);
        e
    }

    #[test]
    fn test_child_inherits_parent_translation() {
        let mut scene = Scene::new();
        let root = spawn(&mut scene, Vec3::new(10.0, 0.0, 0.0));
        let child = spawn(&mut scene, Vec3::new(5.0, 1.0, 0.0));
        let grandchild = spawn(&mut scene, Vec3::new(0.0, 0.0, 2.0));
        scene.emplace(child, Parent(root));
        scene.emplace(grandchild, Parent(child));

        update_transforms(&mut scene).unwrap();

        let world = scene.get::<Transform>(grandchild).unwrap().world;
        let p = world.transform_point3(Vec3::zero());
        assert!((p - Vec3::new(15.0, 1.0, 2.0)).mag() < 1e-5);
    }

    #[test]
    fn test_local_transform_follows_position_change() {
        let mut scene = Scene::new();
        let e = spawn(&mut scene, Vec3::zero());
        scene.emplace(e, Position(Vec3::new(0.0, 3.0, 0.0)));

        update_transforms(&mut scene).unwrap();

        let p = scene.get::<Transform>(e).unwrap().world.transform_point3(Vec3::zero());
        assert!((p.y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_circular_hierarchy_is_an_error() {
        let mut scene = Scene::new();
        let a = spawn(&mut scene, Vec3::zero());
        let b = spawn(&mut scene, Vec3::zero());
        scene.emplace(a, Parent(b));
        scene.emplace(b, Parent(a));

        assert!(matches!(calc_world_transforms(&mut scene), Err(StreamError::CircularHierarchy)));
    }

    #[test]
    fn test_parent_without_transform_acts_as_root() {
        let mut scene = Scene::new();
        let bare = scene.create_entity();
        let child = spawn(&mut scene, Vec3::new(1.0, 0.0, 0.0));
        scene.emplace(child, Parent(bare));

        update_transforms(&mut scene).unwrap();

        let p = scene.get::<Transform>(child).unwrap().world.transform_point3(Vec3::zero());
        assert!((p.x - 1.0).abs() < 1e-5);
    }
}
