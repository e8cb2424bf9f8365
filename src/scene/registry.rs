// ============================================
// Scene Registry - Реестр сущностей и компонентов
// ============================================
// Хранилище компонентов по TypeId: у каждого типа свой HashMap.
// Реестр НЕ потокобезопасен - воркеры работают с ним
// только через общий Mutex<Scene>.

use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};

use super::entity::Entity;

/// Любой тип, который можно хранить в сцене
pub trait Component: Send + 'static {}

impl<T: Send + 'static> Component for T {}

/// Стирание типа для хранилищ компонентов
trait ComponentStorage: Send {
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Storage<T> {
    items: HashMap<Entity, T>,
}

impl<T: Component> ComponentStorage for Storage<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.items.remove(&entity).is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Сцена: живые сущности + хранилища компонентов
pub struct Scene {
    next_id: u64,
    alive: BTreeSet<Entity>,
    storages: HashMap<TypeId, Box<dyn ComponentStorage>>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            alive: BTreeSet::new(),
            storages: HashMap::new(),
        }
    }

    /// Создать пустую сущность
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::from_raw(self.next_id);
        self.next_id += 1;
        self.alive.insert(entity);
        entity
    }

    /// Удалить сущность вместе со всеми компонентами
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.alive.remove(&entity) {
            return false;
        }
        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }
        true
    }

    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    pub fn entity_count(&self) -> usize {
        self.alive.len()
    }

    /// Все живые сущности по возрастанию id
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive.iter().copied()
    }

    /// Добавить (или заменить) компонент. false если сущность мертва.
    pub fn emplace<T: Component>(&mut self, entity: Entity, component: T) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.storage_mut::<T>().insert(entity, component);
        true
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(&entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<Storage<T>>()?
            .items
            .get_mut(&entity)
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<Storage<T>>()?
            .items
            .remove(&entity)
    }

    /// Итератор по всем сущностям с компонентом T (порядок не определён)
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.storage::<T>()
            .into_iter()
            .flat_map(|items| items.iter().map(|(e, c)| (*e, c)))
    }

    /// Сущности с компонентом T, отсортированные по id
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        let mut entities: Vec<_> = self.query::<T>().map(|(e, _)| e).collect();
        entities.sort();
        entities
    }

    pub fn count<T: Component>(&self) -> usize {
        self.storage::<T>().map_or(0, |items| items.len())
    }

    fn storage<T: Component>(&self) -> Option<&HashMap<Entity, T>> {
        self.storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<Storage<T>>()
            .map(|s| &s.items)
    }

    fn storage_mut<T: Component>(&mut self) -> &mut HashMap<Entity, T> {
        let storage = self
            .storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Storage::<T> { items: HashMap::new() }));

        match storage.as_any_mut().downcast_mut::<Storage<T>>() {
            Some(s) => &mut s.items,
            None => unreachable!("component storage registered under a foreign TypeId"),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(u32);

    #[derive(Debug, PartialEq)]
    struct Name(&'static str);

    #[test]
    fn test_emplace_get_and_replace() {
        let mut scene = Scene::new();
        let e = scene.create_entity();
        assert!(scene.emplace(e, Health(10)));
        assert!(scene.emplace(e, Name("root")));
        assert_eq!(scene.get::<Health>(e), Some(&Health(10)));

        scene.emplace(e, Health(3));
        assert_eq!(scene.get::<Health>(e), Some(&Health(3)));
        assert_eq!(scene.count::<Health>(), 1);

        if let Some(h) = scene.get_mut::<Health>(e) {
            h.0 += 1;
        }
        assert_eq!(scene.remove::<Health>(e), Some(Health(4)));
        assert!(!scene.has::<Health>(e));
    }

    #[test]
    fn test_destroy_removes_all_components() {
        let mut scene = Scene::new();
        let a = scene.create_entity();
        let b = scene.create_entity();
        scene.emplace(a, Health(1));
        scene.emplace(a, Name("a"));
        scene.emplace(b, Health(2));

        assert!(scene.destroy_entity(a));
        assert!(!scene.destroy_entity(a));
        assert!(!scene.is_alive(a));
        assert_eq!(scene.get::<Name>(a), None);
        assert_eq!(scene.entities_with::<Health>(), vec![b]);
        assert_eq!(scene.entity_count(), 1);
    }

    #[test]
    fn test_dead_entity_rejects_components() {
        let mut scene = Scene::new();
        let e = scene.create_entity();
        scene.destroy_entity(e);
        assert!(!scene.emplace(e, Health(1)));
        assert_eq!(scene.count::<Health>(), 0);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut scene = Scene::new();
        let a = scene.create_entity();
        scene.destroy_entity(a);
        let b = scene.create_entity();
        assert_ne!(a, b);
        assert!(b.id() > a.id());
    }
}
