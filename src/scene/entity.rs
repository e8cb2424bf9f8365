// ============================================
// Entity - Идентификатор сущности сцены
// ============================================

/// Сущность сцены. Идентификаторы не переиспользуются.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    #[inline]
    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.0
    }
}
