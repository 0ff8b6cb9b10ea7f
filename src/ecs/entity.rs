use std::fmt;

/// Opaque entity handle, valid only inside the store that created it.
///
/// Ids come from a per-store monotonic counter and are never reused, so a
/// stale handle can never alias a newer entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    pub(crate) const fn from_raw(id: u64) -> Self {
        Entity(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
