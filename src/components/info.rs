use std::sync::Arc;

/// Which [`EntityDef`](crate::resources::definitions::EntityDef) an entity was
/// spawned from, plus an optional instance name for lookups and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    pub kind: Arc<str>,
    pub name: Option<String>,
}

impl Info {
    pub fn new(kind: impl Into<Arc<str>>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
