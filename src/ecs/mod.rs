//! Sparse-map entity/component store.
//!
//! Entities are bare integer handles. Every component kind has its own table
//! (`FxHashMap<Entity, C>`), and a component exists for an entity only after
//! an explicit [`EntityStore::emplace`]. Views are inner joins over tables.
//!
//! ```text
//! EntityStore
//!   live:   BTreeSet<Entity>            valid handles, ascending
//!   tables: Info | Position | Velocity | Direction | Flags | State
//!           Timers | Collision | Render | Audio   (one map each)
//! ```

mod entity;
mod store;

pub use entity::Entity;
pub use store::{Component, ComponentTable, EntityStore, Query, Tables};
