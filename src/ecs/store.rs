use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use super::entity::Entity;
use crate::components::audio::Audio;
use crate::components::collision::Collision;
use crate::components::direction::Direction;
use crate::components::flags::Flags;
use crate::components::info::Info;
use crate::components::position::Position;
use crate::components::render::Render;
use crate::components::state::State;
use crate::components::timers::Timers;
use crate::components::velocity::Velocity;

pub type ComponentTable<C> = FxHashMap<Entity, C>;

/// A component kind with its own table in [`Tables`].
pub trait Component: Sized + 'static {
    const NAME: &'static str;
    fn table(tables: &Tables) -> &ComponentTable<Self>;
    fn table_mut(tables: &mut Tables) -> &mut ComponentTable<Self>;
}

macro_rules! component_tables {
    ($($ty:ty => $field:ident),* $(,)?) => {
        /// One table per component kind.
        #[derive(Default)]
        pub struct Tables {
            $($field: ComponentTable<$ty>,)*
        }

        impl Tables {
            fn remove_all(&mut self, entity: Entity) {
                $(self.$field.remove(&entity);)*
            }

            fn reserve(&mut self, additional: usize) {
                $(self.$field.reserve(additional);)*
            }

            fn clear(&mut self) {
                $(self.$field.clear();)*
            }

            fn count_for(&self, entity: Entity) -> usize {
                0 $(+ usize::from(self.$field.contains_key(&entity)))*
            }
        }

        $(
            impl Component for $ty {
                const NAME: &'static str = stringify!($ty);
                fn table(tables: &Tables) -> &ComponentTable<Self> {
                    &tables.$field
                }
                fn table_mut(tables: &mut Tables) -> &mut ComponentTable<Self> {
                    &mut tables.$field
                }
            }
        )*
    };
}

component_tables! {
    Info => info,
    Position => position,
    Velocity => velocity,
    Direction => direction,
    Flags => flags,
    State => state,
    Timers => timers,
    Collision => collision,
    Render => render,
    Audio => audio,
}

/// A set of component kinds an entity must hold all of.
pub trait Query {
    fn matches(tables: &Tables, entity: Entity) -> bool;
}

macro_rules! impl_query {
    ($($ty:ident),+) => {
        impl<$($ty: Component),+> Query for ($($ty,)+) {
            fn matches(tables: &Tables, entity: Entity) -> bool {
                $($ty::table(tables).contains_key(&entity))&&+
            }
        }
    };
}

impl_query!(A);
impl_query!(A, B);
impl_query!(A, B, C);
impl_query!(A, B, C, D);
impl_query!(A, B, C, D, E);

/// Owns entity handles and their component tables.
#[derive(Default)]
pub struct EntityStore {
    next_id: u64,
    live: BTreeSet<Entity>,
    tables: Tables,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-reserve table space for `capacity` more entities. Never changes
    /// observable behaviour.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.tables.reserve(capacity);
    }

    /// Allocate a fresh handle with no components.
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::from_raw(self.next_id);
        self.next_id += 1;
        self.live.insert(entity);
        entity
    }

    pub fn is_valid(&self, entity: Entity) -> bool {
        self.live.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Live entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.live.iter().copied()
    }

    /// Erase `entity` from every table and the live set. Returns whether it
    /// was live.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        if !self.live.remove(&entity) {
            return false;
        }
        self.tables.remove_all(entity);
        true
    }

    /// Remove every entity. Ids keep counting from where they were.
    pub fn clear(&mut self) {
        self.live.clear();
        self.tables.clear();
    }

    /// Attach or replace a component. Returns the previous value.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not live in this store.
    pub fn emplace<C: Component>(&mut self, entity: Entity, value: C) -> Option<C> {
        assert!(
            self.is_valid(entity),
            "emplace {} on entity {} which is not live",
            C::NAME,
            entity
        );
        C::table_mut(&mut self.tables).insert(entity, value)
    }

    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        C::table(&self.tables).contains_key(&entity)
    }

    /// Read a component.
    ///
    /// # Panics
    ///
    /// Panics if the component was never attached to `entity`.
    pub fn get<C: Component>(&self, entity: Entity) -> &C {
        self.try_get(entity)
            .unwrap_or_else(|| panic!("entity {} has no {} component", entity, C::NAME))
    }

    pub fn try_get<C: Component>(&self, entity: Entity) -> Option<&C> {
        C::table(&self.tables).get(&entity)
    }

    /// Mutate a component in place and return the closure's result.
    ///
    /// # Panics
    ///
    /// Panics if the component was never attached to `entity`.
    pub fn update<C: Component, R>(&mut self, entity: Entity, f: impl FnOnce(&mut C) -> R) -> R {
        match C::table_mut(&mut self.tables).get_mut(&entity) {
            Some(component) => f(component),
            None => panic!("entity {} has no {} component", entity, C::NAME),
        }
    }

    pub fn try_update<C: Component, R>(&mut self, entity: Entity, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        C::table_mut(&mut self.tables).get_mut(&entity).map(f)
    }

    /// Detach one component.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        C::table_mut(&mut self.tables).remove(&entity)
    }

    /// Entities holding every component in `Q`, ascending by id.
    ///
    /// Returned as an owned list so callers can mutate the store while
    /// walking it.
    pub fn view<Q: Query>(&self) -> Vec<Entity> {
        self.live
            .iter()
            .copied()
            .filter(|e| Q::matches(&self.tables, *e))
            .collect()
    }

    /// Number of tables holding an entry for `entity`.
    pub fn component_count(&self, entity: Entity) -> usize {
        self.tables.count_for(entity)
    }
}
