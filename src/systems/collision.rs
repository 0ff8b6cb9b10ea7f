//! Tile collision.
//!
//! Runs after [`integrate`](super::movement::integrate). The move of this
//! tick is replayed one axis at a time from `position - velocity`:
//!
//! - x: SOLID tiles push the hitbox back out sideways;
//! - y: SOLID tiles block both ways, PLATFORM tiles only catch a hitbox
//!   falling onto their top, SLOPE tiles lift the hitbox onto their surface.
//!
//! A blocked axis has its velocity zeroed. `ON_GROUND` is set when the
//! hitbox rests on something, and `UNDERWATER` when its centre is below the
//! subworld water line.

use smallvec::SmallVec;

use crate::components::collision::{Collision, Side, TileContact};
use crate::components::flags::Flags;
use crate::components::position::Position;
use crate::components::velocity::Velocity;
use crate::geometry::{Rect, Vec2};
use crate::resources::definitions::{CollisionType, TileDefs};
use crate::resources::subworld::Subworld;
use crate::resources::tilemap::Tilemap;

/// Slack for "was above the platform" and ground probing.
const EPSILON: f32 = 1e-4;
const GROUND_PROBE: f32 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub position: Vec2<f32>,
    pub velocity: Vec2<f32>,
    pub contacts: SmallVec<[TileContact; 4]>,
    pub on_ground: bool,
}

fn tile_rect(tile: Vec2<i32>) -> Rect<f32> {
    Rect::new(tile.x as f32, tile.y as f32, 1.0, 1.0)
}

/// Tiles under `area` with their collision type, skipping empty ones.
fn tiles_in(map: &Tilemap, defs: &TileDefs, area: &Rect<f32>) -> SmallVec<[(Vec2<i32>, CollisionType); 8]> {
    let (min, max) = area.tile_span();
    let mut out = SmallVec::new();
    for x in min.x..=max.x {
        for y in min.y..=max.y {
            let id = map.read(x, y);
            if id.is_none() {
                continue;
            }
            let collision = defs.get(id.as_str()).collision;
            if collision != CollisionType::None {
                out.push((Vec2::new(x, y), collision));
            }
        }
    }
    out
}

fn slope_surface(map: &Tilemap, defs: &TileDefs, tile: Vec2<i32>, x: f32) -> Option<f32> {
    let local = x - tile.x as f32;
    if !(0.0..1.0).contains(&local) {
        return None;
    }
    let slope = defs.get(map.read(tile.x, tile.y).as_str()).slope;
    Some(tile.y as f32 + slope.height_at(local))
}

/// Replay one tick of motion for a hitbox that ended at `position`.
pub fn resolve_box(
    map: &Tilemap,
    defs: &TileDefs,
    hitbox: Rect<f32>,
    position: Vec2<f32>,
    velocity: Vec2<f32>,
) -> Resolution {
    let start = position - velocity;
    let mut pos = start;
    let mut vel = velocity;
    let mut contacts = SmallVec::new();
    let mut on_ground = false;

    // x axis
    pos.x += vel.x;
    let area = hitbox.translate(pos);
    for (tile, kind) in tiles_in(map, defs, &area) {
        if kind != CollisionType::Solid {
            continue;
        }
        let r = tile_rect(tile);
        let area = hitbox.translate(pos);
        if !r.intersects(&area) {
            continue;
        }
        if vel.x > 0.0 {
            pos.x = r.left() - hitbox.right();
            contacts.push(TileContact { tile, side: Side::Right, collision: kind });
        } else if vel.x < 0.0 {
            pos.x = r.right() - hitbox.left();
            contacts.push(TileContact { tile, side: Side::Left, collision: kind });
        }
    }
    if contacts.iter().any(|c: &TileContact| matches!(c.side, Side::Left | Side::Right)) {
        vel.x = 0.0;
    }

    // y axis
    let prev_bottom = start.y + hitbox.bottom();
    pos.y += vel.y;
    let area = hitbox.translate(pos);
    let center_x = area.midpoint().x;
    for (tile, kind) in tiles_in(map, defs, &area) {
        let r = tile_rect(tile);
        let area = hitbox.translate(pos);
        match kind {
            CollisionType::Solid => {
                if !r.intersects(&area) {
                    continue;
                }
                if vel.y <= 0.0 {
                    pos.y = r.top() - hitbox.bottom();
                    on_ground = true;
                    contacts.push(TileContact { tile, side: Side::Bottom, collision: kind });
                } else {
                    pos.y = r.bottom() - hitbox.top();
                    contacts.push(TileContact { tile, side: Side::Top, collision: kind });
                }
                vel.y = 0.0;
            }
            CollisionType::Platform => {
                if vel.y < 0.0 && prev_bottom >= r.top() - EPSILON && area.bottom() < r.top() && r.intersects(&area) {
                    pos.y = r.top() - hitbox.bottom();
                    vel.y = 0.0;
                    on_ground = true;
                    contacts.push(TileContact { tile, side: Side::Bottom, collision: kind });
                }
            }
            CollisionType::Slope => {
                if vel.y > 0.0 {
                    continue;
                }
                if let Some(surface) = slope_surface(map, defs, tile, center_x) {
                    if area.bottom() < surface && prev_bottom >= r.bottom() - EPSILON {
                        pos.y = surface - hitbox.bottom();
                        vel.y = 0.0;
                        on_ground = true;
                        contacts.push(TileContact { tile, side: Side::Bottom, collision: kind });
                    }
                }
            }
            CollisionType::None => {}
        }
    }

    // resting without downward speed still counts as grounded
    if !on_ground && vel.y <= 0.0 {
        let feet = hitbox.translate(pos);
        let probe = Rect::new(feet.left(), feet.bottom() - GROUND_PROBE, feet.width(), GROUND_PROBE);
        on_ground = tiles_in(map, defs, &probe).iter().any(|(tile, kind)| match kind {
            CollisionType::Solid | CollisionType::Platform => {
                (feet.bottom() - tile_rect(*tile).top()).abs() < GROUND_PROBE
                    && tile_rect(*tile).intersects(&probe)
            }
            CollisionType::Slope => slope_surface(map, defs, *tile, feet.midpoint().x)
                .is_some_and(|s| (feet.bottom() - s).abs() < GROUND_PROBE),
            CollisionType::None => false,
        });
    }

    Resolution {
        position: pos,
        velocity: vel,
        contacts,
        on_ground,
    }
}

/// Resolve every SOLID-flagged entity with a hitbox against the tile world.
pub fn resolve_tiles(subworld: &mut Subworld, defs: &TileDefs) {
    let water = subworld.water;
    let Subworld { tilemap, store, .. } = subworld;

    for e in store.view::<(Position, Velocity, Flags, Collision)>() {
        let flags = *store.get::<Flags>(e);
        let pos = store.get::<Position>(e).0;
        let hitbox = store.get::<Collision>(e).hitbox;

        let (pos, contacts, on_ground) = if flags.has(Flags::SOLID) {
            let vel = store.get::<Velocity>(e).0;
            let res = resolve_box(tilemap, defs, hitbox, pos, vel);
            store.update::<Position, _>(e, |p| p.0 = res.position);
            store.update::<Velocity, _>(e, |v| v.0 = res.velocity);
            (res.position, res.contacts, res.on_ground)
        } else {
            (pos, SmallVec::new(), false)
        };

        let center_y = hitbox.translate(pos).midpoint().y;
        let underwater = water.is_some_and(|w| center_y < w);
        store.update::<Flags, _>(e, |f| {
            f.assign(Flags::ON_GROUND, on_ground);
            f.assign(Flags::UNDERWATER, underwater);
        });
        store.update::<Collision, _>(e, |c| c.contacts = contacts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::definitions::{SlopeKind, TileDef};
    use crate::resources::tilemap::TileId;

    const EPS: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    fn world() -> (Tilemap, TileDefs) {
        let mut defs = TileDefs::new();
        defs.register("solid", TileDef { collision: CollisionType::Solid, ..TileDef::default() }).unwrap();
        defs.register("platform", TileDef { collision: CollisionType::Platform, ..TileDef::default() }).unwrap();
        defs.register(
            "up",
            TileDef {
                collision: CollisionType::Slope,
                slope: SlopeKind::Up,
                ..TileDef::default()
            },
        )
        .unwrap();
        defs.register("deco", TileDef::default()).unwrap();
        let mut map = Tilemap::new();
        for x in -5..5 {
            map.write(x, 0, TileId::new("solid"));
        }
        (map, defs)
    }

    fn unit() -> Rect<f32> {
        Rect::new(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn test_lands_on_floor() {
        let (map, defs) = world();
        let res = resolve_box(&map, &defs, unit(), Vec2::new(0.0, 0.8), Vec2::new(0.0, -0.4));
        assert!(approx_eq(res.position.y, 1.0));
        assert_eq!(res.velocity.y, 0.0);
        assert!(res.on_ground);
        assert!(res.contacts.iter().any(|c| c.side == Side::Bottom));
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let (mut map, defs) = world();
        map.write(3, 1, TileId::new("solid"));
        let res = resolve_box(&map, &defs, unit(), Vec2::new(2.3, 1.0), Vec2::new(0.5, 0.0));
        assert!(approx_eq(res.position.x, 2.0));
        assert_eq!(res.velocity.x, 0.0);
        assert!(res.contacts.iter().any(|c| c.side == Side::Right && c.tile == Vec2::new(3, 1)));
        assert!(res.on_ground);
    }

    #[test]
    fn test_head_bump() {
        let (mut map, defs) = world();
        map.write(0, 4, TileId::new("solid"));
        let res = resolve_box(&map, &defs, unit(), Vec2::new(0.0, 3.2), Vec2::new(0.0, 0.4));
        assert!(approx_eq(res.position.y, 3.0));
        assert_eq!(res.velocity.y, 0.0);
        assert!(!res.on_ground);
        assert!(res.contacts.iter().any(|c| c.side == Side::Top));
    }

    #[test]
    fn test_platform_only_from_above() {
        let (mut map, defs) = world();
        map.write(0, 3, TileId::new("platform"));
        // jumping up through it
        let up = resolve_box(&map, &defs, unit(), Vec2::new(0.0, 3.3), Vec2::new(0.0, 0.4));
        assert!(approx_eq(up.position.y, 3.3));
        // falling onto it
        let down = resolve_box(&map, &defs, unit(), Vec2::new(0.0, 3.8), Vec2::new(0.0, -0.4));
        assert!(approx_eq(down.position.y, 4.0));
        assert!(down.on_ground);
    }

    #[test]
    fn test_slope_lifts_onto_surface() {
        let (mut map, defs) = world();
        map.write(2, 1, TileId::new("up"));
        // centre x = 2.5 -> surface at 1.5
        let res = resolve_box(&map, &defs, unit(), Vec2::new(2.0, 1.2), Vec2::new(0.0, -0.02));
        assert!(approx_eq(res.position.y, 1.5));
        assert!(res.on_ground);
    }

    #[test]
    fn test_deco_tiles_do_not_collide() {
        let (mut map, defs) = world();
        map.write(0, 2, TileId::new("deco"));
        let res = resolve_box(&map, &defs, unit(), Vec2::new(0.0, 1.5), Vec2::new(0.0, -0.1));
        assert!(approx_eq(res.position.y, 1.5));
        assert!(!res.on_ground);
    }

    #[test]
    fn test_resting_entity_is_grounded() {
        let (map, defs) = world();
        let res = resolve_box(&map, &defs, unit(), Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0));
        assert!(res.on_ground);
        assert!(res.contacts.is_empty());
    }

    #[test]
    fn test_resolve_tiles_sets_flags() {
        let (map, defs) = world();
        let mut sw = Subworld::new(Rect::new(-5, 0, 10, 10));
        sw.tilemap = map;
        sw.water = Some(3.0);
        let e = sw.store.create_entity();
        sw.store.emplace(e, Position::new(0.0, 0.9));
        sw.store.emplace(e, Velocity::new(0.0, -0.1));
        sw.store.emplace(e, Flags::new(Flags::SOLID | Flags::GRAVITY));
        sw.store.emplace(e, Collision::new(unit()));

        resolve_tiles(&mut sw, &defs);
        let flags = *sw.store.get::<Flags>(e);
        assert!(flags.has(Flags::ON_GROUND));
        assert!(flags.has(Flags::UNDERWATER));
        assert!(approx_eq(sw.store.get::<Position>(e).0.y, 1.0));
        assert!(sw.store.get::<Collision>(e).touching(Side::Bottom));
    }
}
