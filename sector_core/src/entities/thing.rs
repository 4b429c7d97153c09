use hecs::Entity;
use sector_game_config::{GameConfig, ThingConfig};
use sector_map_format::Map;
use ultraviolet::{DVec2, DVec3};

use crate::{
    components::{CBody, CThing},
    grid::{EntityClass, Grid},
    level::Level,
    SectorAccel,
};

/// Spawns a thing standing on the floor of the sector under `pos`, or hanging
/// from its ceiling.
pub fn spawn_thing(
    world: &mut hecs::World,
    grid: &mut Grid,
    level: &Level,
    sector_accel: &SectorAccel,
    config: &ThingConfig,
    pos: DVec2,
    angle: f64,
) -> Entity {
    let c_thing = CThing::from_config(config, angle);

    let mut body = CBody::new(DVec3::new(pos.x, 0., pos.y), config.radius, config.height);
    body.sector = sector_accel.query(level, pos);
    match body.sector {
        Some(id) => {
            let sector = level.sector(id);
            body.floor = sector.floor;
            body.ceiling = sector.ceiling;
            body.pos.y = if c_thing.hanging() {
                sector.ceiling - config.height
            } else {
                sector.floor
            };
            body.grounded = !c_thing.hanging();
        }
        None => log::warn!(
            "Thing type {} at ({}, {}) is outside every sector",
            config.thing_type,
            pos.x,
            pos.y
        ),
    }

    body.span = grid.span_of(pos, body.radius);
    let span = body.span;

    let entity = world.spawn((c_thing, body));
    grid.insert(EntityClass::Thing, entity, span);
    entity
}

pub fn init_thing_entities(
    world: &mut hecs::World,
    grid: &mut Grid,
    level: &Level,
    sector_accel: &SectorAccel,
    game_config: &GameConfig,
    map: &Map,
) -> Vec<Entity> {
    let mut spawned = Vec::with_capacity(map.things.len());

    for thing in map.things.iter() {
        let Some(thing_config) = game_config.thing(thing.thing_type) else {
            log::warn!("Unknown thing type {}, skipping", thing.thing_type);
            continue;
        };

        spawned.push(spawn_thing(
            world,
            grid,
            level,
            sector_accel,
            thing_config,
            DVec2::new(thing.x, thing.y),
            thing.angle,
        ));
    }

    spawned
}
