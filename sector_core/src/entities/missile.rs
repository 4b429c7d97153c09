use hecs::Entity;
use sector_game_config::MissileConfig;
use ultraviolet::{DVec2, DVec3};

use crate::{
    components::{CBody, CMissile},
    grid::{EntityClass, Grid},
};

/// Missiles leave from this fraction of the shooter's height.
const EYE_LEVEL: f64 = 0.75;

/// Spawns a missile at the shooter's eye level, flying along `direction` at
/// the configured speed. A zero direction fires along the shooter's facing.
pub fn spawn_missile(
    world: &mut hecs::World,
    grid: &mut Grid,
    config: &MissileConfig,
    owner: Entity,
    shooter: &CBody,
    angle: f64,
    direction: DVec3,
) -> Entity {
    let direction = if direction.mag_sq() > 0. {
        direction.normalized()
    } else {
        let radians = angle.to_radians();
        DVec3::new(radians.cos(), 0., radians.sin())
    };

    let mut pos = shooter.pos;
    pos.y += shooter.height * EYE_LEVEL - config.height * 0.5;

    let mut body = CBody::new(pos, config.radius, config.height);
    body.vel = direction * config.speed;
    body.sector = shooter.sector;
    body.floor = shooter.floor;
    body.ceiling = shooter.ceiling;
    body.span = grid.span_of(DVec2::new(pos.x, pos.z), config.radius);
    let span = body.span;

    let entity = world.spawn((
        CMissile {
            owner: Some(owner),
            damage: config.damage,
        },
        body,
    ));
    grid.insert(EntityClass::Missile, entity, span);
    entity
}
