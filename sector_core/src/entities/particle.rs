use hecs::Entity;
use rand::{rngs::StdRng, Rng};
use ultraviolet::{DVec2, DVec3};

use crate::{
    components::{CBody, CParticle},
    grid::{EntityClass, Grid},
};

const PARTICLE_SIZE: f64 = 0.05;
const SPREAD: f64 = 0.15;

/// Bursts `count` particles out of the middle of `origin`. Spawn velocities
/// come from `rng`, so a seeded generator gives the same burst every run.
pub fn spawn_particles(
    world: &mut hecs::World,
    grid: &mut Grid,
    rng: &mut StdRng,
    origin: &CBody,
    count: u32,
    ttl: u32,
    spawned: &mut Vec<Entity>,
) {
    let mut pos = origin.pos;
    pos.y += origin.height * 0.5;
    let xz = DVec2::new(pos.x, pos.z);

    for _ in 0..count {
        let mut body = CBody::new(pos, PARTICLE_SIZE, PARTICLE_SIZE);
        body.vel = DVec3::new(
            rng.random_range(-SPREAD..SPREAD),
            rng.random_range(0.05..0.25),
            rng.random_range(-SPREAD..SPREAD),
        );
        body.sector = origin.sector;
        body.floor = origin.floor;
        body.ceiling = origin.ceiling;
        body.span = grid.span_of(xz, PARTICLE_SIZE);
        let span = body.span;

        let entity = world.spawn((CParticle { ttl }, body));
        grid.insert(EntityClass::Particle, entity, span);
        spawned.push(entity);
    }
}
