//! Small world used by the integrator tests.

use hecs::Entity;
use sector_game_config::{GameConfig, ThingConfig, ThingKind};
use sector_map_format::Map;
use ultraviolet::{DVec2, DVec3};

use crate::components::CBody;
use crate::cvars::PhysicsConfig;
use crate::entities::{spawn_missile, spawn_thing};
use crate::events::HitTarget;
use crate::grid::{EntityClass, Grid};
use crate::level::Level;
use crate::sector_accel::SectorAccel;

use super::{Physics, ThingStep, TickScratch};

pub struct Scene {
    pub level: Level,
    pub grid: Grid,
    pub accel: SectorAccel,
    pub config: PhysicsConfig,
    pub game: GameConfig,
    pub ecs: hecs::World,
    pub scratch: TickScratch,
}

impl Scene {
    /// Friction is off so moves are exact.
    pub fn new(map: &Map) -> Self {
        let mut level = Level::from_map(map);
        level.compile();
        Self {
            grid: Grid::from_level(&level),
            accel: SectorAccel::new(&level),
            level,
            config: PhysicsConfig {
                friction: 1.,
                ..Default::default()
            },
            game: GameConfig::default_config().unwrap(),
            ecs: hecs::World::new(),
            scratch: TickScratch::default(),
        }
    }

    pub fn thing_config(&self, kind: ThingKind) -> ThingConfig {
        let mut config = self.game.thing_of_kind(kind).unwrap().clone();
        if kind == ThingKind::Hero {
            config.radius = 0.5;
        }
        config
    }

    pub fn spawn(&mut self, kind: ThingKind, x: f64, z: f64) -> Entity {
        let config = self.thing_config(kind);
        spawn_thing(
            &mut self.ecs,
            &mut self.grid,
            &self.level,
            &self.accel,
            &config,
            DVec2::new(x, z),
            0.,
        )
    }

    pub fn fire(&mut self, owner: Entity, direction: DVec3) -> Entity {
        let shooter = self.body(owner);
        spawn_missile(
            &mut self.ecs,
            &mut self.grid,
            &self.game.missile,
            owner,
            &shooter,
            0.,
            direction,
        )
    }

    pub fn push(&mut self, entity: Entity, vx: f64, vz: f64) {
        let mut body = self.ecs.get::<&mut CBody>(entity).unwrap();
        body.vel.x = vx;
        body.vel.z = vz;
    }

    fn physics(&mut self) -> (Physics<'_>, &mut hecs::World, &mut TickScratch) {
        (
            Physics {
                level: &self.level,
                grid: &mut self.grid,
                accel: &self.accel,
                config: &self.config,
            },
            &mut self.ecs,
            &mut self.scratch,
        )
    }

    pub fn step(&mut self, entity: Entity) -> ThingStep {
        let (mut physics, ecs, scratch) = self.physics();
        physics.integrate_thing(ecs, entity, scratch)
    }

    pub fn step_projectile(&mut self, entity: Entity, class: EntityClass) -> Option<HitTarget> {
        let (mut physics, ecs, scratch) = self.physics();
        physics.integrate_projectile(ecs, entity, class, scratch)
    }

    pub fn body(&self, entity: Entity) -> CBody {
        *self.ecs.get::<&CBody>(entity).unwrap()
    }
}
