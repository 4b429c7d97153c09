use std::collections::HashSet;

use anyhow::{anyhow, bail, Result};
use hecs::Entity;
use rand::{rngs::StdRng, SeedableRng};
use sector_game_config::{GameConfig, ThingKind};
use sector_map_format::Map;
use ultraviolet::{DVec2, DVec3};

use crate::{
    components::{CBody, CMissile, CParticle, CThing},
    compile::CompileReport,
    cvars::{default_cvars, CVarsMap, PhysicsConfig},
    entities::{init_thing_entities, spawn_missile, spawn_particles},
    events::{HitTarget, WorldEvent},
    grid::{EntityClass, Grid},
    helpers::{geom::segment_crossing, ChangedSet},
    level::{Level, LineFlags, LineId, SectorFlags, SectorId, Surface},
    physics::{Physics, ThingStep, TickScratch},
    SectorAccel, Stopwatch,
};

pub struct World {
    pub game_config: GameConfig,

    pub level: Level,
    pub report: CompileReport,

    /// Actual game state is maintained in the ECS "world".
    pub world: hecs::World,
    /// First hero found in the map, if any.
    pub hero: Option<Entity>,

    pub grid: Grid,
    pub sector_accel: SectorAccel,
    pub cvars: CVarsMap,
    pub physics: PhysicsConfig,

    /// Entities spawned, moved or removed during the last update.
    pub changes: ChangedSet<Entity>,
    pub tick: u64,

    events: Vec<WorldEvent>,
    scratch: TickScratch,
    rng: StdRng,
    fired_lines: HashSet<LineId>,
    fired_sectors: HashSet<SectorId>,
}

impl World {
    pub fn new(map: &Map, game_config: GameConfig) -> Result<Self> {
        map.validate()?;

        // Time how long it takes to compile and spawn.
        let mut stopwatch = Stopwatch::new();

        let mut level = Level::from_map(map);
        let report = level.compile();

        let mut grid = Grid::from_level(&level);
        // Build acceleration structure for sectors.
        let sector_accel = SectorAccel::new(&level);

        let cvars = default_cvars();
        let physics = PhysicsConfig::from_cvars(&cvars)?;

        // Add things to the world.
        // Requires we've already initialized sector accel.
        let mut world = hecs::World::new();
        let things =
            init_thing_entities(&mut world, &mut grid, &level, &sector_accel, &game_config, map);

        let hero = things.iter().copied().find(|&entity| {
            world
                .get::<&CThing>(entity)
                .is_ok_and(|thing| thing.kind == ThingKind::Hero)
        });
        if hero.is_none() {
            log::warn!("Map {:?} has no hero start", map.name);
        }

        let mut changes = ChangedSet::default();
        for &entity in &things {
            changes.spawn(entity);
        }

        let setup_time = stopwatch.lap();

        log::info!("Added {} entities to the world.", world.len());
        log::info!("Setup time: {:?}", setup_time);

        Ok(Self {
            game_config,

            level,
            report,

            world,
            hero,

            grid,
            sector_accel,
            rng: StdRng::seed_from_u64(physics.particle_seed.into()),
            cvars,
            physics,

            changes,
            tick: 0,

            events: Vec::new(),
            scratch: TickScratch::default(),
            fired_lines: HashSet::new(),
            fired_sectors: HashSet::new(),
        })
    }

    /// Runs one tick: things, then missiles, then particles, each in entity
    /// id order.
    pub fn update(&mut self) {
        self.changes.clear();
        self.tick += 1;

        self.update_things();
        self.update_missiles();
        self.update_particles();
    }

    fn update_things(&mut self) {
        let mut order = std::mem::take(&mut self.scratch.order);
        order.clear();
        order.extend(self.world.query_mut::<&CThing>().into_iter().map(|(entity, _)| entity));
        order.sort_unstable_by_key(|entity| entity.id());

        for &entity in &order {
            if !self.world.contains(entity) {
                continue;
            }

            let step = {
                let (mut physics, world, scratch) = self.split();
                physics.integrate_thing(world, entity, scratch)
            };
            if step.moved {
                self.changes.change(entity);
            }

            let Ok(kind) = self.world.get::<&CThing>(entity).map(|thing| thing.kind) else {
                continue;
            };
            match kind {
                ThingKind::Hero => self.hero_contacts(entity, step),
                ThingKind::Monster | ThingKind::Medkit | ThingKind::Tree | ThingKind::Doodad => {}
            }
        }

        self.scratch.order = order;
    }

    /// Pickups, line triggers and sector triggers for a hero that just moved.
    fn hero_contacts(&mut self, hero: Entity, step: ThingStep) {
        for i in 0..self.scratch.touched_things.len() {
            let item = self.scratch.touched_things[i];
            self.pick_up(hero, item);
        }

        for i in 0..self.scratch.touched_lines.len() {
            let id = self.scratch.touched_lines[i];
            let line = self.level.line(id);
            let Some(trigger) = line.trigger else {
                continue;
            };
            if line.flags.contains(LineFlags::TriggerOnce) && !self.fired_lines.insert(id) {
                continue;
            }
            self.notify(WorldEvent::LineTouched {
                entity: hero,
                line: id,
                trigger,
            });
        }

        if let Some(id) = step.entered {
            let sector = self.level.sector(id);
            let Some(trigger) = sector.trigger else {
                return;
            };
            if sector.flags.contains(SectorFlags::TriggerOnce) && !self.fired_sectors.insert(id) {
                return;
            }
            self.notify(WorldEvent::SectorEntered {
                entity: hero,
                sector: id,
                trigger,
            });
        }
    }

    fn pick_up(&mut self, hero: Entity, item: Entity) {
        let Ok(heal) = self
            .world
            .get::<&CThing>(item)
            .map(|thing| thing.pickup().then_some(thing.heal))
        else {
            return;
        };
        let Some(heal) = heal else {
            return;
        };

        let healed = {
            let Ok(mut thing) = self.world.get::<&mut CThing>(hero) else {
                return;
            };
            if !thing.alive() {
                return;
            }
            let before = thing.health;
            thing.health = (thing.health + heal).min(thing.max_health);
            thing.health - before
        };

        self.remove_entity(item, EntityClass::Thing);
        self.notify(WorldEvent::ItemPickedUp {
            entity: hero,
            item,
            healed,
        });
    }

    fn update_missiles(&mut self) {
        let mut order = std::mem::take(&mut self.scratch.order);
        order.clear();
        order.extend(self.world.query_mut::<&CMissile>().into_iter().map(|(entity, _)| entity));
        order.sort_unstable_by_key(|entity| entity.id());

        for &entity in &order {
            let hit = {
                let (mut physics, world, scratch) = self.split();
                physics.integrate_projectile(world, entity, EntityClass::Missile, scratch)
            };
            match hit {
                Some(target) => self.missile_hit(entity, target),
                None => self.changes.change(entity),
            }
        }

        self.scratch.order = order;
    }

    fn missile_hit(&mut self, missile: Entity, target: HitTarget) {
        let Ok(mut impact) = self.world.get::<&CBody>(missile).map(|body| *body) else {
            return;
        };
        let damage = self
            .world
            .get::<&CMissile>(missile)
            .map(|missile| missile.damage)
            .unwrap_or(0);

        self.remove_entity(missile, EntityClass::Missile);
        self.notify(WorldEvent::MissileHit { missile, target });

        if let HitTarget::Thing(thing) = target {
            self.damage(thing, damage);
        }

        // Keep the burst inside the sector when the missile left it.
        impact.pos.y = impact.pos.y.max(impact.floor).min(impact.ceiling - impact.height);
        self.burst(&impact);
    }

    fn update_particles(&mut self) {
        let mut order = std::mem::take(&mut self.scratch.order);
        order.clear();
        order.extend(self.world.query_mut::<&mut CParticle>().into_iter().map(|(entity, particle)| {
            particle.ttl = particle.ttl.saturating_sub(1);
            entity
        }));
        order.sort_unstable_by_key(|entity| entity.id());

        for &entity in &order {
            let expired = self
                .world
                .get::<&CParticle>(entity)
                .map(|particle| particle.ttl == 0)
                .unwrap_or(true);
            if expired {
                self.remove_entity(entity, EntityClass::Particle);
                continue;
            }

            let hit = {
                let (mut physics, world, scratch) = self.split();
                physics.integrate_projectile(world, entity, EntityClass::Particle, scratch)
            };
            match hit {
                Some(_) => self.remove_entity(entity, EntityClass::Particle),
                None => self.changes.change(entity),
            }
        }

        self.scratch.order = order;
    }

    /// Applies damage to a shootable, living thing. Monsters are removed when
    /// they die; a dead hero stays in the world.
    pub fn damage(&mut self, entity: Entity, amount: i32) {
        let (kind, health) = {
            let Ok(mut thing) = self.world.get::<&mut CThing>(entity) else {
                return;
            };
            if !thing.shootable() || !thing.alive() {
                return;
            }
            thing.health = (thing.health - amount).max(0);
            (thing.kind, thing.health)
        };

        self.notify(WorldEvent::ThingDamaged {
            entity,
            amount,
            health,
        });
        if health > 0 {
            return;
        }

        self.notify(WorldEvent::ThingDied { entity });
        match kind {
            ThingKind::Hero => {}
            ThingKind::Monster | ThingKind::Medkit | ThingKind::Tree | ThingKind::Doodad => {
                if let Ok(body) = self.world.get::<&CBody>(entity).map(|body| *body) {
                    self.burst(&body);
                }
                self.remove_entity(entity, EntityClass::Thing);
            }
        }
    }

    /// Fires the configured missile from `owner`'s eye level. A zero
    /// direction fires along the owner's facing.
    pub fn fire_missile(&mut self, owner: Entity, direction: DVec3) -> Result<Entity> {
        let shooter = *self.world.get::<&CBody>(owner)?;
        let angle = self.world.get::<&CThing>(owner).map(|thing| thing.angle).unwrap_or(0.);

        let missile = spawn_missile(
            &mut self.world,
            &mut self.grid,
            &self.game_config.missile,
            owner,
            &shooter,
            angle,
            direction,
        );
        self.changes.spawn(missile);
        Ok(missile)
    }

    fn burst(&mut self, origin: &CBody) {
        let mut spawned = Vec::new();
        spawn_particles(
            &mut self.world,
            &mut self.grid,
            &mut self.rng,
            origin,
            self.physics.particles_per_hit,
            self.physics.particle_ttl,
            &mut spawned,
        );
        for entity in spawned {
            self.changes.spawn(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity, class: EntityClass) {
        if let Ok(span) = self.world.get::<&CBody>(entity).map(|body| body.span) {
            self.grid.remove(class, entity, span);
        }
        if self.world.despawn(entity).is_ok() {
            self.changes.remove(entity);
        }
    }

    fn split(&mut self) -> (Physics<'_>, &mut hecs::World, &mut TickScratch) {
        (
            Physics {
                level: &self.level,
                grid: &mut self.grid,
                accel: &self.sector_accel,
                config: &self.physics,
            },
            &mut self.world,
            &mut self.scratch,
        )
    }

    /// Sector under a world position, holes excluded.
    pub fn find_sector(&self, x: f64, z: f64) -> Option<SectorId> {
        self.sector_accel.query(&self.level, DVec2::new(x, z))
    }

    /// Whether nothing blocks the segment between two world points: no solid
    /// line is crossed, and every open line is crossed within its passage.
    pub fn line_of_sight(&self, from: DVec3, to: DVec3) -> bool {
        let a = DVec2::new(from.x, from.z);
        let b = DVec2::new(to.x, to.z);

        let mut seen = HashSet::new();
        for (c, r) in self.grid.segment_cells(a, b) {
            for &id in &self.grid.cell(c, r).lines {
                if !seen.insert(id) {
                    continue;
                }
                let (p, q) = self.level.line_points(id);
                let Some(t) = segment_crossing(a, b, p, q) else {
                    continue;
                };

                let line = self.level.line(id);
                if line.physical() {
                    return false;
                }
                let y = from.y + (to.y - from.y) * t;
                match self.level.opening(line) {
                    Some((floor, ceiling)) if y >= floor && y <= ceiling => {}
                    _ => return false,
                }
            }
        }

        true
    }

    /// Changes a sector's floor or ceiling texture. Existing triangles are
    /// re-stamped; a side that had no texture is triangulated now. If that
    /// fails the side keeps the texture with no triangles and the failure
    /// goes to the compile report.
    pub fn set_sector_texture(&mut self, id: SectorId, surface: Surface, name: &str) -> Result<()> {
        if id.0 >= self.level.sectors.len() {
            bail!("No sector {}", id.0);
        }

        let texture = self.level.textures.intern(name);
        let previous = self.level.sector(id).texture(surface);
        let had_texture = previous.is_some();
        log::debug!(
            "Sector {} {:?} texture {} -> {}",
            id.0,
            surface,
            previous
                .and_then(|previous| self.level.textures.name(previous))
                .unwrap_or("-"),
            name
        );

        let sector = &mut self.level.sectors[id.0];
        match surface {
            Surface::Floor => sector.floor_texture = Some(texture),
            Surface::Ceiling => sector.ceiling_texture = Some(texture),
        }

        if had_texture {
            let sign = surface.normal_sign();
            for tri in sector.triangles.edit().iter_mut() {
                if tri.normal_sign == sign {
                    tri.texture = texture;
                }
            }
        } else {
            let triangles = self.level.triangulate_surface(id, surface, &mut self.report);
            self.level.sectors[id.0].triangles.edit().extend(triangles);
        }

        Ok(())
    }

    /// Sets a cvar from a string and refreshes the physics snapshot.
    pub fn set_cvar(&mut self, name: &str, value: &str) -> Result<()> {
        let cvar = self
            .cvars
            .get_mut(name)
            .ok_or_else(|| anyhow!("Unknown cvar {name}"))?;
        cvar.value.set_from_str(value)?;

        self.physics = PhysicsConfig::from_cvars(&self.cvars)?;
        if name == "g_particle_seed" {
            self.rng = StdRng::seed_from_u64(self.physics.particle_seed.into());
        }
        Ok(())
    }

    pub fn notify(&mut self, event: WorldEvent) {
        if self.physics.log_events {
            log::debug!("Tick {}: {:?}", self.tick, event);
        }
        self.events.push(event);
    }

    /// Hands queued events to the caller, oldest first.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn with_hero_body<RT, F: FnOnce(&mut CBody) -> RT>(&mut self, callback: F) -> Result<RT> {
        let hero = self.hero.ok_or(anyhow!("No hero in the world"))?;
        let body = self.world.query_one_mut::<&mut CBody>(hero)?;
        Ok(callback(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use sector_map_format::{Line, Sector, Thing, Vector};

    fn thing(thing_type: u32, x: f64, y: f64) -> Thing {
        Thing {
            x,
            y,
            angle: 0.,
            thing_type,
        }
    }

    fn arena(things: Vec<Thing>) -> World {
        let mut map = Map::default();
        map.push_box((0., 0.), (32., 32.), 0., 8.);
        map.things = things;
        World::new(&map, GameConfig::default_config().unwrap()).unwrap()
    }

    fn health(world: &World, entity: Entity) -> i32 {
        world.world.get::<&CThing>(entity).unwrap().health
    }

    fn particles(world: &mut World) -> usize {
        world.world.query_mut::<&CParticle>().into_iter().count()
    }

    #[test]
    fn builds_and_finds_sectors() {
        let mut world = arena(vec![thing(1, 10., 10.), thing(4, 20., 20.), thing(999, 5., 5.)]);

        assert!(world.report.is_clean());
        assert_eq!(world.world.len(), 2);
        assert!(world.hero.is_some());
        assert_eq!(world.changes.spawned().len(), 2);
        assert_eq!(world.find_sector(16., 16.), Some(SectorId(0)));
        assert_eq!(world.find_sector(40., 16.), None);

        world.update();
        assert!(world.changes.spawned().is_empty());
        assert_eq!(world.tick, 1);
    }

    #[test]
    fn rejects_invalid_map() {
        let mut map = Map::default();
        map.push_box((0., 0.), (10., 10.), 0., 8.);
        map.lines[0].b = 42;
        assert!(World::new(&map, GameConfig::default_config().unwrap()).is_err());
    }

    #[test]
    fn hero_picks_up_medkit() {
        let mut world = arena(vec![thing(1, 10., 10.), thing(3, 11., 10.)]);
        let hero = world.hero.unwrap();
        world.world.get::<&mut CThing>(hero).unwrap().health = 90;

        world.with_hero_body(|body| body.vel.x = 0.5).unwrap();
        world.update();

        let events = world.drain_events();
        let [WorldEvent::ItemPickedUp { entity, item, healed }] = events.as_slice() else {
            panic!("unexpected events {events:?}");
        };
        let item = *item;
        assert_eq!(*entity, hero);
        assert_eq!(*healed, 10);
        assert_eq!(health(&world, hero), 100);
        assert!(!world.world.contains(item));
        assert!(world.changes.removed().contains(&item));
        assert!(world.changes.changed().contains(&hero));
        assert_eq!(world.grid.registrations(EntityClass::Thing, item), 0);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn missiles_kill_monster() {
        let mut world = arena(vec![thing(1, 10., 10.), thing(2, 14., 10.)]);
        let hero = world.hero.unwrap();
        let (monster, _) = world
            .world
            .query_mut::<&CThing>()
            .into_iter()
            .find(|(_, thing)| thing.kind == ThingKind::Monster)
            .unwrap();

        let missile = world.fire_missile(hero, DVec3::new(1., 0., 0.)).unwrap();
        assert!(world.changes.spawned().contains(&missile));
        for _ in 0..20 {
            world.update();
        }
        assert_eq!(health(&world, monster), 40);
        assert!(!world.world.contains(missile));

        let events = world.drain_events();
        assert_eq!(
            events[..2],
            [
                WorldEvent::MissileHit {
                    missile,
                    target: HitTarget::Thing(monster),
                },
                WorldEvent::ThingDamaged {
                    entity: monster,
                    amount: 20,
                    health: 40,
                },
            ]
        );

        for _ in 0..2 {
            world.fire_missile(hero, DVec3::new(1., 0., 0.)).unwrap();
            for _ in 0..20 {
                world.update();
            }
        }

        assert!(!world.world.contains(monster));
        assert!(world
            .drain_events()
            .contains(&WorldEvent::ThingDied { entity: monster }));
        assert_eq!(world.grid.registrations(EntityClass::Thing, monster), 0);
    }

    #[test]
    fn dead_hero_stays() {
        let mut world = arena(vec![thing(1, 10., 10.)]);
        let hero = world.hero.unwrap();

        world.damage(hero, 150);
        assert_eq!(
            world.drain_events(),
            vec![
                WorldEvent::ThingDamaged {
                    entity: hero,
                    amount: 150,
                    health: 0,
                },
                WorldEvent::ThingDied { entity: hero },
            ]
        );
        assert!(world.world.contains(hero));

        // Already dead.
        world.damage(hero, 10);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn trees_are_not_shootable() {
        let mut world = arena(vec![thing(4, 10., 10.)]);
        let tree = world.world.iter().next().unwrap().entity();
        world.damage(tree, 10);
        assert!(world.drain_events().is_empty());
        assert!(world.world.contains(tree));
    }

    #[test]
    fn particles_expire() {
        let mut world = arena(vec![thing(2, 16., 16.)]);
        world.set_cvar("g_particle_ttl", "2").unwrap();
        let monster = world.world.iter().next().unwrap().entity();

        world.damage(monster, 100);
        assert_eq!(particles(&mut world), 6);

        world.update();
        assert_eq!(particles(&mut world), 6);
        world.update();
        assert_eq!(particles(&mut world), 0);
        assert_eq!(world.changes.removed().len(), 6);
    }

    #[test]
    fn particle_bursts_are_reproducible() {
        let run = || {
            let mut world = arena(vec![thing(2, 16., 16.)]);
            let monster = world.world.iter().next().unwrap().entity();
            world.damage(monster, 100);

            let mut velocities: Vec<(u32, DVec3)> = world
                .world
                .query_mut::<(&CParticle, &CBody)>()
                .into_iter()
                .map(|(entity, (_, body))| (entity.id(), body.vel))
                .collect();
            velocities.sort_by_key(|(id, _)| *id);
            velocities
        };

        assert_eq!(run(), run());
    }

    /// Two rooms joined by an open line at x = 10. The right room carries a
    /// trigger.
    fn trigger_rooms(sector_flags: u32, line_flags: u32) -> Map {
        let mut map = Map {
            vectors: vec![
                Vector::new(0., 0.),
                Vector::new(10., 0.),
                Vector::new(10., 10.),
                Vector::new(0., 10.),
                Vector::new(20., 0.),
                Vector::new(20., 10.),
            ],
            lines: vec![
                Line::new(0, 1).with_middle("WALL"),
                Line::new(1, 2),
                Line::new(2, 3).with_middle("WALL"),
                Line::new(3, 0).with_middle("WALL"),
                Line::new(1, 4).with_middle("WALL"),
                Line::new(4, 5).with_middle("WALL"),
                Line::new(5, 2).with_middle("WALL"),
            ],
            sectors: vec![
                Sector::new(0., 8., vec![0, 1, 2, 3], vec![0, 1, 2, 3])
                    .with_textures("FLOOR", "CEIL"),
                Sector::new(0., 8., vec![1, 4, 5, 2], vec![4, 5, 6, 1])
                    .with_textures("FLOOR", "CEIL"),
            ],
            things: vec![thing(1, 9., 5.)],
            ..Default::default()
        };
        map.sectors[1].trigger = Some(7);
        map.sectors[1].flags = sector_flags;
        map.lines[5].trigger = Some(3);
        map.lines[5].flags = line_flags;
        map
    }

    fn walk(world: &mut World, vx: f64, ticks: usize) {
        for _ in 0..ticks {
            world.with_hero_body(|body| body.vel.x = vx).unwrap();
            world.update();
        }
    }

    fn sector_entries(world: &mut World) -> usize {
        world
            .drain_events()
            .iter()
            .filter(|event| matches!(event, WorldEvent::SectorEntered { trigger: 7, .. }))
            .count()
    }

    #[test]
    fn sector_trigger_fires_on_entry() {
        let mut world =
            World::new(&trigger_rooms(0, 0), GameConfig::default_config().unwrap()).unwrap();
        walk(&mut world, 0.4, 5);
        walk(&mut world, -0.4, 5);
        walk(&mut world, 0.4, 5);
        assert_eq!(sector_entries(&mut world), 2);

        let mut world = World::new(
            &trigger_rooms(SectorFlags::TriggerOnce.bits(), 0),
            GameConfig::default_config().unwrap(),
        )
        .unwrap();
        walk(&mut world, 0.4, 5);
        walk(&mut world, -0.4, 5);
        walk(&mut world, 0.4, 5);
        assert_eq!(sector_entries(&mut world), 1);
    }

    #[test]
    fn line_trigger_once() {
        let touches = |line_flags| {
            let mut world =
                World::new(&trigger_rooms(0, line_flags), GameConfig::default_config().unwrap())
                    .unwrap();
            world.with_hero_body(|body| body.pos.x = 19.4).unwrap();
            for _ in 0..3 {
                walk(&mut world, 0.3, 1);
            }
            world
                .drain_events()
                .iter()
                .filter(|event| matches!(event, WorldEvent::LineTouched { trigger: 3, .. }))
                .count()
        };

        assert_eq!(touches(0), 3);
        assert_eq!(touches(LineFlags::TriggerOnce.bits()), 1);
    }

    #[test]
    fn sight_through_openings() {
        let mut map = trigger_rooms(0, 0);
        map.sectors[1].floor = 2.;
        let world = World::new(&map, GameConfig::default_config().unwrap()).unwrap();

        assert!(world.line_of_sight(DVec3::new(5., 1., 5.), DVec3::new(15., 3., 5.)));
        assert!(!world.line_of_sight(DVec3::new(5., 0.5, 5.), DVec3::new(15., 0.5, 5.)));
        // Out through a solid wall.
        assert!(!world.line_of_sight(DVec3::new(5., 1., 5.), DVec3::new(5., 1., 15.)));
        assert!(world.line_of_sight(DVec3::new(2., 1., 2.), DVec3::new(8., 1., 8.)));
    }

    #[test]
    fn retexturing_sectors() {
        let mut map = Map::default();
        map.push_box((0., 0.), (10., 10.), 0., 5.);
        map.sectors[0].ceiling_texture = None;
        let mut world = World::new(&map, GameConfig::default_config().unwrap()).unwrap();
        let id = SectorId(0);
        world.level.sectors[0].triangles.clear_changed();

        world.set_sector_texture(id, Surface::Floor, "LAVA").unwrap();
        let lava = world.level.textures.get("LAVA").unwrap();
        let sector = world.level.sector(id);
        assert!(sector.triangles.changed());
        assert_eq!(sector.surface_triangles(Surface::Floor).count(), 2);
        assert!(sector.surface_triangles(Surface::Floor).all(|tri| tri.texture == lava));

        world.set_sector_texture(id, Surface::Ceiling, "SKY").unwrap();
        let sector = world.level.sector(id);
        assert_eq!(sector.triangles.len(), 4);
        assert_approx_eq!(
            sector.surface_triangles(Surface::Ceiling).map(|tri| tri.area()).sum::<f64>(),
            100.
        );

        assert!(world.set_sector_texture(SectorId(5), Surface::Floor, "LAVA").is_err());
    }

    #[test]
    fn retexturing_broken_sector_is_reported() {
        let mut map = Map::default();
        map.push_box((0., 0.), (10., 10.), 0., 5.);
        let base = map.push_box((20., 0.), (30., 10.), 0., 5.);
        map.sectors[base].vecs.swap(1, 2);
        map.sectors[base].ceiling_texture = None;
        let mut world = World::new(&map, GameConfig::default_config().unwrap()).unwrap();
        let id = SectorId(base);
        assert_eq!(world.report.failed_triangulations.len(), 1);

        world.set_sector_texture(id, Surface::Ceiling, "SKY").unwrap();
        let sky = world.level.textures.get("SKY");
        let sector = world.level.sector(id);
        assert_eq!(sector.ceiling_texture, sky);
        assert!(sector.triangles.is_empty());

        let failures = &world.report.failed_triangulations;
        assert_eq!(failures.len(), 2);
        assert_eq!((failures[1].sector, failures[1].surface), (id, Surface::Ceiling));
    }

    #[test]
    fn cvars_update_physics() {
        let mut world = arena(vec![]);
        world.set_cvar("g_gravity", "0.05").unwrap();
        assert_eq!(world.physics.gravity, 0.05);

        assert!(world.set_cvar("g_gravity", "heavy").is_err());
        assert!(world.set_cvar("g_nothing", "1").is_err());
        assert!(world.with_hero_body(|_| ()).is_err());
    }
}
