use hecs::Entity;

use crate::components::{CBody, CMissile, CThing};
use crate::events::HitTarget;
use crate::grid::EntityClass;
use crate::helpers::geom::segment_crossing;
use crate::level::Line;

use super::{Physics, TickScratch};

impl Physics<'_> {
    /// Advances a missile or particle by a tick. Nothing is resolved: the
    /// first contact is returned and the caller removes the projectile.
    ///
    /// Missiles hit things before lines. Particles fall under gravity and
    /// never hit things.
    pub fn integrate_projectile(
        &mut self,
        ecs: &mut hecs::World,
        entity: Entity,
        class: EntityClass,
        scratch: &mut TickScratch,
    ) -> Option<HitTarget> {
        let Ok(mut body) = ecs.get::<&CBody>(entity).map(|body| *body) else {
            return None;
        };

        if class == EntityClass::Particle {
            body.vel.y -= self.config.gravity;
        }

        let from = body.xz();
        body.prev = from;
        body.pos += body.vel;
        self.rebucket(class, entity, &mut body);

        let mut hit = None;
        if class == EntityClass::Missile {
            let owner = ecs.get::<&CMissile>(entity).ok().and_then(|missile| missile.owner);
            hit = self.hit_thing(ecs, entity, owner, &body, scratch);
        }
        if hit.is_none() {
            hit = self.cross_lines(&mut body, scratch);
        }
        if hit.is_none() && (body.pos.y < body.floor || body.top() > body.ceiling) {
            hit = Some(HitTarget::Bounds);
        }

        if let Ok(mut stored) = ecs.get::<&mut CBody>(entity) {
            *stored = body;
        }

        hit
    }

    /// Lowest-id thing the projectile overlaps that can stop it.
    fn hit_thing(
        &self,
        ecs: &hecs::World,
        entity: Entity,
        owner: Option<Entity>,
        body: &CBody,
        scratch: &mut TickScratch,
    ) -> Option<HitTarget> {
        scratch.visited.clear();
        scratch.collided.clear();

        scratch.visited.insert(entity);
        if let Some(owner) = owner {
            scratch.visited.insert(owner);
        }
        self.grid.gather_entities(
            EntityClass::Thing,
            body.span,
            &mut scratch.visited,
            &mut scratch.collided,
        );
        scratch.collided.sort_unstable_by_key(|other| other.id());

        scratch
            .collided
            .iter()
            .copied()
            .find(|&other| {
                let solid = ecs
                    .get::<&CThing>(other)
                    .map(|thing| thing.physical() || thing.shootable())
                    .unwrap_or(false);
                solid
                    && ecs
                        .get::<&CBody>(other)
                        .map(|other_body| body.overlaps(&other_body))
                        .unwrap_or(false)
            })
            .map(HitTarget::Thing)
    }

    /// Walks the lines crossed between `prev` and the new position in order.
    /// Open lines carry the projectile into the next sector; the first line
    /// that stops it puts it at the crossing point.
    fn cross_lines(&self, body: &mut CBody, scratch: &mut TickScratch) -> Option<HitTarget> {
        scratch.seen_lines.clear();
        scratch.lines.clear();
        scratch.crossings.clear();

        let from = body.prev;
        let to = body.xz();
        let span = self
            .grid
            .span_of(from, body.radius)
            .union(&self.grid.span_of(to, body.radius));
        self.grid
            .gather_lines(span, &mut scratch.seen_lines, &mut scratch.lines);

        for &id in &scratch.lines {
            let (a, b) = self.level.line_points(id);
            if let Some(t) = segment_crossing(from, to, a, b) {
                scratch.crossings.push((t, id));
            }
        }
        scratch
            .crossings
            .sort_by(|(a_t, a), (b_t, b)| a_t.total_cmp(b_t).then(a.cmp(b)));

        for &(t, id) in &scratch.crossings {
            let line = self.level.line(id);
            if self.stops_projectile(line, body) {
                body.set_xz(from + (to - from) * t);
                return Some(HitTarget::Line(id));
            }

            let next = body
                .sector
                .and_then(|sector| line.other_side(sector))
                .or_else(|| self.accel.query(self.level, to));
            if let Some(next) = next {
                let sector = self.level.sector(next);
                body.sector = Some(next);
                body.floor = sector.floor;
                body.ceiling = sector.ceiling;
            }
        }

        None
    }

    /// Projectiles do not step up: they pass an open line only when their
    /// whole height fits the opening.
    fn stops_projectile(&self, line: &Line, body: &CBody) -> bool {
        if line.physical() {
            return true;
        }
        match self.level.opening(line) {
            None => true,
            Some((floor, ceiling)) => body.pos.y < floor || body.top() > ceiling,
        }
    }
}
