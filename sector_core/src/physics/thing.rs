use hecs::Entity;
use ultraviolet::DVec2;

use crate::components::{CBody, CThing};
use crate::grid::EntityClass;
use crate::helpers::geom::{closest_point_on_segment, EPSILON};
use crate::level::SectorId;

use super::{manhattan, Physics, TickScratch};

/// Horizontal speeds below this come to rest under friction.
const REST_SPEED: f64 = 1e-4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThingStep {
    pub moved: bool,
    /// The sector the thing ended up in, when it changed this tick.
    pub entered: Option<SectorId>,
}

impl Physics<'_> {
    /// Advances one thing by a tick: friction, horizontal move, collisions
    /// against things then lines, sector lookup, then gravity.
    ///
    /// Lines touched and non-blocking things overlapped are left in
    /// `scratch.touched_lines` and `scratch.touched_things`.
    pub fn integrate_thing(
        &mut self,
        ecs: &mut hecs::World,
        entity: Entity,
        scratch: &mut TickScratch,
    ) -> ThingStep {
        scratch.touched_lines.clear();
        scratch.touched_things.clear();

        let Ok(mut body) = ecs.get::<&CBody>(entity).map(|body| *body) else {
            return ThingStep::default();
        };
        let (physical, hanging) = ecs
            .get::<&CThing>(entity)
            .map(|thing| (thing.physical(), thing.hanging()))
            .unwrap_or((false, false));

        let airborne = !hanging && body.pos.y > body.floor;
        if !body.is_moving() && !airborne {
            return ThingStep::default();
        }

        if body.grounded {
            body.vel.x *= self.config.friction;
            body.vel.z *= self.config.friction;
            if body.vel.x.abs() < REST_SPEED {
                body.vel.x = 0.;
            }
            if body.vel.z.abs() < REST_SPEED {
                body.vel.z = 0.;
            }
        }

        let start = body.pos;
        body.prev = body.xz();
        body.pos.x += body.vel.x;
        body.pos.z += body.vel.z;
        self.rebucket(EntityClass::Thing, entity, &mut body);

        self.resolve_things(ecs, entity, &mut body, physical, scratch);
        self.resolve_lines(&mut body, scratch);
        let entered = self.update_sector(&mut body, scratch);
        self.integrate_vertical(&mut body, hanging);
        self.rebucket(EntityClass::Thing, entity, &mut body);

        if let Ok(mut stored) = ecs.get::<&mut CBody>(entity) {
            *stored = body;
        }

        ThingStep {
            moved: body.pos != start,
            entered,
        }
    }

    /// Pushes the body out of every physical thing it overlaps, nearest to
    /// its previous position first. Overlaps that do not block are recorded.
    fn resolve_things(
        &self,
        ecs: &hecs::World,
        entity: Entity,
        body: &mut CBody,
        physical: bool,
        scratch: &mut TickScratch,
    ) {
        scratch.visited.clear();
        scratch.collided.clear();
        scratch.candidates.clear();

        scratch.visited.insert(entity);
        self.grid.gather_entities(
            EntityClass::Thing,
            body.span,
            &mut scratch.visited,
            &mut scratch.collided,
        );

        for &other in &scratch.collided {
            let Ok(other_body) = ecs.get::<&CBody>(other) else {
                continue;
            };
            let other_physical = ecs
                .get::<&CThing>(other)
                .map(|thing| thing.physical())
                .unwrap_or(false);
            scratch.candidates.push((other, *other_body, other_physical));
        }

        let prev = body.prev;
        scratch.candidates.sort_by(|(a, a_body, _), (b, b_body, _)| {
            manhattan(a_body.xz(), prev)
                .total_cmp(&manhattan(b_body.xz(), prev))
                .then(a.id().cmp(&b.id()))
        });

        for &(other, other_body, other_physical) in &scratch.candidates {
            if !body.overlaps(&other_body) {
                continue;
            }
            if physical && other_physical {
                push_apart(body, &other_body);
            } else {
                scratch.touched_things.push(other);
            }
        }
    }

    /// Circle against segment for every line near the body.
    fn resolve_lines(&self, body: &mut CBody, scratch: &mut TickScratch) {
        scratch.seen_lines.clear();
        scratch.lines.clear();

        let span = self.grid.span_of(body.xz(), body.radius);
        self.grid
            .gather_lines(span, &mut scratch.seen_lines, &mut scratch.lines);
        scratch.lines.sort_unstable();

        for &id in &scratch.lines {
            let line = self.level.line(id);
            let (a, b) = self.level.line_points(id);

            let p = body.xz();
            let (closest, t) = closest_point_on_segment(p, a, b);
            let away = p - closest;
            let dist = away.mag();
            if dist >= body.radius {
                continue;
            }

            scratch.touched_lines.push(id);
            if !self.blocks(line, body) {
                continue;
            }

            let push = if (t > 0. && t < 1.) || dist < EPSILON {
                // Side of approach decides which way the normal points.
                let mut side = (body.prev - a).dot(line.normal);
                if side == 0. {
                    side = (p - a).dot(line.normal);
                }
                line.normal * if side < 0. { -1. } else { 1. }
            } else {
                away / dist
            };

            body.set_xz(closest + push * body.radius);

            let vel = DVec2::new(body.vel.x, body.vel.z);
            let into = vel.dot(push);
            if into < 0. {
                let vel = vel - push * into;
                body.vel.x = vel.x;
                body.vel.z = vel.y;
            }
        }
    }

    /// Touched lines narrow the search to the sectors on their sides. With no
    /// touch this tick, a touch on the previous tick or a position outside the
    /// cached sector falls back to the full lookup.
    fn update_sector(&self, body: &mut CBody, scratch: &TickScratch) -> Option<SectorId> {
        let p = body.xz();

        let resolved = if !scratch.touched_lines.is_empty() {
            scratch
                .touched_lines
                .iter()
                .flat_map(|&id| {
                    let line = self.level.line(id);
                    [line.plus, line.minus]
                })
                .flatten()
                .find(|&sector| self.level.sector_has_point(sector, p))
                .or(body.sector)
        } else if body.touched_lines
            || !body
                .sector
                .is_some_and(|sector| self.level.sector_has_point(sector, p))
        {
            self.accel.query(self.level, p).or(body.sector)
        } else {
            body.sector
        };

        body.touched_lines = !scratch.touched_lines.is_empty();

        let entered = (resolved != body.sector).then_some(resolved).flatten();
        body.sector = resolved;
        if let Some(sector) = resolved {
            let sector = self.level.sector(sector);
            body.floor = sector.floor;
            body.ceiling = sector.ceiling;
        }

        entered
    }

    fn integrate_vertical(&self, body: &mut CBody, hanging: bool) {
        if hanging {
            body.vel.y = 0.;
            return;
        }

        if body.pos.y > body.floor || body.vel.y > 0. {
            body.vel.y -= self.config.gravity;
        }
        body.pos.y += body.vel.y;

        if body.pos.y <= body.floor {
            body.pos.y = body.floor;
            body.vel.y = body.vel.y.max(0.);
            body.grounded = true;
        } else {
            body.grounded = false;
        }

        if body.top() > body.ceiling {
            body.pos.y = (body.ceiling - body.height).max(body.floor);
            body.vel.y = body.vel.y.min(0.);
        }
    }
}

/// Moves `body` out of `other` along the axis on which it was further away
/// before the move, and stops it on that axis.
fn push_apart(body: &mut CBody, other: &CBody) {
    let reach = body.radius + other.radius;
    let dx = body.prev.x - other.pos.x;
    let dz = body.prev.y - other.pos.z;

    if dx.abs() >= dz.abs() {
        body.pos.x = other.pos.x + reach.copysign(dx);
        body.vel.x = 0.;
    } else {
        body.pos.z = other.pos.z + reach.copysign(dz);
        body.vel.z = 0.;
    }
}
