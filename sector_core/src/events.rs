use hecs::Entity;

use crate::level::{LineId, SectorId};

/// What a missile or particle stopped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Thing(Entity),
    Line(LineId),
    /// Floor or ceiling of the sector it was in.
    Bounds,
}

/// Notifications for the gameplay layer, queued during a tick and handed out
/// by `World::drain_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// A hero entered a sector carrying a trigger.
    SectorEntered {
        entity: Entity,
        sector: SectorId,
        trigger: u32,
    },
    /// A hero touched a line carrying a trigger.
    LineTouched {
        entity: Entity,
        line: LineId,
        trigger: u32,
    },
    ThingDamaged {
        entity: Entity,
        amount: i32,
        health: i32,
    },
    ThingDied {
        entity: Entity,
    },
    ItemPickedUp {
        entity: Entity,
        item: Entity,
        healed: i32,
    },
    MissileHit {
        missile: Entity,
        target: HitTarget,
    },
}
