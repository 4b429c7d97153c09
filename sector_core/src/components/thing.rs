use sector_game_config::{ThingConfig, ThingFlags, ThingKind};

#[derive(Debug, Clone)]
pub struct CThing {
    pub kind: ThingKind,
    pub thing_type: u32,
    pub flags: ThingFlags,

    /// Facing, in degrees.
    pub angle: f64,

    pub health: i32,
    pub max_health: i32,
    /// Health a pickup restores.
    pub heal: i32,
}

impl CThing {
    pub fn from_config(config: &ThingConfig, angle: f64) -> Self {
        Self {
            kind: config.kind,
            thing_type: config.thing_type,
            flags: config.flags,
            angle,
            health: config.health,
            max_health: config.health,
            heal: config.heal,
        }
    }

    /// Physical things block each other; the rest are only touched.
    pub fn physical(&self) -> bool {
        self.flags.contains(ThingFlags::Obstacle)
    }

    pub fn shootable(&self) -> bool {
        self.flags.contains(ThingFlags::Shootable)
    }

    pub fn pickup(&self) -> bool {
        self.flags.contains(ThingFlags::Pickup)
    }

    pub fn hanging(&self) -> bool {
        self.flags.contains(ThingFlags::Hanging)
    }

    pub fn alive(&self) -> bool {
        self.health > 0
    }
}
