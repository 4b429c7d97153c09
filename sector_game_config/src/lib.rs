use bitflags::bitflags;
use serde::Deserialize;

/// The behaviour a thing gets in the world. Dispatched with a `match` in the
/// integration loop rather than per-entity callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThingKind {
    Hero,
    Monster,
    Medkit,
    Tree,
    Doodad,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub things: Vec<ThingConfig>,
    pub missile: MissileConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThingConfig {
    pub thing_type: u32,
    pub kind: ThingKind,

    pub flags: ThingFlags,

    pub radius: f64,
    pub height: f64,

    pub health: i32,
    /// Health restored when picked up.
    #[serde(default)]
    pub heal: i32,

    pub description: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MissileConfig {
    pub radius: f64,
    pub height: f64,
    /// Distance travelled per tick.
    pub speed: f64,
    pub damage: i32,
}

bitflags! {
    /// String codes follow the "Class" column convention of DoomWiki thing tables.
    #[derive(Debug, Deserialize, Copy, Clone, PartialEq, Eq)]
    #[serde(try_from = "String")]
    pub struct ThingFlags: u32 {
        /// Pickup. A hero can pick the thing up by walking over it
        ///
        /// String code: P
        const Pickup = 0b00000001;
        /// Monster. Counts towards kill percentage
        ///
        /// String code: M
        const Monster = 0b00000010;
        /// Obstacle. Heroes and monsters must walk around
        ///
        /// String code: O
        const Obstacle = 0b00000100;
        /// Shootable. Can be damaged and destroyed
        ///
        /// String code: *
        const Shootable = 0b00001000;
        /// Hangs from the ceiling and ignores gravity
        ///
        /// String code: ^
        const Hanging = 0b00010000;
    }
}

impl TryFrom<String> for ThingFlags {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let mut flags = ThingFlags::empty();
        for c in s.chars() {
            match c {
                'P' => flags |= ThingFlags::Pickup,
                'M' => flags |= ThingFlags::Monster,
                'O' => flags |= ThingFlags::Obstacle,
                '*' => flags |= ThingFlags::Shootable,
                '^' => flags |= ThingFlags::Hanging,
                _ => return Err("Invalid flag"),
            }
        }

        Ok(flags)
    }
}

impl GameConfig {
    pub fn default_config() -> serde_json::Result<Self> {
        Self::from_json(include_str!("../config/default.json"))
    }

    pub fn from_json(config_str: &str) -> serde_json::Result<Self> {
        serde_json::from_str(config_str)
    }

    pub fn thing(&self, thing_type: u32) -> Option<&ThingConfig> {
        self.things.iter().find(|thing| thing.thing_type == thing_type)
    }

    pub fn thing_of_kind(&self, kind: ThingKind) -> Option<&ThingConfig> {
        self.things.iter().find(|thing| thing.kind == kind)
    }
}
