use std::collections::HashMap;

use anyhow::{anyhow, Error};

pub const DEFAULT_CVARS: &[(&str, CVar)] = &[
    // #############################
    // PHYSICS VARIABLES:
    // These are read through PhysicsConfig.
    // #############################
    (
        "g_gravity",
        CVar {
            description: "Downward acceleration, in units per tick squared.",
            value: CVarValue::F64(0.028),
        },
    ),
    (
        "g_friction",
        CVar {
            description: "Horizontal velocity multiplier applied every grounded tick.",
            value: CVarValue::F64(0.88),
        },
    ),
    (
        "g_step_height",
        CVar {
            description: "Largest floor rise an actor can walk up through an open line.",
            value: CVarValue::F64(0.5),
        },
    ),
    // #############################
    // PARTICLE VARIABLES:
    // #############################
    (
        "g_particle_ttl",
        CVar {
            description: "Lifetime of a particle, in ticks.",
            value: CVarValue::U32(60),
        },
    ),
    (
        "g_particle_seed",
        CVar {
            description: "Seed for particle spawn velocities.",
            value: CVarValue::U32(1),
        },
    ),
    (
        "g_particles_per_hit",
        CVar {
            description: "Particles spawned by a missile impact or a death.",
            value: CVarValue::U32(6),
        },
    ),
    // #############################
    // DEBUG VARIABLES:
    // #############################
    (
        "d_log_events",
        CVar {
            description: "Log every world event at debug level.",
            value: CVarValue::Bool(false),
        },
    ),
];

pub type CVarsMap = HashMap<&'static str, CVar>;

pub fn default_cvars() -> CVarsMap {
    DEFAULT_CVARS.iter().copied().collect()
}

/// Typed snapshot of the cvars the integrator reads every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub friction: f64,
    pub step_height: f64,
    pub particle_ttl: u32,
    pub particle_seed: u32,
    pub particles_per_hit: u32,
    pub log_events: bool,
}

impl PhysicsConfig {
    pub fn from_cvars(cvars: &CVarsMap) -> anyhow::Result<Self> {
        Ok(Self {
            gravity: cvar(cvars, "g_gravity")?.as_f64().ok_or(wrong_type("g_gravity"))?,
            friction: cvar(cvars, "g_friction")?.as_f64().ok_or(wrong_type("g_friction"))?,
            step_height: cvar(cvars, "g_step_height")?
                .as_f64()
                .ok_or(wrong_type("g_step_height"))?,
            particle_ttl: cvar(cvars, "g_particle_ttl")?
                .as_u32()
                .ok_or(wrong_type("g_particle_ttl"))?,
            particle_seed: cvar(cvars, "g_particle_seed")?
                .as_u32()
                .ok_or(wrong_type("g_particle_seed"))?,
            particles_per_hit: cvar(cvars, "g_particles_per_hit")?
                .as_u32()
                .ok_or(wrong_type("g_particles_per_hit"))?,
            log_events: cvar(cvars, "d_log_events")?
                .as_bool()
                .ok_or(wrong_type("d_log_events"))?,
        })
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.028,
            friction: 0.88,
            step_height: 0.5,
            particle_ttl: 60,
            particle_seed: 1,
            particles_per_hit: 6,
            log_events: false,
        }
    }
}

fn cvar(cvars: &CVarsMap, name: &str) -> anyhow::Result<CVarValue> {
    cvars
        .get(name)
        .map(|cvar| cvar.value)
        .ok_or_else(|| anyhow!("Unknown cvar {name}"))
}

fn wrong_type(name: &str) -> Error {
    anyhow!("Cvar {name} has the wrong type")
}

#[derive(Debug, Clone, Copy)]
pub struct CVar {
    pub description: &'static str,
    pub value: CVarValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CVarValue {
    Bool(bool),
    U32(u32),
    F64(f64),
}

impl CVarValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CVarValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            CVarValue::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CVarValue::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn set_from_str(&mut self, value: &str) -> Result<(), Error> {
        match self {
            CVarValue::Bool(ref mut v) => *v = value.parse()?,
            CVarValue::U32(ref mut v) => *v = value.parse()?,
            CVarValue::F64(ref mut v) => *v = value.parse()?,
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_snapshot() {
        let cvars = default_cvars();
        assert_eq!(
            PhysicsConfig::from_cvars(&cvars).unwrap(),
            PhysicsConfig::default()
        );
    }

    #[test]
    fn set_from_str_keeps_type() {
        let mut value = CVarValue::F64(1.);
        value.set_from_str("0.5").unwrap();
        assert_eq!(value, CVarValue::F64(0.5));

        let mut value = CVarValue::U32(1);
        assert!(value.set_from_str("-3").is_err());
        assert_eq!(value, CVarValue::U32(1));

        let mut value = CVarValue::Bool(false);
        value.set_from_str("true").unwrap();
        assert_eq!(value.as_bool(), Some(true));
    }
}
