use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use sector_core::{Stopwatch, World, WorldEvent};
use sector_game_config::GameConfig;
use sector_map_format::Map;
use ultraviolet::DVec3;

#[derive(Parser)]
#[command(name = "sector-sim")]
#[command(about = "Compile a sector map and run its world without a renderer")]
struct Args {
    /// Map file in JSON. The built-in demo map is used when omitted.
    #[arg(long)]
    map: Option<PathBuf>,

    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Hero speed along +x, per tick.
    #[arg(long, default_value_t = 0.15)]
    walk: f64,

    /// Fire a missile every this many ticks. Zero never fires.
    #[arg(long, default_value_t = 45)]
    fire_every: u64,

    /// Cvar override as `name=value`. May be repeated.
    #[arg(long = "cvar")]
    cvars: Vec<String>,
}

fn parse_cvar(arg: &str) -> Result<(&str, &str)> {
    arg.split_once('=')
        .ok_or_else(|| anyhow!("Expected name=value, got {arg:?}"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let map = match &args.map {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read map {}", path.display()))?;
            Map::from_json(&json)?
        }
        None => Map::from_json(include_str!("../demo_map.json"))?,
    };

    let mut world = World::new(&map, GameConfig::default_config()?)?;
    for arg in &args.cvars {
        let (name, value) = parse_cvar(arg)?;
        world.set_cvar(name, value)?;
    }

    let hero = world.hero;
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let stopwatch = Stopwatch::new();

    for tick in 1..=args.ticks {
        if let Some(hero) = hero {
            world.with_hero_body(|body| body.vel.x = args.walk)?;
            if args.fire_every > 0 && tick % args.fire_every == 0 {
                world.fire_missile(hero, DVec3::new(1., 0., 0.))?;
            }
        }

        world.update();

        for event in world.drain_events() {
            log::info!("Tick {tick}: {event:?}");
            *counts.entry(event_name(&event)).or_default() += 1;
        }
    }

    let elapsed = stopwatch.total();

    log::info!(
        "Ran {} ticks in {:?} ({} entities left)",
        args.ticks,
        elapsed,
        world.world.len()
    );
    if let Some(hero) = hero {
        let body = world.with_hero_body(|body| *body)?;
        log::info!(
            "Hero {:?} at ({:.2}, {:.2}, {:.2}) in sector {:?}",
            hero,
            body.pos.x,
            body.pos.y,
            body.pos.z,
            body.sector.map(|sector| sector.0)
        );
    }
    for (name, count) in counts {
        log::info!("{name}: {count}");
    }

    Ok(())
}

fn event_name(event: &WorldEvent) -> &'static str {
    match event {
        WorldEvent::SectorEntered { .. } => "sector entered",
        WorldEvent::LineTouched { .. } => "line touched",
        WorldEvent::ThingDamaged { .. } => "thing damaged",
        WorldEvent::ThingDied { .. } => "thing died",
        WorldEvent::ItemPickedUp { .. } => "item picked up",
        WorldEvent::MissileHit { .. } => "missile hit",
    }
}
