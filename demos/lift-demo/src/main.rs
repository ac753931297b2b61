//! lift-demo — one passenger journey through the lift simulation.
//!
//! Rides from the start floor to `DESTINATION`, shows the frame driver
//! dropping time after a stall, saves the world to JSON, reloads it and
//! fast-forwards over the time it was "away".  Notifications and tick
//! summaries go to CSV under `output/lift-demo`.
//!
//! ```text
//! cargo run -p lift-demo [-- config.json]
//! RUST_LOG=debug cargo run -p lift-demo
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use log::info;

use lift_cabin::DOOR_PASSABLE;
use lift_core::{BoardingMode, Direction, SimConfig};
use lift_output::{CsvWriter, SimOutputObserver};
use lift_sim::{FixedStepDriver, World, WorldBuilder};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:       &str = "output/lift-demo";
const DESTINATION:      i64  = 7;
const FRAME_MS:         u64  = 16;    // ~60 fps presentation loop
const STALL_MS:         u64  = 2_000; // one frame that hangs for two seconds
const AWAY_MS:          u64  = 15 * 60 * 1_000;
const SUMMARY_INTERVAL: u64  = 20;    // one summary row per simulated second
const JOURNEY_LIMIT_MS: u64  = 120_000;

type Output = Rc<RefCell<SimOutputObserver<CsvWriter>>>;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_config() -> Result<SimConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(SimConfig::default());
    };
    let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config: SimConfig = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    info!("loaded configuration from {path}");
    Ok(config)
}

/// Feed fixed frames to the driver until `done` holds.
fn drive_until(
    world:  &mut World,
    driver: &mut FixedStepDriver,
    what:   &str,
    done:   impl Fn(&World) -> bool,
) -> Result<()> {
    let mut waited = 0;
    while !done(world) {
        if waited >= JOURNEY_LIMIT_MS {
            bail!("gave up waiting for {what} after {waited} ms");
        }
        driver.frame(world, FRAME_MS);
        waited += FRAME_MS;
    }
    println!("  [{}] {what}", world.now());
    Ok(())
}

fn doors_passable(world: &World) -> bool {
    world.elevator().doors_open() && world.elevator().door_progress() >= DOOR_PASSABLE
}

fn print_state(label: &str, world: &World) {
    let s = world.summary();
    println!(
        "{label}: t={} floor={} pos={:.2} m doors={} load={:.0} kg pending={} state={:?}",
        s.at,
        s.floor,
        s.position_m,
        if s.doors_open { "open" } else { "closed" },
        s.load_kg,
        s.pending_calls,
        s.state,
    );
}

// ── Phases ────────────────────────────────────────────────────────────────────

fn ride(world: &mut World, driver: &mut FixedStepDriver) -> Result<()> {
    let start = world.passenger().floor;
    let floors = world.config().floors;
    let direction = if Direction::Up.valid_from(start, floors) { Direction::Up } else { Direction::Down };
    let call = world.call_elevator(direction)?;
    println!("  [{}] {call} placed at floor {start} ({direction})", world.now());

    let manual = world.config().boarding == BoardingMode::Manual;
    if manual {
        drive_until(world, driver, "doors open for boarding", doors_passable)?;
        world.board()?;
    }
    drive_until(world, driver, "passenger aboard", |w| w.passenger().inside)?;

    let destination = world.select_destination(DESTINATION)?;
    println!("  [{}] destination floor {destination} selected", world.now());

    if manual {
        drive_until(world, driver, "arrived with doors open", |w| {
            w.elevator().arrival_floor() == Some(destination) && doors_passable(w)
        })?;
        world.alight()?;
    }
    drive_until(world, driver, "passenger out", |w| !w.passenger().inside)?;
    Ok(())
}

fn save_and_reload(world: &World, config: &SimConfig, output: &Output) -> Result<World> {
    let path = Path::new(OUTPUT_DIR).join("snapshot.json");
    fs::write(&path, world.to_json()?).with_context(|| format!("writing {}", path.display()))?;
    println!("Saved {} (tick {})", path.display(), world.tick());

    let text = fs::read_to_string(&path)?;
    let mut restored = World::from_json_or_fresh(config, &text)?;
    restored.subscribe(Rc::clone(output));
    Ok(restored)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let config = load_config()?;
    println!("=== lift-demo ===");
    println!(
        "Floors: {}  |  Start: {}  |  Boarding: {:?}  |  NPCs: {}  |  Seed: {}",
        config.floors, config.initial_floor, config.boarding, config.npc_count, config.seed
    );
    println!();

    // 1. World with CSV output.
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let output: Output = Rc::new(RefCell::new(SimOutputObserver::new(writer, SUMMARY_INTERVAL)));
    let mut world = WorldBuilder::new(config.clone()).observer(Rc::clone(&output)).build()?;
    let mut driver = FixedStepDriver::new(&world);

    // 2. The journey.
    let t0 = Instant::now();
    println!("Journey:");
    ride(&mut world, &mut driver)?;
    println!("Journey simulated in {:.3} s wall time", t0.elapsed().as_secs_f64());
    print_state("After journey", &world);
    println!();

    // 3. A stalled frame.
    let report = driver.frame(&mut world, STALL_MS);
    println!(
        "Stalled frame of {STALL_MS} ms: {} steps run, {} ms dropped, {} ms carried",
        report.steps,
        report.dropped_ms,
        driver.pending_ms()
    );
    println!();

    // 4. Save, reload, catch up.
    let mut world = save_and_reload(&world, &config, &output)?;
    print_state("Reloaded", &world);
    let replayed = world.fast_forward(AWAY_MS);
    println!("Away for {AWAY_MS} ms; replayed {replayed} ms");
    print_state("Caught up", &world);
    println!();

    // 5. Wrap up.
    output.borrow_mut().finish();
    if let Some(e) = output.borrow_mut().take_error() {
        eprintln!("output error: {e}");
    }
    println!("Recent log:");
    let skip = world.log().count().saturating_sub(10);
    for entry in world.log().skip(skip) {
        println!("  [{}] {}", entry.at, entry.message);
    }
    println!();
    println!("Output written to {OUTPUT_DIR}/");

    Ok(())
}
