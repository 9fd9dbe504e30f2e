use anyhow::Context;
use raycast::{Intent, Level, World};

const DEFAULT_SCRIPT: &str = "wwwwwwddddddddddwwwwwwwwaaaa";

/// Keys held during one tick: `w`/`s` walk, `a`/`d` turn, `q`/`e` turn left or
/// right while walking forward, anything else idles.
fn intents(keys: char) -> (Intent, Intent) {
    match keys {
        'w' => (Intent::Idle, Intent::Positive),
        's' => (Intent::Idle, Intent::Negative),
        'a' => (Intent::Negative, Intent::Idle),
        'd' => (Intent::Positive, Intent::Idle),
        'q' => (Intent::Negative, Intent::Positive),
        'e' => (Intent::Positive, Intent::Positive),
        _ => (Intent::Idle, Intent::Idle),
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("RAYCAST_LOG");

    let mut args = std::env::args().skip(1);
    let level = match args.next() {
        Some(path) if path != "-" => Level::load(&path)?,
        _ => {
            log::info!("using builtin level");
            Level::builtin()?
        }
    };
    let script = args.next().unwrap_or_else(|| DEFAULT_SCRIPT.to_string());

    log::info!("initializing world");
    let mut world = World::new(level).context("could not start session")?;

    for (tick, keys) in script.chars().enumerate() {
        let (turn, walk) = intents(keys);
        world.set_intents(turn, walk);
        world.tick();
        log::debug!("tick {tick} keys {keys:?}");
    }

    if world.hits().is_empty() {
        world.tick();
    }

    let pose = world.player().pose;
    println!(
        "player at ({:.2}, {:.2}) heading {:.3} rad",
        pose.pos.x, pose.pos.y, pose.heading
    );
    for (column, slice) in world.hits().iter().enumerate() {
        println!(
            "{column:>4} angle {:>7.4} dist {:>9.3} {} at ({:.2}, {:.2}) {:?}",
            slice.angle,
            slice.distance,
            if slice.is_vertical { "vert" } else { "horz" },
            slice.hit.x,
            slice.hit.y,
            slice.face(),
        );
    }

    Ok(())
}
