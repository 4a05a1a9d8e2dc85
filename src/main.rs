//! Headless dungeon layout generator.
//!
//! Runs the whole pipeline for one seed and writes the layout as JSON plus a
//! PNG preview.

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::LevelFilter;

use dungeon_layout::constants::{DEFAULT_TICK, MAX_RUN_TICKS};
use dungeon_layout::{raster, DebugLines, DungeonGenerator, GenerationConfig, RoomArena};

/// Generate a dungeon layout
#[derive(Parser, Debug)]
#[command(name = "dungeon-layout")]
#[command(version, about = "Generate a procedural dungeon layout", long_about = None)]
struct Args {
    /// RNG seed; the same seed and config give the same layout
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// JSON file overriding generation settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for layout.json and layout.png
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,

    /// Override the number of spawned rooms
    #[arg(short, long)]
    rooms: Option<usize>,

    /// Simulated seconds per tick
    #[arg(long, default_value_t = DEFAULT_TICK)]
    tick: f32,

    /// Give up after this many ticks
    #[arg(long, default_value_t = MAX_RUN_TICKS)]
    max_ticks: u64,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Serve puffin profiling data while generating
    #[arg(long)]
    profile: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let _profiler = if args.profile {
        let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
        let server = puffin_http::Server::new(&addr)?;
        puffin::set_scopes_on(true);
        log::info!("serving profile data on {addr}");
        Some(server)
    } else {
        None
    };

    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(rooms) = args.rooms {
        config.room_count = rooms;
    }

    let arena = RoomArena::new(config.footprint_unit);
    let mut generator = DungeonGenerator::new(config, arena, StdRng::seed_from_u64(args.seed))?;
    let mut lines = DebugLines::new();

    log::info!("generating with seed {}", args.seed);
    generator.start();
    let mut ticks = 0;
    while !generator.is_finished() && ticks < args.max_ticks {
        generator.tick(args.tick, &mut lines)?;
        lines.update(args.tick);
        for event in generator.events() {
            lines.handle_event(&event);
            log::debug!("{event:?}");
        }
        if args.profile {
            puffin::GlobalProfiler::lock().new_frame();
        }
        ticks += 1;
    }
    if !generator.is_finished() {
        log::warn!("stopped in {} after {ticks} ticks", generator.stage());
    }

    let layout = generator.layout()?;
    log::info!(
        "{} rooms, {} connections, {} hallways after {ticks} ticks",
        layout.rooms.len(),
        layout.connections.len(),
        layout.hallways.len()
    );

    std::fs::create_dir_all(&args.out_dir)?;
    let json_path = args.out_dir.join("layout.json");
    std::fs::write(&json_path, layout.to_json()?)?;
    log::info!("wrote layout to {}", json_path.display());
    raster::save_preview(&layout, &args.out_dir.join("layout.png"))?;

    Ok(())
}
