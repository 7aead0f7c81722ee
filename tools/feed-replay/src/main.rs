//! feed-replay: synthetic update feeds and headless replay for starwatch.
//!
//! Usage:
//!   feed-replay generate --output feed.ndjson --seed 7 --ships 4 --asteroids 20
//!   feed-replay replay --input feed.ndjson --fps 60 --config starwatch.toml

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use starwatch_client::error::ClientResult;
use starwatch_client::{AppContext, ClientConfig};
use starwatch_core::constants::MICROS_PER_SEC;
use starwatch_core::enums::{ConnectionStatus, EntityKind};
use starwatch_core::protocol::{decode_batch, encode_batch, Snapshot};
use starwatch_core::types::{Position, Velocity};

/// Replay ticks faster than one per microsecond cannot be scheduled.
const MAX_FPS: u64 = 1_000_000;
/// Upper bound on the mean batch gap: one hour.
const MAX_INTERVAL_MS: u64 = 3_600_000;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "generate" => cmd_generate(&args[2..]),
        "replay" => cmd_replay(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "feed-replay: starwatch update feed tool\n\
         \n\
         Commands:\n\
         \n\
         generate  Write a deterministic synthetic feed (one JSON batch per line)\n\
         \n\
           --output <path>      Output file path\n\
           --seed <N>           RNG seed (default: 42)\n\
           --ships <N>          Number of ships (default: 4)\n\
           --asteroids <N>      Number of asteroids (default: 16)\n\
           --duration <secs>    Feed length in seconds (default: 60)\n\
           --interval-ms <ms>   Mean gap between batches (default: 250, max: 3600000)\n\
         \n\
         replay    Drive the client headlessly from a recorded feed\n\
         \n\
           --input <path>       Feed file (one JSON batch per line)\n\
           --fps <N>            Render ticks per second (default: 60, max: 1000000)\n\
           --config <path>      Client config TOML (optional)\n\
         \n\
         Set RUST_LOG=debug for per-batch and per-tick detail.\n"
    );
}

fn parse_path(args: &[String], flag: &str) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
    }
    None
}

fn parse_num<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            if let Ok(n) = args[i + 1].parse::<T>() {
                return n;
            }
        }
    }
    default
}

fn require_path(args: &[String], flag: &str) -> PathBuf {
    match parse_path(args, flag) {
        Some(p) => p,
        None => {
            eprintln!("Error: {flag} <path> is required");
            process::exit(1);
        }
    }
}

// --- Generate command ---

/// Ground-truth motion of one synthetic object: constant acceleration.
struct Body {
    kind: EntityKind,
    id: u64,
    origin: Position,
    velocity: Velocity,
    accel: (f64, f64),
    radius: f64,
    /// Chance of being included in any given batch.
    report_rate: f64,
}

impl Body {
    fn snapshot_at(&self, t_sec: f64) -> Snapshot {
        let (ax, ay) = self.accel;
        Snapshot {
            kind: self.kind,
            id: self.id,
            position: Position::new(
                self.origin.x + self.velocity.x * t_sec + 0.5 * ax * t_sec * t_sec,
                self.origin.y + self.velocity.y * t_sec + 0.5 * ay * t_sec * t_sec,
            ),
            velocity: Velocity::new(self.velocity.x + ax * t_sec, self.velocity.y + ay * t_sec),
            radius: Some(self.radius),
        }
    }
}

fn spawn_bodies(rng: &mut ChaCha8Rng, ships: u64, asteroids: u64) -> Vec<Body> {
    let mut bodies = Vec::new();

    for id in 0..ships {
        let heading: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
        let speed: f64 = rng.gen_range(5.0..40.0);
        let thrust: f64 = rng.gen_range(-2.0..2.0);
        bodies.push(Body {
            kind: EntityKind::Ship,
            id,
            origin: Position::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0)),
            velocity: Velocity::new(speed * heading.cos(), speed * heading.sin()),
            accel: (thrust * heading.cos(), thrust * heading.sin()),
            radius: 10.0,
            report_rate: 0.9,
        });
    }

    for id in 0..asteroids {
        bodies.push(Body {
            kind: EntityKind::Asteroid,
            id,
            origin: Position::new(rng.gen_range(-2000.0..2000.0), rng.gen_range(-2000.0..2000.0)),
            velocity: Velocity::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0)),
            accel: (0.0, 0.0),
            radius: rng.gen_range(8.0..60.0),
            report_rate: 0.5,
        });
    }

    bodies
}

/// Irregular gaps: 50%..150% of the mean interval, never zero.
fn next_gap_us(rng: &mut ChaCha8Rng, interval_ms: u64) -> u64 {
    let interval_ms = interval_ms.clamp(1, MAX_INTERVAL_MS);
    let gap_ms = rng
        .gen_range(interval_ms / 2..=interval_ms + interval_ms / 2)
        .max(1);
    gap_ms * 1000
}

fn cmd_generate(args: &[String]) -> ClientResult<()> {
    let output = require_path(args, "--output");
    let seed = parse_num(args, "--seed", 42u64);
    let ships = parse_num(args, "--ships", 4u64);
    let asteroids = parse_num(args, "--asteroids", 16u64);
    let duration_secs = parse_num(args, "--duration", 60.0f64);
    let interval_ms = parse_num(args, "--interval-ms", 250u64).clamp(1, MAX_INTERVAL_MS);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let bodies = spawn_bodies(&mut rng, ships, asteroids);

    let mut writer = BufWriter::new(File::create(&output)?);
    let end_us = (duration_secs * MICROS_PER_SEC) as u64;
    let mut ts_us = 0u64;
    let mut batches = 0u64;

    while ts_us <= end_us {
        let t_sec = ts_us as f64 / MICROS_PER_SEC;
        let snapshots: Vec<Snapshot> = bodies
            .iter()
            .filter(|b| rng.gen_bool(b.report_rate))
            .map(|b| b.snapshot_at(t_sec))
            .collect();

        writeln!(writer, "{}", encode_batch(ts_us, &snapshots)?)?;
        batches += 1;

        ts_us = ts_us.saturating_add(next_gap_us(&mut rng, interval_ms));
        if ts_us == u64::MAX {
            break;
        }
    }
    writer.flush()?;

    log::info!("seed={seed} wrote {batches} batches for {} bodies", bodies.len());
    eprintln!("Done! Output: {} ({batches} batches)", output.display());
    Ok(())
}

// --- Replay command ---

#[derive(Debug, Default)]
struct ReplayStats {
    batches: u64,
    dropped_batches: u64,
    items: u64,
    rejected: u64,
    stale: u64,
    ticks: u64,
    /// Distance between the prediction and the next authoritative position.
    error_sum: f64,
    error_max: f64,
    error_samples: u64,
}

fn load_config(args: &[String]) -> ClientResult<ClientConfig> {
    match parse_path(args, "--config") {
        Some(path) => Ok(ClientConfig::load(path)?),
        None => Ok(ClientConfig::default()),
    }
}

fn cmd_replay(args: &[String]) -> ClientResult<()> {
    let input = require_path(args, "--input");
    let fps = parse_num(args, "--fps", 60u64);
    let config = load_config(args)?;

    let stats = replay(&input, fps, config)?;

    eprintln!(
        "Replayed {} batches ({} dropped), {} items ({} rejected, {} stale), {} render ticks",
        stats.batches, stats.dropped_batches, stats.items, stats.rejected, stats.stale, stats.ticks
    );
    if stats.error_samples > 0 {
        eprintln!(
            "Prediction error at next update: mean {:.3}, max {:.3} ({} samples)",
            stats.error_sum / stats.error_samples as f64,
            stats.error_max,
            stats.error_samples
        );
    }
    Ok(())
}

/// Interval between render ticks, with `fps` clamped to `1..=MAX_FPS`.
fn frame_duration(fps: u64) -> Duration {
    Duration::from_micros(1_000_000 / fps.clamp(1, MAX_FPS))
}

/// Feed every line of `input` to a fresh client, mapping server time 1:1
/// onto a virtual local clock and rendering at `fps` in between.
fn replay(input: &Path, fps: u64, config: ClientConfig) -> ClientResult<ReplayStats> {
    let reader = BufReader::new(File::open(input)?);
    let frame = frame_duration(fps);

    let mut ctx = AppContext::new(config);
    let mut stats = ReplayStats::default();
    let start = Instant::now();
    let mut first_ts: Option<u64> = None;
    let mut next_frame = start;

    ctx.set_connection_status(ConnectionStatus::Established);

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let batch = match decode_batch(&line) {
            Ok(batch) => batch,
            Err(e) => {
                log::warn!("skipping batch #{}: {e}", stats.batches + stats.dropped_batches);
                stats.dropped_batches += 1;
                continue;
            }
        };

        let base = *first_ts.get_or_insert(batch.server_us);
        let arrival = start + Duration::from_micros(batch.server_us.saturating_sub(base));

        while next_frame < arrival {
            let tick = ctx.render_tick(next_frame);
            log::trace!("tick now_us={} drawn={}", tick.now_us, tick.drawn);
            stats.ticks += 1;
            next_frame += frame;
        }

        for snapshot in &batch.snapshots {
            if let Some(entity) = ctx.store().get(&snapshot.key()) {
                if batch.server_us > entity.last_update_us() {
                    let error = entity.predict(batch.server_us).distance_to(&snapshot.position);
                    stats.error_sum += error;
                    stats.error_max = stats.error_max.max(error);
                    stats.error_samples += 1;
                }
            }
        }

        let report = ctx.ingest_batch(batch, arrival);
        stats.batches += 1;
        stats.items += (report.accepted() + report.rejected.len()) as u64;
        stats.rejected += report.rejected.len() as u64;
        stats.stale += report.stale as u64;
    }

    ctx.set_connection_status(ConnectionStatus::Lost);
    log::info!(
        "replay finished with {} entities tracked, {} drawn",
        ctx.store().len(),
        ctx.scene().drawables().count()
    );
    Ok(stats)
}
