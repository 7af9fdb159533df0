mod config;
mod geometry;
mod pass;
mod playback;
mod scene;
mod trajectory;
mod web;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::pass::{sample_path, PassCatalog, PassRecord};
use crate::scene::{Scene, SceneEvent};

#[derive(Parser)]
#[command(name = "pass-viz")]
#[command(about = "Animated satellite pass visualization")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every pass in a pass file
    Validate { passes: PathBuf },
    /// Print time-stepped look angles of a pass as JSON
    Path {
        passes: PathBuf,
        #[arg(short, long, default_value_t = 0)]
        index: usize,
        /// Sample spacing, e.g. 5s
        #[arg(short, long, default_value = "5s")]
        step: String,
        #[arg(short, long, default_value_t = 0)]
        decimals: u32,
    },
    /// Render the scene of a pass to SVG
    Render {
        passes: PathBuf,
        #[arg(short, long, default_value_t = 0)]
        index: usize,
        /// Playback progress to render, 0 to 1
        #[arg(short, long, default_value_t = 0.0)]
        progress: f64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Play a pass in the terminal; Ctrl-C closes
    Play {
        passes: PathBuf,
        #[arg(short, long, default_value_t = 0)]
        index: usize,
    },
    /// Serve the interactive view
    Serve {
        /// Pass file to preselect from
        #[arg(short, long)]
        passes: Option<PathBuf>,
        #[arg(short, long, default_value_t = 0)]
        index: usize,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Validate { passes } => validate(&passes),
        Commands::Path {
            passes,
            index,
            step,
            decimals,
        } => path(&passes, index, &step, decimals),
        Commands::Render {
            passes,
            index,
            progress,
            output,
        } => render(&config, &passes, index, progress, output.as_deref()),
        Commands::Play { passes, index } => play(&config, &passes, index),
        Commands::Serve { passes, index } => serve(config, passes.as_deref(), index),
    }
}

fn validate(path: &Path) -> ExitCode {
    let catalog = match PassCatalog::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading passes: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(name) = catalog.satellite_name() {
        println!("Satellite: {}", name);
    }

    let mut invalid = 0;
    for (i, pass) in catalog.passes.iter().enumerate() {
        match pass.summary() {
            Ok(s) => println!(
                "  {}: {} -> {}  max {:.1}° {}  ({} min)",
                i,
                s.start.format("%Y-%m-%d %H:%M:%S"),
                s.end.format("%H:%M:%S"),
                s.max_elevation_deg,
                s.max_compass,
                s.duration_minutes
            ),
            Err(e) => {
                invalid += 1;
                println!("  {}: invalid: {}", i, e);
            }
        }
    }

    if invalid > 0 {
        eprintln!("{} of {} passes are invalid", invalid, catalog.passes.len());
        return ExitCode::FAILURE;
    }
    println!("All {} passes are valid", catalog.passes.len());
    ExitCode::SUCCESS
}

fn load_pass(path: &Path, index: usize) -> Result<PassRecord, ExitCode> {
    PassCatalog::from_file(path)
        .and_then(|catalog| catalog.get(index).cloned())
        .map_err(|e| {
            eprintln!("Error loading pass: {}", e);
            ExitCode::FAILURE
        })
}

fn path(passes: &Path, index: usize, step: &str, decimals: u32) -> ExitCode {
    let pass = match load_pass(passes, index) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let step = match humantime::parse_duration(step.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| chrono::Duration::from_std(d).map_err(|e| e.to_string()))
    {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid step: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let samples = match sample_path(&pass, step, decimals) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid pass: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&samples) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn render(
    config: &Config,
    passes: &Path,
    index: usize,
    progress: f64,
    output: Option<&Path>,
) -> ExitCode {
    let pass = match load_pass(passes, index) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let mut scene = Scene::new(config.scene(), config.observer);
    if let Err(e) = scene.select_pass(pass) {
        eprintln!("Pass rejected: {}", e);
        return ExitCode::FAILURE;
    }

    if progress > 0.0 {
        if let Err(e) = scene.seek(progress, Instant::now()) {
            eprintln!("Playback error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let svg = match scene.render(&config.renderer()) {
        Ok(svg) => svg,
        Err(e) => {
            eprintln!("Render error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        Some(path) => match std::fs::write(path, svg) {
            Ok(()) => {
                println!("Wrote {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error writing {}: {}", path.display(), e);
                ExitCode::FAILURE
            }
        },
        None => {
            println!("{}", svg);
            ExitCode::SUCCESS
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, ExitCode> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            eprintln!("Error starting runtime: {}", e);
            ExitCode::FAILURE
        })
}

fn play(config: &Config, passes: &Path, index: usize) -> ExitCode {
    let pass = match load_pass(passes, index) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let mut scene = Scene::new(config.scene(), config.observer);
    if let Err(e) = scene.select_pass(pass) {
        eprintln!("Pass rejected: {}", e);
        return ExitCode::FAILURE;
    }
    if let Some(s) = scene.status().summary {
        println!(
            "Pass: {} -> {}, max {:.1}° {}, {} minutes",
            s.start.format("%H:%M:%S"),
            s.end.format("%H:%M:%S"),
            s.max_elevation_deg,
            s.max_compass,
            s.duration_minutes
        );
    }

    rt.block_on(play_scene(scene, config.playback.frame_interval))
}

async fn play_scene(mut scene: Scene, frame_interval: Duration) -> ExitCode {
    const PRINT_EVERY: Duration = Duration::from_millis(500);

    if let Err(e) = scene.play(Instant::now()) {
        eprintln!("Playback error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut frames = tokio::time::interval(frame_interval.max(Duration::from_millis(1)));
    let mut last_print: Option<Instant> = None;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                scene.close();
                println!("Closed");
                return ExitCode::SUCCESS;
            }
            _ = frames.tick() => {
                let now = Instant::now();
                for event in scene.run_frames(now) {
                    match event {
                        SceneEvent::Progress { progress, simulated_time } => {
                            if last_print.is_some_and(|t| now.duration_since(t) < PRINT_EVERY) {
                                continue;
                            }
                            last_print = Some(now);
                            print_progress(&scene, progress, simulated_time);
                        }
                        SceneEvent::Completed { simulated_time } => {
                            print_progress(&scene, 1.0, simulated_time);
                            println!("Pass complete");
                            return ExitCode::SUCCESS;
                        }
                    }
                }
            }
        }
    }
}

fn print_progress(scene: &Scene, progress: f64, simulated_time: f64) {
    let time = chrono::DateTime::from_timestamp(simulated_time as i64, 0)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();
    let angles = scene
        .trajectory()
        .ok()
        .and_then(|t| t.sample_at(progress).map(|p| (p.azimuth_deg, p.elevation_deg)));
    match angles {
        Some((az, el)) => println!(
            "{:>5.1}%  {}  az {:>5.1}° {:<3}  el {:>4.1}°",
            progress * 100.0,
            time,
            az,
            geometry::compass_point(az),
            el
        ),
        None => println!("{:>5.1}%  {}", progress * 100.0, time),
    }
}

fn serve(config: Config, passes: Option<&Path>, index: usize) -> ExitCode {
    let pass = match passes.map(|p| load_pass(p, index)).transpose() {
        Ok(p) => p,
        Err(code) => return code,
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    match rt.block_on(web::run_server(config, pass)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
