mod png_out;
mod settings;

use anyhow::{Context, Result};
use bbg_core::logging::{LogConfig, LogLevel};
use bbg_core::FrameSource;
use bbg_earthbound::address::{self, HAS_HEADER};
use bbg_earthbound::block::Block;
use bbg_earthbound::{codec, AspectRatio, BattleScene, Rom};
use clap::{Parser, Subcommand, ValueEnum};
use settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "battlebg", about = "Extract and render battle backgrounds")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Core log level: off, error, warn, info, debug, trace
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append core log messages to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Core messages allowed per category per second
    #[arg(long, global = true)]
    log_rate_limit: Option<usize>,
}

/// Drains the core log file on every exit path out of `main`.
struct LogFlush;

impl Drop for LogFlush {
    fn drop(&mut self) {
        LogConfig::global().shutdown();
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Aspect {
    Full,
    Wide,
    Medium,
    Narrow,
}

impl From<Aspect> for AspectRatio {
    fn from(a: Aspect) -> Self {
        match a {
            Aspect::Full => AspectRatio::Full,
            Aspect::Wide => AspectRatio::Wide,
            Aspect::Medium => AspectRatio::Medium,
            Aspect::Narrow => AspectRatio::Narrow,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Render frames of a two-layer scene to PNG files
    Render {
        rom: PathBuf,

        /// JSON settings file (defaults to battlebg.json next to the executable)
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        layer1: Option<usize>,

        #[arg(long)]
        layer2: Option<usize>,

        #[arg(long, value_enum)]
        aspect: Option<Aspect>,

        /// Ticks to advance per frame (1-10)
        #[arg(long)]
        frame_skip: Option<u32>,

        /// Blend weights for layer 1 and layer 2
        #[arg(long, num_args = 2, value_names = ["LAYER1", "LAYER2"])]
        alpha: Option<Vec<f64>>,

        /// Number of frames to write
        #[arg(long)]
        frames: Option<usize>,

        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print debug_state after each frame
        #[arg(long, default_value_t = false)]
        debug: bool,

        /// Write the effective settings back to the settings file
        #[arg(long, default_value_t = false)]
        save_config: bool,
    },
    /// Decompress one block and report its size
    Decompress {
        rom: PathBuf,

        /// Block position: decimal, 0x-prefixed hex or $-prefixed hex
        #[arg(long, value_parser = parse_number)]
        offset: u32,

        /// Treat --offset as a logical address instead of a file offset
        #[arg(long, default_value_t = false)]
        logical: bool,

        /// Write the decompressed bytes here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a background entry and its distortion effect
    Info {
        rom: PathBuf,

        #[arg(long, default_value_t = 0)]
        entry: usize,
    },
}

fn parse_number(s: &str) -> Result<u32, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(hex) = s.strip_prefix('$') {
        u32::from_str_radix(&hex.replace(':', ""), 16)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid number {:?}: {}", s, e))
}

fn configure_logging(args: &Args) -> Result<()> {
    let config = LogConfig::global();
    if let Some(level) = &args.log_level {
        let level = LogLevel::from_str(level)
            .with_context(|| format!("unknown log level {:?}", level))?;
        config.set_global_level(level);
    }
    if let Some(limit) = args.log_rate_limit {
        config.set_rate_limit(limit);
    }
    if let Some(path) = &args.log_file {
        config
            .set_log_file(path.clone())
            .with_context(|| format!("opening log file {}", path.display()))?;
    }
    Ok(())
}

fn read_rom(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let _flush = LogFlush;
    configure_logging(&args)?;

    match args.command {
        Command::Render {
            rom,
            config,
            layer1,
            layer2,
            aspect,
            frame_skip,
            alpha,
            frames,
            out,
            debug,
            save_config,
        } => {
            let settings_path = config.unwrap_or_else(Settings::config_path);
            let mut settings = Settings::load(&settings_path);

            // Command-line flags win over the settings file
            let scene_config = &mut settings.scene;
            if let Some(l) = layer1 {
                scene_config.layer1 = l;
            }
            if let Some(l) = layer2 {
                scene_config.layer2 = l;
            }
            if let Some(a) = aspect {
                scene_config.aspect_ratio = a.into();
            }
            if let Some(f) = frame_skip {
                scene_config.frame_skip = f;
            }
            if let Some(&[a1, a2]) = alpha.as_deref() {
                scene_config.alpha = Some([a1, a2]);
            }
            if let Some(f) = frames {
                settings.frames = f;
            }
            if let Some(dir) = out {
                settings.out_dir = dir;
            }
            if save_config {
                settings
                    .save(&settings_path)
                    .with_context(|| format!("saving {}", settings_path.display()))?;
                log::info!("saved settings to {}", settings_path.display());
            }
            let frames = settings.frames;
            let out_dir = settings.out_dir.clone();

            let rom = Rom::new(read_rom(&rom)?)?;
            let mut scene = BattleScene::new(&rom, &settings.scene)?;

            fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating {}", out_dir.display()))?;
            for index in 0..frames {
                let frame = scene.step_frame()?;
                let path = png_out::frame_path(&out_dir, index);
                png_out::write_png(&path, &frame)?;
                if debug {
                    println!(
                        "DEBUG STATE (frame {}):\n{}",
                        index,
                        serde_json::to_string_pretty(&scene.debug_state())?
                    );
                }
            }
            log::info!("wrote {} frame(s) to {}", frames, out_dir.display());
            println!("Rendered {} frame(s) to {}", frames, out_dir.display());
        }
        Command::Decompress {
            rom,
            offset,
            logical,
            out,
        } => {
            let data = read_rom(&rom)?;
            let start = if logical {
                address::to_file_offset(offset, HAS_HEADER)?
            } else {
                offset as usize
            };

            let size = codec::measure(&data, start)?;
            let bytes = Block::new(&data, start).decompress()?;
            match address::to_logical_address(start, HAS_HEADER) {
                Ok(logical) => {
                    println!("Block at {:#X} (${:06X}): {} byte(s)", start, logical, size)
                }
                Err(_) => println!("Block at {:#X}: {} byte(s)", start, size),
            }

            if let Some(path) = out {
                fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
                log::info!("wrote {} byte(s) to {}", bytes.len(), path.display());
            }
        }
        Command::Info { rom, entry } => {
            let rom = Rom::new(read_rom(&rom)?)?;
            let background = rom.background(entry)?;
            let effect_index = background.effect_index();
            let effect = rom.distortion_effect(effect_index).ok();
            let info = serde_json::json!({
                "entry": entry,
                "background": background,
                "graphics_bits": rom.graphics_bits(background.graphics_index as usize),
                "effect_index": effect_index,
                "effect": effect,
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}
