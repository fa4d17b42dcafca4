//! chatstack CLI Tool
//!
//! Command-line interface for turning chat logs into scrolling ASS overlays.

mod load;

use anyhow::{Context, Result};
use chatstack_ass::RenderConfig;
use chatstack_core::{normalize, simulate, SimulationConfig, Timeline};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Byte order mark so players detect the script as UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Parser)]
#[command(name = "chatstack")]
#[command(about = "Render chat logs as a Twitch-style scrolling chat overlay in ASS format")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a chat dump to an ASS subtitle file
    Render {
        /// Input chat JSON (list of chat messages)
        chat: PathBuf,

        /// Output .ass file path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        stack: StackArgs,

        /// Seconds to animate stack movement (0 = no animation)
        #[arg(long, default_value = "0")]
        shift: f64,

        /// Fade-out seconds when a message disappears (0 = no fade)
        #[arg(long, default_value = "0")]
        fade_out: f64,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Show how a chat dump lays out on the stack without writing a script
    Inspect {
        /// Input chat JSON (list of chat messages)
        chat: PathBuf,

        #[command(flatten)]
        stack: StackArgs,

        /// Print the full timeline as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct StackArgs {
    /// Max lines visible at once
    #[arg(long, default_value = "6")]
    max_lines: usize,

    /// Seconds each message lives unless pushed out
    #[arg(long, default_value = "10")]
    hold: f64,

    /// Manual sync offset (+ delays chat, - advances chat)
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    offset_seconds: f64,
}

#[derive(Args)]
struct StyleArgs {
    #[arg(long, default_value = "1080")]
    resx: u32,

    #[arg(long, default_value = "1920")]
    resy: u32,

    #[arg(long, default_value = "10")]
    margin_l: u32,

    #[arg(long, default_value = "10")]
    margin_r: u32,

    #[arg(long, default_value = "10")]
    margin_v: u32,

    #[arg(long, default_value = "Nanum Gothic")]
    font_name: String,

    #[arg(long, default_value = "36")]
    font_size: u32,

    /// Outline width in pixels
    #[arg(long, default_value = "2")]
    outline: u32,

    /// Shadow depth in pixels
    #[arg(long, default_value = "0")]
    shadow: u32,

    /// Extra pixels between stacked lines
    #[arg(long, default_value = "2")]
    line_gap: u32,
}

impl StyleArgs {
    fn into_config(self, slide_secs: f64, fade_out_secs: f64) -> RenderConfig {
        RenderConfig {
            res_x: self.resx,
            res_y: self.resy,
            margin_l: self.margin_l,
            margin_r: self.margin_r,
            margin_v: self.margin_v,
            font_name: self.font_name,
            font_size: self.font_size,
            outline: self.outline,
            shadow: self.shadow,
            line_gap: self.line_gap,
            slide_secs,
            fade_out_secs,
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            chat,
            output,
            stack,
            shift,
            fade_out,
            style,
        } => render_chat(chat, output, stack, style.into_config(shift, fade_out))?,

        Commands::Inspect { chat, stack, json } => inspect_chat(chat, stack, json)?,
    }

    Ok(())
}

fn build_timeline(chat: &Path, stack: &StackArgs) -> Result<Timeline> {
    let config = SimulationConfig::new(stack.hold, stack.max_lines);
    config.validate().context("Invalid stack options")?;

    let records = load::load_chat(chat)?;
    let total = records.len();
    let messages = normalize(records, stack.offset_seconds).context("Invalid offset option")?;
    tracing::info!(
        records = total,
        messages = messages.len(),
        "loaded chat from {}",
        chat.display()
    );

    simulate(&messages, &config).context("Failed to simulate chat stack")
}

fn render_chat(chat: PathBuf, output: PathBuf, stack: StackArgs, render: RenderConfig) -> Result<()> {
    render.validate().context("Invalid render options")?;

    let timeline = build_timeline(&chat, &stack)?;
    let script = chatstack_ass::render_script(&timeline, &render).context("Failed to render ASS script")?;

    let file = File::create(&output).context("Failed to create output file")?;
    let mut writer = BufWriter::new(file);
    writer.write_all(UTF8_BOM)?;
    writer
        .write_all(script.as_bytes())
        .context("Failed to write ASS script")?;
    writer.flush().context("Failed to write ASS script")?;

    println!(
        "Wrote: {} ({} dialogue segments)",
        output.display(),
        timeline.segment_count()
    );

    Ok(())
}

fn inspect_chat(chat: PathBuf, stack: StackArgs, json: bool) -> Result<()> {
    let timeline = build_timeline(&chat, &stack)?;

    if json {
        println!("{}", timeline.to_json_pretty()?);
        return Ok(());
    }

    print_info(&timeline);
    Ok(())
}

fn print_info(timeline: &Timeline) {
    let hidden = timeline.tracks.iter().filter(|t| t.is_hidden()).count();

    println!("\n=== Chat Stack ===");
    println!("Hold: {:.2} seconds", timeline.config.hold);
    println!("Max lines: {}", timeline.config.max_slots);
    println!("Messages: {}", timeline.tracks.len());
    println!("Never visible: {}", hidden);
    println!("Segments: {}", timeline.segment_count());
    println!("Duration: {:.2} seconds", timeline.duration());

    println!("\n=== Timeline (first 10 messages) ===");
    for track in timeline.tracks.iter().take(10) {
        let message = &track.message;
        println!("  [{}] {:.2}s {}: {}", message.id, message.time, message.name, message.body);
        for seg in &track.segments {
            let moved = seg
                .moved_from
                .map(|from| format!(" (from slot {})", from))
                .unwrap_or_default();
            println!(
                "      slot {} from {:.2}s to {:.2}s{}{}",
                seg.slot,
                seg.start,
                seg.end,
                moved,
                if seg.is_final { " final" } else { "" }
            );
        }
    }
    if timeline.tracks.len() > 10 {
        println!("  ... and {} more messages", timeline.tracks.len() - 10);
    }
}
