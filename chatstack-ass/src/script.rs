//! ASS script assembly

use crate::time::{ass_time, millis};
use crate::{render_text, Error, RenderConfig, Result};
use chatstack_core::{MessageTrack, Segment, Timeline};
use std::fmt::Write;

/// Segments shorter than this are stretched so renderers still show them
const MIN_DURATION_SECS: f64 = 0.01;

/// Name of the single style every dialogue line uses
const STYLE_NAME: &str = "Chat";

/// Builds the `[Script Info]`, `[V4+ Styles]` and `[Events]` header
pub fn script_header(config: &RenderConfig) -> String {
    let mut header = String::new();

    header.push_str("[Script Info]\n");
    header.push_str("; Script generated by chatstack\n");
    header.push_str("ScriptType: v4.00+\n");
    let _ = writeln!(header, "PlayResX: {}", config.res_x);
    let _ = writeln!(header, "PlayResY: {}", config.res_y);
    header.push_str("WrapStyle: 2\n");
    header.push_str("ScaledBorderAndShadow: yes\n");
    header.push('\n');

    header.push_str("[V4+ Styles]\n");
    header.push_str(
        "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, \
         Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, \
         Alignment, MarginL, MarginR, MarginV, Encoding\n",
    );
    let _ = writeln!(
        header,
        "Style: {},{},{},{},{},{},{},0,0,0,0,100,100,0,0,1,{},{},1,{},{},{},1",
        STYLE_NAME,
        config.font_name,
        config.font_size,
        config.primary_colour,
        config.secondary_colour,
        config.outline_colour,
        config.back_colour,
        config.outline,
        config.shadow,
        config.margin_l,
        config.margin_r,
        config.margin_v,
    );
    header.push('\n');

    header.push_str("[Events]\n");
    header.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
    header
}

/// Formats one segment of a track as a `Dialogue` line (without newline).
///
/// Segments shorter than 10ms are stretched to 10ms. A segment that still has
/// no positive duration afterwards is a simulator bug and is reported as
/// `Error::InvalidSegment`.
pub fn dialogue_line(track: &MessageTrack, segment: &Segment, config: &RenderConfig) -> Result<String> {
    let start = segment.start;
    let mut end = segment.end;
    if end <= start + MIN_DURATION_SECS {
        end = start + MIN_DURATION_SECS;
    }
    if !start.is_finite() || !end.is_finite() || end <= start {
        return Err(Error::InvalidSegment {
            start: segment.start,
            end: segment.end,
        });
    }

    let x = config.margin_l;
    let y = config.slot_y(segment.slot);
    let slide_ms = millis(config.slide_secs);
    let fade_ms = millis(config.fade_out_secs);

    // Bottom-left anchor
    let mut tags = String::from("\\an1");
    match segment.moved_from {
        Some(from) if slide_ms > 0 => {
            let y0 = config.slot_y(from);
            let _ = write!(tags, "\\move({x},{y0},{x},{y},0,{slide_ms})");
        }
        _ => {
            let _ = write!(tags, "\\pos({x},{y})");
        }
    }
    if segment.is_final && fade_ms > 0 {
        let _ = write!(tags, "\\fad(0,{fade_ms})");
    }

    let text = render_text(&track.message.name, &track.message.body, config);

    Ok(format!(
        "Dialogue: 0,{},{},{},,{},{},{},,{{{}}}{}",
        ass_time(start),
        ass_time(end),
        STYLE_NAME,
        config.margin_l,
        config.margin_r,
        config.margin_v,
        tags,
        text,
    ))
}

/// Renders a complete ASS script for the timeline
pub fn render_script(timeline: &Timeline, config: &RenderConfig) -> Result<String> {
    config.validate()?;

    let mut script = script_header(config);
    for (track, segment) in timeline.segments() {
        script.push_str(&dialogue_line(track, segment, config)?);
        script.push('\n');
    }

    tracing::debug!(
        lines = timeline.segment_count(),
        bytes = script.len(),
        "rendered ASS script"
    );
    Ok(script)
}
