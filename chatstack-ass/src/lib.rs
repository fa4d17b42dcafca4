//! chatstack ASS Formatter
//!
//! This library turns a simulated chat timeline into an Advanced SubStation
//! Alpha script: one `Dialogue` line per segment, positioned by slot, with
//! optional slide and fade effects.

pub mod script;
pub mod text;
pub mod time;

pub use script::{dialogue_line, render_script, script_header};
pub use text::{escape, render_text};
pub use time::ass_time;

/// Result type for chatstack-ass operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for chatstack-ass operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid render configuration: {0}")]
    Configuration(String),

    #[error("Segment has no duration: start {start}, end {end}")]
    InvalidSegment { start: f64, end: f64 },
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Script canvas width (PlayResX)
    pub res_x: u32,
    /// Script canvas height (PlayResY)
    pub res_y: u32,
    pub margin_l: u32,
    pub margin_r: u32,
    pub margin_v: u32,
    pub font_name: String,
    pub font_size: u32,
    /// Outline width in pixels
    pub outline: u32,
    /// Shadow depth in pixels
    pub shadow: u32,
    /// Extra spacing between stacked lines in pixels
    pub line_gap: u32,
    /// Slide animation length when the stack moves (0 = no animation)
    pub slide_secs: f64,
    /// Fade-out length when a message disappears (0 = no fade)
    pub fade_out_secs: f64,
    /// Colour override for sender names
    pub name_colour: String,
    /// Colour override for message bodies
    pub body_colour: String,
    pub primary_colour: String,
    pub secondary_colour: String,
    pub outline_colour: String,
    pub back_colour: String,
}

impl RenderConfig {
    /// Height of one stack slot in pixels
    pub fn line_height(&self) -> u32 {
        self.font_size + self.line_gap + self.outline * 2
    }

    /// Baseline y coordinate for a slot, counted up from the bottom margin
    pub fn slot_y(&self, slot: usize) -> i64 {
        self.res_y as i64 - self.margin_v as i64 - slot as i64 * self.line_height() as i64
    }

    /// Checks that the configuration describes a drawable canvas
    pub fn validate(&self) -> Result<()> {
        if self.res_x == 0 || self.res_y == 0 {
            return Err(Error::Configuration(format!(
                "canvas must be non-empty, got {}x{}",
                self.res_x, self.res_y
            )));
        }
        if self.font_size == 0 {
            return Err(Error::Configuration("font size must be positive".to_string()));
        }
        for (label, secs) in [("slide", self.slide_secs), ("fade-out", self.fade_out_secs)] {
            if !secs.is_finite() || secs < 0.0 {
                return Err(Error::Configuration(format!(
                    "{label} duration must be zero or positive, got {secs}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            res_x: 1080,
            res_y: 1920,
            margin_l: 10,
            margin_r: 10,
            margin_v: 10,
            font_name: "Nanum Gothic".to_string(),
            font_size: 36,
            outline: 2,
            shadow: 0,
            line_gap: 2,
            slide_secs: 0.0,
            fade_out_secs: 0.0,
            name_colour: "&H00B0B0B0&".to_string(),
            body_colour: "&H00FFFFFF&".to_string(),
            primary_colour: "&H00FFFFFF".to_string(),
            secondary_colour: "&H000000FF".to_string(),
            outline_colour: "&H00000000".to_string(),
            back_colour: "&H64000000".to_string(),
        }
    }
}
