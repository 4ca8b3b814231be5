// Keyboard parameter panel.
// Visual: a small translucent box in the top-left corner listing every
// setting; the selected line is marked with ">" and Left/Right change it.
//
// The panel only edits the Config. Anything else a change needs (new grain
// tile, new blob shape) comes back as a `Hook` for the main loop to run.

use crate::config::Config;
use crate::draw::{draw_text_5x7, fill_rect, shade_rect, GLYPH_ADVANCE, LINE_HEIGHT};
use crate::types::{FrameBuffer, Rgb};

/// Colors a color control steps through, wrapping at both ends.
const PALETTE: &[Rgb] = &[
    Rgb::WHITE,
    Rgb::new(0xFE, 0x5F, 0x38),
    Rgb::new(0xFF, 0xC8, 0x3D),
    Rgb::new(0x3D, 0xDC, 0x84),
    Rgb::new(0x2E, 0xC4, 0xE6),
    Rgb::new(0x61, 0x44, 0xE3),
    Rgb::new(0x1E, 0x3A, 0x8A),
    Rgb::new(0xE3, 0x44, 0xB5),
    Rgb::new(0xFF, 0x2E, 0x2E),
    Rgb::new(0xF5, 0xE6, 0xC8),
    Rgb::new(0x80, 0x80, 0x80),
    Rgb::BLACK,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param {
    Radius,
    Variation,
    Segments,
    Offset,
    FrontColor,
    BackColor,
    Blur,
    BlurAmount,
    Grain,
    GrainAnimate,
    GrainAmount,
    GrainHardness,
    GrainSize,
    GrainColor,
    AnimationSpeed,
    AnimationAmount,
    Animate,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Kind {
    Slider { min: f64, max: f64, step: f64 },
    Color,
    Toggle,
}

#[derive(Clone, Copy, Debug)]
pub struct Control {
    pub param: Param,
    pub label: &'static str,
    pub kind: Kind,
}

const fn slider(param: Param, label: &'static str, min: f64, max: f64, step: f64) -> Control {
    Control { param, label, kind: Kind::Slider { min, max, step } }
}

const fn color(param: Param, label: &'static str) -> Control {
    Control { param, label, kind: Kind::Color }
}

const fn toggle(param: Param, label: &'static str) -> Control {
    Control { param, label, kind: Kind::Toggle }
}

/// Panel rows, top to bottom.
pub const CONTROLS: &[Control] = &[
    slider(Param::Radius, "radius", 20.0, 200.0, 1.0),
    slider(Param::Variation, "variation", 0.0, 100.0, 1.0),
    slider(Param::Segments, "segments", 3.0, 20.0, 1.0),
    slider(Param::Offset, "offset", 0.0, 400.0, 5.0),
    color(Param::FrontColor, "front color"),
    color(Param::BackColor, "back color"),
    toggle(Param::Blur, "blur"),
    slider(Param::BlurAmount, "blur amount", 0.0, 500.0, 5.0),
    toggle(Param::Grain, "grain"),
    toggle(Param::GrainAnimate, "grain animate"),
    slider(Param::GrainAmount, "grain amount", 0.0, 1.0, 0.05),
    slider(Param::GrainHardness, "grain hardness", 0.0, 1.0, 0.05),
    slider(Param::GrainSize, "grain size", 1.0, 8.0, 0.1),
    color(Param::GrainColor, "grain color"),
    slider(Param::AnimationSpeed, "speed", 0.1, 5.0, 0.1),
    slider(Param::AnimationAmount, "amount", 0.0, 50.0, 1.0),
    toggle(Param::Animate, "animate"),
];

/// Side effect a change requires beyond the Config edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hook {
    /// Grain color/hardness/size changed: rebuild the grain tile now.
    RegenerateGrain,
    /// Segment count changed: new random offsets for both blobs.
    ResizeSegments(usize),
}

pub struct Panel {
    selected: usize,
    pub visible: bool,
}

impl Default for Panel {
    fn default() -> Self {
        Self { selected: 0, visible: true }
    }
}

impl Panel {
    pub fn new(visible: bool) -> Self {
        Self { selected: 0, visible }
    }

    pub fn selected(&self) -> &'static Control {
        &CONTROLS[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % CONTROLS.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + CONTROLS.len() - 1) % CONTROLS.len();
    }

    #[cfg(test)]
    pub fn select(&mut self, param: Param) {
        if let Some(i) = CONTROLS.iter().position(|c| c.param == param) {
            self.selected = i;
        }
    }

    /// Move the selected control by `steps` (negative = down).
    /// Toggles flip on any non-zero step.
    pub fn adjust(&mut self, config: &mut Config, steps: i32) -> Option<Hook> {
        if steps == 0 {
            return None;
        }
        let control = *self.selected();
        let changed = match control.kind {
            Kind::Slider { min, max, step } => {
                let old = slider_value(config, control.param);
                let new = snap(old + step * steps as f64, min, max, step);
                set_slider(config, control.param, new);
                slider_value(config, control.param) != old
            }
            Kind::Color => {
                let c = color_value(config, control.param);
                *color_value_mut(config, control.param) = palette_step(c, steps);
                color_value(config, control.param) != c
            }
            Kind::Toggle => {
                flip(config, control.param);
                true
            }
        };
        if changed {
            tracing::debug!(param = control.label, "panel change");
            hook_for(control.param, config)
        } else {
            None
        }
    }

    /// Flip the selected toggle; other kinds ignore it.
    pub fn toggle(&mut self, config: &mut Config) -> Option<Hook> {
        if self.selected().kind == Kind::Toggle {
            self.adjust(config, 1)
        } else {
            None
        }
    }

    /// Draw the panel in the top-left corner, below `top`.
    pub fn render(&self, fb: &mut FrameBuffer, config: &Config, top: i32) {
        if !self.visible {
            return;
        }
        let label_cols = CONTROLS.iter().map(|c| c.label.len()).max().unwrap_or(0) + 3;
        let width = (label_cols + 10) as i32 * GLYPH_ADVANCE + 8;
        let height = CONTROLS.len() as i32 * LINE_HEIGHT + 8;
        shade_rect(fb, 4, top, width, height);

        for (i, c) in CONTROLS.iter().enumerate() {
            let y = top + 4 + i as i32 * LINE_HEIGHT;
            let marker = if i == self.selected { ">" } else { " " };
            let text = format!("{marker} {:<w$}{}", c.label, value_text(config, c), w = label_cols - 2);
            let ink = if i == self.selected { 0x00_FF_CC_33 } else { 0x00_FF_FF_FF };
            draw_text_5x7(fb, 8, y, &text, ink);

            if c.kind == Kind::Color {
                let sx = 8 + (label_cols as i32 + 8) * GLYPH_ADVANCE;
                fill_rect(fb, sx, y, 7, 7, color_value(config, c.param).to_u32());
            }
        }
    }
}

/// Clamp into [min, max] and round to the slider grid.
fn snap(v: f64, min: f64, max: f64, step: f64) -> f64 {
    let v = v.clamp(min, max);
    let snapped = min + ((v - min) / step).round() * step;
    // Keep decimal steps tidy (0.1 * 3 != 0.3).
    let snapped = (snapped * 1e6).round() / 1e6;
    snapped.clamp(min, max)
}

/// Move `steps` entries along the palette, starting from the entry closest
/// to `current` (colors loaded from a file need not be in it).
fn palette_step(current: Rgb, steps: i32) -> Rgb {
    let distance = |c: &Rgb| {
        let d = |a: u8, b: u8| (a as i32 - b as i32).pow(2);
        d(c.r, current.r) + d(c.g, current.g) + d(c.b, current.b)
    };
    let start = PALETTE
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| distance(c))
        .map_or(0, |(i, _)| i);
    let idx = (start as i64 + steps as i64).rem_euclid(PALETTE.len() as i64);
    PALETTE[idx as usize]
}

fn value_text(config: &Config, c: &Control) -> String {
    match c.kind {
        Kind::Slider { step, .. } => {
            let v = slider_value(config, c.param);
            if step >= 1.0 { format!("{v:.0}") } else { format!("{v:.2}") }
        }
        Kind::Color => color_value(config, c.param).to_string(),
        Kind::Toggle => if toggle_value(config, c.param) { "on".into() } else { "off".into() },
    }
}

fn hook_for(param: Param, config: &Config) -> Option<Hook> {
    match param {
        Param::Segments => Some(Hook::ResizeSegments(config.segments)),
        Param::GrainColor | Param::GrainHardness | Param::GrainSize => Some(Hook::RegenerateGrain),
        _ => None,
    }
}

fn slider_value(config: &Config, param: Param) -> f64 {
    match param {
        Param::Radius => config.radius,
        Param::Variation => config.variation,
        Param::Segments => config.segments as f64,
        Param::Offset => config.offset,
        Param::BlurAmount => config.blur_amount,
        Param::GrainAmount => config.grain_amount,
        Param::GrainHardness => config.grain_hardness,
        Param::GrainSize => config.grain_size,
        Param::AnimationSpeed => config.animation_speed,
        Param::AnimationAmount => config.animation_amount,
        _ => 0.0,
    }
}

fn set_slider(config: &mut Config, param: Param, v: f64) {
    match param {
        Param::Radius => config.radius = v,
        Param::Variation => config.variation = v,
        Param::Segments => config.segments = v.round() as usize,
        Param::Offset => config.offset = v,
        Param::BlurAmount => config.blur_amount = v,
        Param::GrainAmount => config.grain_amount = v,
        Param::GrainHardness => config.grain_hardness = v,
        Param::GrainSize => config.grain_size = v,
        Param::AnimationSpeed => config.animation_speed = v,
        Param::AnimationAmount => config.animation_amount = v,
        _ => {}
    }
}

fn color_value(config: &Config, param: Param) -> Rgb {
    match param {
        Param::FrontColor => config.front_color,
        Param::BackColor => config.back_color,
        _ => config.grain_color,
    }
}

fn color_value_mut(config: &mut Config, param: Param) -> &mut Rgb {
    match param {
        Param::FrontColor => &mut config.front_color,
        Param::BackColor => &mut config.back_color,
        _ => &mut config.grain_color,
    }
}

fn toggle_value(config: &Config, param: Param) -> bool {
    match param {
        Param::Blur => config.blur,
        Param::Grain => config.grain,
        Param::GrainAnimate => config.grain_animate,
        Param::Animate => config.animate,
        _ => false,
    }
}

fn flip(config: &mut Config, param: Param) {
    match param {
        Param::Blur => config.blur = !config.blur,
        Param::Grain => config.grain = !config.grain,
        Param::GrainAnimate => config.grain_animate = !config.grain_animate,
        Param::Animate => config.animate = !config.animate,
        _ => {}
    }
}
