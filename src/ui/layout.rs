//! Screen layouts
//!
//! Turns screen state into positioned boxes, labels and icons. Layout is
//! kept apart from rasterization so it can be checked without pixels.

use tiny_skia::Color;

use crate::config::UiConfig;
use crate::domain::core::{Rect, lerp};
use crate::domain::form::{FieldId, FormState, Mode};
use crate::domain::playback::PlaybackState;

/// Colour scheme shared by both screens
pub mod palette {
    use tiny_skia::Color;

    pub fn unicorn() -> Color {
        Color::from_rgba8(155, 89, 182, 255)
    }

    pub fn error() -> Color {
        Color::from_rgba8(255, 99, 71, 255) // tomato
    }

    pub fn stop() -> Color {
        Color::from_rgba8(238, 130, 238, 255) // violet
    }

    pub fn background() -> Color {
        Color::WHITE
    }

    pub fn on_accent() -> Color {
        Color::WHITE
    }
}

const DISABLED_OPACITY: f32 = 0.5;
const PADDING_X: i32 = 16;
const PADDING_Y: i32 = 32;
const FIELD_LABEL_HEIGHT: i32 = 18;
const FIELD_INPUT_HEIGHT: i32 = 40;
const FIELD_ERROR_HEIGHT: i32 = 18;
const FIELD_GAP: i32 = 8;
const BUTTON_HEIGHT: i32 = 48;
const BUTTON_GAP: i32 = 16;

/// Filled and/or outlined rectangle
#[derive(Debug, Clone)]
pub struct BoxItem {
    pub rect: Rect,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
}

/// Single line of text, `y` is the baseline
#[derive(Debug, Clone)]
pub struct Label {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Play,
    Pause,
    Stop,
}

/// Round control button with a glyph
#[derive(Debug, Clone)]
pub struct Icon {
    pub kind: IconKind,
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub color: Color,
    pub enabled: bool,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct SceneLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub boxes: Vec<BoxItem>,
    pub labels: Vec<Label>,
    pub icons: Vec<Icon>,
}

/// Horizontal offset of the banner: enters from the right edge at 0 and has
/// fully left on the left at 1
pub fn banner_x(progress: f64, viewport_width: u32, banner_width: u32) -> f64 {
    lerp(f64::from(viewport_width), -f64::from(banner_width), progress.clamp(0.0, 1.0))
}

fn faded(color: Color, enabled: bool) -> Color {
    if enabled {
        return color;
    }
    let mut color = color;
    color.apply_opacity(DISABLED_OPACITY);
    color
}

impl SceneLayout {
    fn empty(ui: &UiConfig) -> Self {
        Self {
            canvas_width: ui.viewport_width,
            canvas_height: ui.viewport_height,
            boxes: Vec::new(),
            labels: Vec::new(),
            icons: Vec::new(),
        }
    }

    fn label(&mut self, text: impl Into<String>, x: i32, baseline: i32, size: f32, color: Color) {
        self.labels.push(Label {
            text: text.into(),
            x: x as f32,
            y: baseline as f32,
            size,
            color,
        });
    }

    fn button(&mut self, rect: Rect, title: &str, filled: bool, enabled: bool) {
        let accent = faded(palette::unicorn(), enabled);
        self.boxes.push(BoxItem {
            rect,
            fill: filled.then_some(accent),
            stroke: Some(accent),
            stroke_width: 1.0,
        });
        let text_color = if filled { palette::on_accent() } else { accent };
        let size = 16.0;
        self.label(title, rect.x + 12, rect.y + rect.h / 2 + (size as i32) / 3, size, text_color);
    }

    /// Signup/login form
    pub fn signup(form: &FormState, can_submit: bool, ui: &UiConfig) -> Self {
        let mut layout = Self::empty(ui);
        let viewport = Rect::from_size(ui.viewport_width as i32, ui.viewport_height as i32);
        let mut rest = viewport.inset(PADDING_X, PADDING_Y);

        let place_field = |layout: &mut Self, rest: &mut Rect, field: FieldId| {
            let (title, placeholder) = match field {
                FieldId::Email => ("Email", "your.email@parad.ise"),
                FieldId::Password => ("Password", "Your password"),
                FieldId::Name => ("Name", "Your name"),
            };
            let state = form.field(field);

            let (label_band, below) = rest.take_top(FIELD_LABEL_HEIGHT);
            layout.label(title, label_band.x, label_band.bottom() - 4, 12.0, palette::unicorn());

            let (input, below) = below.take_top(FIELD_INPUT_HEIGHT);
            let border = if state.error_visible { palette::error() } else { palette::unicorn() };
            layout.boxes.push(BoxItem {
                rect: input,
                fill: None,
                stroke: Some(border),
                stroke_width: 1.0,
            });
            let baseline = input.y + input.h / 2 + 4;
            if state.is_empty() {
                let mut hint = Color::BLACK;
                hint.apply_opacity(0.35);
                layout.label(placeholder, input.x + 8, baseline, 13.0, hint);
            } else if field == FieldId::Password {
                let masked = "\u{2022}".repeat(state.raw_value.chars().count());
                layout.label(masked, input.x + 8, baseline, 13.0, Color::BLACK);
            } else {
                layout.label(state.raw_value.clone(), input.x + 8, baseline, 13.0, Color::BLACK);
            }

            let (error_band, below) = below.take_top(FIELD_ERROR_HEIGHT);
            if let Some(message) = form.error_message(field) {
                layout.label(message, error_band.x, error_band.bottom() - 4, 12.0, palette::error());
            }
            *rest = below.take_top(FIELD_GAP).1;
        };

        place_field(&mut layout, &mut rest, FieldId::Email);
        place_field(&mut layout, &mut rest, FieldId::Password);

        if let Some(auth_error) = &form.auth_error {
            let (band, below) = rest.take_top(FIELD_ERROR_HEIGHT);
            layout.label(auth_error.clone(), band.x + 4, band.bottom() - 4, 12.0, palette::error());
            rest = below;
        }

        if form.mode == Mode::Register {
            place_field(&mut layout, &mut rest, FieldId::Name);
        }

        let (primary, secondary) = match form.mode {
            Mode::Register => ("Register", "Login"),
            Mode::Login => ("Login", "I don't have an account"),
        };
        let (_, below) = rest.take_top(BUTTON_GAP);
        let (button, below) = below.take_top(BUTTON_HEIGHT);
        layout.button(button.inset(4, 0), primary, true, can_submit);
        let (_, below) = below.take_top(BUTTON_GAP);
        let (button, _) = below.take_top(BUTTON_HEIGHT);
        layout.button(button.inset(4, 0), secondary, false, true);

        layout
    }

    /// Main screen: greeting, transport controls, banner and logout
    pub fn main(name: &str, playback: PlaybackState, progress: f64, ui: &UiConfig) -> Self {
        let mut layout = Self::empty(ui);
        let width = ui.viewport_width as i32;
        let height = ui.viewport_height as i32;

        layout.label(
            format!("Welcome {name} to \u{1F984} paradise"),
            PADDING_X,
            72,
            26.0,
            palette::unicorn(),
        );

        let controls_y = (height as f32) * 0.3;
        let center_x = width as f32 / 2.0;
        let toggle = if playback == PlaybackState::Playing {
            IconKind::Pause
        } else {
            IconKind::Play
        };
        layout.icons.push(Icon {
            kind: toggle,
            cx: center_x - 40.0,
            cy: controls_y,
            radius: 32.0,
            color: palette::unicorn(),
            enabled: true,
        });
        let stop_enabled = playback != PlaybackState::Stopped;
        layout.icons.push(Icon {
            kind: IconKind::Stop,
            cx: center_x + 40.0,
            cy: controls_y,
            radius: 24.0,
            color: faded(palette::stop(), stop_enabled),
            enabled: stop_enabled,
        });

        let banner_height = 56;
        let banner_top = (height as f32 * 0.45) as i32;
        let x = banner_x(progress, ui.viewport_width, ui.banner_width).round() as i32;
        let banner = Rect::new(x, banner_top, ui.banner_width as i32, banner_height);
        let mut tint = palette::unicorn();
        tint.apply_opacity(0.2);
        layout.boxes.push(BoxItem {
            rect: banner,
            fill: Some(tint),
            stroke: None,
            stroke_width: 0.0,
        });
        layout.label(
            "\u{1F984} \u{1F984} \u{1F984}",
            banner.x + 8,
            banner.y + 40,
            40.0,
            palette::unicorn(),
        );

        let logout = Rect::new(32, height - PADDING_Y - BUTTON_HEIGHT, width - 64, BUTTON_HEIGHT);
        layout.button(logout, "Logout", false, true);

        layout
    }

    /// Banner rectangle of a main-screen layout
    pub fn banner(&self) -> Option<Rect> {
        self.boxes.iter().find(|b| b.stroke.is_none()).map(|b| b.rect)
    }

    pub fn icon(&self, kind: IconKind) -> Option<&Icon> {
        self.icons.iter().find(|icon| icon.kind == kind)
    }

    pub fn has_label(&self, text: &str) -> bool {
        self.labels.iter().any(|label| label.text == text)
    }
}
