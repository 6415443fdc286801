//! Scene rendering with tiny-skia
//!
//! Rasterizes a [`SceneLayout`] into a pixmap. Labels go through the
//! [`TextRasterizer`] when a font is configured; without one each label is
//! drawn as a tinted bar of roughly the same extent.

use std::path::Path;

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect as SkiaRect, Stroke, Transform};
use tracing::{debug, warn};

use crate::config::UiConfig;
use crate::domain::core::Rect;
use crate::ui::layout::{BoxItem, Icon, IconKind, Label, SceneLayout, palette};
use crate::ui::text::TextRasterizer;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create pixmap for rendering")]
    PixmapCreationFailed,

    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Failed to read font {path}: {source}")]
    FontIo {
        path: String,
        source: std::io::Error,
    },

    #[error("Font data is not a valid TrueType/OpenType font")]
    InvalidFont,

    #[error("Failed to write image: {0}")]
    Encode(String),
}

/// Average glyph advance as a fraction of font size, for placeholder bars
const PLACEHOLDER_ADVANCE: f32 = 0.5;

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

/// Draws scene layouts
#[derive(Debug, Default)]
pub struct SceneRenderer {
    text: Option<TextRasterizer>,
}

impl SceneRenderer {
    /// Renderer with placeholder text
    pub fn new() -> Self {
        Self { text: None }
    }

    /// Renderer using the font from `ui.font_path`, if any
    pub fn with_font(ui: &UiConfig) -> Result<Self, RendererError> {
        let text = match &ui.font_path {
            Some(path) => {
                let rasterizer = TextRasterizer::from_file(path)?;
                debug!(path = %path.display(), "Loaded font");
                Some(rasterizer)
            }
            None => None,
        };
        Ok(Self { text })
    }

    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    /// Render a layout to a new pixmap
    pub fn render(&self, layout: &SceneLayout) -> Result<Pixmap, RendererError> {
        if layout.canvas_width == 0 || layout.canvas_height == 0 {
            return Err(RendererError::InvalidDimensions {
                width: layout.canvas_width,
                height: layout.canvas_height,
            });
        }
        let mut pixmap = Pixmap::new(layout.canvas_width, layout.canvas_height)
            .ok_or(RendererError::PixmapCreationFailed)?;
        pixmap.fill(palette::background());

        let canvas = Rect::from_size(layout.canvas_width as i32, layout.canvas_height as i32);
        for item in layout.boxes.iter().filter(|b| b.rect.intersects(&canvas)) {
            self.render_box(&mut pixmap, item);
        }
        for icon in &layout.icons {
            self.render_icon(&mut pixmap, icon);
        }
        for label in &layout.labels {
            self.render_label(&mut pixmap, label);
        }

        Ok(pixmap)
    }

    fn render_box(&self, pixmap: &mut Pixmap, item: &BoxItem) {
        let Some(rect) = SkiaRect::from_xywh(
            item.rect.x as f32,
            item.rect.y as f32,
            item.rect.w as f32,
            item.rect.h as f32,
        ) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);

        if let Some(fill) = item.fill {
            pixmap.fill_path(&path, &paint(fill), FillRule::Winding, Transform::identity(), None);
        }
        if let Some(color) = item.stroke {
            let stroke = Stroke {
                width: item.stroke_width.max(1.0),
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
        }
    }

    fn render_icon(&self, pixmap: &mut Pixmap, icon: &Icon) {
        let mut circle = PathBuilder::new();
        circle.push_circle(icon.cx, icon.cy, icon.radius);
        if let Some(path) = circle.finish() {
            pixmap.fill_path(&path, &paint(icon.color), FillRule::Winding, Transform::identity(), None);
        }

        let r = icon.radius * 0.45;
        let glyph = match icon.kind {
            IconKind::Play => {
                let mut pb = PathBuilder::new();
                pb.move_to(icon.cx - r * 0.6, icon.cy - r);
                pb.line_to(icon.cx + r, icon.cy);
                pb.line_to(icon.cx - r * 0.6, icon.cy + r);
                pb.close();
                pb.finish()
            }
            IconKind::Pause => {
                let mut pb = PathBuilder::new();
                let bar = r * 0.35;
                for left in [icon.cx - r * 0.7, icon.cx + r * 0.7 - bar] {
                    if let Some(rect) = SkiaRect::from_xywh(left, icon.cy - r, bar, r * 2.0) {
                        pb.push_rect(rect);
                    }
                }
                pb.finish()
            }
            IconKind::Stop => {
                SkiaRect::from_xywh(icon.cx - r * 0.8, icon.cy - r * 0.8, r * 1.6, r * 1.6)
                    .map(PathBuilder::from_rect)
            }
        };
        if let Some(path) = glyph {
            pixmap.fill_path(
                &path,
                &paint(palette::on_accent()),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn render_label(&self, pixmap: &mut Pixmap, label: &Label) {
        if let Some(text) = &self.text {
            text.draw(pixmap, label);
            return;
        }

        // Bar covering the x-height band of the text
        let width = PLACEHOLDER_ADVANCE * label.size * label.text.chars().count() as f32;
        let height = label.size * 0.5;
        if let Some(rect) = SkiaRect::from_xywh(label.x, label.y - height, width, height) {
            let mut color = label.color;
            color.apply_opacity(0.6);
            pixmap.fill_rect(rect, &paint(color), Transform::identity(), None);
        }
    }

    /// Raw RGBA bytes (premultiplied) of a rendered frame
    pub fn pixmap_to_rgba(&self, pixmap: &Pixmap) -> Vec<u8> {
        pixmap.data().to_vec()
    }
}

/// Write a frame as PNG
pub fn save_png(pixmap: &Pixmap, path: &Path) -> Result<(), RendererError> {
    pixmap.save_png(path).map_err(|err| {
        warn!(path = %path.display(), error = %err, "Failed to write frame");
        RendererError::Encode(err.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::FormState;
    use crate::domain::playback::PlaybackState;
    use crate::domain::validation::Validator;

    fn is_white(pixmap: &Pixmap, x: u32, y: u32) -> bool {
        let px = pixmap.pixel(x, y).unwrap();
        (px.red(), px.green(), px.blue(), px.alpha()) == (255, 255, 255, 255)
    }

    #[test]
    fn renders_at_viewport_size() {
        let ui = UiConfig::default();
        let form = FormState::new(&Validator::default());
        let layout = SceneLayout::signup(&form, false, &ui);

        let pixmap = SceneRenderer::new().render(&layout).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (ui.viewport_width, ui.viewport_height));
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let ui = UiConfig::default();
        let mut layout = SceneLayout::main("Ann", PlaybackState::Stopped, 0.0, &ui);
        layout.canvas_width = 0;
        let result = SceneRenderer::new().render(&layout);
        assert!(matches!(result, Err(RendererError::InvalidDimensions { width: 0, .. })));
    }

    #[test]
    fn banner_is_drawn_where_progress_puts_it() {
        let ui = UiConfig::default();
        let layout = SceneLayout::main("Ann", PlaybackState::Playing, 0.5, &ui);
        let banner = layout.banner().unwrap();
        let pixmap = SceneRenderer::new().render(&layout).unwrap();

        // Inside the banner, just below its top edge and left of its label
        let inside_x = (banner.x + 2) as u32;
        let inside_y = (banner.y + 2) as u32;
        assert!(!is_white(&pixmap, inside_x, inside_y));

        // Same row, left of the banner
        assert!(is_white(&pixmap, (banner.x - 20) as u32, inside_y));
    }

    #[test]
    fn banner_off_screen_at_start() {
        let ui = UiConfig::default();
        let layout = SceneLayout::main("Ann", PlaybackState::Stopped, 0.0, &ui);
        let banner = layout.banner().unwrap();
        let pixmap = SceneRenderer::new().render(&layout).unwrap();
        assert!(is_white(&pixmap, ui.viewport_width - 1, (banner.y + 2) as u32));
    }

    #[test]
    fn rgba_buffer_covers_every_pixel() {
        let ui = UiConfig::default();
        let renderer = SceneRenderer::new();
        let layout = SceneLayout::main("Ann", PlaybackState::Paused, 0.25, &ui);
        let pixmap = renderer.render(&layout).unwrap();
        let rgba = renderer.pixmap_to_rgba(&pixmap);
        assert_eq!(rgba.len(), (ui.viewport_width * ui.viewport_height * 4) as usize);
    }

    #[test]
    fn missing_font_fails_construction() {
        let ui = UiConfig {
            font_path: Some("/no/such/font.ttf".into()),
            ..UiConfig::default()
        };
        assert!(matches!(SceneRenderer::with_font(&ui), Err(RendererError::FontIo { .. })));
        assert!(!SceneRenderer::with_font(&UiConfig::default()).unwrap().has_font());
    }

    #[test]
    fn frames_are_written_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let ui = UiConfig::default();
        let layout = SceneLayout::main("Ann", PlaybackState::Stopped, 0.0, &ui);
        let pixmap = SceneRenderer::new().render(&layout).unwrap();

        save_png(&pixmap, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
