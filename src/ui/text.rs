//! Glyph rasterization with ab_glyph

use std::path::Path;

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::{Color, Pixmap, PremultipliedColorU8};

use crate::ui::layout::Label;
use crate::ui::renderer::RendererError;

/// Draws labels with an outline font
pub struct TextRasterizer {
    font: FontVec,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl TextRasterizer {
    pub fn from_file(path: &Path) -> Result<Self, RendererError> {
        let data = std::fs::read(path).map_err(|source| RendererError::FontIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(data)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, RendererError> {
        let font = FontVec::try_from_vec(data).map_err(|_| RendererError::InvalidFont)?;
        Ok(Self { font })
    }

    /// Rasterizes `label` onto the pixmap, left-aligned on its baseline
    pub fn draw(&self, pixmap: &mut Pixmap, label: &Label) {
        let scale = PxScale::from(label.size);
        let scaled = self.font.as_scaled(scale);
        let mut caret = point(label.x, label.y);
        let mut previous: Option<GlyphId> = None;

        for ch in label.text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret.x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let x = bounds.min.x as i32 + gx as i32;
                    let y = bounds.min.y as i32 + gy as i32;
                    blend_pixel(pixmap, x, y, label.color, coverage);
                });
            }
        }
    }
}

/// Source-over blend of `color` at `coverage` into one pixel
pub(crate) fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: Color, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= pixmap.width() || y as u32 >= pixmap.height() {
        return;
    }
    let index = (y as u32 * pixmap.width() + x as u32) as usize;
    let alpha = (color.alpha() * coverage).clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let pixels = pixmap.pixels_mut();
    let dst = pixels[index];
    let keep = 1.0 - alpha;
    let channel = |src: f32, dst: u8| (src * alpha * 255.0 + f32::from(dst) * keep).round().clamp(0.0, 255.0) as u8;

    let a = channel(1.0, dst.alpha());
    let r = channel(color.red(), dst.red()).min(a);
    let g = channel(color.green(), dst.green()).min(a);
    let b = channel(color.blue(), dst.blue()).min(a);
    if let Some(blended) = PremultipliedColorU8::from_rgba(r, g, b, a) {
        pixels[index] = blended;
    }
}
