//! Text engine for watermark tiles.
//!
//! Fonts come from three places, tried in this order by [`resolve_font`]:
//!
//! - a font file path (`/usr/share/fonts/.../DejaVuSans.ttf`)
//! - a family name looked up in the system font database (`"DejaVu Sans"`)
//! - the built-in 8×8 bitmap font, which always succeeds
//!
//! Outline fonts are rasterized with `ab_glyph`. The bitmap font draws every
//! glyph in a fixed 8×8 cell; it ignores the requested size.

use std::fmt;
use std::path::Path;

use ab_glyph::{Font, FontVec, GlyphId, PxScale, PxScaleFont, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use image::{Rgba, RgbaImage};
use tracing::debug;

use super::layout::TilePosition;
use super::WatermarkError;

/// Cell size of the built-in bitmap font
pub const BITMAP_CELL: u32 = 8;

/// Installed fonts available to the watermark renderer.
///
/// Built once at startup and shared read-only between requests.
pub struct FontLibrary {
    db: Database,
}

impl FontLibrary {
    /// Create the library, scanning the system font directories when
    /// `load_system_fonts` is set.
    pub fn new(load_system_fonts: bool) -> Self {
        let mut db = Database::new();
        if load_system_fonts {
            db.load_system_fonts();
        }
        debug!(faces = db.len(), "Font library initialised");
        Self { db }
    }

    /// Number of font faces known to the library
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Load `candidate` (a font file path or a family name) at `size` pixels.
    pub fn load_font(&self, candidate: &str, size: u32) -> Result<WatermarkFont, WatermarkError> {
        let path = Path::new(candidate);
        let font = if path.is_file() {
            let data = std::fs::read(path).map_err(|e| {
                WatermarkError::FontLoadError(format!("{}: {}", candidate, e))
            })?;
            FontVec::try_from_vec(data).map_err(|e| {
                WatermarkError::FontLoadError(format!("{}: {}", candidate, e))
            })?
        } else {
            self.load_family(candidate)?
        };

        Ok(WatermarkFont::Outline {
            name: candidate.to_string(),
            font,
            scale: PxScale::from(size.max(1) as f32),
        })
    }

    fn load_family(&self, family: &str) -> Result<FontVec, WatermarkError> {
        let query = Query {
            families: &[Family::Name(family)],
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query).ok_or_else(|| {
            WatermarkError::FontLoadError(format!("{}: no installed face", family))
        })?;

        self.db
            .with_face_data(id, |data, index| {
                FontVec::try_from_vec_and_index(data.to_vec(), index)
            })
            .ok_or_else(|| {
                WatermarkError::FontLoadError(format!("{}: face data unavailable", family))
            })?
            .map_err(|e| WatermarkError::FontLoadError(format!("{}: {}", family, e)))
    }
}

impl fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontLibrary")
            .field("faces", &self.db.len())
            .finish()
    }
}

/// A font ready to measure and draw text at one size.
pub enum WatermarkFont {
    /// Scalable font rasterized with `ab_glyph`
    Outline {
        name: String,
        font: FontVec,
        scale: PxScale,
    },
    /// Built-in 8×8 bitmap font
    Bitmap,
}

impl fmt::Debug for WatermarkFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outline { name, scale, .. } => f
                .debug_struct("Outline")
                .field("name", name)
                .field("scale", &scale.y)
                .finish(),
            Self::Bitmap => f.write_str("Bitmap"),
        }
    }
}

impl WatermarkFont {
    pub fn name(&self) -> &str {
        match self {
            Self::Outline { name, .. } => name,
            Self::Bitmap => "builtin-8x8",
        }
    }

    pub fn is_bitmap(&self) -> bool {
        matches!(self, Self::Bitmap)
    }

    /// Width and height in pixels of `text` drawn on one line.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            Self::Outline { font, scale, .. } => {
                let scaled = font.as_scaled(*scale);
                let width = pen_positions(&scaled, text)
                    .last()
                    .map_or(0.0, |(id, x)| x + scaled.h_advance(id));

                let height = if text.is_empty() {
                    0.0
                } else {
                    scaled.height()
                };
                (width.max(0.0).ceil() as u32, height.ceil() as u32)
            }
            Self::Bitmap => {
                let chars = text.chars().count() as u32;
                let height = if chars == 0 { 0 } else { BITMAP_CELL };
                (chars * BITMAP_CELL, height)
            }
        }
    }

    /// Draw `text` with its top-left corner at `position`, blending over the
    /// existing canvas pixels. Pixels outside the canvas are skipped.
    pub fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        position: TilePosition,
        text: &str,
        color: Rgba<u8>,
    ) {
        match self {
            Self::Outline { font, scale, .. } => {
                draw_outline(canvas, font, *scale, position, text, color)
            }
            Self::Bitmap => draw_bitmap(canvas, position, text, color),
        }
    }
}

fn draw_outline(
    canvas: &mut RgbaImage,
    font: &FontVec,
    scale: PxScale,
    position: TilePosition,
    text: &str,
    color: Rgba<u8>,
) {
    let scaled = font.as_scaled(scale);
    let baseline = position.y + scaled.ascent();

    for (id, offset) in pen_positions(&scaled, text) {
        let glyph = id.with_scale_and_position(scale, ab_glyph::point(position.x + offset, baseline));
        let Some(outline) = font.outline_glyph(glyph) else {
            continue;
        };
        let origin = outline.px_bounds().min;
        outline.draw(|gx, gy, coverage| {
            let alpha = (coverage.clamp(0.0, 1.0) * f32::from(color[3])).round() as u8;
            blend_at(
                canvas,
                i64::from(gx) + origin.x as i64,
                i64::from(gy) + origin.y as i64,
                Rgba([color[0], color[1], color[2], alpha]),
            );
        });
    }
}

/// Each glyph of `text` with the kerned pen offset it starts at.
fn pen_positions<'a>(
    scaled: &'a PxScaleFont<&'a FontVec>,
    text: &'a str,
) -> impl Iterator<Item = (GlyphId, f32)> + 'a {
    let mut pen = 0.0f32;
    let mut previous: Option<GlyphId> = None;
    text.chars().map(move |c| {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            pen += scaled.kern(prev, id);
        }
        let start = pen;
        pen += scaled.h_advance(id);
        previous = Some(id);
        (id, start)
    })
}

fn draw_bitmap(canvas: &mut RgbaImage, position: TilePosition, text: &str, color: Rgba<u8>) {
    let origin_x = position.x.round() as i64;
    let origin_y = position.y.round() as i64;

    for (index, c) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(c).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };
        let cell_x = origin_x + index as i64 * BITMAP_CELL as i64;

        // Bit 0 of each row byte is the leftmost column
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..BITMAP_CELL {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                blend_at(canvas, cell_x + col as i64, origin_y + row as i64, color);
            }
        }
    }
}

fn blend_at(canvas: &mut RgbaImage, x: i64, y: i64, top: Rgba<u8>) {
    if top[3] == 0 || x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    let blended = blend_pixels(*canvas.get_pixel(x, y), top);
    canvas.put_pixel(x, y, blended);
}

/// Source-over blend of `top` onto `bottom`.
fn blend_pixels(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let src = f32::from(top[3]) / 255.0;
    let dst = f32::from(bottom[3]) / 255.0 * (1.0 - src);
    let alpha = src + dst;
    if alpha <= 0.0 {
        return Rgba([0; 4]);
    }

    let mut out = [0u8; 4];
    for (channel, slot) in out.iter_mut().take(3).enumerate() {
        let value = (f32::from(top[channel]) * src + f32::from(bottom[channel]) * dst) / alpha;
        *slot = value.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (alpha * 255.0).round() as u8;
    Rgba(out)
}

/// A candidate that could not be loaded, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFailure {
    pub candidate: String,
    pub reason: String,
}

/// Outcome of the candidate search.
#[derive(Debug)]
pub struct FontResolution {
    /// The font to draw with
    pub font: WatermarkFont,
    /// Candidates tried before `font`, in order
    pub failures: Vec<FontFailure>,
}

impl FontResolution {
    pub fn used_fallback(&self) -> bool {
        self.font.is_bitmap()
    }
}

/// Try each candidate in order at `size` pixels; fall back to the bitmap font
/// when none loads. Never fails.
pub fn resolve_font(candidates: &[String], size: u32, library: &FontLibrary) -> FontResolution {
    let mut failures = Vec::new();

    for candidate in candidates {
        match library.load_font(candidate, size) {
            Ok(font) => {
                debug!(font = %candidate, size, "Resolved watermark font");
                return FontResolution { font, failures };
            }
            Err(e) => {
                debug!(font = %candidate, error = %e, "Font candidate unavailable");
                failures.push(FontFailure {
                    candidate: candidate.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(
        tried = failures.len(),
        "No font candidate loaded, using built-in bitmap font"
    );
    FontResolution {
        font: WatermarkFont::Bitmap,
        failures,
    }
}
