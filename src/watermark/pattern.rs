//! Pattern renderer: draws the tiled text onto the oversized canvas.

use image::{Rgba, RgbaImage};
use tracing::debug;

use super::layout::TileLayout;
use super::text_renderer::WatermarkFont;
use super::WatermarkError;

/// Background of a fresh canvas. White so that resampling during rotation
/// never pulls dark fringes into the white text.
pub const TRANSPARENT_WHITE: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Fill used for the text: white at `alpha`.
pub fn text_fill(alpha: u8) -> Rgba<u8> {
    Rgba([255, 255, 255, alpha])
}

/// Render `text` at every tile position of a `canvas_size` canvas.
///
/// Text is drawn horizontally; rotation happens afterwards on the whole
/// canvas.
pub fn render_pattern(
    text: &str,
    font: &WatermarkFont,
    canvas_size: (u32, u32),
    density: u32,
    fill: Rgba<u8>,
) -> Result<RgbaImage, WatermarkError> {
    let text_size = font.measure(text);
    let layout = TileLayout::new(text_size, canvas_size, density)?;

    let mut canvas = RgbaImage::from_pixel(canvas_size.0, canvas_size.1, TRANSPARENT_WHITE);
    let mut tiles = 0usize;
    for position in layout.positions() {
        font.draw_text(&mut canvas, position, text, fill);
        tiles += 1;
    }

    debug!(
        text_width = text_size.0,
        text_height = text_size.1,
        horizontal_gap = layout.horizontal_gap(),
        vertical_gap = layout.vertical_gap(),
        tiles,
        font = font.name(),
        "Rendered watermark pattern"
    );

    Ok(canvas)
}
