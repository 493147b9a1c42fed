//! Offline export of the animation to an animated GIF.
//!
//! Not wired to the command line; call [`save_gif`] from code when a file
//! copy of the animation is needed. Labels are not rasterized.

use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result, anyhow};
use gif::{Encoder, Frame, Repeat};
use glam::Vec2;
use tracing::{info, trace};

use crate::{
    config::ColorMode,
    scene::{Scene, WORLD_MAX, WORLD_MIN},
    table::DensityTable,
};

pub const DEFAULT_EXPORT_FPS: u32 = 60;
pub const DEFAULT_EXPORT_SIZE: u16 = 440;

const BACKGROUND: [u8; 3] = [u8::MAX, u8::MAX, u8::MAX];
/// Encoder quantization speed, 1 (best) to 30 (fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Rasterizes the current scene into an opaque RGBA buffer.
///
/// The world window `[WORLD_MIN, WORLD_MAX]^2` is stretched over the
/// whole image, y pointing up. Squares are alpha-blended over a white
/// background.
pub fn render_frame(scene: &Scene, width: u32, height: u32) -> Vec<u8> {
    let span = WORLD_MAX - WORLD_MIN;
    let mut pixels = Vec::with_capacity(buffer_len(width, height));

    for py in 0..height {
        let y = WORLD_MAX - (py as f32 + 0.5) / height as f32 * span;
        for px in 0..width {
            let x = WORLD_MIN + (px as f32 + 0.5) / width as f32 * span;
            let p = Vec2::new(x, y);

            let mut rgb = BACKGROUND;
            if let Some(sq) = scene.squares().iter().find(|sq| sq.contains(p)) {
                let [r, g, b, a] = sq.fill.to_rgba8();
                rgb = blend([r, g, b], a, rgb);
            }
            pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], u8::MAX]);
        }
    }

    pixels
}

/// Bytes needed for a `width x height` RGBA image, computed in `usize` so
/// that sizes up to `u16::MAX` squared cannot overflow.
fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

fn blend(src: [u8; 3], alpha: u8, dst: [u8; 3]) -> [u8; 3] {
    let a = alpha as u32;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
    [mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2])]
}

/// Renders every row of `table` and writes the frames to `path` as an
/// endlessly repeating GIF.
///
/// ### Parameters
/// - `size` - Width and height of the square image in pixels.
/// - `fps` - Target frame rate; GIF delays have 10 ms resolution, so
///   anything above 100 is rejected.
///
/// ### Errors
/// Invalid `size`/`fps`, an empty table, or any I/O / encoding failure.
#[tracing::instrument(level = "debug", skip(table))]
pub fn save_gif(
    table: &DensityTable,
    mode: ColorMode,
    path: &Path,
    size: u16,
    fps: u32,
) -> Result<()> {
    if size == 0 {
        return Err(anyhow!("Image size must be positive"));
    }
    if fps == 0 || fps > 100 {
        return Err(anyhow!("Frame rate must be between 1 and 100, got {fps}"));
    }

    let mut scene = Scene::build(table, mode)?;
    let delay = (100 / fps) as u16;

    let file = File::create(path)
        .with_context(|| format!("Failed to create animation file {}", path.display()))?;
    let mut encoder = Encoder::new(BufWriter::new(file), size, size, &[])?;
    encoder.set_repeat(Repeat::Infinite)?;

    for frame in 0..table.len() {
        scene.apply_frame(table, frame);
        let mut pixels = render_frame(&scene, size.into(), size.into());
        let mut gif_frame = Frame::from_rgba_speed(size, size, &mut pixels, QUANTIZE_SPEED);
        gif_frame.delay = delay;
        encoder.write_frame(&gif_frame)?;
        trace!(frame, "Encoded frame");
    }

    info!(path = %path.display(), frames = table.len(), "Saved animation");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DensityRow;
    use std::fs;

    const SIZE: u32 = 44;

    fn pixel(buf: &[u8], x: u32, y: u32) -> [u8; 4] {
        let i = ((y * SIZE + x) * 4) as usize;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    /// Pixel roughly at the center of a world point on a `SIZE` image.
    fn world_pixel(x: f32, y: f32) -> (u32, u32) {
        let span = WORLD_MAX - WORLD_MIN;
        let px = ((x - WORLD_MIN) / span * SIZE as f32) as u32;
        let py = ((WORLD_MAX - y) / span * SIZE as f32) as u32;
        (px, py)
    }

    #[test]
    fn render_bw_uses_gray_shades() {
        let table = DensityTable::synthetic();
        let scene = Scene::build(&table, ColorMode::Bw).unwrap();
        let buf = render_frame(&scene, SIZE, SIZE);
        assert_eq!(buf.len(), (SIZE * SIZE * 4) as usize);

        let (x, y) = world_pixel(5.0, 15.0);
        assert_eq!(pixel(&buf, x, y), [255, 255, 255, 255]);

        let (x, y) = world_pixel(15.0, 5.0);
        assert_eq!(pixel(&buf, x, y), [0, 0, 0, 255]);

        let (x, y) = world_pixel(5.0, 5.0);
        assert_eq!(pixel(&buf, x, y), [26, 26, 26, 255]);
    }

    #[test]
    fn render_color_blends_over_white() {
        let table = DensityTable::synthetic();
        let scene = Scene::build(&table, ColorMode::Color).unwrap();
        let buf = render_frame(&scene, SIZE, SIZE);

        // |1⟩⟨1| is opaque yellow, |2⟩⟨2| fully transparent.
        let (x, y) = world_pixel(5.0, 15.0);
        assert_eq!(pixel(&buf, x, y), [255, 255, 0, 255]);
        let (x, y) = world_pixel(15.0, 5.0);
        assert_eq!(pixel(&buf, x, y), [255, 255, 255, 255]);
    }

    #[test]
    fn render_leaves_margin_as_background() {
        let scene = Scene::build(&DensityTable::synthetic(), ColorMode::Bw).unwrap();
        let buf = render_frame(&scene, SIZE, SIZE);
        assert_eq!(pixel(&buf, 0, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, SIZE - 1, SIZE - 1), [255, 255, 255, 255]);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn buffer_len_does_not_overflow_for_large_images() {
        assert_eq!(buffer_len(65536, 16384), 1 << 32);
        let side = u16::MAX as u32;
        assert_eq!(buffer_len(side, side), side as usize * side as usize * 4);
    }

    #[test]
    fn render_non_square_image_has_full_length() {
        let scene = Scene::build(&DensityTable::synthetic(), ColorMode::Bw).unwrap();
        let buf = render_frame(&scene, 30, 7);
        assert_eq!(buf.len(), 30 * 7 * 4);
    }

    #[test]
    fn save_gif_writes_file() {
        let dir = std::env::temp_dir().join("dmat-core-tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("save_gif_writes_file.gif");

        let rows = (0..4)
            .map(|i| DensityRow {
                time: i as f64,
                p11: 1.0 - i as f64 / 4.0,
                p12: 0.1,
                p21: 0.1,
                p22: i as f64 / 4.0,
            })
            .collect();
        let table = DensityTable::from_rows(rows);

        save_gif(&table, ColorMode::Color, &path, 32, DEFAULT_EXPORT_FPS).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }

    #[test]
    fn save_gif_rejects_invalid_frame_rate() {
        let path = std::env::temp_dir().join("dmat-core-tests/never_written.gif");
        let table = DensityTable::synthetic();
        assert!(save_gif(&table, ColorMode::Bw, &path, 32, 0).is_err());
        assert!(save_gif(&table, ColorMode::Bw, &path, 32, 500).is_err());
    }
}
