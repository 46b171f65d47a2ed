/// Rasterized snapshots of annotated images
///
/// Every committed stroke re-exports the active image as a PNG into the trial
/// folder: the source body diagram with all of that image's strokes
/// composited on top, frozen sensations at half opacity. Screen-space stroke
/// points are mapped into image pixel space through the display rect the
/// canvas recorded.

use std::path::Path;

use thiserror::Error;

use crate::gui::theme::sensation_color;

/// Half-width of the stamped stroke, in image pixels
const STAMP_RADIUS: i32 = 2;
/// Alpha for strokes of completed sensations
const FROZEN_SNAPSHOT_ALPHA: u8 = 128;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Map a screen-space point into image pixel coordinates.
pub fn map_to_pixel(point: egui::Pos2, display: egui::Rect, dims: (u32, u32)) -> (i32, i32) {
    if display.width() <= 0.0 || display.height() <= 0.0 {
        return (0, 0);
    }
    let x = (point.x - display.min.x) / display.width() * dims.0 as f32;
    let y = (point.y - display.min.y) / display.height() * dims.1 as f32;
    (x.round() as i32, y.round() as i32)
}

/// Composite the image's strokes onto the source diagram and write the
/// snapshot PNG. `strokes` and `movement` carry (sensation index, points);
/// sensations below `current_sensation` render at half opacity.
pub fn export_snapshot(
    source: &Path,
    out_path: &Path,
    display: egui::Rect,
    strokes: &[(u32, Vec<egui::Pos2>)],
    movement: &[(u32, Vec<egui::Pos2>)],
    current_sensation: u32,
) -> Result<(), SnapshotError> {
    let mut img = image::open(source)?.to_rgba8();
    let dims = img.dimensions();

    for (sensation, points) in strokes.iter().chain(movement.iter()) {
        let c = sensation_color(*sensation);
        let alpha = if *sensation < current_sensation {
            FROZEN_SNAPSHOT_ALPHA
        } else {
            255
        };
        let rgb = [c.r(), c.g(), c.b()];

        let pixels: Vec<(i32, i32)> = points
            .iter()
            .map(|p| map_to_pixel(*p, display, dims))
            .collect();
        match pixels.as_slice() {
            [] => {}
            [p] => stamp(&mut img, p.0, p.1, rgb, alpha),
            _ => {
                for pair in pixels.windows(2) {
                    draw_thick_line(&mut img, pair[0], pair[1], rgb, alpha);
                }
            }
        }
    }

    if let Some(parent) = out_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    img.save(out_path)?;
    Ok(())
}

/// Bresenham line with a square stamp at each step, giving the exported
/// stroke roughly the on-screen width.
fn draw_thick_line(
    img: &mut image::RgbaImage,
    from: (i32, i32),
    to: (i32, i32),
    rgb: [u8; 3],
    alpha: u8,
) {
    let (x0, y0) = from;
    let (x1, y1) = to;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx: i32 = if x0 < x1 { 1 } else { -1 };
    let sy: i32 = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut cx = x0;
    let mut cy = y0;
    loop {
        stamp(img, cx, cy, rgb, alpha);
        if cx == x1 && cy == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            cx += sx;
        }
        if e2 <= dx {
            err += dx;
            cy += sy;
        }
    }
}

fn stamp(img: &mut image::RgbaImage, x: i32, y: i32, rgb: [u8; 3], alpha: u8) {
    for dy in -STAMP_RADIUS..=STAMP_RADIUS {
        for dx in -STAMP_RADIUS..=STAMP_RADIUS {
            blend_pixel(img, x + dx, y + dy, rgb, alpha);
        }
    }
}

fn blend_pixel(img: &mut image::RgbaImage, x: i32, y: i32, rgb: [u8; 3], alpha: u8) {
    if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let dst = img.get_pixel_mut(x as u32, y as u32);
    let a = alpha as u32;
    for ch in 0..3 {
        let src = rgb[ch] as u32;
        let bg = dst.0[ch] as u32;
        dst.0[ch] = ((src * a + bg * (255 - a)) / 255) as u8;
    }
    dst.0[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_to_pixel_corners_and_center() {
        let display = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(200.0, 400.0));
        let dims = (400, 800);
        assert_eq!(map_to_pixel(egui::pos2(100.0, 50.0), display, dims), (0, 0));
        assert_eq!(map_to_pixel(egui::pos2(300.0, 450.0), display, dims), (400, 800));
        assert_eq!(map_to_pixel(egui::pos2(200.0, 250.0), display, dims), (200, 400));
    }

    #[test]
    fn test_map_to_pixel_degenerate_rect() {
        let display = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(0.0, 0.0));
        assert_eq!(map_to_pixel(egui::pos2(5.0, 5.0), display, (100, 100)), (0, 0));
    }

    #[test]
    fn test_blend_pixel_full_alpha_replaces() {
        let mut img = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
        blend_pixel(&mut img, 1, 1, [128, 0, 204], 255);
        assert_eq!(img.get_pixel(1, 1).0, [128, 0, 204, 255]);
        // Out-of-bounds writes are ignored
        blend_pixel(&mut img, -1, 0, [0, 0, 0], 255);
        blend_pixel(&mut img, 4, 0, [0, 0, 0], 255);
    }

    #[test]
    fn test_blend_pixel_half_alpha_mixes() {
        let mut img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 255]));
        blend_pixel(&mut img, 0, 0, [0, 0, 0], 128);
        let px = img.get_pixel(0, 0).0;
        assert!(px[0] > 100 && px[0] < 155, "half-alpha black over white is mid gray");
    }

    #[test]
    fn test_export_snapshot_writes_strokes() {
        let dir = std::env::temp_dir().join(format!("perceptmap_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let source = dir.join("diagram.png");
        image::RgbaImage::from_pixel(64, 64, image::Rgba([255, 255, 255, 255]))
            .save(&source)
            .unwrap();

        let display = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(64.0, 64.0));
        let strokes = vec![(0u32, vec![egui::pos2(10.0, 10.0), egui::pos2(50.0, 50.0)])];
        let out = dir.join("out").join("diagram_annotated.png");

        export_snapshot(&source, &out, display, &strokes, &[], 0).unwrap();

        let result = image::open(&out).unwrap().to_rgba8();
        let px = result.get_pixel(30, 30).0;
        assert_eq!(
            [px[0], px[1], px[2]],
            [128, 0, 204],
            "sensation 0 stroke drawn in palette color"
        );
        let corner = result.get_pixel(0, 63).0;
        assert_eq!([corner[0], corner[1], corner[2]], [255, 255, 255]);

        std::fs::remove_dir_all(dir).unwrap();
    }
}
