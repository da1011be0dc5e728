//! PngSweep application icon generator.
//!
//! Produces a procedural icon: a rounded photo frame whose left half shows a
//! transparency checkerboard and whose right half is flattened onto white,
//! with a mountain and sun drawn across both halves. Rendered as RGBA pixel
//! data suitable for use as a window icon.

/// Generate a PngSweep icon as egui `IconData`.
pub fn generate_icon(size: u32) -> egui::IconData {
    let rgba = render_icon(size);
    egui::IconData {
        rgba,
        width: size,
        height: size,
    }
}

/// Render the icon into an RGBA pixel buffer (top-to-bottom row order).
pub fn render_icon(size: u32) -> Vec<u8> {
    let s = size as f32;
    let mut pixels = vec![0u8; (size * size * 4) as usize];

    // ── Layout ──────────────────────────────────────────────────
    let margin = s * 0.08;
    let corner = s * 0.14;
    let border = (s * 0.05).max(1.0);
    let split_x = s * 0.5;
    let checker = (s / 8.0).max(1.0);

    let sun = (s * 0.68, s * 0.34, s * 0.09);
    let horizon = s * 0.78;
    let peak = (s * 0.38, s * 0.40);

    let frame_colour = [0x89, 0xb4, 0xfa];
    let sky_light = [0xff, 0xff, 0xff];
    let mountain = [0x4c, 0x8f, 0x5a];
    let sun_colour = [0xf9, 0xe2, 0xaf];

    for y in 0..size {
        for x in 0..size {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;

            let coverage = rounded_rect_coverage(px, py, margin, s - margin, corner);
            if coverage <= 0.0 {
                continue;
            }

            let inner = rounded_rect_coverage(
                px,
                py,
                margin + border,
                s - margin - border,
                (corner - border).max(0.0),
            );

            let rgb = if inner < 0.5 {
                frame_colour
            } else if in_circle(px, py, sun) {
                sun_colour
            } else if py < horizon && py > mountain_edge(px, peak, horizon) {
                mountain
            } else if px < split_x {
                // Transparency checkerboard on the "before" half.
                let cell = ((px / checker) as u32 + (py / checker) as u32) % 2;
                if cell == 0 {
                    [0xcc, 0xcc, 0xcc]
                } else {
                    [0x99, 0x99, 0x99]
                }
            } else {
                sky_light
            };

            let i = ((y * size + x) * 4) as usize;
            pixels[i] = rgb[0];
            pixels[i + 1] = rgb[1];
            pixels[i + 2] = rgb[2];
            pixels[i + 3] = (coverage * 255.0).round() as u8;
        }
    }

    pixels
}

/// Anti-aliased coverage of a square `[lo, hi]²` with rounded corners.
fn rounded_rect_coverage(px: f32, py: f32, lo: f32, hi: f32, radius: f32) -> f32 {
    let cx = px.clamp(lo + radius, hi - radius);
    let cy = py.clamp(lo + radius, hi - radius);
    let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
    let edge = if px < lo || px > hi || py < lo || py > hi {
        -1.0
    } else {
        radius - dist
    };
    (edge + 0.5).clamp(0.0, 1.0)
}

fn in_circle(px: f32, py: f32, (cx, cy, r): (f32, f32, f32)) -> bool {
    (px - cx).powi(2) + (py - cy).powi(2) <= r * r
}

/// Y coordinate of the mountain ridge at `px`: a triangle from the horizon
/// up to `peak` and back down.
fn mountain_edge(px: f32, (peak_x, peak_y): (f32, f32), horizon: f32) -> f32 {
    let half_base = horizon - peak_y;
    let t = ((px - peak_x).abs() / half_base).min(1.0);
    peak_y + (horizon - peak_y) * t
}
