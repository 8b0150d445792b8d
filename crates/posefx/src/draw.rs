//! Raster primitives over HWC RGB buffers, plus the skeleton and mask
//! renderers built on them.

use crate::{
    Canvas, KeypointIndex, Mask, Pose,
    color::Rgb,
};

/// Skeleton edges between COCO keypoints.
pub const SKELETON_EDGES: [(KeypointIndex, KeypointIndex); 16] = {
    use KeypointIndex::*;
    [
        (Nose, LeftEye),
        (Nose, RightEye),
        (LeftEye, LeftEar),
        (RightEye, RightEar),
        (LeftShoulder, RightShoulder),
        (LeftShoulder, LeftElbow),
        (LeftShoulder, LeftHip),
        (RightShoulder, RightElbow),
        (RightShoulder, RightHip),
        (LeftElbow, LeftWrist),
        (RightElbow, RightWrist),
        (LeftHip, RightHip),
        (LeftHip, LeftKnee),
        (RightHip, RightKnee),
        (LeftKnee, LeftAnkle),
        (RightKnee, RightAnkle),
    ]
};

pub const DEFAULT_LINE_WIDTH: f32 = 6.0;
const LINE_WIDTH_MIN: f32 = 1.0;
const LINE_WIDTH_MAX: f32 = 15.0;
const SHOULDER_WIDTH_MIN: f32 = 50.0;
const SHOULDER_WIDTH_MAX: f32 = 200.0;

/// Map `value` from the range [r_min, r_max] onto [t_min, t_max].
pub fn scale(value: f32, r_min: f32, r_max: f32, t_min: f32, t_max: f32) -> f32 {
    (value - r_min) * (t_max - t_min) / (r_max - r_min) + t_min
}

/// Line width for a skeleton, wider when the person is closer to the camera.
pub fn line_width_for(pose: &Pose, threshold: f32) -> f32 {
    match pose.shoulder_width(threshold) {
        Some(shoulders) => scale(
            shoulders,
            SHOULDER_WIDTH_MIN,
            SHOULDER_WIDTH_MAX,
            LINE_WIDTH_MIN,
            LINE_WIDTH_MAX,
        )
        .clamp(LINE_WIDTH_MIN, LINE_WIDTH_MAX),
        None => DEFAULT_LINE_WIDTH,
    }
}

/// Draw the edges of `pose` whose endpoints both reach `threshold`.
pub fn draw_skeleton(canvas: &mut dyn Canvas, pose: &Pose, color: Rgb, threshold: f32) {
    let mut ctx = canvas.context();
    ctx.set_stroke(color);
    ctx.set_line_width(line_width_for(pose, threshold));

    for (a, b) in SKELETON_EDGES {
        let kp1 = pose.keypoint(a);
        let kp2 = pose.keypoint(b);
        if kp1.confidence >= threshold && kp2.confidence >= threshold {
            ctx.stroke_line(kp1.position, kp2.position);
        }
    }
}

/// Tint the foreground pixels of `mask`, scaled to the canvas size.
/// Background pixels are left as they are.
pub fn draw_mask(canvas: &mut dyn Canvas, mask: &Mask, color: Rgb) {
    let width = canvas.width();
    let height = canvas.height();
    if width == 0 || height == 0 || mask.width() == 0 || mask.height() == 0 {
        return;
    }

    let mut ctx = canvas.context();
    for y in 0..height {
        let my = y * mask.height() / height;
        for x in 0..width {
            let mx = x * mask.width() / width;
            if mask.is_foreground(mx, my) {
                ctx.put_pixel(x, y, color);
            }
        }
    }
}

/// Draw a one-pixel line, clipped to the buffer.
pub fn draw_line(
    buf: &mut [u8],
    width: usize,
    height: usize,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: Rgb,
) {
    let bounds = (0, 0, width as i32 - 1, height as i32 - 1);
    if let Some((x0, y0, x1, y1)) = clip_line(x0, y0, x1, y1, bounds) {
        for_each_line_point(x0, y0, x1, y1, |x, y| {
            set_pixel(buf, width, x as usize, y as usize, color)
        });
    }
}

/// Draw a line `line_width` pixels wide with round caps.
pub fn draw_thick_line(
    buf: &mut [u8],
    width: usize,
    height: usize,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    line_width: f32,
    color: Rgb,
) {
    // a circle wider than the buffer covers it anyway
    let radius = ((line_width / 2.0).round() as i32).min(width.max(height) as i32);
    if radius < 1 {
        draw_line(buf, width, height, x0, y0, x1, y1, color);
        return;
    }

    // circles centered just outside the buffer still paint inside it
    let bounds = (-radius, -radius, width as i32 - 1 + radius, height as i32 - 1 + radius);
    if let Some((x0, y0, x1, y1)) = clip_line(x0, y0, x1, y1, bounds) {
        for_each_line_point(x0, y0, x1, y1, |x, y| {
            draw_filled_circle(buf, width, height, x, y, radius, color)
        });
    }
}

/// Draw a filled circle, clipped to the buffer.
pub fn draw_filled_circle(
    buf: &mut [u8],
    width: usize,
    height: usize,
    cx: i32,
    cy: i32,
    radius: i32,
    color: Rgb,
) {
    let r2 = radius as i64 * radius as i64;
    let y_range = cy.saturating_sub(radius).max(0)..=cy.saturating_add(radius).min(height as i32 - 1);
    let x_range = cx.saturating_sub(radius).max(0)..=cx.saturating_add(radius).min(width as i32 - 1);

    for y in y_range {
        for x in x_range.clone() {
            let (dx, dy) = (x as i64 - cx as i64, y as i64 - cy as i64);
            if dx * dx + dy * dy <= r2 {
                set_pixel(buf, width, x as usize, y as usize, color);
            }
        }
    }
}

/// Convert an HWC RGB buffer to packed 0x00RRGGBB words.
pub fn rgb_to_argb(buf: &[u8], width: usize, height: usize) -> Vec<u32> {
    buf.chunks_exact(3)
        .take(width * height)
        .map(|px| ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32)
        .collect()
}

pub(crate) fn set_pixel(buf: &mut [u8], width: usize, x: usize, y: usize, color: Rgb) {
    let idx = (y * width + x) * 3;
    buf[idx..idx + 3].copy_from_slice(&color);
}

// Bresenham, inclusive of both endpoints
fn for_each_line_point(
    mut x0: i32,
    mut y0: i32,
    x1: i32,
    y1: i32,
    mut plot: impl FnMut(i32, i32),
) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        plot(x0, y0);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

// Cohen-Sutherland outcodes
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

type Bounds = (i32, i32, i32, i32);

/// Clip a segment to the inclusive `bounds`; `None` if nothing remains.
///
/// Intersections are computed in `i128`, so endpoints anywhere in the `i32`
/// range are accepted.
fn clip_line(
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    bounds: Bounds,
) -> Option<(i32, i32, i32, i32)> {
    let (min_x, min_y, max_x, max_y) = bounds;
    if max_x < min_x || max_y < min_y {
        return None;
    }

    let (mut x0, mut y0, mut x1, mut y1) = (x0 as i128, y0 as i128, x1 as i128, y1 as i128);
    let (min_x, min_y, max_x, max_y) = (min_x as i128, min_y as i128, max_x as i128, max_y as i128);
    let outcode = |x: i128, y: i128| {
        let mut code = INSIDE;
        if x < min_x {
            code |= LEFT;
        } else if x > max_x {
            code |= RIGHT;
        }
        if y < min_y {
            code |= TOP;
        } else if y > max_y {
            code |= BOTTOM;
        }
        code
    };

    loop {
        let code0 = outcode(x0, y0);
        let code1 = outcode(x1, y1);

        if code0 | code1 == 0 {
            // inside `bounds`, so back in i32 range
            return Some((x0 as i32, y0 as i32, x1 as i32, y1 as i32));
        }
        if code0 & code1 != 0 {
            return None;
        }

        let code = if code0 != 0 { code0 } else { code1 };
        let (dx, dy) = (x1 - x0, y1 - y0);
        let (x, y) = if code & TOP != 0 {
            (x0 + dx * (min_y - y0) / dy, min_y)
        } else if code & BOTTOM != 0 {
            (x0 + dx * (max_y - y0) / dy, max_y)
        } else if code & LEFT != 0 {
            (min_x, y0 + dy * (min_x - x0) / dx)
        } else {
            (max_x, y0 + dy * (max_x - x0) / dx)
        };

        if code == code0 {
            x0 = x;
            y0 = y;
        } else {
            x1 = x;
            y1 = y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_line_inside_is_unchanged() {
        assert_eq!(clip_line(1, 1, 5, 5, (0, 0, 9, 9)), Some((1, 1, 5, 5)));
    }

    #[test]
    fn test_clip_line_fully_outside() {
        assert_eq!(clip_line(-5, -5, -1, -2, (0, 0, 9, 9)), None);
    }

    #[test]
    fn test_clip_line_horizontal_crossing() {
        assert_eq!(clip_line(-5, 5, 15, 5, (0, 0, 9, 9)), Some((0, 5, 9, 5)));
    }

    #[test]
    fn test_scale_maps_range_endpoints() {
        assert_eq!(scale(50.0, 50.0, 200.0, 1.0, 15.0), 1.0);
        assert_eq!(scale(200.0, 50.0, 200.0, 1.0, 15.0), 15.0);
    }
}
