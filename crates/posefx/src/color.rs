/// RGB color, one byte per channel.
pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];
pub const WHITE: Rgb = [255, 255, 255];
pub const LIGHT_GREY: Rgb = [200, 200, 200];

/// Tint used for the body mask.
pub const MASK_TINT: Rgb = [120, 170, 255];

/// Canvas background.
pub const BACKGROUND: Rgb = WHITE;

/// Blend from `a` (t = 0) to `b` (t = 1).
pub fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}
