use crate::{
    CanvasError,
    color::{self, Rgb},
    draw,
};
use posefx_base::Vec2;

/// Drawing surface shared by the render loop and every effect.
pub trait Canvas {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Borrow the pixels for drawing.
    fn context(&mut self) -> DrawContext<'_>;

    /// Called once a perception result has been drawn, so a loading
    /// indicator can be hidden.
    fn loaded(&mut self);

    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: Rgb) {
        self.context().fill(color);
    }
}

/// Stroke state plus a mutable view of an HWC RGB buffer.
pub struct DrawContext<'a> {
    buf: &'a mut [u8],
    width: usize,
    height: usize,
    stroke: Rgb,
    line_width: f32,
}

impl<'a> DrawContext<'a> {
    /// `buf` must hold `width * height * 3` bytes.
    pub fn new(buf: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert_eq!(buf.len(), width * height * 3);
        Self {
            buf,
            width,
            height,
            stroke: color::BLACK,
            line_width: 1.0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_stroke(&mut self, color: Rgb) {
        self.stroke = color;
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width.max(1.0);
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Stroke a round-capped line with the current stroke color and width.
    pub fn stroke_line(&mut self, from: Vec2<f32>, to: Vec2<f32>) {
        draw::draw_thick_line(
            self.buf,
            self.width,
            self.height,
            from.x.round() as i32,
            from.y.round() as i32,
            to.x.round() as i32,
            to.y.round() as i32,
            self.line_width,
            self.stroke,
        );
    }

    pub fn fill_circle(&mut self, center: Vec2<f32>, radius: i32, color: Rgb) {
        draw::draw_filled_circle(
            self.buf,
            self.width,
            self.height,
            center.x.round() as i32,
            center.y.round() as i32,
            radius,
            color,
        );
    }

    /// Set one pixel; out-of-bounds coordinates are ignored.
    pub fn put_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            draw::set_pixel(self.buf, self.width, x, y, color);
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        for px in self.buf.chunks_exact_mut(3) {
            px.copy_from_slice(&color);
        }
    }
}

/// In-memory RGB canvas.
#[derive(Debug, Clone)]
pub struct RgbCanvas {
    width: usize,
    height: usize,
    data: Vec<u8>,
    is_loaded: bool,
}

impl RgbCanvas {
    /// A canvas filled with the background color.
    pub fn new(width: usize, height: usize) -> Self {
        let mut canvas = Self {
            width,
            height,
            data: vec![0; width * height * 3],
            is_loaded: false,
        };
        canvas.clear(color::BACKGROUND);
        canvas
    }

    /// Wrap an existing HWC RGB buffer.
    pub fn from_pixels(width: usize, height: usize, data: Vec<u8>) -> Result<Self, CanvasError> {
        let expected = width * height * 3;
        if data.len() != expected {
            return Err(CanvasError::SizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
            is_loaded: false,
        })
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 3;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Whether a perception result has been drawn yet.
    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    /// Pack as 0x00RRGGBB words, the layout window toolkits expect.
    pub fn to_argb(&self) -> Vec<u32> {
        draw::rgb_to_argb(&self.data, self.width, self.height)
    }
}

impl Canvas for RgbCanvas {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn context(&mut self) -> DrawContext<'_> {
        DrawContext::new(&mut self.data, self.width, self.height)
    }

    fn loaded(&mut self) {
        if !self.is_loaded {
            log::debug!("first perception result drawn");
        }
        self.is_loaded = true;
    }
}
