use std::{path::Path, time::Duration, time::Instant};

use image::{Rgba, RgbaImage};

use crate::{config::RenderConfig, scene::Scene, util::color::clamp_color};

/// Receives finished pixels in canvas-centered coordinates (origin in the
/// middle, y up).
pub trait PixelSink {
    fn put_pixel(&mut self, x: i32, y: i32, color: [u8; 3]);

    /// Called once after every pixel of a frame was written.
    fn present(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Canvas-centered column range. Odd widths get the extra column on the
    /// positive side.
    pub fn x_range(&self) -> std::ops::Range<i32> {
        centered_range(self.width)
    }

    pub fn y_range(&self) -> std::ops::Range<i32> {
        centered_range(self.height)
    }
}

fn centered_range(extent: u32) -> std::ops::Range<i32> {
    let half = (extent / 2) as i32;
    -half..(extent as i32 - half)
}

#[derive(Debug, Clone, Copy)]
pub struct FrameStats {
    pub pixels: u64,
    pub elapsed: Duration,
}

/// Traces one ray per pixel and hands every clamped color to `sink`, then
/// presents the sink once.
pub fn render_frame<S: PixelSink + ?Sized>(
    scene: &Scene,
    config: &RenderConfig,
    canvas: CanvasSize,
    sink: &mut S,
) -> FrameStats {
    let start = Instant::now();
    let depth = config.recursion_depth();
    let camera = &scene.camera;
    let mut pixels = 0;

    for x in canvas.x_range() {
        for y in canvas.y_range() {
            let direction = camera.canvas_to_viewport(x, y, canvas.width, canvas.height);
            let color = scene.trace_ray(camera.position, direction, 1.0, f64::INFINITY, depth);
            sink.put_pixel(x, y, clamp_color(color));
            pixels += 1;
        }
    }
    sink.present();

    let stats = FrameStats {
        pixels,
        elapsed: start.elapsed(),
    };
    tracing::info!(
        width = canvas.width,
        height = canvas.height,
        depth,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "frame rendered"
    );
    stats
}

/// Pixel sink backed by an RGBA image with the usual top-left origin.
pub struct ImageSink {
    image: RgbaImage,
    frames: u64,
}

impl ImageSink {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            image: RgbaImage::from_pixel(canvas.width, canvas.height, Rgba([0, 0, 0, 255])),
            frames: 0,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Number of completed frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.image.save(path)
    }

    fn buffer_position(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let width = self.image.width() as i64;
        let height = self.image.height() as i64;
        // top row holds the largest y of the centered range
        let bx = width / 2 + x as i64;
        let by = (height - height / 2 - 1) - y as i64;

        if bx < 0 || bx >= width || by < 0 || by >= height {
            return None;
        }
        Some((bx as u32, by as u32))
    }
}

impl PixelSink for ImageSink {
    fn put_pixel(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if let Some((bx, by)) = self.buffer_position(x, y) {
            let [r, g, b] = color;
            self.image.put_pixel(bx, by, Rgba([r, g, b, 255]));
        }
    }

    fn present(&mut self) {
        self.frames += 1;
        tracing::trace!(frame = self.frames, "frame presented");
    }
}
