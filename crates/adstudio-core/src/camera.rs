//! Stage pan/zoom: converts between screen and document coordinates.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Largest scale used when fitting a document into the workspace.
pub const MAX_FIT_SCALE: f64 = 0.8;
/// Longest on-screen side of a fitted document, in screen pixels.
pub const FIT_EXTENT: f64 = 600.0;

/// Initial stage scale for a document: its long side is shown at
/// [`FIT_EXTENT`] pixels, never above [`MAX_FIT_SCALE`].
pub fn fit_scale(document: Size) -> f64 {
    let longest = document.width.max(document.height);
    if longest <= 0.0 {
        return MAX_FIT_SCALE;
    }
    (FIT_EXTENT / longest).min(MAX_FIT_SCALE)
}

/// Stage view transform.
///
/// Pointer input arrives in screen space; everything in the layout core
/// works in document space, so the host converts through this first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Screen position of the document origin.
    pub offset: Vec2,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 5.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document to screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen to document.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_document(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn document_to_screen(&self, document_point: Point) -> Point {
        self.transform() * document_point
    }

    /// A screen-space length (handle tolerance, say) in document units.
    pub fn screen_length(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let anchor = self.screen_to_document(screen_point);
        self.zoom = new_zoom;
        self.offset += screen_point - self.document_to_screen(anchor);
    }

    /// Scale the document with [`fit_scale`] and center it in the viewport.
    pub fn fit_document(&mut self, document: Size, viewport: Size) {
        self.zoom = fit_scale(document).clamp(self.min_zoom, self.max_zoom);
        let center = Rect::from_origin_size(Point::ORIGIN, document).center();
        self.offset = Vec2::new(
            viewport.width / 2.0 - center.x * self.zoom,
            viewport.height / 2.0 - center.y * self.zoom,
        );
    }
}
