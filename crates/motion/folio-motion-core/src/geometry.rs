//! Scroll geometry in document coordinates (px, y grows downward).

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Document offset of the viewport's top edge.
    pub scroll_y: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(scroll_y: f32, height: f32) -> Self {
        Self { scroll_y, height }
    }

    pub fn bottom(&self) -> f32 {
        self.scroll_y + self.height
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
    /// Document offset of the element's top edge.
    pub top: f32,
    pub height: f32,
}

impl ElementRect {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Fraction of the element inside the viewport, in [0, 1].
    pub fn visible_fraction(&self, viewport: &Viewport) -> f32 {
        let overlap = (self.bottom().min(viewport.bottom()) - self.top.max(viewport.scroll_y)).max(0.0);
        if self.height <= 0.0 {
            let inside = self.top >= viewport.scroll_y && self.top <= viewport.bottom();
            return if inside { 1.0 } else { 0.0 };
        }
        (overlap / self.height).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_fraction_partial_and_full() {
        let vp = Viewport::new(0.0, 800.0);
        assert_eq!(ElementRect::new(600.0, 400.0).visible_fraction(&vp), 0.5);
        assert_eq!(ElementRect::new(100.0, 200.0).visible_fraction(&vp), 1.0);
        assert_eq!(ElementRect::new(900.0, 200.0).visible_fraction(&vp), 0.0);
        assert_eq!(ElementRect::new(300.0, 0.0).visible_fraction(&vp), 1.0);
    }
}
