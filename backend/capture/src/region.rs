//! Drag-select region tracking in CSS pixels.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in viewport CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Normalized rectangle spanning two corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Pointer input delivered to the selection overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
}

/// Selection state machine: anchor on down, resize on move, finish on up.
#[derive(Debug, Default)]
pub struct RegionSelector {
    anchor: Option<Point>,
    rect: Option<Rect>,
}

impl RegionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one pointer event. Returns the visible rectangle after the event, if any.
    pub fn handle(&mut self, event: PointerEvent) -> Option<Rect> {
        match event {
            PointerEvent::Down(p) => {
                self.anchor = Some(p);
                self.rect = Some(Rect::from_corners(p, p));
            }
            PointerEvent::Move(p) => {
                if let Some(anchor) = self.anchor {
                    self.rect = Some(Rect::from_corners(anchor, p));
                }
            }
            PointerEvent::Up => {
                self.anchor = None;
            }
        }
        self.rect
    }

    /// Final selection, or `None` when nothing usable was drawn.
    pub fn finish(self) -> Option<Rect> {
        self.rect.filter(|r| !r.is_degenerate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_normalizes_drag_direction() {
        let rect = Rect::from_corners(Point::new(300.0, 200.0), Point::new(100.0, 250.0));
        assert_eq!(
            rect,
            Rect {
                left: 100.0,
                top: 200.0,
                width: 200.0,
                height: 50.0
            }
        );
    }

    #[test]
    fn drag_produces_selection() {
        let mut sel = RegionSelector::new();
        sel.handle(PointerEvent::Down(Point::new(10.0, 10.0)));
        sel.handle(PointerEvent::Move(Point::new(50.0, 30.0)));
        let visible = sel.handle(PointerEvent::Move(Point::new(60.0, 40.0))).unwrap();
        assert_eq!(visible.width, 50.0);
        sel.handle(PointerEvent::Up);
        let rect = sel.finish().unwrap();
        assert_eq!((rect.left, rect.top, rect.width, rect.height), (10.0, 10.0, 50.0, 30.0));
    }

    #[test]
    fn click_without_drag_is_degenerate() {
        let mut sel = RegionSelector::new();
        sel.handle(PointerEvent::Down(Point::new(10.0, 10.0)));
        sel.handle(PointerEvent::Up);
        assert!(sel.finish().is_none());
    }

    #[test]
    fn move_before_down_is_ignored() {
        let mut sel = RegionSelector::new();
        assert!(sel.handle(PointerEvent::Move(Point::new(5.0, 5.0))).is_none());
        sel.handle(PointerEvent::Up);
        assert!(sel.finish().is_none());
    }

    #[test]
    fn flat_line_is_degenerate() {
        let mut sel = RegionSelector::new();
        sel.handle(PointerEvent::Down(Point::new(0.0, 10.0)));
        sel.handle(PointerEvent::Move(Point::new(80.0, 10.0)));
        sel.handle(PointerEvent::Up);
        assert!(sel.finish().is_none());
    }
}
