// Copyright (c) 2021 10X Genomics, Inc. All rights reserved.

// Rectangles, for node boxes and hit-testing.  The y axis points down.

use serde_derive::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn top_center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y,
        }
    }

    pub fn bottom_center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.bottom(),
        }
    }

    // Points on the boundary are inside.

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    // Smallest rectangle containing both.

    pub fn union(&self, r: &Rect) -> Rect {
        let (x, y) = (self.x.min(r.x), self.y.min(r.y));
        Rect::new(x, y, self.right().max(r.right()) - x, self.bottom().max(r.bottom()) - y)
    }
}
