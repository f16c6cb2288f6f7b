//! Points and boundary polylines in world units

/// Boundary flag marking an open, single-sided collision line
pub const ONE_WAY: u8 = 0x40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Whether `b` lies on the line through `a` and `c` with `a -> b` and
/// `b -> c` sharing a slope (either direction, including zero length).
pub fn colinear(a: Point, b: Point, c: Point) -> bool {
    let (dx1, dy1) = (i64::from(b.x) - i64::from(a.x), i64::from(b.y) - i64::from(a.y));
    let (dx2, dy2) = (i64::from(c.x) - i64::from(b.x), i64::from(c.y) - i64::from(b.y));
    dx1 * dy2 == dy1 * dx2
}

/// An ordered polyline. Solid boundaries are cyclic until closed; one-way
/// boundaries are open chains.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Boundary {
    pub flags: u8,
    pub points: Vec<Point>,
}

impl Boundary {
    pub fn new(points: Vec<Point>) -> Self {
        Self { flags: 0, points }
    }

    pub fn one_way(points: Vec<Point>) -> Self {
        Self {
            flags: ONE_WAY,
            points,
        }
    }

    pub fn is_one_way(&self) -> bool {
        self.flags & ONE_WAY != 0
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point repeated at the end
    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    /// Repeat the first point at the end
    pub fn close(&mut self) {
        if let Some(&first) = self.points.first() {
            self.points.push(first);
        }
    }

    /// Same cyclic sequence of points, starting anywhere
    pub fn same_cycle(&self, other: &Boundary) -> bool {
        let n = self.points.len();
        if n != other.points.len() {
            return false;
        }
        if n == 0 {
            return true;
        }
        (0..n).any(|shift| (0..n).all(|i| self.points[(i + shift) % n] == other.points[i]))
    }
}
