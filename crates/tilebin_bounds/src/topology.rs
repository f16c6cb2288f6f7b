//! Edge adjacency classification
//!
//! Two boundaries can be joined where an edge of `A` and an edge of `B` lie
//! on the same vertical or horizontal line and run in opposite directions:
//! `A` from `a1` to `a2` (increasing), `B` from `b1` to `b2` (decreasing).
//! How the two spans overlap decides which run of `B`'s points is spliced
//! into `A`. The cases are named after the letter the two outlines form.

use crate::point::Point;

/// How two opposite edges on one line overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Both spans coincide
    O,
    /// Spans start together, `A` is shorter
    LShortA,
    /// Spans end together, `B` is shorter
    LShortB,
    /// Spans end together, `A` is shorter
    JShortA,
    /// Spans start together, `B` is shorter
    JShortB,
    /// `A` lies strictly inside `B`
    TShortA,
    /// `B` lies strictly inside `A`
    TShortB,
    /// Partial overlap, `A` first
    S,
    /// Partial overlap, `B` first
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMatch {
    NoMatch,
    MergeAt(Topology),
}

/// Classify the overlap of `A`'s span `a1 -> a2` and `B`'s span `b1 -> b2`
/// on a shared line.
pub fn classify(a1: i32, a2: i32, b1: i32, b2: i32) -> EdgeMatch {
    use Topology::*;

    if !(a1 < a2 && b1 > b2) {
        return EdgeMatch::NoMatch;
    }
    let topology = if a1 == b2 && a2 == b1 {
        O
    } else if a1 == b2 && a2 < b1 {
        LShortA
    } else if a1 < b2 && a2 == b1 {
        LShortB
    } else if a1 > b2 && a2 == b1 {
        JShortA
    } else if a1 == b2 && a2 > b1 {
        JShortB
    } else if a1 > b2 && a2 < b1 {
        TShortA
    } else if a1 < b2 && a2 > b1 {
        TShortB
    } else if a1 < b2 && a2 < b1 && a2 > b2 {
        S
    } else if a1 > b2 && a2 > b1 && a1 < b1 {
        Z
    } else {
        return EdgeMatch::NoMatch;
    };
    EdgeMatch::MergeAt(topology)
}

impl Topology {
    /// Bounds of the run of `B` spliced into `A`, relative to `B`'s matched
    /// edge `s -> t`: the run starts at `t` (or just past it) and stops
    /// before `s` (or just after it).
    fn run(self) -> (usize, usize) {
        match self {
            Topology::O => (1, 0),
            Topology::LShortA | Topology::JShortB => (1, 1),
            Topology::LShortB | Topology::JShortA => (0, 0),
            Topology::TShortA | Topology::TShortB | Topology::S | Topology::Z => (0, 1),
        }
    }
}

/// A join of `B` into `A`: copy `B`'s cyclic run `first..last` and insert
/// it into `A` before index `insert_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splice {
    pub topology: Topology,
    pub insert_at: usize,
    /// Start of the run in `B`, may equal `B`'s length
    pub first: usize,
    /// End of the run in `B` (exclusive), wrapping past the end when not
    /// greater than `first`
    pub last: usize,
}

impl Splice {
    /// `B`'s points covered by this splice
    pub fn run(&self, b: &[Point]) -> Vec<Point> {
        if self.first < self.last {
            b[self.first..self.last].to_vec()
        } else {
            let mut run = b[self.first.min(b.len())..].to_vec();
            run.extend_from_slice(&b[..self.last.min(b.len())]);
            run
        }
    }
}

/// First pair of opposite edges, scanning `A`'s edges then `B`'s, where
/// `B` can be joined into `A`. A shared vertical line is checked before a
/// shared horizontal one.
pub fn find_splice(a: &[Point], b: &[Point]) -> Option<Splice> {
    let (na, nb) = (a.len(), b.len());
    for i in 0..na {
        let (a1, a2) = (a[i], a[(i + 1) % na]);
        for s in 0..nb {
            let t = (s + 1) % nb;
            let (b1, b2) = (b[s], b[t]);
            let matched = if a1.x == a2.x && b1.x == b2.x && a1.x == b1.x {
                classify(a1.y, a2.y, b1.y, b2.y)
            } else if a1.y == a2.y && b1.y == b2.y && a1.y == b1.y {
                classify(a1.x, a2.x, b1.x, b2.x)
            } else {
                EdgeMatch::NoMatch
            };
            if let EdgeMatch::MergeAt(topology) = matched {
                let (first, last) = topology.run();
                return Some(Splice {
                    topology,
                    insert_at: (i + 1) % na,
                    first: t + first,
                    last: s + last,
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use Topology::*;

    #[test]
    fn test_classify_cases() {
        assert_eq!(classify(0, 16, 16, 0), EdgeMatch::MergeAt(O));
        assert_eq!(classify(0, 16, 32, 0), EdgeMatch::MergeAt(LShortA));
        assert_eq!(classify(0, 32, 32, 16), EdgeMatch::MergeAt(LShortB));
        assert_eq!(classify(16, 32, 32, 0), EdgeMatch::MergeAt(JShortA));
        assert_eq!(classify(0, 32, 16, 0), EdgeMatch::MergeAt(JShortB));
        assert_eq!(classify(16, 32, 48, 0), EdgeMatch::MergeAt(TShortA));
        assert_eq!(classify(0, 48, 32, 16), EdgeMatch::MergeAt(TShortB));
        assert_eq!(classify(0, 32, 48, 16), EdgeMatch::MergeAt(S));
        assert_eq!(classify(16, 48, 32, 0), EdgeMatch::MergeAt(Z));
    }

    #[test]
    fn test_classify_rejects() {
        // Same direction.
        assert_eq!(classify(0, 16, 0, 16), EdgeMatch::NoMatch);
        // Disjoint spans.
        assert_eq!(classify(0, 16, 48, 32), EdgeMatch::NoMatch);
        // Touching at a single point.
        assert_eq!(classify(0, 16, 32, 16), EdgeMatch::NoMatch);
        assert_eq!(classify(16, 32, 16, 0), EdgeMatch::NoMatch);
    }

    #[test]
    fn test_find_splice_adjacent_squares() {
        let a = [Point::new(0, 0), Point::new(16, 0), Point::new(16, 16), Point::new(0, 16)];
        let b = [Point::new(16, 0), Point::new(32, 0), Point::new(32, 16), Point::new(16, 16)];
        let splice = find_splice(&a, &b).unwrap();
        assert_eq!(
            splice,
            Splice {
                topology: O,
                insert_at: 2,
                first: 1,
                last: 3
            }
        );
        assert_eq!(splice.run(&b), vec![Point::new(32, 0), Point::new(32, 16)]);
    }

    #[test]
    fn test_run_wraps() {
        let b = [Point::new(0, 0), Point::new(1, 0), Point::new(2, 0), Point::new(3, 0)];
        let splice = Splice {
            topology: O,
            insert_at: 0,
            first: 3,
            last: 1,
        };
        assert_eq!(splice.run(&b), vec![Point::new(3, 0), Point::new(0, 0)]);
        let past_end = Splice { first: 4, last: 2, ..splice };
        assert_eq!(past_end.run(&b), vec![Point::new(0, 0), Point::new(1, 0)]);
    }

    #[test]
    fn test_find_splice_none_for_same_direction() {
        let a = [Point::new(0, 0), Point::new(16, 0), Point::new(16, 16), Point::new(0, 16)];
        assert_eq!(find_splice(&a, &a), None);
    }
}
