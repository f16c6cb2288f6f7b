//! One-way line merging

use crate::point::{colinear, Boundary};
use tracing::debug;

/// Chain open one-way lines end to start, then drop interior points on
/// straight runs. End points are kept.
pub fn merge_lines(lines: &mut Vec<Boundary>) {
    let before = lines.len();
    while let Some((a, b)) = next_chain(lines) {
        let tail = lines.remove(b);
        let a = if b < a { a - 1 } else { a };
        lines[a].points.extend_from_slice(&tail.points[1..]);
    }
    for line in lines.iter_mut() {
        let points = &mut line.points;
        while let Some(i) = (1..points.len().saturating_sub(1))
            .find(|&i| colinear(points[i - 1], points[i], points[i + 1]))
        {
            points.remove(i);
        }
    }
    debug!(before, after = lines.len(), "merged one-way lines");
}

fn next_chain(lines: &[Boundary]) -> Option<(usize, usize)> {
    for (a, head) in lines.iter().enumerate() {
        let Some(end) = head.points.last() else {
            continue;
        };
        for (b, tail) in lines.iter().enumerate() {
            if a != b && tail.points.first() == Some(end) {
                return Some((a, b));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_chained_segments_collapse() {
        let mut lines = vec![
            Boundary::one_way(vec![p(16, 0), p(32, 0)]),
            Boundary::one_way(vec![p(0, 0), p(16, 0)]),
        ];
        merge_lines(&mut lines);
        assert_eq!(lines, vec![Boundary::one_way(vec![p(0, 0), p(32, 0)])]);
    }

    #[test]
    fn test_corner_is_kept() {
        let mut lines = vec![
            Boundary::one_way(vec![p(0, 16), p(16, 0)]),
            Boundary::one_way(vec![p(16, 0), p(32, 0)]),
        ];
        merge_lines(&mut lines);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].points, vec![p(0, 16), p(16, 0), p(32, 0)]);
    }

    #[test]
    fn test_disjoint_lines_untouched() {
        let mut lines = vec![
            Boundary::one_way(vec![p(0, 0), p(16, 0)]),
            Boundary::one_way(vec![p(32, 0), p(48, 0)]),
        ];
        let before = lines.clone();
        merge_lines(&mut lines);
        assert_eq!(lines, before);
    }
}
