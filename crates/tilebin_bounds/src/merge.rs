//! Solid boundary merging
//!
//! Tile outlines that share an edge are joined into one outline until no
//! two outlines touch. Joining leaves behind doubled-back spikes and
//! pinched figure eights, so the result is reduced (spikes removed, pinched
//! outlines split in two) and simplified by dropping every point that lies
//! on a straight run. Rounds of all three repeat until one changes nothing.

use crate::error::{BoundsError, Result};
use crate::point::{colinear, Boundary, Point};
use crate::topology::{find_splice, Splice};
use tracing::{debug, trace};

/// Merge every pair of touching solid boundaries, then reduce and simplify
/// the result. Running it again on its own output changes nothing.
pub fn merge_solid(boundaries: &mut Vec<Boundary>) -> Result<()> {
    let total: usize = boundaries.iter().map(Boundary::len).sum();
    merge_within(boundaries, 4 * total + 16)
}

/// Repeat joining, reduction and simplification until a whole round leaves
/// the boundaries untouched. Simplifying can expose a new backtrack or
/// pinch, so no step is final on its own.
fn merge_within(boundaries: &mut Vec<Boundary>, budget: usize) -> Result<()> {
    let before = boundaries.len();
    let mut joins = 0;
    let mut rounds = 0;
    loop {
        rounds += 1;
        if rounds > budget {
            return Err(BoundsError::NoFixedPoint {
                stage: "merge",
                rounds: budget,
            });
        }
        let previous = boundaries.clone();
        joins += join_adjacent(boundaries);
        for boundary in boundaries.iter_mut() {
            remove_backtracks(&mut boundary.points);
        }
        split_one(boundaries);
        for boundary in boundaries.iter_mut() {
            simplify(&mut boundary.points);
        }
        boundaries.retain(|b| !b.is_empty());
        if *boundaries == previous {
            break;
        }
    }
    debug!(before, after = boundaries.len(), joins, rounds, "merged solid boundaries");
    Ok(())
}

/// Apply the first available join, then rescan from the start until no
/// pair of boundaries touches. Returns the number of joins made.
fn join_adjacent(boundaries: &mut Vec<Boundary>) -> usize {
    let mut joins = 0;
    while let Some((a, b, splice)) = next_join(boundaries) {
        trace!(a, b, topology = ?splice.topology, "joining boundaries");
        let run = splice.run(&boundaries[b].points);
        boundaries[a]
            .points
            .splice(splice.insert_at..splice.insert_at, run);
        boundaries.remove(b);
        joins += 1;
    }
    joins
}

fn next_join(boundaries: &[Boundary]) -> Option<(usize, usize, Splice)> {
    for (a, outer) in boundaries.iter().enumerate() {
        for (b, inner) in boundaries.iter().enumerate() {
            if a == b {
                continue;
            }
            if let Some(splice) = find_splice(&outer.points, &inner.points) {
                return Some((a, b, splice));
            }
        }
    }
    None
}

/// Remove every `p, q, p` backtrack, treating the points as a cycle.
/// Outlines reduced below a triangle are cleared.
fn remove_backtracks(points: &mut Vec<Point>) {
    loop {
        let n = points.len();
        if n < 3 {
            points.clear();
            return;
        }
        let Some(i) = (0..n).find(|&i| points[i] == points[(i + 2) % n]) else {
            return;
        };
        let j = (i + 1) % n;
        let (hi, lo) = if i > j { (i, j) } else { (j, i) };
        points.remove(hi);
        points.remove(lo);
    }
}

/// Split the first outline that passes over the same edge twice in
/// opposite directions. The loop between the two passes becomes a new
/// boundary at the end of the list.
fn split_one(boundaries: &mut Vec<Boundary>) -> bool {
    for index in 0..boundaries.len() {
        let points = &boundaries[index].points;
        let Some((i, j)) = find_split(points) else {
            continue;
        };
        let flags = boundaries[index].flags;
        let piece = points[i..=j].to_vec();
        boundaries[index].points.drain(i + 1..j);
        trace!(index, i, j, "splitting pinched boundary");
        boundaries.push(Boundary {
            flags,
            points: piece,
        });
        return true;
    }
    false
}

fn find_split(points: &[Point]) -> Option<(usize, usize)> {
    let n = points.len();
    if n < 4 {
        return None;
    }
    for i in 0..=n - 3 {
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if points[i] == points[(j + 1) % n] && points[i + 1] == points[j] {
                return Some((i, j));
            }
        }
    }
    None
}

/// Drop points on straight runs, treating the points as a cycle. Zero
/// length edges and spikes are colinear too, so they go as well.
fn simplify(points: &mut Vec<Point>) {
    loop {
        let n = points.len();
        if n < 3 {
            points.clear();
            return;
        }
        let straight = (0..n).find(|&i| {
            colinear(points[i], points[(i + 1) % n], points[(i + 2) % n])
        });
        let Some(i) = straight else {
            return;
        };
        points.remove((i + 1) % n);
    }
}
