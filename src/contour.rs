//! Single-component outer boundary tracing over a [`RasterMask`].
//!
//! The tracer walks pixel centres with a left-hand-on-the-wall rule: from the
//! current heading it tries a left turn, straight ahead, a right turn and
//! finally a reversal, and moves to the first foreground neighbour. Starting
//! from the first foreground pixel in row-major order with a rightward heading,
//! this follows the exterior edge clockwise.
//!
//! This is best effort. Thin necks, single-pixel contacts and multiple blobs
//! can make the path cross itself or wander into other regions, and holes are
//! never traced.

use crate::mask::RasterMask;

/// Heading of the tracer in image coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    // Variants are declared in clockwise order, so the discriminant indexes CLOCKWISE.
    fn rotate(self, quarter_turns: usize) -> Self {
        Self::CLOCKWISE[(self as usize + quarter_turns) % 4]
    }

    pub fn turn_left(self) -> Self {
        self.rotate(3)
    }

    pub fn turn_right(self) -> Self {
        self.rotate(1)
    }

    pub fn reverse(self) -> Self {
        self.rotate(2)
    }

    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    /// Candidate headings in preference order: left, straight, right, back.
    pub fn candidates(self) -> [Direction; 4] {
        [self.turn_left(), self, self.turn_right(), self.reverse()]
    }
}

/// Ordered pixel positions visited by the tracer. Not closed.
pub type PixelPath = Vec<(u32, u32)>;

/// Why the tracer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceTermination {
    /// The mask has no foreground pixel.
    NoForeground,
    /// The tracer stepped back onto the start pixel.
    Closed,
    /// No neighbour of the current pixel is foreground.
    DeadEnd,
    /// The step budget of `4 * width * height` ran out.
    IterationCap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceOutcome {
    pub path: PixelPath,
    pub termination: TraceTermination,
}

/// Maximum number of steps for a `width x height` mask.
pub fn iteration_cap(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

/// Trace the outer boundary reachable from the first foreground pixel.
///
/// The start pixel is the first path entry and is not repeated when the
/// tracer returns to it.
pub fn trace_outer_contour(mask: &RasterMask) -> TraceOutcome {
    let Some(start) = mask.first_foreground() else {
        return TraceOutcome {
            path: Vec::new(),
            termination: TraceTermination::NoForeground,
        };
    };

    let mut path = vec![start];
    let (mut cx, mut cy) = (i64::from(start.0), i64::from(start.1));
    let mut heading = Direction::Right;
    let cap = iteration_cap(mask.width(), mask.height());

    for _ in 0..cap {
        let next = heading.candidates().into_iter().find(|d| {
            let (dx, dy) = d.offset();
            mask.is_foreground(cx + dx, cy + dy)
        });
        let Some(dir) = next else {
            return TraceOutcome {
                path,
                termination: TraceTermination::DeadEnd,
            };
        };

        let (dx, dy) = dir.offset();
        cx += dx;
        cy += dy;
        heading = dir;

        // is_foreground guarantees the new position is inside the grid
        let pos = (cx as u32, cy as u32);
        if pos == start {
            return TraceOutcome {
                path,
                termination: TraceTermination::Closed,
            };
        }
        path.push(pos);
    }

    TraceOutcome {
        path,
        termination: TraceTermination::IterationCap,
    }
}
