// Turns the blob's polygon into a smooth closed outline made of cubic
// Bézier segments (Catmull-Rom style handles). The rasterizer gets it as a
// tiny-skia path.

use crate::types::Point;
use tiny_skia::PathBuilder;

/// How far each handle reaches along the neighbour-to-neighbour direction.
pub const TENSION: f64 = 0.33;

/// Incoming (`cp1`) and outgoing (`cp2`) handles of one vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPair {
    pub cp1: Point,
    pub cp2: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCmd {
    MoveTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
    Close,
}

/// A drawing path in canvas terms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub cmds: Vec<PathCmd>,
}

impl Path {
    #[cfg(test)]
    pub fn cubic_count(&self) -> usize {
        self.cmds.iter().filter(|c| matches!(c, PathCmd::CubicTo { .. })).count()
    }

    /// The same outline for the rasterizer. `None` when there is nothing to
    /// fill (no commands, or non-finite coordinates).
    pub fn to_skia(&self) -> Option<tiny_skia::Path> {
        let mut pb = PathBuilder::with_capacity(self.cmds.len(), self.cmds.len() * 3);
        for cmd in &self.cmds {
            match *cmd {
                PathCmd::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
                PathCmd::CubicTo { c1, c2, to } => pb.cubic_to(
                    c1.x as f32, c1.y as f32,
                    c2.x as f32, c2.y as f32,
                    to.x as f32, to.y as f32,
                ),
                PathCmd::Close => pb.close(),
            }
        }
        pb.finish()
    }
}

/// Handles for every vertex, treating `points` as a loop.
pub fn control_points(points: &[Point]) -> Vec<ControlPair> {
    let n = points.len();
    (0..n)
        .map(|i| {
            let curr = points[i];
            let next = points[(i + 1) % n];
            let prev = points[(i + n - 1) % n];
            let tangent = (next - prev) * TENSION;
            ControlPair { cp1: curr - tangent, cp2: curr + tangent }
        })
        .collect()
}

/// Closed smooth path through all `points`: move to the first, one cubic per
/// vertex (the last returns to the first), then close.
pub fn smooth_closed(points: &[Point]) -> Path {
    let n = points.len();
    if n == 0 {
        return Path::default();
    }
    let handles = control_points(points);

    let mut cmds = Vec::with_capacity(n + 2);
    cmds.push(PathCmd::MoveTo(points[0]));
    for i in 0..n {
        let j = (i + 1) % n;
        cmds.push(PathCmd::CubicTo { c1: handles[i].cp2, c2: handles[j].cp1, to: points[j] });
    }
    cmds.push(PathCmd::Close);
    Path { cmds }
}
