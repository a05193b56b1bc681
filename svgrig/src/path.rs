use crate::{Affine, Point2D, Warning};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathPrimitive {
    MoveTo(Point2D),
    LineTo(Point2D),
    CubicTo {
        ctrl1: Point2D,
        ctrl2: Point2D,
        to: Point2D,
    },
    /// Line back to the start of the current subpath.
    ClosePath,
}

/// Absolute path geometry, in the coordinate space of its node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub primitives: Vec<PathPrimitive>,
}

/// Result of interpreting a `d` attribute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    pub path: Path,
    pub warnings: Vec<Warning>,
}

impl Path {
    /// Interprets path data made of whitespace-separated command letters
    /// (`M m L l C c Z z`) and `x,y` coordinate tokens.
    ///
    /// Never fails: unsupported commands, malformed coordinates and dangling
    /// curve groups are reported as warnings and skipped.
    pub fn parse(d: &str) -> PathData {
        let mut interpreter = PathInterpreter::default();
        for token in d.split_whitespace() {
            interpreter.token(token);
        }
        interpreter.finish()
    }

    /// Every absolute point of the path in order, one per accepted
    /// coordinate pair. Curve control points are included; `ClosePath`
    /// contributes nothing.
    pub fn points(&self) -> Vec<Point2D> {
        let mut out = Vec::with_capacity(self.primitives.len());
        for primitive in &self.primitives {
            match *primitive {
                PathPrimitive::MoveTo(p) | PathPrimitive::LineTo(p) => out.push(p),
                PathPrimitive::CubicTo { ctrl1, ctrl2, to } => {
                    out.extend([ctrl1, ctrl2, to]);
                }
                PathPrimitive::ClosePath => {}
            }
        }
        out
    }

    /// Position of the pen after the last primitive.
    pub fn end_point(&self) -> Option<Point2D> {
        let mut start = None;
        let mut current = None;
        for primitive in &self.primitives {
            match *primitive {
                PathPrimitive::MoveTo(p) => {
                    start = Some(p);
                    current = Some(p);
                }
                PathPrimitive::LineTo(p) | PathPrimitive::CubicTo { to: p, .. } => {
                    current = Some(p);
                }
                PathPrimitive::ClosePath => current = start,
            }
        }
        current
    }

    pub fn transformed(&self, transform: &Affine) -> Path {
        let primitives = self
            .primitives
            .iter()
            .map(|primitive| match *primitive {
                PathPrimitive::MoveTo(p) => PathPrimitive::MoveTo(transform.apply(p)),
                PathPrimitive::LineTo(p) => PathPrimitive::LineTo(transform.apply(p)),
                PathPrimitive::CubicTo { ctrl1, ctrl2, to } => PathPrimitive::CubicTo {
                    ctrl1: transform.apply(ctrl1),
                    ctrl2: transform.apply(ctrl2),
                    to: transform.apply(to),
                },
                PathPrimitive::ClosePath => PathPrimitive::ClosePath,
            })
            .collect();
        Path { primitives }
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// Points-only interpretation, used for the skeleton path.
pub fn path_points(d: &str) -> (Vec<Point2D>, Vec<Warning>) {
    let data = Path::parse(d);
    (data.path.points(), data.warnings)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Command {
    Move { relative: bool },
    Line { relative: bool },
    Cubic { relative: bool },
    Close,
}

impl Command {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "M" => Some(Self::Move { relative: false }),
            "m" => Some(Self::Move { relative: true }),
            "L" => Some(Self::Line { relative: false }),
            "l" => Some(Self::Line { relative: true }),
            "C" => Some(Self::Cubic { relative: false }),
            "c" => Some(Self::Cubic { relative: true }),
            "Z" | "z" => Some(Self::Close),
            _ => None,
        }
    }
}

#[derive(Default)]
struct PathInterpreter {
    current: Point2D,
    subpath_start: Point2D,
    command: Option<Command>,
    // Coordinate pairs accepted since the last command letter.
    run_len: usize,
    pending_curve: Vec<Point2D>,
    primitives: Vec<PathPrimitive>,
    warnings: Vec<Warning>,
}

impl PathInterpreter {
    fn token(&mut self, token: &str) {
        if let Some(command) = Command::from_token(token) {
            self.begin_command(command);
            return;
        }

        match token.parse::<Point2D>() {
            Ok(p) => self.coordinate(token, p),
            // The running command stays active, so the pairs that follow
            // still land at their index in points-only mode.
            Err(_) if looks_like_command(token) => {
                self.end_run();
                self.report(Warning::UnknownCommand {
                    token: token.to_string(),
                });
            }
            Err(_) => self.report(Warning::MalformedPoint {
                token: token.to_string(),
            }),
        }
    }

    fn begin_command(&mut self, command: Command) {
        self.end_run();
        self.command = Some(command);
        self.run_len = 0;
        if command == Command::Close {
            self.primitives.push(PathPrimitive::ClosePath);
            self.current = self.subpath_start;
        }
    }

    fn coordinate(&mut self, token: &str, p: Point2D) {
        match self.command {
            Some(Command::Close) | None => {
                self.report(Warning::OrphanCoordinate {
                    token: token.to_string(),
                });
                return;
            }
            Some(Command::Move { relative }) => {
                let target = if relative { self.current + p } else { p };
                if self.run_len == 0 {
                    self.primitives.push(PathPrimitive::MoveTo(target));
                    self.subpath_start = target;
                } else {
                    // Extra pairs after a move are implicit line-tos.
                    self.primitives.push(PathPrimitive::LineTo(target));
                }
                self.current = target;
            }
            Some(Command::Line { relative }) => {
                let target = if relative { self.current + p } else { p };
                self.primitives.push(PathPrimitive::LineTo(target));
                self.current = target;
            }
            Some(Command::Cubic { relative }) => {
                self.pending_curve.push(p);
                if self.pending_curve.len() == 3 {
                    let base = if relative {
                        self.current
                    } else {
                        Point2D::ORIGIN
                    };
                    let ctrl1 = base + self.pending_curve[0];
                    let ctrl2 = base + self.pending_curve[1];
                    let to = base + self.pending_curve[2];
                    self.pending_curve.clear();
                    self.primitives
                        .push(PathPrimitive::CubicTo { ctrl1, ctrl2, to });
                    self.current = to;
                }
            }
        }
        self.run_len += 1;
    }

    fn end_run(&mut self) {
        if !self.pending_curve.is_empty() {
            let pairs = self.pending_curve.len();
            self.pending_curve.clear();
            self.report(Warning::IncompleteCurve { pairs });
        }
    }

    fn report(&mut self, warning: Warning) {
        log::warn!("path data: {warning}");
        self.warnings.push(warning);
    }

    fn finish(mut self) -> PathData {
        self.end_run();
        PathData {
            path: Path {
                primitives: self.primitives,
            },
            warnings: self.warnings,
        }
    }
}

fn looks_like_command(token: &str) -> bool {
    !token.contains(',') && token.starts_with(|c: char| c.is_ascii_alphabetic())
}
