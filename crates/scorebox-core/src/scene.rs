//! Retained scene graph
//!
//! The scene holds one [`BoxGroup`] per player plus the two axes and the
//! container transform. Every primitive carries its own opacity [`Fade`],
//! evaluated against an explicit clock, so the scene can be sampled at any
//! point of a transition.
//!
//! Dataset switches go through [`Scene::join`], a keyed join on the player
//! identifier:
//! - groups for new players enter, fading in from transparent
//! - groups for retained players are rebuilt and fade in from wherever they are
//! - groups for absent players fade out and are dropped by [`Scene::prune`]

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::axis::Axis;
use crate::view::ViewTransform;

/// Cubic ease-in-out over `t` in [0, 1]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let u = t - 2.0;
        (u * u * u + 2.0) / 2.0
    }
}

/// Opacity transition between two values
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    pub from: f64,
    pub to: f64,
    /// Clock time the transition starts
    pub start: f64,
    pub duration: f64,
}

impl Fade {
    /// A constant opacity
    pub fn fixed(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            start: 0.0,
            duration: 0.0,
        }
    }

    /// Transition from `from` to `to` starting at `start`
    pub fn new(from: f64, to: f64, start: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// Opacity at clock time `now`
    pub fn value_at(&self, now: f64) -> f64 {
        if now <= self.start {
            return self.from;
        }
        if self.duration <= 0.0 || now >= self.start + self.duration {
            return self.to;
        }
        let t = (now - self.start) / self.duration;
        self.from + (self.to - self.from) * ease_cubic_in_out(t)
    }

    /// Check if the transition has reached its target at `now`
    pub fn is_finished(&self, now: f64) -> bool {
        self.duration <= 0.0 || now >= self.start + self.duration
    }

    /// Replace this transition with one towards `to`, starting from the
    /// opacity reached at `now`
    pub fn retarget(&self, now: f64, to: f64, duration: f64) -> Self {
        Self::new(self.value_at(now), to, now, duration)
    }
}

/// Role of a primitive inside a box group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// Interquartile rectangle
    Quartiles,
    Median,
    UpperWhisker,
    LowerWhisker,
    Outlier,
}

impl PrimitiveKind {
    /// Class name of the primitive
    pub fn class_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Quartiles => "quartiles",
            PrimitiveKind::Median => "median",
            PrimitiveKind::UpperWhisker => "upper-whisker",
            PrimitiveKind::LowerWhisker => "lower-whisker",
            PrimitiveKind::Outlier => "outlier",
        }
    }
}

/// A single path command
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
}

/// Polyline path data
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    pub commands: Vec<PathCommand>,
}

impl PathData {
    /// Start a path at (x, y)
    pub fn move_to(x: f64, y: f64) -> Self {
        Self {
            commands: vec![PathCommand::MoveTo(x, y)],
        }
    }

    /// Append a line to (x, y)
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::LineTo(x, y));
        self
    }

    /// All points visited, in order
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.commands
            .iter()
            .map(|c| match *c {
                PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => (x, y),
            })
            .collect()
    }

    /// SVG `d` attribute
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                d.push(' ');
            }
            let _ = match *cmd {
                PathCommand::MoveTo(x, y) => write!(d, "M {} {}", x, y),
                PathCommand::LineTo(x, y) => write!(d, "L {} {}", x, y),
            };
        }
        d
    }
}

/// Geometry of a primitive
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Path(PathData),
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
}

/// Paint attributes; `fill: None` means no fill
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: String,
    pub stroke_width: Option<f64>,
}

/// A drawable element with its own opacity transition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub shape: Shape,
    pub style: Style,
    pub opacity: Fade,
}

impl Primitive {
    /// Create a transparent primitive
    pub fn new(kind: PrimitiveKind, shape: Shape, style: Style) -> Self {
        Self {
            kind,
            shape,
            style,
            opacity: Fade::fixed(0.0),
        }
    }

    /// Opacity at clock time `now`
    pub fn opacity_at(&self, now: f64) -> f64 {
        self.opacity.value_at(now)
    }
}

/// All primitives drawn for one player
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxGroup {
    pub player: String,
    pub primitives: Vec<Primitive>,
    /// Set once the player left the dataset
    pub exiting: bool,
}

impl BoxGroup {
    pub fn new(player: impl Into<String>, primitives: Vec<Primitive>) -> Self {
        Self {
            player: player.into(),
            primitives,
            exiting: false,
        }
    }

    /// Class name of the group
    pub fn class_name(&self) -> String {
        format!("box {}", self.player)
    }

    /// Primitives of one kind
    pub fn of_kind(&self, kind: PrimitiveKind) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| p.kind == kind)
    }

    /// Check if every primitive finished its transition at `now`
    pub fn is_settled(&self, now: f64) -> bool {
        self.primitives.iter().all(|p| p.opacity.is_finished(now))
    }

    fn fade_all(&mut self, now: f64, to: f64, duration: f64) {
        for p in &mut self.primitives {
            p.opacity = p.opacity.retarget(now, to, duration);
        }
    }
}

/// Counts from a keyed join
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSummary {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// The retained scene
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scene {
    groups: Vec<BoxGroup>,
    x_axis: Option<Axis>,
    y_axis: Option<Axis>,
    container: ViewTransform,
    x_axis_redraws: u64,
    y_axis_redraws: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the groups with `incoming`, keyed by player
    ///
    /// Incoming groups keep their order; groups still fading out follow.
    /// Primitives of retained groups inherit the opacity of the primitive
    /// with the same kind and ordinal in the old group.
    pub fn join(&mut self, incoming: Vec<BoxGroup>, now: f64, duration: f64) -> JoinSummary {
        let previous_order: Vec<String> = self.groups.iter().map(|g| g.player.clone()).collect();
        let mut previous: HashMap<String, BoxGroup> = self
            .groups
            .drain(..)
            .map(|g| (g.player.clone(), g))
            .collect();

        let mut summary = JoinSummary::default();
        let mut groups = Vec::with_capacity(incoming.len());

        for mut group in incoming {
            match previous.remove(&group.player) {
                Some(old) => {
                    let mut ordinals: HashMap<PrimitiveKind, usize> = HashMap::new();
                    for p in &mut group.primitives {
                        let ordinal = ordinals.entry(p.kind).or_insert(0);
                        let prior = old.of_kind(p.kind).nth(*ordinal);
                        *ordinal += 1;
                        p.opacity = match prior {
                            Some(prior) => prior.opacity.retarget(now, 1.0, duration),
                            None => Fade::new(0.0, 1.0, now, duration),
                        };
                    }
                    summary.updated += 1;
                }
                None => {
                    for p in &mut group.primitives {
                        p.opacity = Fade::new(0.0, 1.0, now, duration);
                    }
                    summary.entered += 1;
                }
            }
            group.exiting = false;
            groups.push(group);
        }

        for player in previous_order {
            if let Some(mut old) = previous.remove(&player) {
                if !old.exiting {
                    old.fade_all(now, 0.0, duration);
                    old.exiting = true;
                    summary.exited += 1;
                }
                groups.push(old);
            }
        }

        self.groups = groups;
        summary
    }

    /// Drop exiting groups whose fade-out has completed at `now`
    ///
    /// Returns the number of groups removed.
    pub fn prune(&mut self, now: f64) -> usize {
        let before = self.groups.len();
        self.groups.retain(|g| !(g.exiting && g.is_settled(now)));
        before - self.groups.len()
    }

    /// Remove every group and both axes
    pub fn clear(&mut self) {
        self.groups.clear();
        self.x_axis = None;
        self.y_axis = None;
        self.container = ViewTransform::identity();
    }

    /// Replace both axes, counting the redraw
    pub fn set_axes(&mut self, x_axis: Axis, y_axis: Axis) {
        self.x_axis = Some(x_axis);
        self.y_axis = Some(y_axis);
        self.x_axis_redraws += 1;
        self.y_axis_redraws += 1;
    }

    /// Set the transform of the primitive container
    pub fn set_container(&mut self, transform: ViewTransform) {
        self.container = transform;
    }

    pub fn groups(&self) -> &[BoxGroup] {
        &self.groups
    }

    /// Group for `player`, exiting or not
    pub fn group(&self, player: &str) -> Option<&BoxGroup> {
        self.groups.iter().find(|g| g.player == player)
    }

    /// Groups not fading out
    pub fn live_groups(&self) -> impl Iterator<Item = &BoxGroup> {
        self.groups.iter().filter(|g| !g.exiting)
    }

    /// Total number of primitives across all groups
    pub fn primitive_count(&self) -> usize {
        self.groups.iter().map(|g| g.primitives.len()).sum()
    }

    pub fn x_axis(&self) -> Option<&Axis> {
        self.x_axis.as_ref()
    }

    pub fn y_axis(&self) -> Option<&Axis> {
        self.y_axis.as_ref()
    }

    pub fn container(&self) -> &ViewTransform {
        &self.container
    }

    /// Number of times each axis was redrawn, (x, y)
    pub fn axis_redraws(&self) -> (u64, u64) {
        (self.x_axis_redraws, self.y_axis_redraws)
    }

    /// Check if every transition has completed at `now`
    pub fn is_settled(&self, now: f64) -> bool {
        self.groups.iter().all(|g| g.is_settled(now))
    }
}
