//! Turtle state and operations for tube interpretation.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The state of the drawing turtle.
///
/// A plain `Copy` value: pushing a branch stores a full copy, so later changes
/// to the live state never leak into a saved one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    /// Current world-space position of the "cursor".
    pub position: Vec3,

    /// Current world-space orientation. Growth follows the local Y axis.
    pub rotation: Quat,

    /// Current cross-section diameter.
    pub thickness: f32,

    /// Current segment length.
    pub length: f32,

    /// World-space heading captured at the most recent open branch point.
    /// Azimuth turns (`>`/`<`) spin around this axis.
    pub branch_axis: Vec3,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self::new(Quat::IDENTITY, 1.0, 1.0)
    }
}

impl TurtleState {
    /// Creates a turtle at the origin with the given orientation and pen.
    pub fn new(rotation: Quat, thickness: f32, length: f32) -> Self {
        let mut state = Self {
            position: Vec3::ZERO,
            rotation,
            thickness,
            length,
            branch_axis: Vec3::Y,
        };
        state.branch_axis = state.heading();
        state
    }

    /// Returns the turtle's growth direction (local Y axis) in world space.
    pub fn heading(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Returns the turtle's local right direction (X-axis) in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Moves the turtle `distance` along its heading.
    pub fn advance(&mut self, distance: f32) {
        self.position += self.heading() * distance;
    }

    /// Rotates the turtle around its local X axis by `angle` radians (inclination).
    pub fn pitch(&mut self, angle: f32) {
        let rot = Quat::from_axis_angle(Vec3::X, angle);
        self.rotation = (self.rotation * rot).normalize();
    }

    /// Rotates the turtle around the current branch axis by `angle` radians.
    pub fn azimuth(&mut self, angle: f32) {
        let rot = Quat::from_axis_angle(self.branch_axis, angle);
        self.rotation = (rot * self.rotation).normalize();
    }

    /// Records the current heading as the axis for subsequent azimuth turns.
    /// Called on the live state right after it has been pushed.
    pub fn mark_branch(&mut self) {
        self.branch_axis = self.heading();
    }
}

/// Operations that can be performed by the tube turtle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurtleOp {
    /// Draw a tube segment and advance (`F`).
    Draw,
    /// Rotate by `sign × delta_inclination` around local X (`+`/`-`).
    Incline(f32),
    /// Rotate by `sign × delta_azimuth` around the branch axis (`>`/`<`).
    Azimuth(f32),
    /// Save the full turtle state onto the stack (`[`).
    Push,
    /// Restore the most recently pushed turtle state (`]`).
    Pop,
    /// Multiply thickness by the thickness decay (`#`).
    DecayThickness,
    /// Multiply length by the length decay (`$`).
    DecayLength,
    /// No-op — symbol has no registered meaning.
    Ignore,
}

impl TurtleOp {
    /// The standard alphabet. Anything else maps to [`TurtleOp::Ignore`].
    pub const STANDARD_SYMBOLS: [(char, TurtleOp); 9] = [
        ('F', TurtleOp::Draw),
        ('+', TurtleOp::Incline(1.0)),
        ('-', TurtleOp::Incline(-1.0)),
        ('>', TurtleOp::Azimuth(1.0)),
        ('<', TurtleOp::Azimuth(-1.0)),
        ('[', TurtleOp::Push),
        (']', TurtleOp::Pop),
        ('#', TurtleOp::DecayThickness),
        ('$', TurtleOp::DecayLength),
    ];

    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            'F' => Self::Draw,
            '+' => Self::Incline(1.0),
            '-' => Self::Incline(-1.0),
            '>' => Self::Azimuth(1.0),
            '<' => Self::Azimuth(-1.0),
            '[' => Self::Push,
            ']' => Self::Pop,
            '#' => Self::DecayThickness,
            '$' => Self::DecayLength,
            _ => Self::Ignore,
        }
    }
}
