//! Interpreter that converts an L-System symbol sequence into a [`TubeMesh`].
//!
//! The entry point is [`TubeInterpreter`]. Configure it with the grammar's
//! [`GrowthParams`] and a [`TubeConfig`], then call [`TubeInterpreter::build`]
//! with a plain symbol string, or [`TubeInterpreter::build_from_state`] with a
//! [`symbios::SymbiosState`] after registering symbol mappings.

use crate::error::{ArborError, Result};
use crate::grammar::GrowthParams;
use crate::mesh::{TubeMesh, TubeSegment};
use crate::turtle::{TurtleOp, TurtleState};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use symbios::{SymbiosState, SymbolTable};
use tracing::{debug, warn};

/// Configuration for tube interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TubeConfig {
    /// Vertices per ring (cross-section polygon sides).
    pub num_sides: usize,
    /// Maximum stack depth for push/pop operations.
    pub max_stack_depth: usize,
    /// Starting orientation. Identity grows the trunk along `+Y`.
    pub initial_rotation: Quat,
}

impl Default for TubeConfig {
    fn default() -> Self {
        Self {
            num_sides: 5,
            max_stack_depth: 1024,
            initial_rotation: Quat::IDENTITY,
        }
    }
}

/// Result of a full interpretation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Interpretation {
    pub mesh: TubeMesh,
    /// The live turtle state once the input is exhausted.
    pub final_state: TurtleState,
    /// Branches still open (unmatched `[`) at the end of input.
    pub open_branches: usize,
}

/// Interprets L-System output to build a [`TubeMesh`].
pub struct TubeInterpreter {
    op_map: Vec<TurtleOp>,
    params: GrowthParams,
    config: TubeConfig,
}

impl TubeInterpreter {
    /// Creates a new interpreter with an empty symbios symbol map.
    ///
    /// Plain strings passed to [`build`](Self::build) always use the standard
    /// alphabet; the map only matters for [`build_from_state`](Self::build_from_state).
    pub fn new(params: GrowthParams, config: TubeConfig) -> Self {
        Self {
            op_map: Vec::new(),
            params,
            config,
        }
    }

    pub fn params(&self) -> &GrowthParams {
        &self.params
    }

    pub fn config(&self) -> &TubeConfig {
        &self.config
    }

    /// Replaces the entire symbol-to-operation map in one step (builder pattern).
    ///
    /// `map` is indexed by symbol ID as returned by [`symbios::SymbolTable`].
    /// Any ID that falls outside the slice is treated as [`TurtleOp::Ignore`].
    pub fn with_map(mut self, map: Vec<TurtleOp>) -> Self {
        self.op_map = map;
        self
    }

    /// Assigns a single [`TurtleOp`] to a symbol ID, growing the map as needed.
    pub fn set_op(&mut self, sym_id: u16, op: TurtleOp) {
        let idx = sym_id as usize;
        if idx >= self.op_map.len() {
            self.op_map.resize(idx + 1, TurtleOp::Ignore);
        }
        self.op_map[idx] = op;
    }

    /// Registers the standard alphabet (`F + - > < [ ] # $`) for every symbol
    /// present in `interner`. Symbols the interner does not know are skipped.
    pub fn populate_standard_symbols(&mut self, interner: &SymbolTable) {
        for (sym, op) in TurtleOp::STANDARD_SYMBOLS {
            if let Some(id) = interner.resolve_id(&sym.to_string()) {
                self.set_op(id, op);
            }
        }
    }

    /// Builds the tube mesh for `symbols`.
    ///
    /// Fails on an unmatched `]` without returning any partial geometry.
    pub fn build(&self, symbols: &str) -> Result<TubeMesh> {
        self.interpret(symbols).map(|i| i.mesh)
    }

    /// Like [`build`](Self::build) but also reports the final turtle state.
    pub fn interpret(&self, symbols: &str) -> Result<Interpretation> {
        self.run(symbols.chars().map(|c| (TurtleOp::from_symbol(c), None)))
    }

    /// Interprets a symbios derivation using the registered symbol map.
    ///
    /// A `Draw` module's first parameter, when present, overrides the segment
    /// length for that one segment.
    pub fn build_from_state(&self, state: &SymbiosState) -> Result<TubeMesh> {
        let ops = (0..state.len()).map_while(|i| {
            let view = state.get_view(i)?;
            let op = *self
                .op_map
                .get(view.sym as usize)
                .unwrap_or(&TurtleOp::Ignore);
            let length = view.params.first().map(|&x| x as f32);
            Some((op, length))
        });
        self.run(ops).map(|i| i.mesh)
    }

    fn run(&self, ops: impl Iterator<Item = (TurtleOp, Option<f32>)>) -> Result<Interpretation> {
        let sides = self.config.num_sides;
        if sides < 3 {
            return Err(ArborError::TooFewSides(sides));
        }
        self.params.validate()?;
        let rotation = self.config.initial_rotation;
        if !rotation.is_finite() || rotation.length_squared() < 1e-12 {
            return Err(ArborError::DegenerateRotation(rotation.to_array()));
        }

        let mut mesh = TubeMesh::new();
        let mut turtle = TurtleState::new(
            rotation.normalize(),
            self.params.initial_thickness,
            self.params.initial_length,
        );
        let mut stack: Vec<TurtleState> = Vec::new();
        let mut clamped = 0usize;

        for (index, (op, length_override)) in ops.enumerate() {
            match op {
                TurtleOp::Draw => {
                    let raw_radius = turtle.thickness / 2.0;
                    let raw_length = length_override.unwrap_or(turtle.length);
                    let radius = non_degenerate(raw_radius);
                    let length = non_degenerate(raw_length);
                    if radius != raw_radius || length != raw_length {
                        clamped += 1;
                    }

                    let base = mesh.vertices.len();
                    if base + 2 * sides > u32::MAX as usize {
                        return Err(ArborError::IndexOverflow(base + 2 * sides));
                    }

                    let start = turtle.position;
                    emit_ring(&mut mesh.vertices, &turtle, radius, sides);
                    turtle.advance(length);
                    emit_ring(&mut mesh.vertices, &turtle, radius, sides);
                    stitch_rings(&mut mesh.indices, base as u32, sides as u32);

                    mesh.segments.push(TubeSegment {
                        start,
                        end: turtle.position,
                        radius,
                    });
                }
                TurtleOp::Incline(s) => turtle.pitch(self.params.delta_inclination * s),
                TurtleOp::Azimuth(s) => turtle.azimuth(self.params.delta_azimuth * s),
                TurtleOp::Push => {
                    if stack.len() >= self.config.max_stack_depth {
                        return Err(ArborError::StackOverflow {
                            index,
                            limit: self.config.max_stack_depth,
                        });
                    }
                    stack.push(turtle);
                    turtle.mark_branch();
                }
                TurtleOp::Pop => {
                    turtle = stack.pop().ok_or(ArborError::StackUnderflow { index })?;
                }
                TurtleOp::DecayThickness => turtle.thickness *= self.params.thickness_decay,
                TurtleOp::DecayLength => turtle.length *= self.params.length_decay,
                TurtleOp::Ignore => {}
            }
        }

        if !stack.is_empty() {
            warn!(open = stack.len(), "symbol string ended with unclosed branches");
        }
        if clamped > 0 {
            warn!(segments = clamped, "degenerate thickness or length clamped to zero");
        }
        debug!(
            vertices = mesh.vertices.len(),
            triangles = mesh.triangle_count(),
            segments = mesh.segments.len(),
            "built tube mesh"
        );

        Ok(Interpretation {
            mesh,
            final_state: turtle,
            open_branches: stack.len(),
        })
    }
}

/// Maps NaN, infinite and non-positive extents to zero.
fn non_degenerate(x: f32) -> f32 {
    if x.is_finite() && x > 0.0 { x } else { 0.0 }
}

/// Appends one ring of `sides` vertices around the turtle's position,
/// perpendicular to its heading.
fn emit_ring(vertices: &mut Vec<Vec3>, turtle: &TurtleState, radius: f32, sides: usize) {
    let heading = turtle.heading();
    let offset = turtle.right() * radius;
    vertices.extend((0..sides).map(|j| {
        let spin = Quat::from_axis_angle(heading, TAU * j as f32 / sides as f32);
        turtle.position + spin * offset
    }));
}

/// Triangulates the strip between the ring starting at `base` and the next one.
///
/// Ring vertex `j` of the lower ring is `base + j`, of the upper ring
/// `base + sides + j`; the last quad wraps back to `j = 0`.
fn stitch_rings(indices: &mut Vec<u32>, base: u32, sides: u32) {
    for j in 0..sides {
        let k = (j + 1) % sides;
        let (a0, a1) = (base + j, base + k);
        let (b0, b1) = (base + sides + j, base + sides + k);
        indices.extend_from_slice(&[a0, b1, b0, a0, a1, b1]);
    }
}
