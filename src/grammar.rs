//! Growth grammar: an axiom, a production rule and the numeric growth parameters.

use crate::error::{ArborError, Result};
use crate::interpreter::{TubeConfig, TubeInterpreter};
use crate::mesh::TubeMesh;
use crate::rule::ProductionRule;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use tracing::{debug, trace};

/// Numeric parameters steering the turtle.
///
/// Angles are in radians. The decay factors are meant to lie in `(0, 1]` but
/// any finite value is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthParams {
    /// Rotation step for `+`/`-`.
    pub delta_inclination: f32,
    /// Rotation step for `>`/`<`.
    pub delta_azimuth: f32,
    /// Trunk diameter at the root.
    pub initial_thickness: f32,
    /// Thickness multiplier applied on `#`.
    pub thickness_decay: f32,
    /// Segment length at the root.
    pub initial_length: f32,
    /// Length multiplier applied on `$`.
    pub length_decay: f32,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            delta_inclination: PI / 6.0,
            delta_azimuth: 2.0 * PI / 3.0,
            initial_thickness: 1.0,
            thickness_decay: 0.7,
            initial_length: 1.0,
            length_decay: 0.8,
        }
    }
}

impl GrowthParams {
    /// Rejects NaN and infinite values. Non-positive sizes are allowed; they
    /// produce degenerate geometry rather than an error.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("delta_inclination", self.delta_inclination),
            ("delta_azimuth", self.delta_azimuth),
            ("initial_thickness", self.initial_thickness),
            ("thickness_decay", self.thickness_decay),
            ("initial_length", self.initial_length),
            ("length_decay", self.length_decay),
        ];
        match fields.into_iter().find(|(_, v)| !v.is_finite()) {
            Some((name, value)) => Err(ArborError::NonFiniteParameter { name, value }),
            None => Ok(()),
        }
    }
}

/// An L-System species: axiom, production rule and growth parameters.
///
/// Immutable once constructed, and `Send + Sync`, so one grammar can feed
/// several builds on different threads.
pub struct GrowthGrammar {
    axiom: String,
    rule: Box<dyn ProductionRule + Send + Sync>,
    params: GrowthParams,
}

impl fmt::Debug for GrowthGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowthGrammar")
            .field("axiom", &self.axiom)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl GrowthGrammar {
    pub fn new<R>(axiom: impl Into<String>, rule: R, params: GrowthParams) -> Self
    where
        R: ProductionRule + Send + Sync + 'static,
    {
        Self {
            axiom: axiom.into(),
            rule: Box::new(rule),
            params,
        }
    }

    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    pub fn params(&self) -> &GrowthParams {
        &self.params
    }

    /// Applies the rule to the whole string `iterations` times.
    ///
    /// `grow(0)` is the axiom; `grow(n + 1)` is `rule(grow(n))`.
    pub fn grow(&self, iterations: u32) -> String {
        let mut current = self.axiom.clone();
        for i in 0..iterations {
            current = self.rule.apply(&current);
            trace!(iteration = i + 1, len = current.len(), "grammar pass");
        }
        debug!(iterations, len = current.len(), "grew symbol string");
        current
    }

    /// [`grow`](Self::grow) for callers holding a signed count.
    /// Counts outside `0..=u32::MAX` fail instead of clamping.
    pub fn grow_checked(&self, iterations: i64) -> Result<String> {
        if iterations < 0 {
            return Err(ArborError::NegativeIterations(iterations));
        }
        let iterations =
            u32::try_from(iterations).map_err(|_| ArborError::TooManyIterations(iterations))?;
        Ok(self.grow(iterations))
    }

    /// [`grow`](Self::grow) with a cap on the string length, checked after
    /// every pass so runaway grammars stop early.
    pub fn grow_bounded(&self, iterations: u32, max_len: usize) -> Result<String> {
        let mut current = self.axiom.clone();
        for i in 1..=iterations {
            current = self.rule.apply(&current);
            if current.len() > max_len {
                return Err(ArborError::GrowthBudgetExceeded {
                    iteration: i,
                    len: current.len(),
                    limit: max_len,
                });
            }
        }
        Ok(current)
    }

    /// Every generation from the axiom up to `grow(iterations)`, in order.
    pub fn generations(&self, iterations: u32) -> Vec<String> {
        let mut out = Vec::with_capacity(iterations as usize + 1);
        out.push(self.axiom.clone());
        for _ in 0..iterations {
            let next = self.rule.apply(&out[out.len() - 1]);
            out.push(next);
        }
        out
    }

    /// An interpreter using this grammar's parameters.
    pub fn interpreter(&self, config: TubeConfig) -> TubeInterpreter {
        TubeInterpreter::new(self.params, config)
    }

    /// Builds the tube mesh for `symbols` with this grammar's parameters.
    pub fn build(&self, symbols: &str, config: TubeConfig) -> Result<TubeMesh> {
        self.interpreter(config).build(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::ReplaceRule;

    fn tree() -> GrowthGrammar {
        GrowthGrammar::new("X", ReplaceRule::new("X", "F[-X]F[-X]"), GrowthParams::default())
    }

    #[test]
    fn zero_iterations_is_axiom() {
        assert_eq!(tree().grow(0), "X");
    }

    #[test]
    fn negative_iterations_fail() {
        assert_eq!(
            tree().grow_checked(-1),
            Err(ArborError::NegativeIterations(-1))
        );
        assert_eq!(tree().grow_checked(1).unwrap(), "F[-X]F[-X]");
    }

    #[test]
    fn oversized_iterations_fail() {
        let too_many = i64::from(u32::MAX) + 1;
        assert_eq!(
            tree().grow_checked(too_many),
            Err(ArborError::TooManyIterations(too_many))
        );
    }

    #[test]
    fn bounded_growth_stops_at_cap() {
        let err = tree().grow_bounded(5, 20).unwrap_err();
        assert!(matches!(
            err,
            ArborError::GrowthBudgetExceeded { iteration: 2, limit: 20, .. }
        ));
        assert_eq!(tree().grow_bounded(1, 20).unwrap(), tree().grow(1));
    }

    #[test]
    fn generations_start_at_axiom() {
        let g = tree();
        let gens = g.generations(3);
        assert_eq!(gens.len(), 4);
        assert_eq!(gens[0], "X");
        assert_eq!(gens[3], g.grow(3));
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        let params = GrowthParams {
            thickness_decay: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ArborError::NonFiniteParameter { name: "thickness_decay", .. })
        ));
        assert!(GrowthParams::default().validate().is_ok());
    }
}
