//! Production rules: pure string-to-string rewrites applied to a whole symbol string.

use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A production rule rewriting an entire symbol string in one pass.
///
/// Implementations must be deterministic for a given input. Closures of the
/// form `Fn(&str) -> String` implement this trait directly.
pub trait ProductionRule {
    /// Rewrites `input` once and returns the successor string.
    fn apply(&self, input: &str) -> String;
}

impl<F> ProductionRule for F
where
    F: Fn(&str) -> String,
{
    fn apply(&self, input: &str) -> String {
        self(input)
    }
}

/// Literal find/replace of every non-overlapping occurrence of `from`.
///
/// Occurrences introduced by `to` are not re-expanded within the same pass;
/// they are picked up by the next iteration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceRule {
    /// Substring to match. An empty pattern leaves the input unchanged.
    pub from: String,
    /// Replacement inserted for each match.
    pub to: String,
}

impl ReplaceRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl ProductionRule for ReplaceRule {
    fn apply(&self, input: &str) -> String {
        // An empty pattern would match between every character.
        if self.from.is_empty() {
            return input.to_owned();
        }
        input.replace(&self.from, &self.to)
    }
}

/// Several single-symbol productions rewritten simultaneously.
///
/// Symbols without a production are copied through unchanged, so the drawing
/// alphabet survives every pass as long as no production targets it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    productions: BTreeMap<char, String>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the production for `symbol` (builder pattern).
    pub fn with(mut self, symbol: char, successor: impl Into<String>) -> Self {
        self.insert(symbol, successor);
        self
    }

    pub fn insert(&mut self, symbol: char, successor: impl Into<String>) {
        self.productions.insert(symbol, successor.into());
    }

    pub fn successor(&self, symbol: char) -> Option<&str> {
        self.productions.get(&symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }
}

impl ProductionRule for RuleSet {
    fn apply(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len() * 2);
        for c in input.chars() {
            match self.productions.get(&c) {
                Some(successor) => out.push_str(successor),
                None => out.push(c),
            }
        }
        out
    }
}

/// A symbol with weighted alternative successors.
///
/// Each call reseeds a [`StdRng`] from `seed`, so the choice sequence is
/// reproducible: the same seed and input always yield the same output.
/// Vary the seed to get a different specimen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StochasticRule {
    /// The symbol being rewritten.
    pub symbol: char,
    /// Candidate successors with their relative weights.
    pub alternatives: Vec<(String, f32)>,
    /// Seed for the choice sequence of every pass.
    pub seed: u64,
}

impl StochasticRule {
    pub fn new(symbol: char, seed: u64) -> Self {
        Self {
            symbol,
            alternatives: Vec::new(),
            seed,
        }
    }

    /// Adds a successor with the given relative weight (builder pattern).
    pub fn with_alternative(mut self, successor: impl Into<String>, weight: f32) -> Self {
        self.alternatives.push((successor.into(), weight));
        self
    }
}

impl ProductionRule for StochasticRule {
    fn apply(&self, input: &str) -> String {
        // No usable weights: leave the symbol in place rather than guess.
        let Ok(dist) = WeightedIndex::new(self.alternatives.iter().map(|(_, w)| w.max(0.0))) else {
            return input.to_owned();
        };
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut out = String::with_capacity(input.len() * 2);
        for c in input.chars() {
            if c == self.symbol {
                out.push_str(&self.alternatives[dist.sample(&mut rng)].0);
            } else {
                out.push(c);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_rule_does_not_rescan_its_own_output() {
        let rule = ReplaceRule::new("X", "F[-X]F[-X]");
        assert_eq!(rule.apply("X"), "F[-X]F[-X]");
        assert_eq!(rule.apply("F[-X]F[-X]"), "F[-F[-X]F[-X]]F[-F[-X]F[-X]]");
    }

    #[test]
    fn empty_pattern_is_identity() {
        let rule = ReplaceRule::new("", "F");
        assert_eq!(rule.apply("F+F"), "F+F");
    }

    #[test]
    fn rule_set_rewrites_in_parallel() {
        let rules = RuleSet::new().with('A', "AB").with('B', "A");
        assert_eq!(rules.apply("A"), "AB");
        assert_eq!(rules.apply("AB"), "ABA");
        assert_eq!(rules.apply("ABA"), "ABAAB");
        assert_eq!(rules.successor('C'), None);
    }

    #[test]
    fn closures_are_rules() {
        let rule = |s: &str| format!("{s}F");
        assert_eq!(rule.apply("F"), "FF");
    }

    #[test]
    fn stochastic_rule_is_reproducible_per_seed() {
        let rule = StochasticRule::new('X', 7)
            .with_alternative("F[+X]", 1.0)
            .with_alternative("F[-X]", 1.0);
        let input = "XXXXXXXX";
        assert_eq!(rule.apply(input), rule.apply(input));

        let out = rule.apply(input);
        assert_eq!(out.matches('F').count(), 8);
        assert_eq!(out.matches('X').count(), 8);
    }

    #[test]
    fn stochastic_rule_without_weights_is_identity() {
        let rule = StochasticRule::new('X', 1).with_alternative("F", 0.0);
        assert_eq!(rule.apply("XX"), "XX");
    }
}
