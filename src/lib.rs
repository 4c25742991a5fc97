//! # symbios-arbor
//!
//! Growth grammars and turtle interpretation for [Symbios](https://crates.io/crates/symbios)-style
//! L-Systems, producing engine-agnostic branching tube meshes.
//!
//! A [`GrowthGrammar`] rewrites its axiom with a [`ProductionRule`] into a symbol string;
//! a [`TubeInterpreter`] walks that string as turtle commands and emits a [`TubeMesh`]
//! (flat vertex positions plus triangle indices) ready for upload by any renderer.
//!
//! ```text
//! F      draw a segment        +  -   incline
//! [  ]   push / pop branch     >  <   azimuth around the branch axis
//! #      decay thickness       $      decay length
//! ```

pub mod error;
pub mod grammar;
pub mod interpreter;
pub mod mesh;
pub mod rule;
pub mod turtle;

pub use error::ArborError;
pub use grammar::*;
pub use interpreter::*;
pub use mesh::*;
pub use rule::*;
pub use turtle::*;
