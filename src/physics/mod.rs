//! Physical description of the bioheat problem
//!
//! This module holds the **equation**: domain length, perfusion (decay)
//! coefficient λ² and volumetric source S(x). It knows nothing about
//! matrices or iterations; the solver module turns it into linear systems.
//!
//! # Core Concepts
//!
//! - **Parameters** ([`BioheatParameters`]): immutable value passed to every
//!   component at construction
//! - **Source term** ([`SourceTerm`]): optional right-hand side forcing
//! - **Reference profile** ([`reference`]): closed-form solution of the
//!   homogeneous steady problem, used to measure discretization error
//!
//! # Example
//!
//! ```rust
//! use bioheat_rs::physics::{BioheatParameters, SourceTerm};
//!
//! let params = BioheatParameters::tissue();
//! let source = params.source();
//!
//! // Deposition peaks at the surface
//! assert!(source.evaluate(1.0, params.length()) > source.evaluate(0.0, params.length()));
//! ```

pub mod parameters;
pub mod reference;
pub mod source;

pub use parameters::BioheatParameters;
pub use source::SourceTerm;
