//! Immutable, persistent builder for recursive field descriptors
//!
//! `fieldsmith` assembles a tree of field descriptors: each one pairs a
//! lazily realized validation type with a configuration object (display
//! metadata, validators, rendering hints, and child field configuration).
//! The result drives both runtime validation and a presentation layer,
//! without committing callers to any evaluation order.
//!
//! # Architecture
//!
//! - **Immutable state**: every setter returns a new builder; originals are
//!   never touched, so builders are safe to reuse across schema branches
//! - **Two-phase protocol**: configure in any order, then realize on demand
//!   via [`FieldBuilder::get_type`] and [`FieldBuilder::get_options`]
//! - **Provider propagation**: a template provider registered once at the
//!   root reaches every descendant's template callback at realization time
//! - **Select options**: eagerly realized value/label snapshots, mutually
//!   exclusive with child fields
//!
//! The crate assembles validators but never runs them; the type system,
//! the error-message combinator, and the template provider's meaning all
//! belong to collaborators behind the [`TypeSystem`] boundary.

pub mod builder;
pub mod error;
pub mod merge;
pub mod options;
pub mod schema;

pub use builder::{FieldBuilder, RealizeConfig};
pub use error::{FieldError, Result};
pub use options::{Attrs, FieldOptions};
pub use schema::{
    ErrorMessageFn, TemplateCallback, TypeConstructor, TypeSystem, ValueTransform,
};
