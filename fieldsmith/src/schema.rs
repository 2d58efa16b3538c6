//! Boundary contracts for the collaborating type system.
//!
//! The builder assembles validators and rendering configuration but never
//! validates or renders anything itself. Everything it defers to lives here:
//! function aliases for the stored closures, and the [`TypeSystem`] trait the
//! builder is generic over.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;

/// Produces a validation message for a candidate value.
///
/// `None` means the value produces no message under this rule.
pub type ErrorMessageFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Derives a template factory from an opaque provider at realization time.
///
/// The provider is threaded unmodified from wherever it was registered (the
/// root builder, or a realization argument) down to every callback at any
/// depth.
pub type TemplateCallback = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Opaque value transformer stored on a field's configuration.
///
/// Stored and exposed as-is; never invoked by this crate.
pub type ValueTransform = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Deferred type factory installed by `set_type`.
///
/// Receives the accumulated error-message function and, for builders with
/// child fields, the realized subtypes keyed by field name.
pub type TypeConstructor<T> =
    Arc<dyn Fn(Option<ErrorMessageFn>, Option<BTreeMap<String, T>>) -> Result<T> + Send + Sync>;

/// The collaborating type/validation system.
///
/// Implementations supply the opaque validation types the builder assembles,
/// the optional wrapper, the named-leaf factory behind
/// `set_type_and_validate`, and the error-message combinator used when a
/// builder accumulates more than one validator.
pub trait TypeSystem: 'static {
    /// Opaque validation type, possibly composite.
    type Type: Clone + Send + Sync + 'static;

    /// Opaque type descriptor consumed by [`TypeSystem::validated`].
    type Descriptor: Clone + Send + Sync + 'static;

    /// Wrap a type so that absent values pass validation.
    fn optional(ty: Self::Type) -> Self::Type;

    /// Build a named leaf type from a descriptor and an error-message
    /// function.
    fn validated(
        descriptor: Self::Descriptor,
        error: Option<ErrorMessageFn>,
        name: &str,
    ) -> Result<Self::Type>;

    /// Combine several error-message functions into one composite.
    ///
    /// The composite must consult every function; the aggregation policy is
    /// the implementation's own. Composition is expected to tolerate repeated
    /// application, since validators can be added one at a time.
    fn combine_error_messages(fns: Vec<ErrorMessageFn>) -> ErrorMessageFn;
}
