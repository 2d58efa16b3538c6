//! Realized field configuration.
//!
//! `FieldOptions` is the plain data tree produced by configuration
//! realization: display metadata, rendering hints, select-option snapshots,
//! and recursively realized child configurations. The two function-valued
//! slots (`error`, `transformer`) ride along for consumers but are excluded
//! from serialization.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::schema::{ErrorMessageFn, ValueTransform};

/// Rendering attributes nested under a field's configuration.
///
/// Merged key-wise rather than replaced wholesale: setting the placeholder
/// never clears an earlier autofocus, and vice versa.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Attrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_focus: Option<bool>,
}

impl Attrs {
    /// True when no attribute has been set.
    pub fn is_empty(&self) -> bool {
        self.placeholder.is_none() && self.auto_focus.is_none()
    }
}

/// A realized field configuration tree.
///
/// Scalar fields hold the most recently set value. `order` mirrors the
/// sequence in which child fields were added. `fields` is populated only
/// during realization, never by direct caller action.
#[derive(Clone, Default, Serialize)]
pub struct FieldOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Concrete template factory: set directly, or derived from the template
    /// callback at realization time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory: Option<Value>,
    /// Validation error-message function. Not serializable.
    #[serde(skip)]
    pub error: Option<ErrorMessageFn>,
    /// Opaque value transformer. Not serializable.
    #[serde(skip)]
    pub transformer: Option<ValueTransform>,
    #[serde(skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
    /// Opaque pass-through configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    /// Child field keys in insertion order. Append-only.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<String>,
    /// Eagerly realized select-option snapshots.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOptions>,
    /// Realized default/empty choice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_option: Option<Box<FieldOptions>>,
    /// Realized child configurations, in field insertion order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, FieldOptions>,
}

impl FieldOptions {
    /// Snapshot the data portion of this configuration as a JSON value.
    ///
    /// The function-valued slots are omitted; everything else serializes
    /// with unset fields skipped.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("disabled", &self.disabled)
            .field("label", &self.label)
            .field("name", &self.name)
            .field("value", &self.value)
            .field("text", &self.text)
            .field("help", &self.help)
            .field("factory", &self.factory)
            .field("error", &self.error.as_ref().map(|_| "<fn>"))
            .field("transformer", &self.transformer.as_ref().map(|_| "<fn>"))
            .field("attrs", &self.attrs)
            .field("config", &self.config)
            .field("order", &self.order)
            .field("options", &self.options)
            .field("null_option", &self.null_option)
            .field("fields", &self.fields)
            .finish()
    }
}
