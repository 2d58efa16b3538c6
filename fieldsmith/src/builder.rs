//! Immutable field-descriptor builder.
//!
//! A `FieldBuilder` accumulates configuration for one field descriptor:
//! display metadata, validators, rendering hints, and named child builders.
//! Every setter returns a new builder and leaves the original untouched, so
//! a builder can be reused across branches of a schema. Realization happens
//! on demand through two entry points: `get_type` computes the validation
//! type (recursing into children), `get_options` computes the configuration
//! tree (recursing into children and propagating the template provider).
//!
//! Select options are the one exception to laziness: they are realized at
//! attachment time and stored as plain snapshots, since they carry no
//! template factory and need no provider propagation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{FieldError, Result};
use crate::merge;
use crate::options::FieldOptions;
use crate::schema::{
    ErrorMessageFn, TemplateCallback, TypeConstructor, TypeSystem, ValueTransform,
};

/// Options accepted by [`FieldBuilder::get_options_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RealizeConfig {
    /// Suppress template-factory realization entirely. `None` defers to the
    /// builder's own flag.
    pub disable_templates: Option<bool>,
}

/// The accumulated state behind a builder. Cloned wholesale on every setter.
struct BuilderState<S: TypeSystem> {
    field_builders: IndexMap<String, FieldBuilder<S>>,
    optional: bool,
    type_constructor: Option<TypeConstructor<S::Type>>,
    template_callback: Option<TemplateCallback>,
    lazy_template_provider: Option<Value>,
    disable_templates: bool,
    configuration: FieldOptions,
}

impl<S: TypeSystem> Clone for BuilderState<S> {
    fn clone(&self) -> Self {
        Self {
            field_builders: self.field_builders.clone(),
            optional: self.optional,
            type_constructor: self.type_constructor.clone(),
            template_callback: self.template_callback.clone(),
            lazy_template_provider: self.lazy_template_provider.clone(),
            disable_templates: self.disable_templates,
            configuration: self.configuration.clone(),
        }
    }
}

impl<S: TypeSystem> Default for BuilderState<S> {
    fn default() -> Self {
        Self {
            field_builders: IndexMap::new(),
            optional: false,
            type_constructor: None,
            template_callback: None,
            lazy_template_provider: None,
            disable_templates: false,
            configuration: FieldOptions::default(),
        }
    }
}

/// Immutable builder for one field descriptor.
///
/// Cheap to clone: builders share state behind an `Arc` until a setter
/// produces a fresh state record.
pub struct FieldBuilder<S: TypeSystem> {
    state: Arc<BuilderState<S>>,
}

impl<S: TypeSystem> Clone for FieldBuilder<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: TypeSystem> Default for FieldBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TypeSystem> fmt::Debug for FieldBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBuilder")
            .field("fields", &self.state.field_builders.keys().collect::<Vec<_>>())
            .field("optional", &self.state.optional)
            .field("has_type", &self.state.type_constructor.is_some())
            .field(
                "has_template_callback",
                &self.state.template_callback.is_some(),
            )
            .field("configuration", &self.state.configuration)
            .finish()
    }
}

impl<S: TypeSystem> FieldBuilder<S> {
    /// A builder with empty default state.
    pub fn new() -> Self {
        Self {
            state: Arc::new(BuilderState::default()),
        }
    }

    /// Clone the state, apply one change, rewrap. Every setter funnels
    /// through here so the original builder is never touched.
    fn update(&self, apply: impl FnOnce(&mut BuilderState<S>)) -> Self {
        let mut state = (*self.state).clone();
        apply(&mut state);
        Self {
            state: Arc::new(state),
        }
    }

    // --- Configuration setters ---

    pub fn disabled(&self, disabled: bool) -> Self {
        self.update(|s| s.configuration.disabled = Some(disabled))
    }

    pub fn label(&self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.update(|s| s.configuration.label = Some(label))
    }

    pub fn name(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.update(|s| s.configuration.name = Some(name))
    }

    pub fn value(&self, value: Value) -> Self {
        self.update(|s| s.configuration.value = Some(value))
    }

    pub fn text(&self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.update(|s| s.configuration.text = Some(text))
    }

    pub fn help(&self, help: impl Into<String>) -> Self {
        let help = help.into();
        self.update(|s| s.configuration.help = Some(help))
    }

    pub fn placeholder(&self, placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        self.update(|s| s.configuration.attrs.placeholder = Some(placeholder))
    }

    pub fn auto_focus(&self, auto_focus: bool) -> Self {
        self.update(|s| s.configuration.attrs.auto_focus = Some(auto_focus))
    }

    /// Install a concrete template factory directly, merging key-wise with
    /// any factory already set.
    pub fn template_factory(&self, factory: Value) -> Self {
        self.update(|s| merge::merge_into_slot(&mut s.configuration.factory, factory))
    }

    /// Deep-merge an opaque pass-through configuration value.
    pub fn config(&self, config: Value) -> Self {
        self.update(|s| merge::merge_into_slot(&mut s.configuration.config, config))
    }

    /// Store an opaque value transformer on the configuration.
    pub fn transformer(&self, transform: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        let transform: ValueTransform = Arc::new(transform);
        self.update(|s| s.configuration.transformer = Some(transform))
    }

    /// Set (or replace) the validation error-message function.
    pub fn validation_error(
        &self,
        error: impl Fn(&Value) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        let error: ErrorMessageFn = Arc::new(error);
        self.update(|s| s.configuration.error = Some(error))
    }

    /// Add a validation error-message function.
    ///
    /// With no prior function this is equivalent to `validation_error`.
    /// Otherwise the existing and new functions are composed via the type
    /// system's combinator, so repeated calls accumulate validators.
    pub fn add_validation_error(
        &self,
        error: impl Fn(&Value) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        let error: ErrorMessageFn = Arc::new(error);
        self.update(|s| {
            s.configuration.error = Some(match s.configuration.error.take() {
                Some(existing) => S::combine_error_messages(vec![existing, error]),
                None => error,
            });
        })
    }

    // --- State-slot setters ---

    /// Mark the realized type as optional.
    pub fn make_optional(&self) -> Self {
        self.update(|s| s.optional = true)
    }

    /// Install the deferred type factory invoked at `get_type` time.
    pub fn set_type(
        &self,
        constructor: impl Fn(Option<ErrorMessageFn>, Option<BTreeMap<String, S::Type>>) -> Result<S::Type>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        let constructor: TypeConstructor<S::Type> = Arc::new(constructor);
        self.update(|s| s.type_constructor = Some(constructor))
    }

    /// Leaf convenience over `set_type`: build the type from a descriptor and
    /// field name via the type system's validated-leaf factory. The stored
    /// constructor ignores subtypes, so this suits builders without child
    /// fields.
    pub fn set_type_and_validate(
        &self,
        descriptor: S::Descriptor,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.set_type(move |error, _subtypes| S::validated(descriptor.clone(), error, &name))
    }

    /// Install the callback that derives a template factory from a provider
    /// at realization time.
    pub fn lazy_template_factory(
        &self,
        callback: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        let callback: TemplateCallback = Arc::new(callback);
        self.update(|s| s.template_callback = Some(callback))
    }

    /// Register the provider value threaded to every descendant's template
    /// callback at realization time. Typically set once, on the root builder.
    pub fn lazy_template_provider(&self, provider: Value) -> Self {
        self.update(|s| s.lazy_template_provider = Some(provider))
    }

    /// Suppress template-factory realization. Test/debug override.
    pub fn disable_templates(&self, disable: bool) -> Self {
        self.update(|s| s.disable_templates = disable)
    }

    // --- Structure ---

    /// Install a named child builder.
    ///
    /// Child fields and select options are mutually exclusive for a
    /// builder's lifetime. The key is appended to `configuration.order`.
    pub fn add_field(&self, key: impl Into<String>, child: FieldBuilder<S>) -> Result<Self> {
        if !self.state.configuration.options.is_empty() {
            return Err(FieldError::MixedFieldsAndOptions);
        }
        let key = key.into();
        Ok(self.update(|s| {
            s.configuration.order.push(key.clone());
            s.field_builders.insert(key, child);
        }))
    }

    /// Attach a select option: the option builder's configuration is
    /// realized immediately, with no provider, and stored as a plain
    /// snapshot. An option whose configuration needs a provider therefore
    /// fails here, at attachment, not at the parent's realization.
    pub fn add_select_option(&self, option: &FieldBuilder<S>) -> Result<Self> {
        if !self.state.field_builders.is_empty() {
            return Err(FieldError::MixedFieldsAndOptions);
        }
        let snapshot = option.get_options()?;
        trace!(value = ?snapshot.value, text = ?snapshot.text, "select option attached");
        Ok(self.update(|s| s.configuration.options.push(snapshot)))
    }

    /// Attach the default/empty choice, realized eagerly like a select
    /// option but stored singly.
    pub fn null_option(&self, option: &FieldBuilder<S>) -> Result<Self> {
        let snapshot = option.get_options()?;
        Ok(self.update(|s| s.configuration.null_option = Some(Box::new(snapshot))))
    }

    // --- Realization ---

    /// Realize the validation type.
    ///
    /// Leaf builders invoke the stored constructor with the accumulated
    /// error function; composite builders first realize every child type
    /// into a subtypes mapping. The optional wrapper applies last. Pure and
    /// repeatable.
    pub fn get_type(&self) -> Result<S::Type> {
        let constructor = self
            .state
            .type_constructor
            .as_ref()
            .ok_or(FieldError::NoTypeSet)?;
        let error = self.state.configuration.error.clone();

        let ty = if self.state.field_builders.is_empty() {
            constructor(error, None)?
        } else {
            let mut subtypes = BTreeMap::new();
            for (key, child) in &self.state.field_builders {
                subtypes.insert(key.clone(), child.get_type()?);
            }
            trace!(fields = subtypes.len(), "realized composite subtypes");
            constructor(error, Some(subtypes))?
        };

        Ok(if self.state.optional {
            S::optional(ty)
        } else {
            ty
        })
    }

    /// Realize the configuration with no provider argument and default
    /// realization options.
    pub fn get_options(&self) -> Result<FieldOptions> {
        self.get_options_with(None, RealizeConfig::default())
    }

    /// Realize the configuration tree.
    ///
    /// The provider resolves to the argument if given, else this builder's
    /// own registered provider. The resolved provider and disable flag then
    /// propagate unchanged to every descendant, which is how a provider
    /// registered once at the root reaches each nested field's template
    /// callback. A template callback with no resolvable provider is an
    /// error unless templates are disabled or a concrete factory was set
    /// directly. Pure and repeatable.
    pub fn get_options_with(
        &self,
        provider: Option<&Value>,
        config: RealizeConfig,
    ) -> Result<FieldOptions> {
        let disable = config
            .disable_templates
            .unwrap_or(self.state.disable_templates);
        let provider = provider.or(self.state.lazy_template_provider.as_ref());
        let has_concrete_factory = self.state.configuration.factory.is_some();

        if !has_concrete_factory
            && self.state.template_callback.is_some()
            && provider.is_none()
            && !disable
        {
            return Err(FieldError::MissingTemplateProvider);
        }

        let mut realized = self.state.configuration.clone();

        for (key, child) in &self.state.field_builders {
            let child_options = child.get_options_with(
                provider,
                RealizeConfig {
                    disable_templates: Some(disable),
                },
            )?;
            realized.fields.insert(key.clone(), child_options);
        }

        if !has_concrete_factory && !disable {
            if let (Some(callback), Some(provider)) = (&self.state.template_callback, provider) {
                let factory = callback(provider);
                merge::merge_into_slot(&mut realized.factory, factory);
            }
        }

        debug!(
            fields = realized.fields.len(),
            options = realized.options.len(),
            "field configuration realized"
        );
        Ok(realized)
    }
}
