//! Types used to describe a `GraphQL` schema

use std::{fmt, sync::Arc};

use arcstr::ArcStr;

use crate::{
    ast::Type,
    executor::{FieldResult, ResolveInfo, Resolved},
    schema::model::SchemaType,
    types::base::{Arguments, TypeKind},
    value::{Object, Value},
};

/// Shortcut for a function validating a non-null leaf value.
pub type IsValidFn = fn(&Value) -> bool;

/// Shortcut for a function converting a resolved leaf value into its
/// response representation.
pub type SerializeFn = fn(&Value) -> Value;

/// Shortcut for a function converting a coerced input value into the value
/// handed to resolvers.
pub type ParseFn = fn(Value) -> Value;

/// Shortcut for a field resolving function.
pub type FieldResolverFn =
    dyn Fn(&Value, &Arguments, &ResolveInfo<'_>) -> FieldResult<Resolved> + Send + Sync;

/// Shortcut for a function picking the concrete object type of an abstract
/// type's value, by name.
pub type ResolveTypeFn = dyn Fn(&Value, &ResolveInfo<'_>) -> Option<String> + Send + Sync;

/// Scalar type metadata
pub struct ScalarMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    pub(crate) is_valid_fn: IsValidFn,
    pub(crate) serialize_fn: SerializeFn,
    pub(crate) parse_fn: ParseFn,
}

/// Object type metadata
#[derive(Debug)]
pub struct ObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub fields: Vec<Field>,
    #[doc(hidden)]
    pub interface_names: Vec<ArcStr>,
}

/// Enum type metadata
#[derive(Debug)]
pub struct EnumMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub values: Vec<EnumValue>,
}

/// Interface type metadata
pub struct InterfaceMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub fields: Vec<Field>,
    pub(crate) resolve_type: Option<Arc<ResolveTypeFn>>,
}

/// Union type metadata
pub struct UnionMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub of_type_names: Vec<ArcStr>,
    pub(crate) resolve_type: Option<Arc<ResolveTypeFn>>,
}

/// Input object metadata
#[derive(Debug)]
pub struct InputObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub input_fields: Vec<Argument>,
}

/// Generic type metadata
///
/// Lists and non-null wrappers are not types of their own: they only appear
/// in [`Type`] literals referencing a named type.
#[derive(Debug)]
pub enum MetaType {
    #[doc(hidden)]
    Scalar(ScalarMeta),
    #[doc(hidden)]
    Object(ObjectMeta),
    #[doc(hidden)]
    Enum(EnumMeta),
    #[doc(hidden)]
    Interface(InterfaceMeta),
    #[doc(hidden)]
    Union(UnionMeta),
    #[doc(hidden)]
    InputObject(InputObjectMeta),
}

/// Metadata for a field
#[derive(Clone)]
pub struct Field {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub arguments: Option<Vec<Argument>>,
    #[doc(hidden)]
    pub field_type: Type<'static>,
    pub(crate) resolver: Option<Arc<FieldResolverFn>>,
}

/// Metadata for an argument to a field, or a field of an input object
#[derive(Debug, Clone)]
pub struct Argument {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub arg_type: Type<'static>,
    #[doc(hidden)]
    pub default_value: Option<Value>,
}

/// Metadata for a single value in an enum
#[derive(Debug, Clone)]
pub struct EnumValue {
    /// The name of the enum value
    ///
    /// This is the string literal representation of the enum in responses.
    pub name: ArcStr,
    /// The optional description of the enum value.
    pub description: Option<ArcStr>,
    /// The internal value resolvers produce and receive for this enum value.
    ///
    /// Defaults to the name itself.
    pub value: Value,
}

impl MetaType {
    /// Access the name of the type
    pub fn name(&self) -> &ArcStr {
        match self {
            MetaType::Scalar(ScalarMeta { name, .. })
            | MetaType::Object(ObjectMeta { name, .. })
            | MetaType::Enum(EnumMeta { name, .. })
            | MetaType::Interface(InterfaceMeta { name, .. })
            | MetaType::Union(UnionMeta { name, .. })
            | MetaType::InputObject(InputObjectMeta { name, .. }) => name,
        }
    }

    /// Access the description of the type, if applicable
    pub fn description(&self) -> Option<&ArcStr> {
        match self {
            MetaType::Scalar(ScalarMeta { description, .. })
            | MetaType::Object(ObjectMeta { description, .. })
            | MetaType::Enum(EnumMeta { description, .. })
            | MetaType::Interface(InterfaceMeta { description, .. })
            | MetaType::Union(UnionMeta { description, .. })
            | MetaType::InputObject(InputObjectMeta { description, .. }) => description.as_ref(),
        }
    }

    /// Construct a `TypeKind` for a given type
    pub fn type_kind(&self) -> TypeKind {
        match self {
            MetaType::Scalar(_) => TypeKind::Scalar,
            MetaType::Object(_) => TypeKind::Object,
            MetaType::Enum(_) => TypeKind::Enum,
            MetaType::Interface(_) => TypeKind::Interface,
            MetaType::Union(_) => TypeKind::Union,
            MetaType::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// Access a field's meta data given its name
    ///
    /// Only objects and interfaces have fields. This method always returns `None` for other types.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        match self {
            MetaType::Object(ObjectMeta { fields, .. })
            | MetaType::Interface(InterfaceMeta { fields, .. }) => {
                fields.iter().find(|f| f.name == name)
            }
            _ => None,
        }
    }

    /// Access an input field's meta data given its name
    ///
    /// Only input objects have input fields. This method always returns `None` for other types.
    pub fn input_field_by_name(&self, name: &str) -> Option<&Argument> {
        match self {
            MetaType::InputObject(InputObjectMeta { input_fields, .. }) => {
                input_fields.iter().find(|f| f.name == name)
            }
            _ => None,
        }
    }

    /// Returns true if the type is a composite type
    ///
    /// Objects, interfaces, and unions are composite.
    pub fn is_composite(&self) -> bool {
        matches!(
            *self,
            MetaType::Object(_) | MetaType::Interface(_) | MetaType::Union(_)
        )
    }

    /// Returns true if the type can occur in leaf positions in queries
    ///
    /// Only enums and scalars are leaf types.
    pub fn is_leaf(&self) -> bool {
        matches!(*self, MetaType::Enum(_) | MetaType::Scalar(_))
    }

    /// Returns true if the type can be used in input positions, e.g. arguments or variables
    ///
    /// Only scalars, enums, and input objects are input types.
    pub fn is_input(&self) -> bool {
        matches!(
            *self,
            MetaType::Scalar(_) | MetaType::Enum(_) | MetaType::InputObject(_)
        )
    }

    /// Returns true if the type is built-in to GraphQL.
    pub fn is_builtin(&self) -> bool {
        let name = self.name();
        name.starts_with("__")
            || ["Boolean", "String", "Int", "Float", "ID"].contains(&name.as_str())
    }

    /// Checks whether a non-null `value` is acceptable for this type.
    ///
    /// Composite types accept any value, as it is only handed to the
    /// resolvers of their fields.
    pub fn is_valid_value(&self, schema: &SchemaType, value: &Value) -> bool {
        match self {
            MetaType::Scalar(ScalarMeta { is_valid_fn, .. }) => is_valid_fn(value),
            MetaType::Enum(meta) => meta.value_by_input(value).is_some(),
            MetaType::InputObject(InputObjectMeta { input_fields, .. }) => {
                let Some(obj) = value.as_object_value() else {
                    return false;
                };
                input_fields.iter().all(|field| {
                    let Some(ty) = schema.make_type(&field.arg_type) else {
                        return false;
                    };
                    match obj.get_field_value(&field.name) {
                        Some(v) => ty.is_valid_value(schema, v),
                        None => field.default_value.is_some() || !ty.is_non_null(),
                    }
                })
            }
            MetaType::Object(_) | MetaType::Interface(_) | MetaType::Union(_) => true,
        }
    }

    /// Converts a coerced input `value` into what resolvers receive.
    pub fn parse_value(&self, schema: &SchemaType, value: Value) -> Value {
        match self {
            MetaType::Scalar(ScalarMeta { parse_fn, .. }) => parse_fn(value),
            MetaType::Enum(meta) => meta
                .value_by_input(&value)
                .map_or(value, |v| v.value.clone()),
            MetaType::InputObject(_) => match value {
                Value::Object(obj) => Value::object(
                    obj.into_iter()
                        .map(|(key, val)| {
                            let field_ty = self
                                .input_field_by_name(&key)
                                .and_then(|f| schema.make_type(&f.arg_type));
                            let parsed = match field_ty {
                                Some(ty) => ty.parse_value(schema, val),
                                None => val,
                            };
                            (key, parsed)
                        })
                        .collect::<Object>(),
                ),
                other => other,
            },
            MetaType::Object(_) | MetaType::Interface(_) | MetaType::Union(_) => value,
        }
    }

    /// Converts a resolved leaf `value` into its response representation.
    ///
    /// Non-leaf values are returned as is.
    pub fn serialize(&self, value: &Value) -> Value {
        match self {
            MetaType::Scalar(ScalarMeta { serialize_fn, .. }) => serialize_fn(value),
            MetaType::Enum(meta) => meta
                .value_by_output(value)
                .map_or_else(|| value.clone(), |v| Value::scalar(v.name.as_str())),
            _ => value.clone(),
        }
    }
}

impl ScalarMeta {
    /// Builds a new [`ScalarMeta`] type with the specified `name`.
    ///
    /// By default any scalar value is accepted and passed through unchanged.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_valid_fn: |v| v.as_scalar().is_some(),
            serialize_fn: Value::clone,
            parse_fn: |v| v,
        }
    }

    /// Sets the `description` of this [`ScalarMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the function deciding which non-null values are valid.
    #[must_use]
    pub fn validate_with(mut self, f: IsValidFn) -> Self {
        self.is_valid_fn = f;
        self
    }

    /// Sets the function producing the response representation.
    #[must_use]
    pub fn serialize_with(mut self, f: SerializeFn) -> Self {
        self.serialize_fn = f;
        self
    }

    /// Sets the function converting input values for resolvers.
    #[must_use]
    pub fn parse_with(mut self, f: ParseFn) -> Self {
        self.parse_fn = f;
        self
    }

    /// Wraps this [`ScalarMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Scalar(self)
    }
}

impl ObjectMeta {
    /// Build a new [`ObjectMeta`] type with the specified `name` and `fields`.
    pub fn new(name: impl Into<ArcStr>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
            interface_names: vec![],
        }
    }

    /// Sets the `description` of this [`ObjectMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the `interfaces` this [`ObjectMeta`] type implements.
    ///
    /// Overwrites any previously set list of interfaces.
    #[must_use]
    pub fn interfaces(mut self, interfaces: &[&str]) -> Self {
        self.interface_names = interfaces.iter().map(|&n| n.into()).collect();
        self
    }

    /// Access a field's meta data given its name
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether this type declares it implements the interface `name`.
    pub fn implements(&self, name: &str) -> bool {
        self.interface_names.iter().any(|i| i.as_str() == name)
    }

    /// Wraps this [`ObjectMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Object(self)
    }
}

impl EnumMeta {
    /// Build a new [`EnumMeta`] type with the specified `name` and possible
    /// `values`.
    pub fn new(name: impl Into<ArcStr>, values: Vec<EnumValue>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values,
        }
    }

    /// Sets the `description` of this [`EnumMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Wraps this [`EnumMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Enum(self)
    }

    // Inputs name the value, but an already parsed default or a variable
    // may carry the internal value.
    fn value_by_input(&self, value: &Value) -> Option<&EnumValue> {
        let by_name = value
            .as_str()
            .and_then(|s| self.values.iter().find(|v| v.name == s));
        by_name.or_else(|| self.values.iter().find(|v| v.value == *value))
    }

    fn value_by_output(&self, value: &Value) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.value == *value).or_else(|| {
            value
                .as_str()
                .and_then(|s| self.values.iter().find(|v| v.name == s))
        })
    }
}

impl InterfaceMeta {
    /// Builds a new [`InterfaceMeta`] type with the specified `name` and
    /// `fields`.
    pub fn new(name: impl Into<ArcStr>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
            resolve_type: None,
        }
    }

    /// Sets the `description` of this [`InterfaceMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the function naming the concrete object type of a value.
    ///
    /// Without one, the `__typename` entry of an object value is used.
    #[must_use]
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &ResolveInfo<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }

    /// Wraps this [`InterfaceMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Interface(self)
    }
}

impl UnionMeta {
    /// Build a new [`UnionMeta`] type with the specified `name` and possible
    /// member type names.
    pub fn new(name: impl Into<ArcStr>, of_types: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: None,
            of_type_names: of_types.iter().map(|&t| t.into()).collect(),
            resolve_type: None,
        }
    }

    /// Sets the `description` of this [`UnionMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the function naming the concrete object type of a value.
    ///
    /// Without one, the `__typename` entry of an object value is used.
    #[must_use]
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &ResolveInfo<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }

    /// Whether `name` is one of the members of this union.
    pub fn contains(&self, name: &str) -> bool {
        self.of_type_names.iter().any(|t| t.as_str() == name)
    }

    /// Wraps this [`UnionMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Union(self)
    }
}

impl InputObjectMeta {
    /// Builds a new [`InputObjectMeta`] type with the specified `name` and
    /// `input_fields`.
    pub fn new(name: impl Into<ArcStr>, input_fields: Vec<Argument>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_fields,
        }
    }

    /// Set the `description` of this [`InputObjectMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Wraps this [`InputObjectMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::InputObject(self)
    }
}

impl Field {
    /// Builds a new [`Field`] of the given [`Type`] with the given `name`.
    ///
    /// Until a resolver is set, the field reads the entry of the same name
    /// from its parent object value.
    pub fn new(name: impl Into<ArcStr>, field_type: Type<'static>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: None,
            field_type,
            resolver: None,
        }
    }

    /// Set the `description` of this [`Field`].
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an `argument` to this [`Field`].
    ///
    /// Arguments are unordered and can't contain duplicates by name.
    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        match self.arguments {
            None => {
                self.arguments = Some(vec![argument]);
            }
            Some(ref mut args) => {
                args.push(argument);
            }
        };
        self
    }

    /// Sets the function resolving this [`Field`].
    ///
    /// It receives the parent value, the coerced arguments and a
    /// [`ResolveInfo`], and returns either a value or a deferred marker.
    #[must_use]
    pub fn resolve<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Arguments, &ResolveInfo<'_>) -> FieldResult<Resolved>
            + Send
            + Sync
            + 'static,
    {
        self.resolver = Some(Arc::new(f));
        self
    }

    /// Access an argument's meta data given its name
    pub fn argument_by_name(&self, name: &str) -> Option<&Argument> {
        self.arguments
            .as_ref()
            .and_then(|args| args.iter().find(|a| a.name == name))
    }

    /// Returns true if the field is built-in to GraphQL.
    pub fn is_builtin(&self) -> bool {
        self.name.starts_with("__")
    }

    pub(crate) fn resolve_value(
        &self,
        parent: &Value,
        args: &Arguments,
        info: &ResolveInfo<'_>,
    ) -> FieldResult<Resolved> {
        match &self.resolver {
            Some(resolver) => resolver(parent, args, info),
            None => Ok(Resolved::Value(
                parent
                    .as_object_value()
                    .and_then(|o| o.get_field_value(&self.name))
                    .cloned()
                    .unwrap_or_default(),
            )),
        }
    }
}

impl Argument {
    /// Builds a new [`Argument`] of the given [`Type`] with the given `name`.
    pub fn new(name: impl Into<ArcStr>, arg_type: Type<'static>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arg_type,
            default_value: None,
        }
    }

    /// Sets the `description` of this [`Argument`].
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the default value of this [`Argument`].
    ///
    /// Overwrites any previously set default value.
    #[must_use]
    pub fn default_value(mut self, val: impl Into<Value>) -> Self {
        self.default_value = Some(val.into());
        self
    }
}

impl EnumValue {
    /// Constructs a new [`EnumValue`] with the provided `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        let name = name.into();
        Self {
            value: Value::scalar(name.as_str()),
            name,
            description: None,
        }
    }

    /// Sets the `description` of this [`EnumValue`].
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the internal value this [`EnumValue`] stands for.
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }
}

impl InterfaceMeta {
    pub(crate) fn concrete_type_name(
        &self,
        value: &Value,
        info: &ResolveInfo<'_>,
    ) -> Option<String> {
        resolve_concrete_type_name(self.resolve_type.as_deref(), value, info)
    }
}

impl UnionMeta {
    pub(crate) fn concrete_type_name(
        &self,
        value: &Value,
        info: &ResolveInfo<'_>,
    ) -> Option<String> {
        resolve_concrete_type_name(self.resolve_type.as_deref(), value, info)
    }
}

fn resolve_concrete_type_name(
    hook: Option<&ResolveTypeFn>,
    value: &Value,
    info: &ResolveInfo<'_>,
) -> Option<String> {
    match hook {
        Some(f) => f(value, info),
        None => value
            .as_object_value()
            .and_then(|o| o.get_field_value("__typename"))
            .and_then(Value::as_str)
            .map(str::to_owned),
    }
}

impl fmt::Debug for ScalarMeta {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("ScalarMeta")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

impl fmt::Debug for InterfaceMeta {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("InterfaceMeta")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("fields", &self.fields)
            .finish()
    }
}

impl fmt::Debug for UnionMeta {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("UnionMeta")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("of_type_names", &self.of_type_names)
            .finish()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Field")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arguments", &self.arguments)
            .field("field_type", &self.field_type)
            .finish()
    }
}
