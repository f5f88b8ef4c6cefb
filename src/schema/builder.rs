use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use fnv::FnvHashMap;

use crate::{
    ast::Type,
    schema::{
        meta::{Argument, Field, MetaType},
        model::SchemaType,
    },
    types::scalars,
};

/// Error building a [`SchemaType`]
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum SchemaError {
    /// Two types were registered with the same name.
    #[display("Type \"{type_name}\" is defined more than once")]
    DuplicateType {
        /// Name of the conflicting types.
        #[error(not(source))]
        type_name: ArcStr,
    },

    /// No query root type was set, or it isn't registered.
    #[display("Query root type \"{type_name}\" is not defined")]
    MissingQueryType {
        /// Name of the configured query type, empty if none was set.
        #[error(not(source))]
        type_name: ArcStr,
    },

    /// A root operation type isn't an object type.
    #[display("Root type \"{type_name}\" must be an object type")]
    InvalidRootType {
        /// Name of the offending root type.
        #[error(not(source))]
        type_name: ArcStr,
    },

    /// A type references a type that isn't registered.
    #[display("Unknown type \"{type_name}\" referenced by \"{referrer}\"")]
    UnknownType {
        /// Name of the missing type.
        type_name: ArcStr,
        /// Type, field or argument holding the reference.
        referrer: String,
    },

    /// An output type is used in an input position, or the other way around.
    #[display("Type \"{type_name}\" can't be used as the type of \"{referrer}\"")]
    InvalidTypeUsage {
        /// Name of the misused type.
        type_name: ArcStr,
        /// Field or argument holding the reference.
        referrer: String,
    },

    /// An object type declares to implement a type that isn't an interface.
    #[display("Type \"{object}\" implements \"{type_name}\" which is not an interface")]
    NotAnInterface {
        /// Name of the implementing object.
        object: ArcStr,
        /// Name of the non-interface type.
        type_name: ArcStr,
    },

    /// A union has a member that isn't an object type.
    #[display("Union \"{union}\" can only include object types, found \"{type_name}\"")]
    InvalidUnionMember {
        /// Name of the union.
        union: ArcStr,
        /// Name of the non-object member.
        type_name: ArcStr,
    },
}

/// Builder assembling the types of a schema
///
/// The built-in `Int`, `Float`, `String`, `Boolean` and `ID` scalars are
/// always registered.
///
/// ```
/// use dynql::{Field, ObjectMeta, SchemaBuilder, Type};
///
/// let schema = SchemaBuilder::new()
///     .register(
///         ObjectMeta::new("Query", vec![Field::new("hello", Type::named("String"))])
///             .into_meta(),
///     )
///     .query("Query")
///     .build()
///     .expect("valid schema");
///
/// assert!(schema.query_type().is_some());
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    description: Option<ArcStr>,
    types: FnvHashMap<ArcStr, MetaType>,
    duplicates: Vec<ArcStr>,
    query_type_name: Option<ArcStr>,
    mutation_type_name: Option<ArcStr>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Creates a builder holding only the built-in scalars.
    pub fn new() -> Self {
        let mut builder = Self {
            description: None,
            types: FnvHashMap::default(),
            duplicates: vec![],
            query_type_name: None,
            mutation_type_name: None,
        };
        for meta in scalars::builtin_scalars() {
            builder = builder.register(meta);
        }
        builder
    }

    /// Adds a type to the schema.
    ///
    /// Registering a name twice fails the [`build`](Self::build).
    #[must_use]
    pub fn register(mut self, meta: MetaType) -> Self {
        let name = meta.name().clone();
        if self.types.insert(name.clone(), meta).is_some() {
            self.duplicates.push(name);
        }
        self
    }

    /// Sets the name of the query root type.
    #[must_use]
    pub fn query(mut self, name: impl Into<ArcStr>) -> Self {
        self.query_type_name = Some(name.into());
        self
    }

    /// Sets the name of the mutation root type.
    #[must_use]
    pub fn mutation(mut self, name: impl Into<ArcStr>) -> Self {
        self.mutation_type_name = Some(name.into());
        self
    }

    /// Sets the description of the schema.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks that all type references are consistent and builds the schema.
    pub fn build(self) -> Result<SchemaType, SchemaError> {
        if let Some(type_name) = self.duplicates.into_iter().next() {
            return Err(SchemaError::DuplicateType { type_name });
        }

        let query_type_name = self.query_type_name.unwrap_or_default();
        match self.types.get(&query_type_name) {
            None => {
                return Err(SchemaError::MissingQueryType {
                    type_name: query_type_name,
                });
            }
            Some(MetaType::Object(_)) => {}
            Some(_) => {
                return Err(SchemaError::InvalidRootType {
                    type_name: query_type_name,
                });
            }
        }
        if let Some(name) = &self.mutation_type_name {
            if !matches!(self.types.get(name), Some(MetaType::Object(_))) {
                return Err(SchemaError::InvalidRootType {
                    type_name: name.clone(),
                });
            }
        }

        let schema = SchemaType {
            description: self.description,
            types: self.types,
            query_type_name,
            mutation_type_name: self.mutation_type_name,
        };

        for meta in schema.types.values() {
            check_type(&schema, meta)?;
        }

        tracing::debug!(types = schema.types.len(), "built schema");

        Ok(schema)
    }
}

fn check_type(schema: &SchemaType, meta: &MetaType) -> Result<(), SchemaError> {
    match meta {
        MetaType::Object(obj) => {
            for field in &obj.fields {
                check_field(schema, &obj.name, field)?;
            }
            for iface in &obj.interface_names {
                match schema.concrete_type_by_name(iface) {
                    Some(MetaType::Interface(_)) => {}
                    Some(_) => {
                        return Err(SchemaError::NotAnInterface {
                            object: obj.name.clone(),
                            type_name: iface.clone(),
                        });
                    }
                    None => {
                        return Err(SchemaError::UnknownType {
                            type_name: iface.clone(),
                            referrer: obj.name.to_string(),
                        });
                    }
                }
            }
        }
        MetaType::Interface(iface) => {
            for field in &iface.fields {
                check_field(schema, &iface.name, field)?;
            }
        }
        MetaType::Union(union) => {
            for member in &union.of_type_names {
                match schema.concrete_type_by_name(member) {
                    Some(MetaType::Object(_)) => {}
                    Some(_) => {
                        return Err(SchemaError::InvalidUnionMember {
                            union: union.name.clone(),
                            type_name: member.clone(),
                        });
                    }
                    None => {
                        return Err(SchemaError::UnknownType {
                            type_name: member.clone(),
                            referrer: union.name.to_string(),
                        });
                    }
                }
            }
        }
        MetaType::InputObject(input) => {
            for field in &input.input_fields {
                check_argument(schema, &input.name, field)?;
            }
        }
        MetaType::Scalar(_) | MetaType::Enum(_) => {}
    }
    Ok(())
}

fn check_field(schema: &SchemaType, parent: &str, field: &Field) -> Result<(), SchemaError> {
    let referrer = format!("{parent}.{}", field.name);
    let ty = named_type(schema, &field.field_type, &referrer)?;
    if ty.is_input() && !ty.is_leaf() {
        return Err(SchemaError::InvalidTypeUsage {
            type_name: ty.name().clone(),
            referrer,
        });
    }
    for arg in field.arguments.iter().flatten() {
        check_argument(schema, &referrer, arg)?;
    }
    Ok(())
}

fn check_argument(schema: &SchemaType, parent: &str, arg: &Argument) -> Result<(), SchemaError> {
    let referrer = format!("{parent}({})", arg.name);
    let ty = named_type(schema, &arg.arg_type, &referrer)?;
    if !ty.is_input() {
        return Err(SchemaError::InvalidTypeUsage {
            type_name: ty.name().clone(),
            referrer,
        });
    }
    Ok(())
}

fn named_type<'s>(
    schema: &'s SchemaType,
    ty: &Type,
    referrer: &str,
) -> Result<&'s MetaType, SchemaError> {
    let name = ty.innermost_name();
    schema
        .concrete_type_by_name(name)
        .ok_or_else(|| SchemaError::UnknownType {
            type_name: name.into(),
            referrer: referrer.into(),
        })
}
