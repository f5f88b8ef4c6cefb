use std::fmt;

use arcstr::ArcStr;
use fnv::FnvHashMap;

use crate::{
    ast::Type,
    schema::meta::{InterfaceMeta, MetaType, ObjectMeta, UnionMeta},
    types::base::TypeKind,
    value::Value,
};

/// Metadata for a schema
///
/// Built once through [`SchemaBuilder`](crate::SchemaBuilder) and only read
/// afterwards, so a single schema can serve any number of executions.
#[derive(Debug)]
pub struct SchemaType {
    pub(crate) description: Option<ArcStr>,
    pub(crate) types: FnvHashMap<ArcStr, MetaType>,
    pub(crate) query_type_name: ArcStr,
    pub(crate) mutation_type_name: Option<ArcStr>,
}

static_assertions::assert_impl_all!(SchemaType: Send, Sync);

/// A type reference resolved against a schema
///
/// Wraps a concrete named type into any number of list and non-null layers.
#[derive(Clone, Debug)]
pub enum TypeType<'a> {
    #[doc(hidden)]
    Concrete(&'a MetaType),
    #[doc(hidden)]
    NonNull(Box<TypeType<'a>>),
    #[doc(hidden)]
    List(Box<TypeType<'a>>),
}

impl SchemaType {
    /// Get the description of this schema.
    pub fn description(&self) -> Option<&ArcStr> {
        self.description.as_ref()
    }

    /// Get a type by name.
    pub fn type_by_name(&self, name: &str) -> Option<TypeType<'_>> {
        self.types.get(name).map(TypeType::Concrete)
    }

    /// Get a concrete type by name.
    pub fn concrete_type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    /// Get the query type from the schema.
    pub fn query_type(&self) -> Option<&ObjectMeta> {
        match self.types.get(&self.query_type_name) {
            Some(MetaType::Object(meta)) => Some(meta),
            _ => None,
        }
    }

    /// Get the mutation type from the schema, if it has one.
    pub fn mutation_type(&self) -> Option<&ObjectMeta> {
        match self.types.get(self.mutation_type_name.as_ref()?) {
            Some(MetaType::Object(meta)) => Some(meta),
            _ => None,
        }
    }

    /// Resolves a type literal against the schema.
    ///
    /// Returns `None` if the named type isn't registered.
    pub fn make_type(&self, t: &Type) -> Option<TypeType<'_>> {
        Some(match t {
            Type::NonNullNamed(n) => TypeType::NonNull(Box::new(self.type_by_name(n)?)),
            Type::NonNullList(inner) => TypeType::NonNull(Box::new(TypeType::List(Box::new(
                self.make_type(inner)?,
            )))),
            Type::Named(n) => self.type_by_name(n)?,
            Type::List(inner) => TypeType::List(Box::new(self.make_type(inner)?)),
        })
    }

    /// Get a list of the possible concrete object types of an abstract type.
    ///
    /// Non-abstract types have no possible types.
    pub fn possible_types(&self, t: &MetaType) -> Vec<&ObjectMeta> {
        match t {
            MetaType::Union(UnionMeta { of_type_names, .. }) => of_type_names
                .iter()
                .filter_map(|name| match self.concrete_type_by_name(name) {
                    Some(MetaType::Object(meta)) => Some(meta),
                    _ => None,
                })
                .collect(),
            MetaType::Interface(InterfaceMeta { name, .. }) => self
                .types
                .values()
                .filter_map(|t| match t {
                    MetaType::Object(meta) if meta.implements(name) => Some(meta),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        }
    }

    /// Whether `possible_type` is an implementer or member of `abstract_type`.
    pub fn is_possible_type(&self, abstract_type: &MetaType, possible_type: &ObjectMeta) -> bool {
        self.possible_types(abstract_type)
            .into_iter()
            .any(|t| t.name == possible_type.name)
    }

    /// Whether a selection guarded by the type condition `condition` applies
    /// to values of the object type `object`.
    ///
    /// That's the case when the condition names the object itself, one of
    /// its interfaces, or a union it's a member of.
    pub fn type_condition_applies(&self, condition: &str, object: &ObjectMeta) -> bool {
        object.name.as_str() == condition
            || object.implements(condition)
            || matches!(
                self.concrete_type_by_name(condition),
                Some(MetaType::Union(u)) if u.contains(&object.name),
            )
    }
}

impl<'a> TypeType<'a> {
    /// Kind of the outermost layer of this type.
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeType::Concrete(t) => t.type_kind(),
            TypeType::NonNull(_) => TypeKind::NonNull,
            TypeType::List(_) => TypeKind::List,
        }
    }

    /// Strips a non-null wrapper, if any.
    pub fn nullable_type(&self) -> &TypeType<'a> {
        match self {
            TypeType::NonNull(inner) => inner,
            t => t,
        }
    }

    /// The named type at the core of all wrappers.
    #[inline]
    pub fn innermost_concrete(&self) -> &'a MetaType {
        match self {
            TypeType::Concrete(t) => t,
            TypeType::NonNull(n) | TypeType::List(n) => n.innermost_concrete(),
        }
    }

    /// The item type of a possibly non-null list.
    #[inline]
    pub fn list_contents(&self) -> Option<&TypeType<'a>> {
        match self {
            TypeType::List(n) => Some(n),
            TypeType::NonNull(n) => n.list_contents(),
            TypeType::Concrete(_) => None,
        }
    }

    #[expect(missing_docs, reason = "self-explanatory")]
    #[inline]
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeType::NonNull(_))
    }

    /// Checks whether `value` is acceptable for this type.
    ///
    /// Null is only rejected by non-null wrappers. List items are checked
    /// one by one when the item type is an input type; for output types the
    /// items are checked while they're completed.
    pub fn is_valid_value(&self, schema: &SchemaType, value: &Value) -> bool {
        match self {
            TypeType::NonNull(inner) => !value.is_null() && inner.is_valid_value(schema, value),
            TypeType::List(inner) => match value {
                Value::Null => true,
                Value::List(items) => {
                    !inner.innermost_concrete().is_input()
                        || items.iter().all(|v| inner.is_valid_value(schema, v))
                }
                _ => false,
            },
            TypeType::Concrete(t) => value.is_null() || t.is_valid_value(schema, value),
        }
    }

    /// Converts a coerced input `value` into what resolvers receive.
    pub fn parse_value(&self, schema: &SchemaType, value: Value) -> Value {
        match (self, value) {
            (_, Value::Null) => Value::Null,
            (TypeType::NonNull(inner), v) => inner.parse_value(schema, v),
            (TypeType::List(inner), Value::List(items)) => Value::list(
                items
                    .into_iter()
                    .map(|v| inner.parse_value(schema, v))
                    .collect(),
            ),
            (TypeType::List(_), v) => v,
            (TypeType::Concrete(t), v) => t.parse_value(schema, v),
        }
    }
}

impl fmt::Display for TypeType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(t) => f.write_str(t.name()),
            Self::List(i) => write!(f, "[{i}]"),
            Self::NonNull(i) => write!(f, "{i}!"),
        }
    }
}
