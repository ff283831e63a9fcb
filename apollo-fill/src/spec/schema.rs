//! Type introspection needed to fill abstract and enum types.

use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::schema::ExtendedType;

/// Returns the object types an interface or union can resolve to, in schema definition order.
///
/// Returns an empty list for any other type.
pub(crate) fn possible_types<'s>(schema: &'s Schema, abstract_type: &str) -> Vec<&'s Name> {
    match schema.types.get(abstract_type) {
        Some(ExtendedType::Union(union_type)) => {
            union_type.members.iter().map(|member| &member.name).collect()
        }
        Some(ExtendedType::Interface(_)) => schema
            .types
            .iter()
            .filter_map(|(name, ty)| match ty {
                ExtendedType::Object(object)
                    if object.implements_interfaces.contains(abstract_type) =>
                {
                    Some(name)
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Returns the declared values of an enum type, in definition order.
pub(crate) fn enum_values<'s>(schema: &'s Schema, enum_type: &str) -> Vec<&'s Name> {
    match schema.types.get(enum_type) {
        Some(ExtendedType::Enum(enum_type)) => enum_type.values.keys().collect(),
        _ => Vec::new(),
    }
}

/// Whether a fragment with this type condition applies to values of `target`.
///
/// Holds when both are the same type or when every `target` value is also a `condition` value.
pub(crate) fn type_condition_applies(schema: &Schema, condition: &str, target: &str) -> bool {
    condition == target || schema.is_subtype(condition, target)
}
