//! Compiles an executable document into the typed field tree the filler walks.

use std::collections::HashSet;

use apollo_compiler::ExecutableDocument;
use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;
use apollo_compiler::executable;
use apollo_compiler::validation::Valid;
use indexmap::IndexMap;
use serde_json_bytes::ByteString;

use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::spec::FieldNode;
use crate::spec::FieldType;
use crate::spec::IncludeSkip;
use crate::spec::SpecError;
use crate::spec::possible_types;
use crate::spec::type_condition_applies;

// The RECURSION_LIMIT is chosen to be:
//   < # expected to cause stack overflow &&
//   > # expected in a legitimate query
const RECURSION_LIMIT: usize = 512;

/// A compiled GraphQL operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: Option<Name>,
    pub kind: executable::OperationType,
    pub root_type: Name,
    /// Stands in for the field that would hold the root object: its selections are the
    /// operation's root fields.
    pub root: FieldNode,
    pub(crate) variable_defaults: Object,
}

/// Fields grouped by response key, each occurrence with the conditions of its enclosing
/// fragments.
type GroupedFields<'a> = IndexMap<Name, Vec<(&'a Node<executable::Field>, Vec<IncludeSkip>)>>;

impl Operation {
    /// Parses and validates `query` against `schema`, then compiles the operation named
    /// `operation_name`, or the first declared operation if there is no such name in the
    /// document.
    pub fn compile(
        schema: &Valid<Schema>,
        query: &str,
        operation_name: Option<&str>,
    ) -> Result<Self, SpecError> {
        let document = ExecutableDocument::parse_and_validate(schema, query, "query.graphql")
            .map_err(|invalid| SpecError::ValidationError(invalid.errors.to_string()))?;

        let operation = match operation_name
            .and_then(|name| document.operations.get(Some(name)).ok())
        {
            Some(operation) => operation,
            None => document.operations.iter().next().ok_or_else(|| {
                SpecError::UnknownOperation(operation_name.unwrap_or_default().to_string())
            })?,
        };

        let collector = Collector {
            schema,
            document: &document,
        };
        let root_type = operation.selection_set.ty.clone();
        let mut grouped = GroupedFields::new();
        collector.collect_fields(
            &operation.selection_set,
            &root_type,
            &[],
            &mut grouped,
            &mut HashSet::new(),
        );
        let root = FieldNode {
            name: root_type.clone(),
            response_key: root_type.clone(),
            ty: FieldType::NonNull(Box::new(FieldType::Object(root_type.clone()))),
            include_skip: Vec::new(),
            selections: collector.field_nodes(grouped, 0)?,
            inline_fragments: IndexMap::new(),
        };

        let variable_defaults = operation
            .variables
            .iter()
            .filter_map(|variable| {
                let value = variable.default_value.as_ref()?;
                Some((
                    ByteString::from(variable.name.as_str()),
                    parse_value(value),
                ))
            })
            .collect();

        Ok(Operation {
            name: operation.name.clone(),
            kind: operation.operation_type,
            root_type,
            root,
            variable_defaults,
        })
    }
}

struct Collector<'a> {
    schema: &'a Valid<Schema>,
    document: &'a Valid<ExecutableDocument>,
}

impl<'a> Collector<'a> {
    /// Spec: https://spec.graphql.org/draft/#CollectFields()
    fn collect_fields(
        &self,
        selection_set: &'a executable::SelectionSet,
        target: &Name,
        conditions: &[IncludeSkip],
        grouped: &mut GroupedFields<'a>,
        visited_fragments: &mut HashSet<&'a Name>,
    ) {
        for selection in &selection_set.selections {
            match selection {
                executable::Selection::Field(field) => {
                    let Some(conditions) = with_directives(conditions, &field.directives) else {
                        continue;
                    };
                    grouped
                        .entry(field.response_key().clone())
                        .or_default()
                        .push((field, conditions));
                }
                executable::Selection::InlineFragment(inline_fragment) => {
                    let Some(conditions) =
                        with_directives(conditions, &inline_fragment.directives)
                    else {
                        continue;
                    };
                    if let Some(type_condition) = &inline_fragment.type_condition {
                        if !type_condition_applies(self.schema, type_condition, target) {
                            continue;
                        }
                    }
                    self.collect_fields(
                        &inline_fragment.selection_set,
                        target,
                        &conditions,
                        grouped,
                        visited_fragments,
                    );
                }
                executable::Selection::FragmentSpread(fragment_spread) => {
                    let Some(conditions) =
                        with_directives(conditions, &fragment_spread.directives)
                    else {
                        continue;
                    };
                    if !visited_fragments.insert(&fragment_spread.fragment_name) {
                        continue;
                    }
                    let Some(fragment) = self.document.fragments.get(&fragment_spread.fragment_name)
                    else {
                        continue;
                    };
                    if !type_condition_applies(self.schema, fragment.type_condition(), target) {
                        continue;
                    }
                    self.collect_fields(
                        &fragment.selection_set,
                        target,
                        &conditions,
                        grouped,
                        visited_fragments,
                    );
                }
            }
        }
    }

    fn field_nodes(
        &self,
        grouped: GroupedFields<'a>,
        count: usize,
    ) -> Result<Vec<FieldNode>, SpecError> {
        if count > RECURSION_LIMIT {
            tracing::error!("selection processing recursion limit({RECURSION_LIMIT}) exceeded");
            return Err(SpecError::RecursionLimitExceeded);
        }
        grouped
            .into_values()
            .map(|occurrences| self.field_node(&occurrences, count + 1))
            .collect()
    }

    fn field_node(
        &self,
        occurrences: &[(&'a Node<executable::Field>, Vec<IncludeSkip>)],
        count: usize,
    ) -> Result<FieldNode, SpecError> {
        let Some((field, _)) = occurrences.first() else {
            return Err(SpecError::ValidationError(
                "a grouped field has at least one occurrence; qed".to_string(),
            ));
        };
        let ty = FieldType::from_ast(field.ty(), self.schema)?;
        let include_skip = if occurrences
            .iter()
            .any(|(_, conditions)| conditions.is_empty())
        {
            Vec::new()
        } else {
            occurrences
                .iter()
                .map(|(_, conditions)| conditions.clone())
                .collect()
        };
        let mut node = FieldNode {
            name: field.name.clone(),
            response_key: field.response_key().clone(),
            ty,
            include_skip,
            selections: Vec::new(),
            inline_fragments: IndexMap::new(),
        };

        let inner_type = node.ty.inner_type_name().clone();
        match node.ty.inner_type() {
            FieldType::Object(_) => {
                node.selections = self.sub_selections(occurrences, &inner_type, count)?;
            }
            FieldType::Interface(_) | FieldType::Union(_) => {
                node.selections = self.sub_selections(occurrences, &inner_type, count)?;
                let mut inline_fragments = IndexMap::new();
                for possible_type in possible_types(self.schema, &inner_type) {
                    let selections = self.sub_selections(occurrences, possible_type, count)?;
                    if selections != node.selections {
                        inline_fragments.insert(
                            possible_type.clone(),
                            FieldNode {
                                selections,
                                ..node.clone()
                            },
                        );
                    }
                }
                node.inline_fragments = inline_fragments;
            }
            _ => {}
        }
        Ok(node)
    }

    /// Merges the sub-selections of every occurrence of a field, as seen from `target`.
    fn sub_selections(
        &self,
        occurrences: &[(&'a Node<executable::Field>, Vec<IncludeSkip>)],
        target: &Name,
        count: usize,
    ) -> Result<Vec<FieldNode>, SpecError> {
        let mut grouped = GroupedFields::new();
        let mut visited_fragments = HashSet::new();
        for &(field, _) in occurrences {
            self.collect_fields(
                &field.selection_set,
                target,
                &[],
                &mut grouped,
                &mut visited_fragments,
            );
        }
        self.field_nodes(grouped, count)
    }
}

/// Adds the variable-dependent `@skip`/`@include` of a selection to the enclosing conditions.
///
/// Returns `None` when the selection is statically skipped.
fn with_directives(
    conditions: &[IncludeSkip],
    directives: &executable::DirectiveList,
) -> Option<Vec<IncludeSkip>> {
    let include_skip = IncludeSkip::parse(directives);
    if include_skip.statically_skipped() {
        return None;
    }
    let mut conditions = conditions.to_vec();
    if include_skip.is_conditional() {
        conditions.push(include_skip);
    }
    Some(conditions)
}

fn parse_value(value: &executable::Value) -> Value {
    match value {
        executable::Value::Null | executable::Value::Variable(_) => Value::Null,
        executable::Value::Enum(name) => Value::String(name.as_str().into()),
        executable::Value::String(string) => Value::String(string.as_str().into()),
        executable::Value::Boolean(boolean) => Value::Bool(*boolean),
        executable::Value::Int(int) => int
            .try_to_i32()
            .map(|int| Value::Number(int.into()))
            .unwrap_or(Value::Null),
        executable::Value::Float(float) => float
            .try_to_f64()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        executable::Value::List(list) => {
            Value::Array(list.iter().map(|value| parse_value(value)).collect())
        }
        executable::Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, value)| (ByteString::from(name.as_str()), parse_value(value)))
                .collect(),
        ),
    }
}
