use apollo_compiler::Name;
use apollo_compiler::executable;
use indexmap::IndexMap;

use crate::json_ext::Object;
use crate::spec::FieldType;
use crate::spec::TYPENAME;

/// One field of an operation with its collected sub-selections.
///
/// Fragments are already inlined: `selections` holds the fields that apply to every possible
/// type of the field, and for abstract types `inline_fragments` holds a complete alternate node
/// for each concrete type whose selection differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    pub name: Name,
    /// The alias if present, else the field name.
    pub response_key: Name,
    pub ty: FieldType,
    /// Variable-dependent `@skip`/`@include` conditions, one list per occurrence of the field
    /// in the document. An occurrence is present when all of its conditions pass, and the field
    /// is present when any occurrence is. Empty when some occurrence is unconditional.
    pub include_skip: Vec<Vec<IncludeSkip>>,
    pub selections: Vec<FieldNode>,
    pub inline_fragments: IndexMap<Name, FieldNode>,
}

impl FieldNode {
    pub fn is_typename(&self) -> bool {
        self.name.as_str() == TYPENAME
    }

    /// Whether the presence of this field depends on the request variables.
    pub fn is_conditional(&self) -> bool {
        !self.include_skip.is_empty()
    }

    pub(crate) fn should_skip(&self, variables: &Object) -> bool {
        self.is_conditional()
            && self.include_skip.iter().all(|occurrence| {
                occurrence
                    .iter()
                    .any(|include_skip| include_skip.should_skip(variables))
            })
    }

    /// Returns the node to fill once the concrete type of this field is known: the inline
    /// fragment for that type when one exists, else this node.
    pub fn select(&self, concrete_type: &str) -> &FieldNode {
        self.inline_fragments.get(concrete_type).unwrap_or(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IncludeSkip {
    include: Condition,
    skip: Condition,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Yes,
    No,
    Variable(Name),
}

impl IncludeSkip {
    pub(crate) fn parse(directives: &executable::DirectiveList) -> Self {
        let mut include = None;
        let mut skip = None;
        for directive in &directives.0 {
            if include.is_none() && directive.name.as_str() == "include" {
                include = Condition::parse(directive)
            }
            if skip.is_none() && directive.name.as_str() == "skip" {
                skip = Condition::parse(directive)
            }
        }
        Self {
            include: include.unwrap_or(Condition::Yes),
            skip: skip.unwrap_or(Condition::No),
        }
    }

    pub(crate) fn statically_skipped(&self) -> bool {
        matches!(self.skip, Condition::Yes) || matches!(self.include, Condition::No)
    }

    pub(crate) fn is_conditional(&self) -> bool {
        matches!(self.skip, Condition::Variable(_))
            || matches!(self.include, Condition::Variable(_))
    }

    pub(crate) fn should_skip(&self, variables: &Object) -> bool {
        // a missing or non boolean variable does not remove the field
        self.skip.eval(variables).unwrap_or(false) || !self.include.eval(variables).unwrap_or(true)
    }
}

impl Condition {
    pub(crate) fn parse(directive: &executable::Directive) -> Option<Self> {
        match directive.specified_argument_by_name("if")?.as_ref() {
            executable::Value::Boolean(true) => Some(Condition::Yes),
            executable::Value::Boolean(false) => Some(Condition::No),
            executable::Value::Variable(variable) => Some(Condition::Variable(variable.clone())),
            _ => None,
        }
    }

    pub(crate) fn eval(&self, variables: &Object) -> Option<bool> {
        match self {
            Condition::Yes => Some(true),
            Condition::No => Some(false),
            Condition::Variable(variable_name) => variables
                .get(variable_name.as_str())
                .and_then(|v| v.as_bool()),
        }
    }
}

#[cfg(test)]
mod tests {
    use apollo_compiler::name;
    use serde_json_bytes::json;

    use super::*;

    fn variables(value: serde_json_bytes::Value) -> Object {
        value.as_object().cloned().unwrap()
    }

    fn leaf(name: Name) -> FieldNode {
        FieldNode {
            response_key: name.clone(),
            name,
            ty: FieldType::Scalar(name!("String")),
            include_skip: Vec::new(),
            selections: Vec::new(),
            inline_fragments: IndexMap::new(),
        }
    }

    #[test]
    fn variable_conditions() {
        let include_skip = IncludeSkip {
            include: Condition::Variable(name!("withName")),
            skip: Condition::No,
        };
        assert!(include_skip.is_conditional());
        assert!(!include_skip.statically_skipped());
        assert!(include_skip.should_skip(&variables(json!({ "withName": false }))));
        assert!(!include_skip.should_skip(&variables(json!({ "withName": true }))));
        // missing variable keeps the field
        assert!(!include_skip.should_skip(&Object::new()));
    }

    #[test]
    fn static_conditions() {
        let skipped = IncludeSkip {
            include: Condition::Yes,
            skip: Condition::Yes,
        };
        assert!(skipped.statically_skipped());
        assert!(!skipped.is_conditional());
    }

    #[test]
    fn select_falls_back_to_generic_node() {
        let mut field = leaf(name!("pet"));
        let mut dog = field.clone();
        dog.selections.push(leaf(name!("barks")));
        field.inline_fragments.insert(name!("Dog"), dog.clone());

        assert_eq!(field.select("Dog"), &dog);
        assert_eq!(field.select("Cat"), &field);
    }

    #[test]
    fn typename_and_conditional_fields() {
        let mut field = leaf(name!("__typename"));
        assert!(field.is_typename());
        assert!(!field.is_conditional());
        field.include_skip.push(vec![IncludeSkip {
            include: Condition::Yes,
            skip: Condition::Variable(name!("hide")),
        }]);
        assert!(field.is_conditional());
        assert!(field.should_skip(&variables(json!({ "hide": true }))));
    }

    #[test]
    fn any_present_occurrence_keeps_the_field() {
        let mut field = leaf(name!("name"));
        field.include_skip = vec![
            vec![IncludeSkip {
                include: Condition::Variable(name!("withName")),
                skip: Condition::No,
            }],
            vec![IncludeSkip {
                include: Condition::Yes,
                skip: Condition::Variable(name!("hide")),
            }],
        ];
        assert!(!field.should_skip(&variables(json!({ "withName": false, "hide": false }))));
        assert!(!field.should_skip(&variables(json!({ "withName": true, "hide": true }))));
        assert!(field.should_skip(&variables(json!({ "withName": false, "hide": true }))));
    }
}
