use apollo_fill::Resolvers;
use apollo_fill::ValueSource;
use apollo_fill::error::FillError;
use apollo_fill::json_ext::Value;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json_bytes::json;

use crate::test_helpers::fill;
use crate::test_helpers::filler;
use crate::test_helpers::filler_with;
use crate::test_helpers::get;
use crate::test_helpers::keys;

const PET: &str = r#"
    {
        mainPet {
            __typename
            ... on Dog { name barks }
            ... on Cat { name lives }
        }
    }
"#;

#[rstest]
#[case::dog("Dog", &["__typename", "name", "barks"])]
#[case::cat("Cat", &["__typename", "name", "lives"])]
fn partial_discriminant(#[case] typename: &str, #[case] expected: &[&str]) {
    let data = fill(
        &filler(),
        PET,
        Some(json!({ "mainPet": { "__typename": typename } })),
    )
    .unwrap();
    assert_eq!(get(&data, "mainPet.__typename"), &json!(typename));
    assert_eq!(keys(get(&data, "mainPet")), expected);
}

#[test]
fn resolver_discriminant() {
    let filler = filler_with(Resolvers::new().with("Pet", json!({ "__typename": "Cat" })));
    let data = fill(&filler, PET, None).unwrap();
    assert_eq!(get(&data, "mainPet.__typename"), &json!("Cat"));
}

#[test]
fn partial_discriminant_wins_over_resolver() {
    let filler = filler_with(Resolvers::new().with("Pet", json!({ "__typename": "Cat" })));
    let data = fill(
        &filler,
        PET,
        Some(json!({ "mainPet": { "__typename": "Dog", "name": "Rex" } })),
    )
    .unwrap();
    assert_eq!(get(&data, "mainPet.__typename"), &json!("Dog"));
    assert_eq!(get(&data, "mainPet.name"), &json!("Rex"));
    assert!(get(&data, "mainPet.barks").as_bool().is_some());
}

#[test]
fn generated_discriminant() {
    let filler = filler_with(Resolvers::new().with(
        "Pet",
        ValueSource::object([(
            "__typename",
            ValueSource::generator(|_, details, _| {
                if details.path.to_string() == "/mainPet" {
                    "Dog"
                } else {
                    "Cat"
                }
            }),
        )]),
    ));
    let data = fill(&filler, PET, None).unwrap();
    assert_eq!(get(&data, "mainPet.__typename"), &json!("Dog"));
}

#[test]
fn concrete_type_resolvers_fill_fields() {
    let filler = filler_with(
        Resolvers::new()
            .with("Pet", json!({ "__typename": "Dog", "name": "ignored" }))
            .with("Dog", json!({ "name": "Rex" })),
    );
    let data = fill(&filler, PET, None).unwrap();
    assert_eq!(get(&data, "mainPet.name"), &json!("Rex"));
}

#[test]
fn random_choice_is_stable() {
    let first = fill(&filler(), PET, None).unwrap();
    let second = fill(&filler(), PET, None).unwrap();
    assert_eq!(first, second);
    let typename = get(&first, "mainPet.__typename");
    assert!(typename == &json!("Dog") || typename == &json!("Cat"));
}

#[test]
fn random_choice_covers_possible_types() {
    let aliases: Vec<String> = (0..30)
        .map(|index| format!("p{index}: mainPet {{ __typename }}"))
        .collect();
    let data = fill(&filler(), &format!("{{ {} }}", aliases.join(" ")), None).unwrap();
    let typenames: Vec<_> = (0..30)
        .map(|index| get(&data, &format!("p{index}.__typename")).clone())
        .collect();
    assert!(typenames.contains(&json!("Dog")));
    assert!(typenames.contains(&json!("Cat")));
}

#[rstest]
#[case::null(json!(null))]
#[case::empty(json!(""))]
#[case::false_(json!(false))]
#[case::zero(json!(0))]
fn falsy_discriminants_pick_a_type(#[case] typename: Value) {
    let data = fill(
        &filler(),
        PET,
        Some(json!({ "mainPet": { "__typename": typename } })),
    )
    .unwrap();
    let picked = get(&data, "mainPet.__typename");
    assert!(picked == &json!("Dog") || picked == &json!("Cat"));
}

#[rstest]
#[case::unknown("Bird")]
#[case::case_sensitive("dog")]
#[case::not_a_member("User")]
fn unknown_discriminant(#[case] typename: &str) {
    let error = fill(
        &filler(),
        PET,
        Some(json!({ "mainPet": { "__typename": typename } })),
    )
    .unwrap_err();
    assert!(matches!(error, FillError::UnknownPossibleType { .. }));
    assert_eq!(
        error.to_string(),
        format!(
            "no type found for 'Pet' (provided type '{typename}' does not exist or is not a possible type)"
        )
    );
}

#[test]
fn interfaces_resolve_to_implementations() {
    let data = fill(
        &filler(),
        r#"{ node(id: "1") { id __typename ... on User { name } ... on Dog { barks } } }"#,
        Some(json!({ "node": { "__typename": "User", "name": "Ada" } })),
    )
    .unwrap();
    assert_eq!(keys(get(&data, "node")), ["id", "__typename", "name"]);
    assert_eq!(get(&data, "node.__typename"), &json!("User"));
    assert_eq!(get(&data, "node.name"), &json!("Ada"));
}

#[test]
fn lists_of_unions() {
    let data = fill(
        &filler(),
        "{ search { __typename ... on User { id } ... on Dog { barks } } }",
        Some(json!({ "search": [{ "__typename": "User" }, { "__typename": "Dog" }, {}] })),
    )
    .unwrap();
    assert_eq!(get(&data, "search.0.__typename"), &json!("User"));
    assert_eq!(keys(get(&data, "search.0")), ["__typename", "id"]);
    assert_eq!(get(&data, "search.1.__typename"), &json!("Dog"));
    assert_eq!(keys(get(&data, "search.1")), ["__typename", "barks"]);
    let third = get(&data, "search.2.__typename");
    assert!(third == &json!("User") || third == &json!("Dog"));
}

#[test]
fn null_abstract_partial() {
    let data = fill(&filler(), "{ pet { __typename } }", Some(json!({ "pet": null }))).unwrap();
    assert_eq!(data, json!({ "pet": null }));
}
