mod common;
use common::*;

use polystruct::config::Config;
use polystruct::discover::discover;
use polystruct::symbols::{Attribute, SymbolIndex};

#[test]
fn marked_trait_with_variants_yields_one_sum_type() {
    let artifacts = generate(vec![
        marked_trait("IShape"),
        value_type("Circle", &["IShape"]),
        value_type("Square", &["IShape"]),
    ]);
    assert_eq!(names(&artifacts), vec!["Shape.rs"]);
}

#[test]
fn trait_without_variants_is_silent() {
    let artifacts = generate(vec![marked_trait("IShape"), value_type("Loose", &[])]);
    assert!(artifacts.is_empty());
}

#[test]
fn unmarked_trait_is_ignored() {
    let artifacts = generate(vec![plain_trait("IShape"), value_type("Circle", &["IShape"])]);
    assert!(artifacts.is_empty());
}

#[test]
fn variants_found_through_supertraits() {
    let index = SymbolIndex::build(&snapshot(vec![
        marked_trait("IBase"),
        plain_trait("IMiddle"),
        {
            let mut t = plain_trait("ILeaf");
            t.interfaces.push("IMiddle".to_string());
            t
        },
        {
            let mut t = plain_trait("IMiddle2");
            t.interfaces.push("IBase".to_string());
            t
        },
        value_type("Direct", &["IBase"]),
        value_type("Indirect", &["IMiddle2"]),
        value_type("Unrelated", &["ILeaf"]),
    ]))
    .unwrap();
    let found = discover(&index, &Config::default().markers);
    let variants: Vec<_> = found.sum_types[0].variants.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(variants, vec!["Direct", "Indirect"]);
}

#[test]
fn interface_names_resolve_within_namespace() {
    let artifacts = generate(vec![
        in_namespace(marked_trait("IShape"), "crate::geo"),
        in_namespace(value_type("Circle", &["IShape"]), "crate::geo"),
        in_namespace(plain_trait("IShape"), "crate::other"),
        in_namespace(value_type("Blob", &["IShape"]), "crate::other"),
    ]);
    let source = &artifact(&artifacts, "Shape.rs").source;
    assert!(source.contains("Circle(crate::geo::Circle) = 2,"));
    assert!(!source.contains("Blob"));
}

#[test]
fn qualified_interface_names_resolve_across_namespaces() {
    let artifacts = generate(vec![
        in_namespace(marked_trait("IShape"), "crate::geo"),
        in_namespace(value_type("Circle", &["crate::geo::IShape"]), "crate::draw"),
    ]);
    let source = &artifact(&artifacts, "Shape.rs").source;
    assert!(source.contains("Circle(crate::draw::Circle) = 2,"));
    assert!(source.contains("impl crate::geo::IShape for Shape {"));
}

#[test]
fn ambiguous_simple_names_do_not_resolve() {
    let artifacts = generate(vec![
        in_namespace(marked_trait("IShape"), "crate::a"),
        in_namespace(marked_trait("IShape"), "crate::b"),
        in_namespace(value_type("Circle", &["IShape"]), "crate::c"),
    ]);
    assert!(artifacts.is_empty());
}

#[test]
fn partial_declarations_contribute_interfaces() {
    let mut first = value_type("Circle", &[]);
    first.partial = true;
    let mut second = value_type("Circle", &["IShape"]);
    second.partial = true;
    let artifacts = generate(vec![marked_trait("IShape"), first, second]);
    assert_eq!(names(&artifacts), vec!["Shape.rs"]);
}

#[test]
fn marker_paths_and_custom_markers() {
    let mut qualified = plain_trait("IShape");
    qualified.attributes.push(Attribute::new("polystruct::polystruct"));
    let artifacts = generate(vec![qualified, value_type("Circle", &["IShape"])]);
    assert_eq!(names(&artifacts), vec!["Shape.rs"]);

    let mut custom = plain_trait("IShape");
    custom.attributes.push(Attribute::new("tagged_union"));
    let config = Config::from_toml(
        "[markers]\nsum_type = \"tagged_union\"\n",
        std::path::Path::new("polystruct.toml"),
    )
    .unwrap();
    let artifacts = polystruct::generate(
        &snapshot(vec![custom, value_type("Circle", &["IShape"])]),
        &config,
    )
    .unwrap();
    assert_eq!(names(&artifacts), vec!["Shape.rs"]);
}

#[test]
fn name_argument_overrides_derived_name() {
    let mut iface = plain_trait("IShape");
    iface.attributes.push(Attribute::new("polystruct").with_arg("name", "Figure"));
    let artifacts = generate(vec![iface, value_type("Circle", &["IShape"])]);
    let source = &artifact(&artifacts, "Figure.rs").source;
    assert!(source.contains("pub enum Figure {"));
    assert!(source.contains("pub enum FigureType {"));
    assert!(source.contains("pub enum FigureError {"));
}

#[test]
fn fallback_prefix_when_no_conventional_prefix() {
    let artifacts = generate(vec![marked_trait("Drawable"), value_type("Circle", &["Drawable"])]);
    assert_eq!(names(&artifacts), vec!["AnyDrawable.rs"]);
}
