// Property-based tests for polystruct generation.
//
// These check invariants that must hold for any snapshot shape:
// tag assignment, determinism under reordering, and type reference
// normalization.

use proptest::prelude::*;

use polystruct::config::Config;
use polystruct::symbols::{Attribute, Snapshot, TypeDecl, TypeKind, TypeRef};

// =============================================================================
// Snapshot generators
// =============================================================================

fn variant_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[A-Z][a-z]{1,8}", 1..12).prop_map(|names| {
        names
            .into_iter()
            .filter(|n| n != "Empty")
            .collect::<Vec<_>>()
    })
    .prop_filter("at least one variant", |names| !names.is_empty())
}

fn shape_snapshot(names: &[String]) -> Snapshot {
    let mut iface = TypeDecl::new("IAnyShape", TypeKind::Trait);
    iface.attributes.push(Attribute::new("polystruct"));
    let mut types = vec![iface];
    for name in names {
        let mut decl = TypeDecl::new(name.as_str(), TypeKind::Struct);
        decl.interfaces.push("IAnyShape".to_string());
        types.push(decl);
    }
    Snapshot { types }
}

fn serial_config() -> Config {
    let mut config = Config::default();
    config.emit.parallel = false;
    config
}

// =============================================================================
// Tag assignment
// =============================================================================

/// Variants sorted by name take tags 2, 3, 4, ... in the sum enum and the tag enum.
#[test]
fn prop_tags_follow_sorted_names() {
    proptest!(|(names in variant_names())| {
        let artifacts = polystruct::generate(&shape_snapshot(&names), &Config::default()).unwrap();
        prop_assert_eq!(artifacts.len(), 1);
        let source = &artifacts[0].source;

        let mut sorted = names.clone();
        sorted.sort();
        for (name, tag) in sorted.iter().zip(2u32..) {
            let storage_arm = format!("    {name}({name}) = {tag},\n");
            let tag_arm = format!("    {name} = {tag},\n");
            prop_assert!(source.contains(&storage_arm), "missing `{}`", storage_arm.trim());
            prop_assert!(source.contains(&tag_arm), "missing `{}`", tag_arm.trim());
        }
    });
}

// =============================================================================
// Determinism
// =============================================================================

/// Declaration order in the snapshot never reaches the output.
#[test]
fn prop_shuffled_snapshots_generate_identically() {
    proptest!(|((names, shuffled) in variant_names().prop_flat_map(|names| {
        let shuffled = Just(names.clone()).prop_shuffle();
        (Just(names), shuffled)
    }))| {
        let a = polystruct::generate(&shape_snapshot(&names), &Config::default()).unwrap();
        let b = polystruct::generate(&shape_snapshot(&shuffled), &Config::default()).unwrap();
        prop_assert_eq!(a, b);
    });
}

/// Parallel and serial synthesis produce the same artifacts.
#[test]
fn prop_parallel_matches_serial() {
    proptest!(|(groups in prop::collection::vec(variant_names(), 1..5))| {
        let mut types = Vec::new();
        for (i, names) in groups.iter().enumerate() {
            let iface = format!("IKind{i}");
            let mut decl = TypeDecl::new(iface.as_str(), TypeKind::Trait);
            decl.attributes.push(Attribute::new("polystruct"));
            types.push(decl);
            for name in names {
                let mut variant = TypeDecl::new(name.as_str(), TypeKind::Struct);
                variant.namespace = Some(format!("crate::k{i}"));
                variant.interfaces.push(iface.clone());
                types.push(variant);
            }
        }
        let snapshot = Snapshot { types };
        let parallel = polystruct::generate(&snapshot, &Config::default());
        let serial = polystruct::generate(&snapshot, &serial_config());
        prop_assert_eq!(parallel.is_ok(), serial.is_ok());
        if let (Ok(p), Ok(s)) = (parallel, serial) {
            prop_assert_eq!(p.len(), groups.len());
            prop_assert_eq!(p, s);
        }
    });
}

// =============================================================================
// Type reference normalization
// =============================================================================

#[derive(Debug, Clone)]
enum Ty {
    Leaf(&'static str),
    Generic(&'static str, Box<Ty>),
    Ref(bool, Box<Ty>),
    Tuple(Box<Ty>, Box<Ty>),
    Array(Box<Ty>, u8),
    Projection(Box<Ty>, &'static str),
}

impl Ty {
    /// Canonical spelling.
    fn tight(&self) -> String {
        match self {
            Ty::Leaf(name) => name.to_string(),
            Ty::Generic(outer, inner) => format!("{outer}<{}>", inner.tight()),
            Ty::Ref(false, inner) => format!("&{}", inner.tight()),
            Ty::Ref(true, inner) => format!("&mut {}", inner.tight()),
            Ty::Tuple(a, b) => format!("({}, {})", a.tight(), b.tight()),
            Ty::Array(inner, len) => format!("[{}; {len}]", inner.tight()),
            Ty::Projection(inner, bound) => format!("<{} as {bound}>::Item", inner.tight()),
        }
    }

    /// Every token separated by whitespace.
    fn loose(&self) -> String {
        match self {
            Ty::Leaf(name) => name.to_string(),
            Ty::Generic(outer, inner) => format!("{outer} < {} >", inner.loose()),
            Ty::Ref(false, inner) => format!("& {}", inner.loose()),
            Ty::Ref(true, inner) => format!("&  mut\t{}", inner.loose()),
            Ty::Tuple(a, b) => format!("( {} ,{} )", a.loose(), b.loose()),
            Ty::Array(inner, len) => format!("[ {} ;{len} ]", inner.loose()),
            Ty::Projection(inner, bound) => format!("< {}  as {bound} > :: Item", inner.loose()),
        }
    }
}

fn ty_strategy() -> impl Strategy<Value = Ty> {
    let leaf = prop::sample::select(vec!["u8", "u32", "f64", "String", "bool", "std::path::PathBuf"])
        .prop_map(Ty::Leaf);
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (prop::sample::select(vec!["Vec", "Option", "Box"]), inner.clone())
                .prop_map(|(outer, t)| Ty::Generic(outer, Box::new(t))),
            (any::<bool>(), inner.clone()).prop_map(|(m, t)| Ty::Ref(m, Box::new(t))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Ty::Tuple(Box::new(a), Box::new(b))),
            (inner.clone(), 1u8..32).prop_map(|(t, n)| Ty::Array(Box::new(t), n)),
            (inner, prop::sample::select(vec!["Iterator", "IntoIterator", "std::ops::Deref"]))
                .prop_map(|(t, bound)| Ty::Projection(Box::new(t), bound)),
        ]
    })
}

/// Whitespace between tokens never changes the canonical form.
#[test]
fn prop_normalization_ignores_whitespace() {
    proptest!(|(ty in ty_strategy())| {
        let normalized = TypeRef::new(ty.loose()).normalized().unwrap();
        prop_assert_eq!(normalized.as_str(), ty.tight());
    });
}

/// Normalizing twice is the same as normalizing once.
#[test]
fn prop_normalization_is_idempotent() {
    proptest!(|(ty in ty_strategy())| {
        let once = TypeRef::new(ty.loose()).normalized().unwrap();
        let twice = once.normalized().unwrap();
        prop_assert_eq!(once, twice);
    });
}

/// Arbitrary text either lexes or fails with an error; it never panics.
#[test]
fn prop_type_lexing_never_panics() {
    proptest!(|(text in "\\PC{0,64}")| {
        let _ = TypeRef::new(text).normalized();
    });
}
