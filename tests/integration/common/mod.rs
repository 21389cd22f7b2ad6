#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use polystruct::artifact::Artifact;
use polystruct::config::Config;
use polystruct::symbols::{
    Access, Attribute, FieldDecl, Member, MethodDecl, MethodKind, Param, PassMode, PropertyDecl,
    Receiver, Snapshot, TypeDecl, TypeKind, TypeRef, Visibility,
};

pub fn polystruct() -> Command {
    Command::new(env!("CARGO_BIN_EXE_polystruct"))
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

pub fn fixture_text(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).unwrap()
}

pub fn fixture_config() -> Config {
    Config::load(&fixture("polystruct.toml")).unwrap()
}

pub fn shapes_snapshot() -> Snapshot {
    Snapshot::from_json(&fixture_text("shapes.json")).unwrap()
}

/// Copy the shapes snapshot and its config into a fresh directory.
pub fn shapes_workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(fixture("shapes.json"), dir.path().join("shapes.json")).unwrap();
    std::fs::copy(fixture("polystruct.toml"), dir.path().join("polystruct.toml")).unwrap();
    dir
}

pub fn marked_trait(name: &str) -> TypeDecl {
    let mut decl = TypeDecl::new(name, TypeKind::Trait);
    decl.attributes.push(Attribute::new("polystruct"));
    decl
}

pub fn plain_trait(name: &str) -> TypeDecl {
    TypeDecl::new(name, TypeKind::Trait)
}

pub fn value_type(name: &str, interfaces: &[&str]) -> TypeDecl {
    let mut decl = TypeDecl::new(name, TypeKind::Struct);
    decl.interfaces = interfaces.iter().map(|s| s.to_string()).collect();
    decl
}

/// A partial struct forwarding through `field` of type `field_ty`.
pub fn host(name: &str, interfaces: &[&str], field: &str, field_ty: &str) -> TypeDecl {
    let mut decl = value_type(name, interfaces);
    decl.partial = true;
    decl.members.push(Member::Field(FieldDecl {
        name: field.to_string(),
        ty: TypeRef::new(field_ty),
        visibility: Visibility::Private,
        attributes: vec![Attribute::new("delegate")],
    }));
    decl
}

pub fn with_members(mut decl: TypeDecl, members: Vec<Member>) -> TypeDecl {
    decl.members.extend(members);
    decl
}

pub fn in_namespace(mut decl: TypeDecl, namespace: &str) -> TypeDecl {
    decl.namespace = Some(namespace.to_string());
    decl
}

pub fn method(name: &str, receiver: Receiver, params: &[(&str, &str)], returns: Option<&str>) -> Member {
    Member::Method(MethodDecl {
        name: name.to_string(),
        kind: MethodKind::Ordinary,
        receiver: Some(receiver),
        params: params
            .iter()
            .map(|(n, t)| Param { name: n.to_string(), ty: TypeRef::new(*t), pass: PassMode::Value })
            .collect(),
        returns: returns.map(TypeRef::new),
    })
}

pub fn property(name: &str, ty: &str, get: Option<Access>, set: bool) -> Member {
    Member::Property(PropertyDecl { name: name.to_string(), ty: TypeRef::new(ty), get, set })
}

pub fn public_field(name: &str, ty: &str) -> Member {
    Member::Field(FieldDecl {
        name: name.to_string(),
        ty: TypeRef::new(ty),
        visibility: Visibility::Public,
        attributes: vec![],
    })
}

pub fn snapshot(types: Vec<TypeDecl>) -> Snapshot {
    Snapshot { types }
}

pub fn generate(types: Vec<TypeDecl>) -> Vec<Artifact> {
    polystruct::generate(&snapshot(types), &Config::default()).unwrap()
}

pub fn quiet_config() -> Config {
    let mut config = Config::default();
    config.emit.header = false;
    config
}

pub fn artifact<'a>(artifacts: &'a [Artifact], name: &str) -> &'a Artifact {
    artifacts
        .iter()
        .find(|a| a.name == name)
        .unwrap_or_else(|| panic!("no artifact named {name}; have {:?}", names(artifacts)))
}

pub fn names(artifacts: &[Artifact]) -> Vec<&str> {
    artifacts.iter().map(|a| a.name.as_str()).collect()
}
