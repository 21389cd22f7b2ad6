//! The symbol snapshot a generation episode consumes.
//!
//! The host build step exports every type declaration it knows about (traits,
//! structs, enums) together with their attributes, base interfaces and members.
//! Nothing here is resolved yet; see [`index::SymbolIndex`] for the merged view.

pub mod index;
pub mod typeref;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diagnostics::GenError;
pub use index::SymbolIndex;
pub use typeref::TypeRef;

/// A complete, immutable symbol snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl Snapshot {
    pub fn from_json(source: &str) -> Result<Self, GenError> {
        serde_json::from_str(source).map_err(|e| GenError::from_json(&e, source))
    }

    pub fn to_json_pretty(&self) -> Result<String, GenError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GenError::snapshot(format!("failed to serialize snapshot: {e}"), None))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Trait,
    Struct,
    Enum,
}

impl TypeKind {
    pub fn is_value_type(self) -> bool {
        matches!(self, TypeKind::Struct | TypeKind::Enum)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Trait => "trait",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Crate,
    Private,
}

impl Visibility {
    fn private() -> Self {
        Visibility::Private
    }

    /// Rust visibility prefix, including the trailing space when non-empty.
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "pub ",
            Visibility::Crate => "pub(crate) ",
            Visibility::Private => "",
        }
    }
}

/// An attribute as `path(key = "value", ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub path: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, String>,
}

impl Attribute {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), args: BTreeMap::new() }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// True when the path is the marker itself or a qualified path ending in it.
    pub fn is_marker(&self, marker: &str) -> bool {
        self.path == marker
            || self
                .path
                .strip_suffix(marker)
                .is_some_and(|prefix| prefix.ends_with("::"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub kind: TypeKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub partial: bool,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Base interfaces; supertraits when `kind` is `Trait`.
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            kind,
            visibility: Visibility::Public,
            partial: false,
            attributes: Vec::new(),
            interfaces: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Rust path used to refer to this type from generated code.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{ns}::{}", self.name),
            _ => self.name.clone(),
        }
    }

    pub fn marker(&self, marker: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is_marker(marker))
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(f) => Some(f),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Member {
    Property(PropertyDecl),
    Method(MethodDecl),
    Field(FieldDecl),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Property(p) => &p.name,
            Member::Method(m) => &m.name,
            Member::Field(f) => &f.name,
        }
    }
}

/// Whether reading a property leaves the value untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Pure,
    Mutating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Access>,
    #[serde(default)]
    pub set: bool,
}

impl PropertyDecl {
    pub fn getter_receiver(&self) -> Option<Receiver> {
        self.get.map(|access| match access {
            Access::Pure => Receiver::Ref,
            Access::Mutating => Receiver::Mut,
        })
    }

    pub fn setter_name(&self) -> String {
        format!("set_{}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    #[default]
    Ordinary,
    Operator,
    Constructor,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receiver {
    Ref,
    Mut,
    Value,
}

impl Receiver {
    pub fn render(self) -> &'static str {
        match self {
            Receiver::Ref => "&self",
            Receiver::Mut => "&mut self",
            Receiver::Value => "self",
        }
    }

    /// Whether a body running under `self` can call a member that needs `source`.
    pub fn reaches(self, source: Receiver) -> bool {
        match self {
            Receiver::Ref => source == Receiver::Ref,
            Receiver::Mut => matches!(source, Receiver::Ref | Receiver::Mut),
            Receiver::Value => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub kind: MethodKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Receiver>,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeRef>,
}

impl MethodDecl {
    pub fn returns_unit(&self) -> bool {
        self.returns.as_ref().is_none_or(TypeRef::is_unit)
    }

    /// Ordinary instance methods are the only ones that can be forwarded.
    pub fn is_dispatchable(&self) -> bool {
        self.kind == MethodKind::Ordinary && self.receiver.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassMode {
    #[default]
    Value,
    Ref,
    Out,
    In,
}

impl PassMode {
    pub fn render_type(self, ty: &TypeRef) -> String {
        match self {
            PassMode::Value => ty.to_string(),
            PassMode::Ref | PassMode::Out => format!("&mut {ty}"),
            PassMode::In => format!("&{ty}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub pass: PassMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default = "Visibility::private")]
    pub visibility: Visibility,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl FieldDecl {
    pub fn is_accessible(&self) -> bool {
        self.visibility != Visibility::Private
    }

    pub fn marker(&self, marker: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is_marker(marker))
    }
}
