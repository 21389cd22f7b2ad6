//! Sum-type synthesis.
//!
//! A marked trait and its sorted variant set become a closed `#[repr(u32)]`
//! enum whose discriminants are the tags, plus a fieldless tag enum, an error
//! enum, conversions, and trait impls dispatching on the live variant.
//!
//! Tags are fixed: `Uninitialized = 0`, `Empty = 1`, then one per variant in
//! ascending simple-name order. Reordering declarations in the snapshot never
//! changes them.

mod dispatch;
pub mod naming;

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::Config;
use crate::diagnostics::GenError;
use crate::discover::SumTypeInput;
use crate::emit::CodeWriter;
use crate::symbols::{Member, MethodDecl, SymbolIndex, TypeDecl, Visibility};

pub use naming::{generated_name, to_snake_case};

pub const TAG_UNINITIALIZED: u32 = 0;
pub const TAG_EMPTY: u32 = 1;
pub const FIRST_VARIANT_TAG: u32 = 2;

const RESERVED: [&str; 2] = ["Uninitialized", "Empty"];
const FIXED_TAG_DERIVES: &str = "#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]";

#[derive(Debug, Clone)]
pub struct VariantModel<'a> {
    pub decl: &'a TypeDecl,
    /// Arm name in both generated enums.
    pub arm: String,
    pub snake: String,
    pub tag: u32,
}

impl VariantModel<'_> {
    pub fn path(&self) -> String {
        self.decl.qualified_name()
    }
}

/// Everything needed to emit one sum type, validated up front.
#[derive(Debug, Clone)]
pub struct SumTypeModel<'a> {
    pub interface: &'a TypeDecl,
    pub name: String,
    pub visibility: Visibility,
    pub variants: Vec<VariantModel<'a>>,
    pub supertraits: Vec<&'a TypeDecl>,
}

impl<'a> SumTypeModel<'a> {
    pub fn build(
        index: &'a SymbolIndex,
        input: &SumTypeInput<'a>,
        config: &Config,
    ) -> Result<Self, GenError> {
        let interface = input.interface;
        let name = generated_name(interface, config);

        let generated = [name.clone(), format!("{name}Type"), format!("{name}Error")];
        let mut seen = BTreeSet::new();
        let mut seen_snake = BTreeSet::new();
        let mut variants = Vec::with_capacity(input.variants.len());

        for (decl, tag) in input.variants.iter().copied().zip(FIRST_VARIANT_TAG..) {
            if generated.contains(&decl.name) {
                return Err(GenError::generation(format!(
                    "`{}` cannot be a variant of `{name}`: it would share its name with a generated type",
                    decl.qualified_name()
                )));
            }
            if RESERVED.contains(&decl.name.as_str()) {
                return Err(GenError::generation(format!(
                    "`{}` cannot be a variant of `{name}`: `{}` is a reserved tag name",
                    decl.qualified_name(),
                    decl.name
                )));
            }
            if !seen.insert(decl.name.as_str()) {
                return Err(GenError::generation(format!(
                    "`{name}` has two variants named `{}`",
                    decl.name
                )));
            }
            let snake = to_snake_case(&decl.name);
            if !seen_snake.insert(snake.clone()) {
                return Err(GenError::generation(format!(
                    "variant `{}` of `{name}` collides with another variant as `{snake}`",
                    decl.name
                )));
            }
            variants.push(VariantModel { decl, arm: decl.name.clone(), snake, tag });
        }

        let supertraits = index.supertraits(interface);
        for target in std::iter::once(interface).chain(supertraits.iter().copied()) {
            if let Some(method) = undispatchable_method(target) {
                return Err(GenError::generation(format!(
                    "`{}::{}` cannot be dispatched by `{name}`: only methods taking `self` can be forwarded to a variant",
                    target.qualified_name(),
                    method.name
                )));
            }
        }

        Ok(Self {
            interface,
            name,
            visibility: interface.visibility,
            variants,
            supertraits,
        })
    }

    pub fn tag_enum(&self) -> String {
        format!("{}Type", self.name)
    }

    pub fn error_enum(&self) -> String {
        format!("{}Error", self.name)
    }

    pub fn trait_path(&self) -> String {
        self.interface.qualified_name()
    }

    /// `(arm, tag)` pairs, reserved tags first.
    pub fn tag_table(&self) -> Vec<(&str, u32)> {
        let mut table = vec![("Uninitialized", TAG_UNINITIALIZED), ("Empty", TAG_EMPTY)];
        table.extend(self.variants.iter().map(|v| (v.arm.as_str(), v.tag)));
        table
    }

    fn uninitialized_panic(&self) -> String {
        format!("panic!(\"{} has not been initialized\")", self.name)
    }
}

fn undispatchable_method(target: &TypeDecl) -> Option<&MethodDecl> {
    target.members.iter().find_map(|member| match member {
        Member::Method(method) if !method.is_dispatchable() => Some(method),
        _ => None,
    })
}

/// Build and emit the sum type for one marked trait.
pub fn synthesize(
    index: &SymbolIndex,
    input: &SumTypeInput<'_>,
    config: &Config,
) -> Result<(String, String), GenError> {
    let model = SumTypeModel::build(index, input, config)?;
    debug!(
        sum_type = %model.name,
        variants = model.variants.len(),
        supertraits = model.supertraits.len(),
        "emitting sum type"
    );
    let source = emit(&model, config);
    Ok((model.name, source))
}

pub fn emit(model: &SumTypeModel<'_>, config: &Config) -> String {
    let mut w = CodeWriter::new();

    if config.emit.header {
        w.emit_line(&format!(
            "// @generated by polystruct from `{}`. Do not edit.",
            model.trait_path()
        ));
        w.blank();
    }

    emit_tag_enum(&mut w, model);
    w.blank();
    emit_error_enum(&mut w, model);
    w.blank();
    emit_storage(&mut w, model, config);
    w.blank();
    emit_inherent(&mut w, model, config);
    for variant in &model.variants {
        w.blank();
        emit_conversions(&mut w, model, variant);
    }

    w.blank();
    dispatch::emit_dispatch_impl(&mut w, model, model.interface);
    for supertrait in &model.supertraits {
        w.blank();
        dispatch::emit_dispatch_impl(&mut w, model, supertrait);
    }

    w.finish()
}

fn emit_tag_enum(w: &mut CodeWriter, model: &SumTypeModel<'_>) {
    let tag_enum = model.tag_enum();
    let vis = model.visibility.keyword();

    w.emit_line(FIXED_TAG_DERIVES);
    w.emit_line("#[repr(u32)]");
    w.block(&format!("{vis}enum {tag_enum}"), |w| {
        for (arm, tag) in model.tag_table() {
            w.emit_line(&format!("{arm} = {tag},"));
        }
    });
    w.blank();

    w.block(&format!("impl {tag_enum}"), |w| {
        w.block("pub const fn tag(self) -> u32", |w| w.emit_line("self as u32"));
    });
    w.blank();

    w.block(&format!("impl TryFrom<u32> for {tag_enum}"), |w| {
        w.emit_line(&format!("type Error = {};", model.error_enum()));
        w.blank();
        w.block("fn try_from(tag: u32) -> Result<Self, Self::Error>", |w| {
            w.block("match tag", |w| {
                for (arm, tag) in model.tag_table() {
                    w.emit_line(&format!("{tag} => Ok({tag_enum}::{arm}),"));
                }
                w.emit_line(&format!("other => Err({}::TagOutOfRange(other)),", model.error_enum()));
            });
        });
    });
}

fn emit_error_enum(w: &mut CodeWriter, model: &SumTypeModel<'_>) {
    let name = &model.name;
    let error = model.error_enum();
    let tag_enum = model.tag_enum();

    w.emit_line("#[derive(Debug, Clone, Copy, PartialEq, Eq)]");
    w.block(&format!("{}enum {error}", model.visibility.keyword()), |w| {
        w.emit_line(&format!("InvalidCast {{ expected: {tag_enum}, found: {tag_enum} }},"));
        w.emit_line("TagOutOfRange(u32),");
    });
    w.blank();

    w.block(&format!("impl ::core::fmt::Display for {error}"), |w| {
        w.block("fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result", |w| {
            w.block("match self", |w| {
                w.emit_line(&format!(
                    "{error}::InvalidCast {{ expected, found }} => write!(f, \"cannot cast {name} holding {{found:?}} to {{expected:?}}\"),"
                ));
                w.emit_line(&format!(
                    "{error}::TagOutOfRange(tag) => write!(f, \"tag {{tag}} does not name a {name} variant\"),"
                ));
            });
        });
    });
    w.blank();

    w.emit_line(&format!("impl ::std::error::Error for {error} {{}}"));
}

fn emit_storage(w: &mut CodeWriter, model: &SumTypeModel<'_>, config: &Config) {
    let name = &model.name;

    // Default is always written out by hand below.
    let derives: Vec<&str> = config
        .emit
        .derives
        .iter()
        .map(String::as_str)
        .filter(|d| *d != "Default")
        .collect();
    if !derives.is_empty() {
        w.emit_line(&format!("#[derive({})]", derives.join(", ")));
    }
    w.emit_line("#[repr(u32)]");
    w.block(&format!("{}enum {name}", model.visibility.keyword()), |w| {
        w.emit_line(&format!("Uninitialized = {TAG_UNINITIALIZED},"));
        w.emit_line(&format!("Empty = {TAG_EMPTY},"));
        for v in &model.variants {
            w.emit_line(&format!("{}({}) = {},", v.arm, v.path(), v.tag));
        }
    });
    w.blank();

    w.block(&format!("impl Default for {name}"), |w| {
        w.block("fn default() -> Self", |w| w.emit_line(&format!("{name}::Uninitialized")));
    });
}

fn emit_inherent(w: &mut CodeWriter, model: &SumTypeModel<'_>, config: &Config) {
    let name = &model.name;
    let tag_enum = model.tag_enum();
    let trait_path = model.trait_path();
    let panic = model.uninitialized_panic();

    w.open(&format!("impl {name}"));

    w.emit_line(&format!("pub const EMPTY: Self = {name}::Empty;"));
    w.blank();

    w.block(&format!("pub const fn current_type(&self) -> {tag_enum}"), |w| {
        w.block("match self", |w| {
            w.emit_line(&format!("{name}::Uninitialized => {tag_enum}::Uninitialized,"));
            w.emit_line(&format!("{name}::Empty => {tag_enum}::Empty,"));
            for v in &model.variants {
                w.emit_line(&format!("{name}::{arm}(_) => {tag_enum}::{arm},", arm = v.arm));
            }
        });
    });
    w.blank();

    w.block("pub fn type_equals(&self, other: &Self) -> bool", |w| {
        w.emit_line("self.current_type() == other.current_type()");
    });

    if config.emit.unwrapped {
        for (fn_name, recv, reference) in [
            ("unwrapped", "&self", "&"),
            ("unwrapped_mut", "&mut self", "&mut "),
        ] {
            w.blank();
            let sig = format!("pub fn {fn_name}({recv}) -> Option<{reference}dyn {trait_path}>");
            w.block(&sig, |w| {
                w.block("match self", |w| {
                    w.emit_line(&format!("{name}::Uninitialized => {panic},"));
                    w.emit_line(&format!("{name}::Empty => None,"));
                    for v in &model.variants {
                        w.emit_line(&format!(
                            "{name}::{}(this) => Some(this as {reference}dyn {trait_path}),",
                            v.arm
                        ));
                    }
                });
            });
        }
    }

    for v in &model.variants {
        w.blank();
        w.block(&format!("pub fn from_{}(value: {}) -> Self", v.snake, v.path()), |w| {
            w.emit_line(&format!("{name}::{}(value)", v.arm));
        });
        w.blank();
        w.block(&format!("pub fn type_for_{}(_value: &{}) -> {tag_enum}", v.snake, v.path()), |w| {
            w.emit_line(&format!("{tag_enum}::{}", v.arm));
        });
    }

    if config.emit.size_information {
        w.blank();
        w.block("pub fn size_information() -> String", |w| {
            w.emit_line("let mut info = String::new();");
            let sized = std::iter::once((name.clone(), name.clone()))
                .chain(model.variants.iter().map(|v| (v.arm.clone(), v.path())));
            for (label, path) in sized {
                w.emit_line(&format!(
                    "info.push_str(&format!(\"{label} = {{}}\\n\", ::core::mem::size_of::<{path}>()));"
                ));
            }
            w.emit_line("info");
        });
    }

    w.close();
}

fn emit_conversions(w: &mut CodeWriter, model: &SumTypeModel<'_>, v: &VariantModel<'_>) {
    let name = &model.name;
    let path = v.path();

    w.block(&format!("impl From<{path}> for {name}"), |w| {
        w.block(&format!("fn from(value: {path}) -> Self"), |w| {
            w.emit_line(&format!("{name}::{}(value)", v.arm));
        });
    });
    w.blank();

    w.block(&format!("impl TryFrom<{name}> for {path}"), |w| {
        w.emit_line(&format!("type Error = {};", model.error_enum()));
        w.blank();
        w.block(&format!("fn try_from(value: {name}) -> Result<Self, Self::Error>"), |w| {
            w.block("match value", |w| {
                w.emit_line(&format!("{name}::{}(this) => Ok(this),", v.arm));
                w.emit_line(&format!(
                    "other => Err({}::InvalidCast {{ expected: {}::{}, found: other.current_type() }}),",
                    model.error_enum(),
                    model.tag_enum(),
                    v.arm
                ));
            });
        });
    });
}
