//! Symbol discovery: marked traits, delegating hosts, and variant candidates.

use tracing::debug;

use crate::config::Markers;
use crate::symbols::{FieldDecl, SymbolIndex, TypeDecl, TypeKind};

/// A trait marked for sum-type generation together with its variant set.
#[derive(Debug, Clone)]
pub struct SumTypeInput<'a> {
    pub interface: &'a TypeDecl,
    /// Sorted by simple name (ordinal); this order assigns the tags.
    pub variants: Vec<&'a TypeDecl>,
}

/// A partial value type with a field marked for delegation.
#[derive(Debug, Clone)]
pub struct HostInput<'a> {
    pub host: &'a TypeDecl,
    pub field: &'a FieldDecl,
}

#[derive(Debug, Clone, Default)]
pub struct Discovery<'a> {
    pub sum_types: Vec<SumTypeInput<'a>>,
    pub hosts: Vec<HostInput<'a>>,
}

impl Discovery<'_> {
    pub fn is_empty(&self) -> bool {
        self.sum_types.is_empty() && self.hosts.is_empty()
    }
}

/// Traits carrying the sum-type marker, ordered by qualified name.
pub fn discover_interfaces<'a>(index: &'a SymbolIndex, markers: &Markers) -> Vec<&'a TypeDecl> {
    index
        .types()
        .filter(|decl| decl.kind == TypeKind::Trait)
        .filter(|decl| decl.marker(&markers.sum_type).is_some())
        .collect()
}

/// Partial value types that list at least one interface and mark a field for
/// delegation. Only the first marked field participates.
pub fn discover_hosts<'a>(index: &'a SymbolIndex, markers: &Markers) -> Vec<HostInput<'a>> {
    index
        .types()
        .filter(|decl| decl.partial && decl.kind.is_value_type() && !decl.interfaces.is_empty())
        .filter_map(|host| {
            host.fields()
                .find(|f| f.marker(&markers.delegate).is_some())
                .map(|field| HostInput { host, field })
        })
        .collect()
}

/// Value types implementing at least one known interface, directly or through supertraits.
pub fn discover_variants(index: &SymbolIndex) -> Vec<&TypeDecl> {
    index
        .types()
        .filter(|decl| decl.kind.is_value_type())
        .filter(|decl| !index.interface_closure(decl).is_empty())
        .collect()
}

/// Candidates whose interface closure contains `iface`, in tag order.
pub fn variant_set<'a>(
    index: &SymbolIndex,
    iface: &TypeDecl,
    candidates: &[&'a TypeDecl],
) -> Vec<&'a TypeDecl> {
    let key = iface.qualified_name();
    let mut variants: Vec<&TypeDecl> = candidates
        .iter()
        .copied()
        .filter(|decl| index.interface_closure(decl).contains(&key))
        .collect();
    variants.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.qualified_name().cmp(&b.qualified_name()))
    });
    variants
}

pub fn discover<'a>(index: &'a SymbolIndex, markers: &Markers) -> Discovery<'a> {
    let candidates = discover_variants(index);

    let mut sum_types = Vec::new();
    for interface in discover_interfaces(index, markers) {
        let variants = variant_set(index, interface, &candidates);
        if variants.is_empty() {
            debug!(interface = %interface.qualified_name(), "no variants, skipping");
            continue;
        }
        debug!(
            interface = %interface.qualified_name(),
            variants = variants.len(),
            "discovered sum type"
        );
        sum_types.push(SumTypeInput { interface, variants });
    }

    let hosts = discover_hosts(index, markers);
    for input in &hosts {
        debug!(
            host = %input.host.qualified_name(),
            field = %input.field.name,
            "discovered delegating host"
        );
    }

    Discovery { sum_types, hosts }
}
