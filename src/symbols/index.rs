use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::{Member, Snapshot, TypeDecl, TypeKind, TypeRef};
use crate::diagnostics::GenError;

/// Merged, normalized view of a snapshot.
///
/// Declarations sharing a qualified name are folded into one type (partial
/// declarations), and every type reference is rewritten to its canonical form so
/// later stages can compare types with `==`.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    types: BTreeMap<String, TypeDecl>,
    by_simple_name: BTreeMap<String, Vec<String>>,
}

impl SymbolIndex {
    pub fn build(snapshot: &Snapshot) -> Result<Self, GenError> {
        let mut types: BTreeMap<String, TypeDecl> = BTreeMap::new();

        for decl in &snapshot.types {
            let decl = normalize_decl(decl)?;
            let key = decl.qualified_name();
            match types.get_mut(&key) {
                Some(existing) => merge_partial(existing, decl)?,
                None => {
                    types.insert(key, decl);
                }
            }
        }

        let mut by_simple_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (qualified, decl) in &types {
            by_simple_name.entry(decl.name.clone()).or_default().push(qualified.clone());
        }

        Ok(Self { types, by_simple_name })
    }

    pub fn get(&self, qualified: &str) -> Option<&TypeDecl> {
        self.types.get(qualified)
    }

    /// All types, ordered by qualified name.
    pub fn types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolve an interface name as written on `from`: exact qualified name, then
    /// `from`'s namespace, then a simple name that is unique across the snapshot.
    pub fn resolve(&self, name: &str, from: &TypeDecl) -> Option<&TypeDecl> {
        if let Some(decl) = self.types.get(name) {
            return Some(decl);
        }
        if let Some(ns) = from.namespace.as_deref().filter(|ns| !ns.is_empty()) {
            if let Some(decl) = self.types.get(&format!("{ns}::{name}")) {
                return Some(decl);
            }
        }
        match self.by_simple_name.get(name).map(Vec::as_slice) {
            Some([only]) => self.types.get(only),
            _ => None,
        }
    }

    /// Interfaces `decl` lists directly, resolved, deduplicated, in list order.
    pub fn direct_interfaces<'a>(&'a self, decl: &TypeDecl) -> Vec<&'a TypeDecl> {
        let mut seen = BTreeSet::new();
        decl.interfaces
            .iter()
            .filter_map(|name| self.resolve(name, decl))
            .filter(|iface| iface.kind == TypeKind::Trait)
            .filter(|iface| seen.insert(iface.qualified_name()))
            .collect()
    }

    /// Qualified names of every interface reachable from `decl` through base lists.
    /// Does not include `decl` itself.
    pub fn interface_closure(&self, decl: &TypeDecl) -> BTreeSet<String> {
        let own = decl.qualified_name();
        let mut closure = BTreeSet::new();
        let mut queue: VecDeque<&TypeDecl> = self.direct_interfaces(decl).into_iter().collect();

        while let Some(iface) = queue.pop_front() {
            let key = iface.qualified_name();
            if key == own || !closure.insert(key) {
                continue;
            }
            queue.extend(self.direct_interfaces(iface));
        }

        closure
    }

    /// Supertraits of `iface` known to the snapshot, ordered by qualified name.
    pub fn supertraits(&self, iface: &TypeDecl) -> Vec<&TypeDecl> {
        self.interface_closure(iface)
            .iter()
            .filter_map(|name| self.types.get(name))
            .collect()
    }
}

fn normalize_type(ty: &TypeRef) -> Result<TypeRef, GenError> {
    ty.normalized()
}

fn normalize_decl(decl: &TypeDecl) -> Result<TypeDecl, GenError> {
    let mut decl = decl.clone();
    for member in &mut decl.members {
        match member {
            Member::Property(p) => p.ty = normalize_type(&p.ty)?,
            Member::Field(f) => f.ty = normalize_type(&f.ty)?,
            Member::Method(m) => {
                for param in &mut m.params {
                    param.ty = normalize_type(&param.ty)?;
                }
                m.returns = match &m.returns {
                    Some(ty) => Some(normalize_type(ty)?),
                    None => None,
                };
            }
        }
    }
    Ok(decl)
}

fn merge_partial(existing: &mut TypeDecl, decl: TypeDecl) -> Result<(), GenError> {
    if existing.kind != decl.kind {
        return Err(GenError::snapshot(
            format!(
                "`{}` is declared as both {} and {}",
                existing.qualified_name(),
                existing.kind.as_str(),
                decl.kind.as_str()
            ),
            None,
        ));
    }

    existing.partial |= decl.partial;
    for iface in decl.interfaces {
        if !existing.interfaces.contains(&iface) {
            existing.interfaces.push(iface);
        }
    }
    for attr in decl.attributes {
        if !existing.attributes.contains(&attr) {
            existing.attributes.push(attr);
        }
    }
    existing.members.extend(decl.members);
    Ok(())
}
