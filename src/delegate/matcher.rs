use crate::discover::HostInput;
use crate::symbols::{
    FieldDecl, Member, MethodDecl, MethodKind, PropertyDecl, SymbolIndex, TypeDecl,
};

/// The member on the source type that satisfies an interface member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceMember<'a> {
    Property(&'a PropertyDecl),
    Field(&'a FieldDecl),
    Method(&'a MethodDecl),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// Forward through the delegation field.
    Delegate(SourceMember<'a>),
    /// The host already implements it; bridge to the host's own definition.
    HostDefined(&'a Member),
    /// Nothing fits; the member is left for the host (or its compiler) to deal with.
    Unmatched,
}

#[derive(Debug, Clone)]
pub struct MemberPlan<'a> {
    pub member: &'a Member,
    pub resolution: Resolution<'a>,
}

#[derive(Debug, Clone)]
pub struct InterfacePlan<'a> {
    pub interface: &'a TypeDecl,
    pub members: Vec<MemberPlan<'a>>,
}

impl InterfacePlan<'_> {
    pub fn delegate_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| matches!(m.resolution, Resolution::Delegate(_)))
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct HostPlan<'a> {
    pub host: &'a TypeDecl,
    pub field: &'a FieldDecl,
    /// `None` when the field's type is not part of the snapshot.
    pub source: Option<&'a TypeDecl>,
    pub interfaces: Vec<InterfacePlan<'a>>,
}

impl HostPlan<'_> {
    pub fn delegate_count(&self) -> usize {
        self.interfaces.iter().map(InterfacePlan::delegate_count).sum()
    }
}

fn same_return(a: &MethodDecl, b: &MethodDecl) -> bool {
    (a.returns_unit() && b.returns_unit()) || a.returns == b.returns
}

fn method_matches(iface: &MethodDecl, candidate: &MethodDecl) -> bool {
    let (Some(want), Some(have)) = (iface.receiver, candidate.receiver) else {
        return false;
    };
    iface.is_dispatchable()
        && candidate.kind == MethodKind::Ordinary
        && iface.name == candidate.name
        && same_return(iface, candidate)
        && iface.params.len() == candidate.params.len()
        && iface
            .params
            .iter()
            .zip(&candidate.params)
            .all(|(a, b)| a.pass == b.pass && a.ty == b.ty && a.name == b.name)
        && want.reaches(have)
}

/// Every accessor the interface declares must be backed by the candidate.
fn property_matches(iface: &PropertyDecl, candidate: &PropertyDecl) -> bool {
    if iface.name != candidate.name || iface.ty != candidate.ty {
        return false;
    }
    if iface.set && !candidate.set {
        return false;
    }
    match (iface.getter_receiver(), candidate.getter_receiver()) {
        (None, _) => iface.set,
        (Some(want), Some(have)) => want.reaches(have),
        (Some(_), None) => false,
    }
}

fn field_matches(iface: &PropertyDecl, candidate: &FieldDecl) -> bool {
    (iface.get.is_some() || iface.set)
        && iface.name == candidate.name
        && iface.ty == candidate.ty
        && candidate.is_accessible()
}

/// Search `source`'s own members for one that structurally satisfies `member`.
pub fn find_source_member<'a>(member: &Member, source: &'a TypeDecl) -> Option<SourceMember<'a>> {
    source.members.iter().find_map(|candidate| match (member, candidate) {
        (Member::Property(p), Member::Property(c)) if property_matches(p, c) => {
            Some(SourceMember::Property(c))
        }
        (Member::Property(p), Member::Field(c)) if field_matches(p, c) => Some(SourceMember::Field(c)),
        (Member::Method(m), Member::Method(c)) if method_matches(m, c) => Some(SourceMember::Method(c)),
        _ => None,
    })
}

/// The host's own definition of `member`, if it has one.
pub fn host_definition<'a>(member: &Member, host: &'a TypeDecl) -> Option<&'a Member> {
    host.members.iter().find(|candidate| match (member, candidate) {
        (Member::Property(p), Member::Property(c)) => property_matches(p, c),
        (Member::Method(m), Member::Method(c)) => method_matches(m, c),
        _ => false,
    })
}

pub fn resolve_member<'a>(
    member: &'a Member,
    host: &'a TypeDecl,
    source: Option<&'a TypeDecl>,
) -> Resolution<'a> {
    if let Some(own) = host_definition(member, host) {
        return Resolution::HostDefined(own);
    }
    source
        .and_then(|s| find_source_member(member, s))
        .map_or(Resolution::Unmatched, Resolution::Delegate)
}

/// Match every member of every interface the host lists against the source type.
pub fn plan_host<'a>(index: &'a SymbolIndex, input: &HostInput<'a>) -> HostPlan<'a> {
    let host = input.host;
    let source = index
        .resolve(input.field.ty.as_str(), host)
        .filter(|s| s.kind.is_value_type());

    let interfaces = index
        .direct_interfaces(host)
        .into_iter()
        .map(|interface| {
            let members = interface
                .members
                .iter()
                .filter(|m| !matches!(m, Member::Field(_)))
                .map(|member| MemberPlan {
                    member,
                    resolution: resolve_member(member, host, source),
                })
                .collect();
            InterfacePlan { interface, members }
        })
        .collect();

    HostPlan { host, field: input.field, source, interfaces }
}
