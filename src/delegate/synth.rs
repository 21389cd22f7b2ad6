use super::matcher::{HostPlan, InterfacePlan, MemberPlan, Resolution, SourceMember};
use crate::config::Config;
use crate::emit::CodeWriter;
use crate::emit::signature::{call_args, call_args_after, getter_signature, method_signature, setter_signature};
use crate::symbols::{Member, MethodDecl, PropertyDecl, Receiver};

/// Emit the forwarding impls for one host, or `None` when nothing was matched.
pub fn synthesize(plan: &HostPlan<'_>, config: &Config) -> Option<String> {
    if plan.delegate_count() == 0 {
        return None;
    }

    let mut w = CodeWriter::new();
    if config.emit.header {
        w.emit_line(&format!(
            "// @generated by polystruct: delegation for `{}` through field `{}`. Do not edit.",
            plan.host.name, plan.field.name
        ));
        w.blank();
    }

    let mut first = true;
    for iface in plan.interfaces.iter().filter(|i| i.delegate_count() > 0) {
        if !first {
            w.blank();
        }
        first = false;
        emit_interface(&mut w, plan, iface);
    }

    Some(w.finish())
}

fn emit_interface(w: &mut CodeWriter, plan: &HostPlan<'_>, iface: &InterfacePlan<'_>) {
    let header = format!(
        "impl {} for {}",
        iface.interface.qualified_name(),
        plan.host.qualified_name()
    );
    w.open(&header);

    let mut first = true;
    for member in &iface.members {
        if matches!(member.resolution, Resolution::Unmatched) {
            continue;
        }
        if !first {
            w.blank();
        }
        first = false;
        emit_member(w, plan, member);
    }

    w.close();
}

fn emit_member(w: &mut CodeWriter, plan: &HostPlan<'_>, member: &MemberPlan<'_>) {
    let field = &plan.field.name;
    let host = plan.host.qualified_name();

    match (member.member, member.resolution) {
        (Member::Property(prop), Resolution::Delegate(source)) => {
            emit_forwarded_property(w, field, prop, source);
        }
        (Member::Method(method), Resolution::Delegate(SourceMember::Method(target))) => {
            let receiver = forwarding_receiver(method, target);
            w.block(&method_signature(method, receiver), |w| {
                w.emit_line(&format!("self.{field}.{}({})", target.name, call_args(&method.params)));
            });
        }
        (Member::Property(prop), Resolution::HostDefined(Member::Property(own))) => {
            emit_bridged_property(w, &host, prop, own);
        }
        (Member::Method(method), Resolution::HostDefined(Member::Method(own))) => {
            let (receiver, this) = bridge_receiver(method, own);
            w.block(&method_signature(method, receiver), |w| {
                w.emit_line(&format!(
                    "{host}::{}({})",
                    method.name,
                    call_args_after(this, &method.params)
                ));
            });
        }
        _ => {}
    }
}

/// The interface fixes the receiver; a by-value receiver calling a `&mut self`
/// source needs a mutable binding.
fn forwarding_receiver(method: &MethodDecl, target: &MethodDecl) -> &'static str {
    match (method.receiver, target.receiver) {
        (Some(Receiver::Value), Some(Receiver::Mut)) => "mut self",
        (Some(receiver), _) => receiver.render(),
        (None, _) => "&self",
    }
}

/// Receiver for a bridge and the expression handed to the host's own method.
/// A by-value interface method calling a borrowing definition has to borrow `self`.
fn bridge_receiver(method: &MethodDecl, own: &MethodDecl) -> (&'static str, &'static str) {
    match (method.receiver, own.receiver) {
        (Some(Receiver::Value), Some(Receiver::Ref)) => ("self", "&self"),
        (Some(Receiver::Value), Some(Receiver::Mut)) => ("mut self", "&mut self"),
        (Some(receiver), _) => (receiver.render(), "self"),
        (None, _) => ("&self", "self"),
    }
}

fn emit_forwarded_property(w: &mut CodeWriter, field: &str, prop: &PropertyDecl, source: SourceMember<'_>) {
    let mut wrote_getter = false;

    if let Some(receiver) = prop.getter_receiver() {
        let body = match source {
            SourceMember::Property(target) => format!("self.{field}.{}()", target.name),
            SourceMember::Field(target) => {
                format!("::core::clone::Clone::clone(&self.{field}.{})", target.name)
            }
            SourceMember::Method(_) => return,
        };
        w.block(&getter_signature(prop, receiver.render()), |w| w.emit_line(&body));
        wrote_getter = true;
    }

    if prop.set {
        let body = match source {
            SourceMember::Property(target) if target.set => {
                format!("self.{field}.{}(value)", target.setter_name())
            }
            SourceMember::Field(target) => format!("self.{field}.{} = value;", target.name),
            _ => return,
        };
        if wrote_getter {
            w.blank();
        }
        w.block(&setter_signature(prop), |w| w.emit_line(&body));
    }
}

fn emit_bridged_property(w: &mut CodeWriter, host: &str, prop: &PropertyDecl, own: &PropertyDecl) {
    let mut wrote_getter = false;

    if let Some(receiver) = prop.getter_receiver() {
        w.block(&getter_signature(prop, receiver.render()), |w| {
            w.emit_line(&format!("{host}::{}(self)", own.name));
        });
        wrote_getter = true;
    }

    if prop.set && own.set {
        if wrote_getter {
            w.blank();
        }
        w.block(&setter_signature(prop), |w| {
            w.emit_line(&format!("{host}::{}(self, value)", own.setter_name()));
        });
    }
}
