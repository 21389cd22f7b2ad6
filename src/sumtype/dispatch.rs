//! Trait impls for the sum type: every member matches on the live variant and
//! calls through the trait path on its payload.

use super::SumTypeModel;
use crate::emit::CodeWriter;
use crate::emit::signature::{call_args_after, fresh_binding, getter_signature, method_signature, setter_signature};
use crate::symbols::{Member, MethodDecl, PropertyDecl, TypeDecl};

/// What the `Empty` arm evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmptyArm {
    Default,
    NoOp,
}

pub(super) fn emit_dispatch_impl(w: &mut CodeWriter, model: &SumTypeModel<'_>, target: &TypeDecl) {
    let trait_path = target.qualified_name();
    w.open(&format!("impl {trait_path} for {}", model.name));

    let mut first = true;
    let mut separate = |w: &mut CodeWriter| {
        if !first {
            w.blank();
        }
        first = false;
    };

    for member in &target.members {
        match member {
            Member::Property(prop) => {
                if let Some(receiver) = prop.getter_receiver() {
                    separate(w);
                    emit_getter(w, model, &trait_path, prop, receiver.render());
                }
                if prop.set {
                    separate(w);
                    emit_setter(w, model, &trait_path, prop);
                }
            }
            Member::Method(method) => {
                separate(w);
                emit_method(w, model, &trait_path, method);
            }
            Member::Field(_) => {}
        }
    }

    w.close();
}

fn emit_getter(w: &mut CodeWriter, model: &SumTypeModel<'_>, trait_path: &str, prop: &PropertyDecl, receiver: &str) {
    w.block(&getter_signature(prop, receiver), |w| {
        emit_match(w, model, EmptyArm::Default, |binding| {
            format!("{trait_path}::{}({binding})", prop.name)
        });
    });
}

fn emit_setter(w: &mut CodeWriter, model: &SumTypeModel<'_>, trait_path: &str, prop: &PropertyDecl) {
    w.block(&setter_signature(prop), |w| {
        emit_match(w, model, EmptyArm::NoOp, |binding| {
            format!("{trait_path}::{}({binding}, value)", prop.setter_name())
        });
    });
}

fn emit_method(w: &mut CodeWriter, model: &SumTypeModel<'_>, trait_path: &str, method: &MethodDecl) {
    let receiver = method.receiver.map_or("&self", |r| r.render());
    let empty = if method.returns_unit() { EmptyArm::NoOp } else { EmptyArm::Default };
    let binding = fresh_binding("this", &method.params);

    w.block(&method_signature(method, receiver), |w| {
        emit_match_as(w, model, empty, &binding, |binding| {
            format!(
                "{trait_path}::{}({})",
                method.name,
                call_args_after(binding, &method.params)
            )
        });
    });
}

fn emit_match(w: &mut CodeWriter, model: &SumTypeModel<'_>, empty: EmptyArm, call: impl Fn(&str) -> String) {
    emit_match_as(w, model, empty, "this", call);
}

fn emit_match_as(
    w: &mut CodeWriter,
    model: &SumTypeModel<'_>,
    empty: EmptyArm,
    binding: &str,
    call: impl Fn(&str) -> String,
) {
    let name = &model.name;
    w.block("match self", |w| {
        w.emit_line(&format!("{name}::Uninitialized => {},", model.uninitialized_panic()));
        match empty {
            EmptyArm::Default => w.emit_line(&format!("{name}::Empty => Default::default(),")),
            EmptyArm::NoOp => w.emit_line(&format!("{name}::Empty => {{}}")),
        }
        for v in &model.variants {
            w.emit_line(&format!("{name}::{}({binding}) => {},", v.arm, call(binding)));
        }
    });
}
