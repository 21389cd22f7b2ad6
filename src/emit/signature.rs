//! Rendering member signatures and call argument lists.
//!
//! Parameters keep their names and pass conventions exactly, so a forwarding body
//! can hand every argument straight through to the member it calls.

use crate::symbols::{MethodDecl, Param, PropertyDecl};

/// `fn name(<receiver>, a: T, b: &mut U) -> R`
pub fn method_signature(method: &MethodDecl, receiver: &str) -> String {
    let mut sig = format!("fn {}(", method.name);
    sig.push_str(receiver);
    for param in &method.params {
        sig.push_str(", ");
        sig.push_str(&param.name);
        sig.push_str(": ");
        sig.push_str(&param.pass.render_type(&param.ty));
    }
    sig.push(')');
    if let Some(ret) = method.returns.as_ref().filter(|ty| !ty.is_unit()) {
        sig.push_str(" -> ");
        sig.push_str(ret.as_str());
    }
    sig
}

/// `name, other` for forwarding a call with the same parameters.
pub fn call_args(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Receiver followed by the call arguments, for fully qualified calls.
pub fn call_args_after(first: &str, params: &[Param]) -> String {
    if params.is_empty() {
        first.to_string()
    } else {
        format!("{first}, {}", call_args(params))
    }
}

pub fn getter_signature(property: &PropertyDecl, receiver: &str) -> String {
    format!("fn {}({receiver}) -> {}", property.name, property.ty)
}

pub fn setter_signature(property: &PropertyDecl) -> String {
    format!("fn {}(&mut self, value: {})", property.setter_name(), property.ty)
}

/// A binding name that does not shadow any parameter.
pub fn fresh_binding(preferred: &str, params: &[Param]) -> String {
    let mut name = preferred.to_string();
    while params.iter().any(|p| p.name == name) {
        name.push('_');
    }
    name
}
