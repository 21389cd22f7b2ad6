use crate::config::{Config, Naming};
use crate::symbols::TypeDecl;

/// Name of the sum type generated for `iface`.
///
/// An explicit `name = "..."` argument on the marker wins; otherwise the
/// conventional prefix is stripped, or the fallback prefix is prepended.
pub fn generated_name(iface: &TypeDecl, config: &Config) -> String {
    if let Some(name) = iface
        .marker(&config.markers.sum_type)
        .and_then(|attr| attr.args.get("name"))
    {
        return name.clone();
    }
    derive_name(&iface.name, &config.naming)
}

pub fn derive_name(interface: &str, naming: &Naming) -> String {
    if !naming.strip_prefix.is_empty() {
        if let Some(rest) = interface.strip_prefix(naming.strip_prefix.as_str()) {
            if rest.chars().next().is_some_and(char::is_uppercase) {
                return rest.to_string();
            }
        }
    }
    format!("{}{interface}", naming.fallback_prefix)
}

pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                let boundary = prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower);
                if prev != '_' && boundary {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}
