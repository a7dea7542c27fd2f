use std::collections::HashSet;

use crate::{ClassId, TypeHierarchy};

/// Binary-style name of `id`: nested classes are joined to their enclosing class with
/// `delimiter` (`com.acme.Outer$Inner` for `$`).
///
/// Returns `None` if `id` or any enclosing class does not resolve.
pub fn jvm_class_name<H: TypeHierarchy + ?Sized>(
    env: &H,
    id: ClassId,
    delimiter: &str,
) -> Option<String> {
    let mut segments = Vec::new();
    let mut seen = HashSet::new();
    let mut current = id;

    loop {
        if !seen.insert(current) {
            return None;
        }
        let def = env.class(current)?;
        match def.outer {
            Some(outer) => {
                segments.push(def.simple_name.as_str());
                current = outer;
            }
            None => {
                segments.push(def.name.as_str());
                break;
            }
        }
    }

    segments.reverse();
    Some(segments.join(delimiter))
}
