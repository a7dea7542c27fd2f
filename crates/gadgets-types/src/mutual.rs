use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::{ClassDef, ClassId, ExtensibilityPolicy, TypeHierarchy};

const JAVA_LANG_OBJECT: &str = "java.lang.Object";

/// Reflexive-transitive supertype closure of `id`, interfaces of interfaces included.
///
/// Returns `None` when `id` or any of its ancestors is unresolved or has unresolved
/// supertypes: a partial closure would make "does not implement X" claims unsound.
pub fn supertype_closure<H: TypeHierarchy + ?Sized>(
    env: &H,
    id: ClassId,
) -> Option<BTreeSet<ClassId>> {
    let mut out = BTreeSet::new();
    let mut queue = VecDeque::from([id]);

    while let Some(current) = queue.pop_front() {
        if !out.insert(current) {
            continue;
        }
        if env.class(current)?.has_unresolved_supertypes {
            return None;
        }
        queue.extend(env.direct_supertypes(current)?);
    }

    Some(out)
}

/// Whether `sub` is a strict, transitive subtype of `sup`.
///
/// Best-effort: missing class metadata ends the walk rather than failing.
pub fn is_inheritor<H: TypeHierarchy + ?Sized>(env: &H, sub: ClassId, sup: ClassId) -> bool {
    if sub == sup {
        return false;
    }

    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([sub]);
    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        let Some(parents) = env.direct_supertypes(current) else {
            continue;
        };
        for parent in parents {
            if parent == sup {
                return true;
            }
            queue.push_back(parent);
        }
    }

    false
}

/// All declared (transitive) subtypes of `base`, in breadth-first order.
#[must_use]
pub fn all_subtypes<H: TypeHierarchy + ?Sized>(env: &H, base: ClassId) -> Vec<ClassId> {
    let mut out = Vec::new();
    let mut seen: HashSet<ClassId> = HashSet::from([base]);
    let mut queue: VecDeque<ClassId> = env.declared_subtypes(base).into();

    while let Some(next) = queue.pop_front() {
        if !seen.insert(next) {
            continue;
        }
        out.push(next);
        queue.extend(env.declared_subtypes(next));
    }

    out
}

/// Whether a type can exist that is a subtype of both `a` and `b`.
///
/// Unresolved or incomplete hierarchies answer `true`: without full information a common
/// subtype cannot be ruled out.
pub fn exists_mutual_subclass<H: TypeHierarchy + ?Sized>(
    env: &H,
    a: ClassId,
    b: ClassId,
    policy: ExtensibilityPolicy,
) -> bool {
    let mut visited = HashSet::new();
    let found = mutual(env, a, b, policy, &mut visited);
    tracing::trace!(a = a.to_raw(), b = b.to_raw(), ?policy, found, "mutual subclass query");
    found
}

fn mutual<H: TypeHierarchy + ?Sized>(
    env: &H,
    a: ClassId,
    b: ClassId,
    policy: ExtensibilityPolicy,
    visited: &mut HashSet<(ClassId, ClassId)>,
) -> bool {
    if a == b {
        return true;
    }
    // Permits lists are host data and not guaranteed to be acyclic.
    if !visited.insert((a, b)) {
        return false;
    }

    let (Some(a_def), Some(b_def)) = (env.class(a), env.class(b)) else {
        return true;
    };
    let (Some(a_supers), Some(b_supers)) = (supertype_closure(env, a), supertype_closure(env, b))
    else {
        return true;
    };
    if a_supers.contains(&b) || b_supers.contains(&a) {
        return true;
    }
    // Every class is an `Object`, declared or not.
    if a_def.name == JAVA_LANG_OBJECT || b_def.name == JAVA_LANG_OBJECT {
        return true;
    }

    if policy == ExtensibilityPolicy::ClosedWorld {
        return all_subtypes(env, a).into_iter().any(|sub| {
            supertype_closure(env, sub).map_or(true, |supers| supers.contains(&b))
        });
    }

    // Host data may mark an interface final; only a class side closes the search.
    let closed =
        |id: ClassId, def: &ClassDef| !def.kind.is_interface() && env.is_effectively_final(id);
    if closed(a, a_def) || closed(b, b_def) {
        return false;
    }
    // Single inheritance: an unseen class can extend at most one of two unrelated classes.
    if !a_def.kind.is_interface() && !b_def.kind.is_interface() {
        return false;
    }

    if policy == ExtensibilityPolicy::Sealed {
        if a_def.is_sealed {
            return permitted(env, a, a_def)
                .into_iter()
                .any(|p| mutual(env, p, b, policy, visited));
        }
        if b_def.is_sealed {
            return permitted(env, b, b_def)
                .into_iter()
                .any(|p| mutual(env, a, p, policy, visited));
        }
    }

    true
}

fn permitted<H: TypeHierarchy + ?Sized>(env: &H, id: ClassId, def: &ClassDef) -> Vec<ClassId> {
    if def.permitted_subclasses.is_empty() {
        env.declared_subtypes(id)
    } else {
        def.permitted_subclasses.clone()
    }
}
