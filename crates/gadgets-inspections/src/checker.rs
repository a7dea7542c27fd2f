use gadgets_types::{ClassId, ExtensibilityPolicy, TypeHierarchy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Compatible,
    Incompatible,
}

/// Decide whether `operand instanceof cast_target` can ever be true, assuming every
/// non-final class may gain unseen subclasses.
///
/// Only class operands checked against interfaces are judged; every other combination, and
/// anything that fails to resolve, is [`Verdict::Compatible`].
#[must_use]
pub fn check<H: TypeHierarchy + ?Sized>(
    env: &H,
    cast_target: ClassId,
    operand: ClassId,
) -> Verdict {
    check_with_policy(env, cast_target, operand, ExtensibilityPolicy::OpenWorld)
}

/// Like [`check`] with an explicit [`ExtensibilityPolicy`].
#[must_use]
pub fn check_with_policy<H: TypeHierarchy + ?Sized>(
    env: &H,
    cast_target: ClassId,
    operand: ClassId,
    policy: ExtensibilityPolicy,
) -> Verdict {
    match env.is_interface(cast_target) {
        Some(true) => {}
        Some(false) => {
            // Class-to-class checks belong to the type checker.
            tracing::trace!(cast_target = cast_target.to_raw(), "cast target is not an interface");
            return Verdict::Compatible;
        }
        None => {
            tracing::trace!(cast_target = cast_target.to_raw(), "cast target does not resolve");
            return Verdict::Compatible;
        }
    }

    match env.is_interface(operand) {
        Some(false) => {}
        Some(true) => {
            tracing::trace!(operand = operand.to_raw(), "operand is an interface");
            return Verdict::Compatible;
        }
        None => {
            tracing::trace!(operand = operand.to_raw(), "operand does not resolve");
            return Verdict::Compatible;
        }
    }

    if env.exists_common_subtype(operand, cast_target, policy) {
        return Verdict::Compatible;
    }

    tracing::debug!(
        cast_target = cast_target.to_raw(),
        operand = operand.to_raw(),
        ?policy,
        "no mutual subclass of operand and interface"
    );
    Verdict::Incompatible
}
