use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Opaque handle to a declared type inside a [`TypeHierarchy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(u32);

impl ClassId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl ClassKind {
    /// Annotation types are interfaces as far as subtyping is concerned.
    pub fn is_interface(self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::Annotation)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    /// Qualified, dot separated name (`com.acme.Outer.Inner`).
    pub name: String,
    pub simple_name: String,
    pub kind: ClassKind,
    pub is_final: bool,
    pub is_sealed: bool,
    /// Explicit `permits` list. Empty for a sealed type means "the declared direct subtypes".
    pub permitted_subclasses: Vec<ClassId>,
    pub super_class: Option<ClassId>,
    pub interfaces: Vec<ClassId>,
    /// Enclosing class for nested types.
    pub outer: Option<ClassId>,
    /// Set when at least one declared supertype could not be resolved. Nothing derived from
    /// this class's supertype closure can be trusted to be complete.
    pub has_unresolved_supertypes: bool,
}

impl ClassDef {
    /// Records and enums cannot gain subclasses that add capabilities, regardless of modifiers.
    pub fn is_effectively_final(&self) -> bool {
        self.is_final || matches!(self.kind, ClassKind::Enum | ClassKind::Record)
    }

    pub fn direct_supertypes(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.super_class.iter().copied().chain(self.interfaces.iter().copied())
    }
}

/// How much of the subtype universe a hierarchy is allowed to assume exists.
///
/// The right answer depends on the host language and on whether the analysed program is
/// the whole world or a library that others extend.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ExtensibilityPolicy {
    /// Any non-final class may acquire unseen subclasses that implement any interface.
    #[default]
    OpenWorld,
    /// Like [`ExtensibilityPolicy::OpenWorld`], but a sealed type is closed over its
    /// permitted subclasses.
    Sealed,
    /// Only declared types exist. A common subtype must be present in the hierarchy.
    ClosedWorld,
}

/// Read-only view of a class hierarchy supplied by the host.
///
/// Implementors only need to expose class definitions, name lookup and the reverse
/// (subtype) edges; the structural queries inspections use are provided on top of those and
/// can be overridden by hosts that answer them more precisely.
pub trait TypeHierarchy {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;

    fn lookup_class(&self, name: &str) -> Option<ClassId>;

    /// Direct, declared subtypes of `id` (classes extending it, types implementing it).
    fn declared_subtypes(&self, id: ClassId) -> Vec<ClassId>;

    /// `None` when `id` does not resolve.
    fn is_interface(&self, id: ClassId) -> Option<bool> {
        self.class(id).map(|def| def.kind.is_interface())
    }

    /// Direct superclass followed by direct interfaces. `None` when `id` does not resolve.
    fn direct_supertypes(&self, id: ClassId) -> Option<Vec<ClassId>> {
        self.class(id).map(|def| def.direct_supertypes().collect())
    }

    /// Unresolved classes are not considered final.
    fn is_effectively_final(&self, id: ClassId) -> bool {
        self.class(id).is_some_and(ClassDef::is_effectively_final)
    }

    /// Whether some type can be a subtype of both `a` and `b` under `policy`.
    fn exists_common_subtype(&self, a: ClassId, b: ClassId, policy: ExtensibilityPolicy) -> bool {
        crate::exists_mutual_subclass(self, a, b, policy)
    }
}

impl<T: TypeHierarchy + ?Sized> TypeHierarchy for &T {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        (**self).class(id)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        (**self).lookup_class(name)
    }

    fn declared_subtypes(&self, id: ClassId) -> Vec<ClassId> {
        (**self).declared_subtypes(id)
    }

    fn is_interface(&self, id: ClassId) -> Option<bool> {
        (**self).is_interface(id)
    }

    fn direct_supertypes(&self, id: ClassId) -> Option<Vec<ClassId>> {
        (**self).direct_supertypes(id)
    }

    fn is_effectively_final(&self, id: ClassId) -> bool {
        (**self).is_effectively_final(id)
    }

    fn exists_common_subtype(&self, a: ClassId, b: ClassId, policy: ExtensibilityPolicy) -> bool {
        (**self).exists_common_subtype(a, b, policy)
    }
}
