use std::collections::HashMap;

use thiserror::Error;

use crate::{ClassDef, ClassId, ClassKind, TypeHierarchy};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("class `{0}` is declared more than once")]
    DuplicateClass(String),
    #[error("inheritance cycle through `{0}`")]
    InheritanceCycle(String),
    #[error("too many classes in one hierarchy")]
    TooManyClasses,
}

/// Name-based declaration fed to [`HierarchyBuilder`].
///
/// Supertypes are referenced by qualified name so declarations can appear in any order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub kind: ClassKind,
    pub is_final: bool,
    pub is_sealed: bool,
    pub permits: Vec<String>,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub outer: Option<String>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_final: false,
            is_sealed: false,
            permits: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            outer: None,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Interface)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Enum)
    }

    pub fn record(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Record)
    }

    pub fn annotation(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Annotation)
    }

    #[must_use]
    pub fn mark_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Marks the type sealed. An empty `permits` list means "whatever declares it as a
    /// direct supertype".
    #[must_use]
    pub fn sealed<I, S>(mut self, permits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.is_sealed = true;
        self.permits = permits.into_iter().map(Into::into).collect();
        self
    }

    /// `extends` clause. For interfaces this adds a super-interface.
    #[must_use]
    pub fn extends(mut self, name: impl Into<String>) -> Self {
        if self.kind.is_interface() {
            self.interfaces.push(name.into());
        } else {
            self.super_class = Some(name.into());
        }
        self
    }

    #[must_use]
    pub fn implements(mut self, name: impl Into<String>) -> Self {
        self.interfaces.push(name.into());
        self
    }

    #[must_use]
    pub fn nested_in(mut self, outer: impl Into<String>) -> Self {
        self.outer = Some(outer.into());
        self
    }
}

#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    decls: Vec<ClassDecl>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, decl: ClassDecl) -> Self {
        self.decls.push(decl);
        self
    }

    pub fn add(&mut self, decl: ClassDecl) -> &mut Self {
        self.decls.push(decl);
        self
    }

    /// Resolve all names and produce an immutable hierarchy.
    ///
    /// Supertype names that do not resolve are dropped and the declaring class is flagged
    /// with [`ClassDef::has_unresolved_supertypes`]. A sealed type with an unresolvable
    /// permitted subclass is treated as open.
    pub fn build(self) -> Result<MemoryHierarchy, HierarchyError> {
        let mut by_name: HashMap<String, ClassId> = HashMap::with_capacity(self.decls.len());
        for (idx, decl) in self.decls.iter().enumerate() {
            let raw = u32::try_from(idx).map_err(|_| HierarchyError::TooManyClasses)?;
            if by_name.insert(decl.name.clone(), ClassId::new(raw)).is_some() {
                return Err(HierarchyError::DuplicateClass(decl.name.clone()));
            }
        }

        let classes: Vec<ClassDef> = self
            .decls
            .into_iter()
            .map(|decl| resolve_decl(decl, &by_name))
            .collect();

        let mut subtypes: HashMap<ClassId, Vec<ClassId>> = HashMap::new();
        for (idx, def) in classes.iter().enumerate() {
            let id = ClassId::new(idx as u32);
            for parent in def.direct_supertypes() {
                subtypes.entry(parent).or_default().push(id);
            }
        }
        for children in subtypes.values_mut() {
            children.sort();
            children.dedup();
        }

        let hierarchy = MemoryHierarchy {
            classes,
            by_name,
            subtypes,
        };
        hierarchy.check_acyclic()?;
        tracing::debug!(classes = hierarchy.len(), "built memory hierarchy");
        Ok(hierarchy)
    }
}

fn resolve_decl(decl: ClassDecl, by_name: &HashMap<String, ClassId>) -> ClassDef {
    let mut has_unresolved_supertypes = false;
    let mut resolve_super = |name: &str| {
        let id = by_name.get(name).copied();
        if id.is_none() {
            tracing::debug!(class = %decl.name, supertype = name, "unresolved supertype");
            has_unresolved_supertypes = true;
        }
        id
    };

    let super_class = decl.super_class.as_deref().and_then(&mut resolve_super);
    let interfaces: Vec<ClassId> = decl
        .interfaces
        .iter()
        .filter_map(|name| resolve_super(name.as_str()))
        .collect();

    let mut is_sealed = decl.is_sealed;
    let mut permitted_subclasses = Vec::with_capacity(decl.permits.len());
    for name in &decl.permits {
        match by_name.get(name) {
            Some(id) => permitted_subclasses.push(*id),
            None => {
                tracing::debug!(
                    class = %decl.name,
                    permitted = %name,
                    "unresolved permitted subclass"
                );
                is_sealed = false;
            }
        }
    }
    if !is_sealed {
        permitted_subclasses.clear();
    }

    let outer = decl.outer.as_deref().and_then(|name| by_name.get(name).copied());
    let simple_name = decl
        .name
        .rsplit('.')
        .next()
        .unwrap_or(decl.name.as_str())
        .to_string();

    ClassDef {
        simple_name,
        kind: decl.kind,
        is_final: decl.is_final,
        is_sealed,
        permitted_subclasses,
        super_class,
        interfaces,
        outer,
        has_unresolved_supertypes,
        name: decl.name,
    }
}

/// In-memory [`TypeHierarchy`] for tests and small embedders.
#[derive(Clone, Debug, Default)]
pub struct MemoryHierarchy {
    classes: Vec<ClassDef>,
    by_name: HashMap<String, ClassId>,
    subtypes: HashMap<ClassId, Vec<ClassId>>,
}

impl MemoryHierarchy {
    pub fn builder() -> HierarchyBuilder {
        HierarchyBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassDef)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(idx, def)| (ClassId::new(idx as u32), def))
    }

    fn check_acyclic(&self) -> Result<(), HierarchyError> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.classes.len()];
        for start in 0..self.classes.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            // Iterative DFS; `true` on the stack means "all children handled".
            let mut stack = vec![(start, false)];
            while let Some((idx, finished)) = stack.pop() {
                if finished {
                    marks[idx] = Mark::Done;
                    continue;
                }
                match marks[idx] {
                    Mark::Done => continue,
                    Mark::InProgress => continue,
                    Mark::Unvisited => {}
                }
                marks[idx] = Mark::InProgress;
                stack.push((idx, true));
                for parent in self.classes[idx].direct_supertypes() {
                    let parent = parent.to_raw() as usize;
                    match marks[parent] {
                        Mark::InProgress => {
                            return Err(HierarchyError::InheritanceCycle(
                                self.classes[parent].name.clone(),
                            ));
                        }
                        Mark::Unvisited => stack.push((parent, false)),
                        Mark::Done => {}
                    }
                }
            }
        }
        Ok(())
    }
}

impl TypeHierarchy for MemoryHierarchy {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.to_raw() as usize)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    fn declared_subtypes(&self, id: ClassId) -> Vec<ClassId> {
        self.subtypes.get(&id).cloned().unwrap_or_default()
    }
}
