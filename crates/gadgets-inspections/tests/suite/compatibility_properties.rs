use std::collections::BTreeSet;

use gadgets_inspections::{check, check_with_policy, Verdict};
use gadgets_types::{ClassDecl, ClassId, ExtensibilityPolicy, MemoryHierarchy, TypeHierarchy};
use proptest::collection::vec;
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 128;

/// Acyclic hierarchy description: every reference points at a lower index and no class
/// extends a final one.
#[derive(Debug, Clone)]
struct Layout {
    /// Super-interfaces of interface `I{n}`.
    interfaces: Vec<BTreeSet<usize>>,
    classes: Vec<ClassLayout>,
}

#[derive(Debug, Clone)]
struct ClassLayout {
    super_class: Option<usize>,
    interfaces: BTreeSet<usize>,
    is_final: bool,
}

fn arb_layout() -> impl Strategy<Value = Layout> {
    (
        vec(vec(0usize..6, 0..3), 1..6),
        vec(
            (proptest::option::of(0usize..6), vec(0usize..6, 0..3), any::<bool>()),
            1..6,
        ),
    )
        .prop_map(|(raw_interfaces, raw_classes)| {
            let interface_count = raw_interfaces.len();
            let interfaces = raw_interfaces
                .into_iter()
                .enumerate()
                .map(|(idx, supers)| supers.into_iter().filter(|s| *s < idx).collect())
                .collect();
            let mut classes: Vec<ClassLayout> = Vec::with_capacity(raw_classes.len());
            for (idx, (super_class, implemented, is_final)) in raw_classes.into_iter().enumerate() {
                // Final classes cannot be extended.
                let super_class = super_class.filter(|s| *s < idx && !classes[*s].is_final);
                classes.push(ClassLayout {
                    super_class,
                    interfaces: implemented
                        .into_iter()
                        .filter(|i| *i < interface_count)
                        .collect(),
                    is_final,
                });
            }
            Layout {
                interfaces,
                classes,
            }
        })
}

impl Layout {
    fn build(&self) -> MemoryHierarchy {
        let mut builder = MemoryHierarchy::builder();
        for (idx, supers) in self.interfaces.iter().enumerate() {
            let mut decl = ClassDecl::interface(format!("I{idx}"));
            for sup in supers {
                decl = decl.extends(format!("I{sup}"));
            }
            builder.add(decl);
        }
        for (idx, class) in self.classes.iter().enumerate() {
            let mut decl = ClassDecl::class(format!("C{idx}"));
            if let Some(sup) = class.super_class {
                decl = decl.extends(format!("C{sup}"));
            }
            for iface in &class.interfaces {
                decl = decl.implements(format!("I{iface}"));
            }
            if class.is_final {
                decl = decl.mark_final();
            }
            builder.add(decl);
        }
        builder.build().expect("generated hierarchy is acyclic")
    }

    /// Interfaces reachable from each interface, itself included.
    fn interface_closures(&self) -> Vec<BTreeSet<usize>> {
        let mut out: Vec<BTreeSet<usize>> = Vec::with_capacity(self.interfaces.len());
        for (idx, supers) in self.interfaces.iter().enumerate() {
            let mut closure = BTreeSet::from([idx]);
            for sup in supers {
                closure.extend(out[*sup].iter().copied());
            }
            out.push(closure);
        }
        out
    }

    /// Interfaces each class implements, directly or through superclasses and
    /// super-interfaces.
    fn class_interface_closures(&self) -> Vec<BTreeSet<usize>> {
        let interface_closures = self.interface_closures();
        let mut out: Vec<BTreeSet<usize>> = Vec::with_capacity(self.classes.len());
        for class in &self.classes {
            let mut closure = BTreeSet::new();
            if let Some(sup) = class.super_class {
                closure.extend(out[sup].iter().copied());
            }
            for iface in &class.interfaces {
                closure.extend(interface_closures[*iface].iter().copied());
            }
            out.push(closure);
        }
        out
    }
}

fn id(env: &MemoryHierarchy, name: &str) -> ClassId {
    env.lookup_class(name).expect("generated class")
}

fn arb_policy() -> impl Strategy<Value = ExtensibilityPolicy> {
    prop_oneof![
        Just(ExtensibilityPolicy::OpenWorld),
        Just(ExtensibilityPolicy::Sealed),
        Just(ExtensibilityPolicy::ClosedWorld),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: PROPTEST_CASES, .. ProptestConfig::default() })]

    #[test]
    fn class_operand_against_interface_matches_final_and_closure(layout in arb_layout()) {
        let env = layout.build();
        let closures = layout.class_interface_closures();

        for (class_idx, class) in layout.classes.iter().enumerate() {
            let operand = id(&env, &format!("C{class_idx}"));
            for iface_idx in 0..layout.interfaces.len() {
                let target = id(&env, &format!("I{iface_idx}"));
                let expected = if class.is_final && !closures[class_idx].contains(&iface_idx) {
                    Verdict::Incompatible
                } else {
                    Verdict::Compatible
                };
                prop_assert_eq!(check(&env, target, operand), expected, "C{} instanceof I{}", class_idx, iface_idx);
            }
        }
    }

    #[test]
    fn class_targets_are_always_compatible(layout in arb_layout(), policy in arb_policy()) {
        let env = layout.build();
        for (operand, _) in env.iter() {
            for target_idx in 0..layout.classes.len() {
                let target = id(&env, &format!("C{target_idx}"));
                prop_assert_eq!(check_with_policy(&env, target, operand, policy), Verdict::Compatible);
            }
        }
    }

    #[test]
    fn interface_operands_are_always_compatible(layout in arb_layout(), policy in arb_policy()) {
        let env = layout.build();
        for operand_idx in 0..layout.interfaces.len() {
            let operand = id(&env, &format!("I{operand_idx}"));
            for target_idx in 0..layout.interfaces.len() {
                let target = id(&env, &format!("I{target_idx}"));
                prop_assert_eq!(check_with_policy(&env, target, operand, policy), Verdict::Compatible);
            }
        }
    }

    #[test]
    fn verdicts_are_stable(layout in arb_layout(), policy in arb_policy()) {
        let env = layout.build();
        for class_idx in 0..layout.classes.len() {
            let operand = id(&env, &format!("C{class_idx}"));
            for iface_idx in 0..layout.interfaces.len() {
                let target = id(&env, &format!("I{iface_idx}"));
                let first = check_with_policy(&env, target, operand, policy);
                prop_assert_eq!(check_with_policy(&env, target, operand, policy), first);
            }
        }
    }

    #[test]
    fn closed_world_never_accepts_what_open_world_rejects(layout in arb_layout()) {
        let env = layout.build();
        for class_idx in 0..layout.classes.len() {
            let operand = id(&env, &format!("C{class_idx}"));
            for iface_idx in 0..layout.interfaces.len() {
                let target = id(&env, &format!("I{iface_idx}"));
                if check(&env, target, operand) == Verdict::Incompatible {
                    prop_assert_eq!(
                        check_with_policy(&env, target, operand, ExtensibilityPolicy::ClosedWorld),
                        Verdict::Incompatible
                    );
                }
            }
        }
    }
}

#[test]
fn final_dog_is_never_comparable() {
    let env = MemoryHierarchy::builder()
        .with(ClassDecl::interface("Comparable"))
        .with(ClassDecl::class("Dog").mark_final())
        .build()
        .unwrap();
    assert_eq!(
        check(&env, id(&env, "Comparable"), id(&env, "Dog")),
        Verdict::Incompatible
    );
}

#[test]
fn open_animal_may_become_flyable() {
    let env = MemoryHierarchy::builder()
        .with(ClassDecl::interface("Flyable"))
        .with(ClassDecl::class("Animal"))
        .build()
        .unwrap();
    assert_eq!(
        check(&env, id(&env, "Flyable"), id(&env, "Animal")),
        Verdict::Compatible
    );
}
