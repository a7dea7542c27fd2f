use gadgets_types::{jvm_class_name, ClassDecl, ClassId, MemoryHierarchy, TypeHierarchy};

fn nested() -> MemoryHierarchy {
    MemoryHierarchy::builder()
        .with(ClassDecl::class("com.acme.Outer"))
        .with(ClassDecl::class("com.acme.Outer.Inner").nested_in("com.acme.Outer"))
        .with(ClassDecl::interface("com.acme.Outer.Inner.Deep").nested_in("com.acme.Outer.Inner"))
        .build()
        .unwrap()
}

#[test]
fn top_level_name_is_qualified_name() {
    let env = nested();
    let outer = env.lookup_class("com.acme.Outer").unwrap();
    assert_eq!(jvm_class_name(&env, outer, "$").as_deref(), Some("com.acme.Outer"));
}

#[test]
fn nested_names_use_the_delimiter() {
    let env = nested();
    let deep = env.lookup_class("com.acme.Outer.Inner.Deep").unwrap();
    assert_eq!(
        jvm_class_name(&env, deep, "$").as_deref(),
        Some("com.acme.Outer$Inner$Deep")
    );
    assert_eq!(
        jvm_class_name(&env, deep, ".").as_deref(),
        Some("com.acme.Outer.Inner.Deep")
    );
}

#[test]
fn unresolved_class_has_no_name() {
    let env = nested();
    assert_eq!(jvm_class_name(&env, ClassId::new(99), "$"), None);
}
