use gadgets_types::{ClassDecl, ClassId, MemoryHierarchy, TypeHierarchy};

mod jvm_names;

/// Small hierarchy shared by the suites:
///
/// ```text
/// interface Runnable, Comparable, Flyable, Pet
/// interface Walker extends Runnable
/// class Animal
/// final class Dog extends Animal implements Runnable
/// class Cat extends Animal implements Pet
/// final class Robot implements Walker
/// enum Color implements Comparable
/// record Point
/// sealed class Vehicle permits Car, Bike
/// final class Car extends Vehicle implements Runnable
/// final class Bike extends Vehicle
/// sealed interface Shape permits Circle, Square
/// final class Circle implements Shape
/// class Square implements Shape
/// final class Ghost implements missing.Haunting
/// ```
pub(crate) fn zoo() -> MemoryHierarchy {
    MemoryHierarchy::builder()
        .with(ClassDecl::interface("Runnable"))
        .with(ClassDecl::interface("Comparable"))
        .with(ClassDecl::interface("Flyable"))
        .with(ClassDecl::interface("Pet"))
        .with(ClassDecl::interface("Walker").extends("Runnable"))
        .with(ClassDecl::class("Animal"))
        .with(
            ClassDecl::class("Dog")
                .extends("Animal")
                .implements("Runnable")
                .mark_final(),
        )
        .with(ClassDecl::class("Cat").extends("Animal").implements("Pet"))
        .with(ClassDecl::class("Robot").implements("Walker").mark_final())
        .with(ClassDecl::enumeration("Color").implements("Comparable"))
        .with(ClassDecl::record("Point"))
        .with(ClassDecl::class("Vehicle").sealed(["Car", "Bike"]))
        .with(
            ClassDecl::class("Car")
                .extends("Vehicle")
                .implements("Runnable")
                .mark_final(),
        )
        .with(ClassDecl::class("Bike").extends("Vehicle").mark_final())
        .with(ClassDecl::interface("Shape").sealed(["Circle", "Square"]))
        .with(ClassDecl::class("Circle").implements("Shape").mark_final())
        .with(ClassDecl::class("Square").implements("Shape"))
        .with(
            ClassDecl::class("Ghost")
                .implements("missing.Haunting")
                .mark_final(),
        )
        .build()
        .expect("zoo hierarchy is well formed")
}

pub(crate) fn id(env: &MemoryHierarchy, name: &str) -> ClassId {
    env.lookup_class(name)
        .unwrap_or_else(|| panic!("`{name}` must exist in the fixture"))
}
