//! Class introspection
//!
//! Inheritance queries over the registry: subclass checks, hierarchy walks
//! and the assignability rule used by casts and method resolution.

use rivet_sdk::Value;

use crate::class::{Class, FieldDef};
use crate::class_registry::ClassRegistry;

/// Check if `sub_class_id` is `super_class_id` or one of its descendants
pub fn is_subclass_of(registry: &ClassRegistry, sub_class_id: usize, super_class_id: usize) -> bool {
    if sub_class_id == super_class_id {
        return true;
    }

    let mut current_id = sub_class_id;
    while let Some(class) = registry.get_class(current_id) {
        if let Some(parent_id) = class.parent_id {
            if parent_id == super_class_id {
                return true;
            }
            current_id = parent_id;
        } else {
            break;
        }
    }

    false
}

/// Get the class hierarchy (inheritance chain) for a class
///
/// Returns classes from most-derived to the root.
pub fn get_class_hierarchy(registry: &ClassRegistry, class_id: usize) -> Vec<&Class> {
    let mut hierarchy = Vec::new();
    let mut current_id = Some(class_id);

    while let Some(id) = current_id {
        if let Some(class) = registry.get_class(id) {
            hierarchy.push(class);
            current_id = class.parent_id;
        } else {
            break;
        }
    }

    hierarchy
}

/// Check whether a value of class `from` may be typed as `to`.
///
/// Unknown class names are never assignable.
pub fn is_assignable(registry: &ClassRegistry, from: &str, to: &str) -> bool {
    match (registry.id_of(from), registry.id_of(to)) {
        (Some(from_id), Some(to_id)) => is_subclass_of(registry, from_id, to_id),
        _ => false,
    }
}

/// Check whether `value` may be typed as class `to`. `Null` fits every class.
pub fn is_instance_of(registry: &ClassRegistry, value: &Value, to: &str) -> bool {
    match value.runtime_class() {
        None => registry.contains(to),
        Some(class) => is_assignable(registry, class, to),
    }
}

/// Find a field declared by `class_id` or one of its ancestors
pub fn find_field<'r>(registry: &'r ClassRegistry, class_id: usize, name: &str) -> Option<&'r FieldDef> {
    get_class_hierarchy(registry, class_id)
        .into_iter()
        .find_map(|class| class.field(name))
}

/// All fields of a class, inherited ones first
pub fn collect_fields(registry: &ClassRegistry, class_id: usize) -> Vec<&FieldDef> {
    let mut fields = Vec::new();
    for class in get_class_hierarchy(registry, class_id).into_iter().rev() {
        fields.extend(class.fields.iter());
    }
    fields
}
