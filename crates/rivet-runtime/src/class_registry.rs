//! Class registry

use rivet_sdk::{InvocationError, InvocationResult};
use rustc_hash::FxHashMap;

use crate::class::{Class, ClassDef, ClassKind};

/// Registry of all classes known to a runtime
#[derive(Debug)]
pub struct ClassRegistry {
    /// Classes indexed by ID
    classes: Vec<Class>,
    /// Class name to ID mapping
    name_to_id: FxHashMap<String, usize>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            name_to_id: FxHashMap::default(),
        }
    }

    /// Register a class definition, returning its ID.
    ///
    /// The parent must already be registered and the name must be free.
    /// Only the first registered class may be a root. Every class named by
    /// a field, parameter or return type must be registered, or be the
    /// class itself.
    pub fn register_class(&mut self, def: ClassDef) -> InvocationResult<usize> {
        self.check_member_classes(&def)?;
        self.insert(def)
    }

    /// Register a builtin class, whose members may name builtins that
    /// come later in the registration order
    pub(crate) fn register_builtin(&mut self, def: ClassDef) -> InvocationResult<usize> {
        self.insert(def)
    }

    fn insert(&mut self, def: ClassDef) -> InvocationResult<usize> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(InvocationError::Registry(format!(
                "class '{}' is already registered",
                def.name
            )));
        }

        let parent_id = match def.parent.as_deref() {
            Some(parent) => {
                let parent_id = self.id_of(parent).ok_or_else(|| {
                    InvocationError::Registry(format!(
                        "parent '{}' of class '{}' is not registered",
                        parent, def.name
                    ))
                })?;
                // object instances cannot stand in for plain values
                if def.kind == ClassKind::Object && self.classes[parent_id].kind == ClassKind::Value {
                    return Err(InvocationError::Registry(format!(
                        "class '{}' cannot extend value class '{}'",
                        def.name, parent
                    )));
                }
                Some(parent_id)
            }
            None if self.classes.is_empty() => None,
            None => {
                return Err(InvocationError::Registry(format!(
                    "class '{}' has no parent and the root is already registered",
                    def.name
                )))
            }
        };

        let id = self.next_class_id();
        let name = def.name.clone();
        self.classes.push(Class::from_def(id, parent_id, def));
        self.name_to_id.insert(name, id);

        Ok(id)
    }

    fn check_member_classes(&self, def: &ClassDef) -> InvocationResult<()> {
        let known = |name: &str| name == def.name || self.contains(name);

        for field in &def.fields {
            if !known(field.class_name.as_str()) {
                return Err(InvocationError::Registry(format!(
                    "field {}.{} has unknown class '{}'",
                    def.name, field.name, field.class_name
                )));
            }
        }

        for method in def.constructors.iter().chain(&def.methods) {
            let unknown = method
                .params
                .iter()
                .chain(std::iter::once(&method.returns))
                .find(|name| !known(name.as_str()));
            if let Some(name) = unknown {
                return Err(InvocationError::Registry(format!(
                    "{}.{} names unknown class '{}'",
                    def.name,
                    method.signature(),
                    name
                )));
            }
        }

        Ok(())
    }

    /// Get class by ID
    pub fn get_class(&self, id: usize) -> Option<&Class> {
        self.classes.get(id)
    }

    /// Get class by name
    pub fn get_class_by_name(&self, name: &str) -> Option<&Class> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.classes.get(*id))
    }

    /// Get class by name or fail with `ClassNotFound`
    pub fn require(&self, name: &str) -> InvocationResult<&Class> {
        self.get_class_by_name(name)
            .ok_or_else(|| InvocationError::ClassNotFound(name.to_string()))
    }

    /// Look up a class ID by name
    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.name_to_id.get(name).copied()
    }

    /// Check if a class is registered
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    /// Get next available class ID
    pub fn next_class_id(&self) -> usize {
        self.classes.len()
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if no class is registered
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over all classes with their IDs
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Class)> {
        self.classes.iter().enumerate()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}
