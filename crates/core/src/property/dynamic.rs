//! Runtime-described property root

use super::{PropertyDef, PropertyKind, PropertyRoot, PropertyValue};

/// Property root whose fields are declared at runtime
///
/// Used by hosts whose state is not a Rust struct, e.g. values mirrored
/// from a scripting layer.
#[derive(Debug, Clone, Default)]
pub struct DynamicRoot {
    class_name: String,
    properties: Vec<PropertyDef>,
    values: Vec<Option<PropertyValue>>,
}

impl DynamicRoot {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            properties: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append a property with its initial value
    ///
    /// A value whose kind does not match `def.kind` is replaced by the
    /// kind's zero value, so every supported property stays readable.
    pub fn with(mut self, def: PropertyDef, value: impl Into<PropertyValue>) -> Self {
        self.push(def, Some(value.into()));
        self
    }

    /// Append a property of a kind the walker does not support
    pub fn with_unsupported(mut self, name: impl Into<String>, type_name: &str) -> Self {
        let def = PropertyDef::new(name, PropertyKind::Unsupported).with_type_name(type_name);
        self.push(def, None);
        self
    }

    fn push(&mut self, def: PropertyDef, value: Option<PropertyValue>) {
        let value = match value {
            Some(value) if value.kind() == def.kind => Some(value),
            Some(value) => {
                tracing::warn!(
                    "Initial value of {} is {:?}, declared {:?}; using zero",
                    def.name,
                    value.kind(),
                    def.kind
                );
                PropertyValue::zero(def.kind)
            }
            None => PropertyValue::zero(def.kind),
        };
        self.properties.push(def);
        self.values.push(value);
    }

    /// Look up a value by property name
    pub fn get(&self, name: &str) -> Option<PropertyValue> {
        let index = self.properties.iter().position(|p| p.name == name)?;
        self.value(index)
    }

    /// Remove a property by name, returning whether it existed
    pub fn remove(&mut self, name: &str) -> bool {
        match self.properties.iter().position(|p| p.name == name) {
            Some(index) => {
                self.properties.remove(index);
                self.values.remove(index);
                true
            }
            None => false,
        }
    }
}

impl PropertyRoot for DynamicRoot {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    fn value(&self, index: usize) -> Option<PropertyValue> {
        self.values.get(index).copied().flatten()
    }

    fn set_value(&mut self, index: usize, value: PropertyValue) -> bool {
        match (self.properties.get(index), self.values.get_mut(index)) {
            (Some(def), Some(slot)) if def.kind == value.kind() => {
                *slot = Some(value);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_checks_kind() {
        let mut root = DynamicRoot::new("Test")
            .with(PropertyDef::new("Speed", PropertyKind::Float), 1.5f32);

        assert!(root.set_value(0, PropertyValue::Float(2.0)));
        assert!(!root.set_value(0, PropertyValue::Bool(true)));
        assert!(!root.set_value(1, PropertyValue::Float(2.0)));
        assert_eq!(root.get("Speed"), Some(PropertyValue::Float(2.0)));
    }

    #[test]
    fn test_mismatched_initial_value_zeroed() {
        let root = DynamicRoot::new("Test").with(PropertyDef::new("Count", PropertyKind::Int), 1.0f32);
        assert_eq!(root.get("Count"), Some(PropertyValue::Int(0)));
    }

    #[test]
    fn test_unsupported_reads_none() {
        let root = DynamicRoot::new("Test").with_unsupported("Mesh", "UStaticMesh");
        assert_eq!(root.get("Mesh"), None);
    }

    #[test]
    fn test_remove() {
        let mut root = DynamicRoot::new("Test")
            .with(PropertyDef::new("A", PropertyKind::Bool), true)
            .with(PropertyDef::new("B", PropertyKind::Int), 3i32);

        assert!(root.remove("A"));
        assert!(!root.remove("A"));
        assert_eq!(root.properties().len(), 1);
        assert_eq!(root.value(0), Some(PropertyValue::Int(3)));
    }
}
