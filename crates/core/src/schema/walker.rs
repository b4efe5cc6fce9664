//! Ordered walk over a root's exposed properties
//!
//! [`describe`] and [`apply`] visit the same properties in the same order
//! and flatten them to the same slots, so a float buffer produced against
//! one is consumed correctly by the other.

use glam::Vec3;

use crate::property::{
    Color, LinearColor, PropertyDef, PropertyKind, PropertyRoot, PropertyValue,
};

/// Error applying a parameter buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error("Parameter buffer holds {available} values, root needs {required}")]
    OutOfRange { required: usize, available: usize },
}

/// Value kind of a single flattened slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Bool,
    Byte,
    Int,
    Float,
}

/// One flattened scalar of an exposed property
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSlot {
    /// Property category
    pub group: String,
    /// Property name, followed by `" <suffix>"` for composite components
    pub display_name: String,
    /// Transport key, see [`transport_key`]
    pub key: String,
    pub kind: SlotKind,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    /// Current value of the slot
    pub default_value: f32,
    /// Discrete option labels, empty for continuous slots
    pub options: Vec<String>,
}

/// Compose a transport key: `name` or `name_suffix`
pub fn transport_key(name: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        name.to_string()
    } else {
        format!("{}_{}", name, suffix)
    }
}

/// Properties that take part in the transport contract, in walk order
///
/// Inherited properties are excluded. Unexposed and unsupported
/// properties are logged and skipped.
pub fn exposed<'a, R>(root: &'a R) -> impl Iterator<Item = (usize, &'a PropertyDef)> + 'a
where
    R: PropertyRoot + ?Sized,
{
    root.properties()
        .iter()
        .enumerate()
        .filter(|(_, def)| !def.inherited)
        .filter(|(_, def)| {
            if !def.flags.is_exposed() {
                tracing::trace!("Unexposed property: {}", def.name);
                return false;
            }
            if def.kind == PropertyKind::Unsupported {
                tracing::debug!("Unsupported exposed property: {} ({})", def.name, def.type_name);
                return false;
            }
            true
        })
}

/// Transport keys of every slot, in walk order
pub fn keys<R>(root: &R) -> Vec<String>
where
    R: PropertyRoot + ?Sized,
{
    exposed(root)
        .flat_map(|(_, def)| {
            def.kind
                .suffixes()
                .iter()
                .map(move |suffix| transport_key(&def.name, suffix))
        })
        .collect()
}

/// Number of slots [`describe`] emits and [`apply`] consumes
pub fn slot_count<R>(root: &R) -> usize
where
    R: PropertyRoot + ?Sized,
{
    exposed(root).map(|(_, def)| def.kind.slot_count()).sum()
}

/// Clamp metadata or the given fallback range
fn range(def: &PropertyDef, min: f32, max: f32) -> (f32, f32) {
    def.clamp.unwrap_or((min, max))
}

fn slot(
    def: &PropertyDef,
    suffix: &str,
    kind: SlotKind,
    (min, max): (f32, f32),
    step: f32,
    default_value: f32,
    options: Vec<String>,
) -> ParameterSlot {
    let display_name = if suffix.is_empty() {
        def.name.clone()
    } else {
        format!("{} {}", def.name, suffix)
    };

    // Discrete options always span [0, count] in whole steps
    let (min, max, step) = if options.is_empty() {
        (min, max, step)
    } else {
        (0.0, options.len() as f32, 1.0)
    };

    ParameterSlot {
        group: def.category.clone(),
        display_name,
        key: transport_key(&def.name, suffix),
        kind,
        min,
        max,
        step,
        default_value,
        options,
    }
}

fn components(def: &PropertyDef, values: [f32; 4], range: (f32, f32), step: f32) -> Vec<ParameterSlot> {
    def.kind
        .suffixes()
        .iter()
        .zip(values)
        .map(|(suffix, v)| slot(def, suffix, SlotKind::Float, range, step, v, Vec::new()))
        .collect()
}

/// Describe every slot of `root` with its current value as default
pub fn describe<R>(root: &R) -> Vec<ParameterSlot>
where
    R: PropertyRoot + ?Sized,
{
    let mut slots = Vec::new();

    for (index, def) in exposed(root) {
        // Unreadable properties still occupy their slots, defaulting to zero
        let value = match root.value(index) {
            Some(value) if value.kind() == def.kind => Some(value),
            Some(value) => {
                tracing::warn!("Property {} reads as {:?}, declared {:?}", def.name, value.kind(), def.kind);
                PropertyValue::zero(def.kind)
            }
            None => {
                tracing::warn!("Exposed property {} has no readable value", def.name);
                PropertyValue::zero(def.kind)
            }
        };
        let Some(value) = value else {
            continue;
        };

        match value {
            PropertyValue::Bool(v) => {
                tracing::debug!("Exposed bool property: {} is {}", def.name, v);
                let options = vec!["Off".to_string(), "On".to_string()];
                slots.push(slot(def, "", SlotKind::Bool, (0.0, 1.0), 1.0, if v { 1.0 } else { 0.0 }, options));
            }
            PropertyValue::Byte(v) => {
                tracing::debug!("Exposed byte property: {} is {} [{}]", def.name, v, def.options.join(","));
                let range = range(def, 0.0, 255.0);
                slots.push(slot(def, "", SlotKind::Byte, range, 1.0, v as f32, def.options.clone()));
            }
            PropertyValue::Int(v) => {
                tracing::debug!("Exposed int property: {} is {} [{}]", def.name, v, def.options.join(","));
                let range = range(def, -1000.0, 1000.0);
                slots.push(slot(def, "", SlotKind::Int, range, 1.0, v as f32, def.options.clone()));
            }
            PropertyValue::Float(v) => {
                tracing::debug!("Exposed float property: {} is {}", def.name, v);
                let range = range(def, -1.0, 1.0);
                slots.push(slot(def, "", SlotKind::Float, range, 0.001, v, Vec::new()));
            }
            PropertyValue::Vector(v) => {
                tracing::debug!("Exposed vector property: {} is {}", def.name, v);
                slots.extend(components(def, [v.x, v.y, v.z, 0.0], (-1.0, 1.0), 0.001));
            }
            PropertyValue::Color(c) => {
                tracing::debug!("Exposed colour property: {} is {:?}", def.name, c);
                let normalised = [c.r, c.g, c.b, c.a].map(|channel| channel as f32 / 255.0);
                slots.extend(components(def, normalised, (0.0, 1.0), 0.0001));
            }
            PropertyValue::LinearColor(c) => {
                tracing::debug!("Exposed linear colour property: {} is {:?}", def.name, c);
                slots.extend(components(def, [c.r, c.g, c.b, c.a], (0.0, 1.0), 0.0001));
            }
        }
    }

    slots
}

/// Convert one slot-run of floats into a value of `kind`
fn decode(kind: PropertyKind, values: &[f32]) -> Option<PropertyValue> {
    let value = match (kind, values) {
        (PropertyKind::Bool, [v]) => PropertyValue::Bool(*v != 0.0),
        (PropertyKind::Byte, [v]) => PropertyValue::Byte(*v as u8),
        (PropertyKind::Int, [v]) => PropertyValue::Int(*v as i32),
        (PropertyKind::Float, [v]) => PropertyValue::Float(*v),
        (PropertyKind::Vector, [x, y, z]) => PropertyValue::Vector(Vec3::new(*x, *y, *z)),
        (PropertyKind::Color, [r, g, b, a]) => {
            let [r, g, b, a] = [r, g, b, a].map(|channel| (channel * 255.0) as u8);
            PropertyValue::Color(Color::new(r, g, b, a))
        }
        (PropertyKind::LinearColor, [r, g, b, a]) => {
            PropertyValue::LinearColor(LinearColor::new(*r, *g, *b, *a))
        }
        _ => return None,
    };
    Some(value)
}

/// Write a flat float buffer back into `root` in walk order
///
/// The buffer must hold at least [`slot_count`] values; extra values are
/// ignored. Nothing is written when the buffer is too short. Returns the
/// number of values consumed.
pub fn apply<R>(root: &mut R, values: &[f32]) -> Result<usize, ApplyError>
where
    R: PropertyRoot + ?Sized,
{
    let required = slot_count(root);
    if values.len() < required {
        return Err(ApplyError::OutOfRange {
            required,
            available: values.len(),
        });
    }

    let layout: Vec<(usize, PropertyKind, String)> = exposed(root)
        .map(|(index, def)| (index, def.kind, def.name.clone()))
        .collect();

    let mut offset = 0;
    for (index, kind, name) in layout {
        let count = kind.slot_count();
        let run = &values[offset..offset + count];
        offset += count;

        match decode(kind, run) {
            Some(value) => {
                if !root.set_value(index, value) {
                    tracing::warn!("Failed to set property {}", name);
                }
            }
            None => tracing::warn!("Cannot decode {:?} property {}", kind, name),
        }
    }

    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{DynamicRoot, PropertyFlags};

    fn scenario_root() -> DynamicRoot {
        DynamicRoot::new("Scenario")
            .with(PropertyDef::new("Enabled", PropertyKind::Bool), true)
            .with(PropertyDef::new("Speed", PropertyKind::Float), 0.5f32)
            .with(
                PropertyDef::new("Offset", PropertyKind::Vector).with_category("Motion"),
                Vec3::new(1.0, 2.0, 3.0),
            )
    }

    #[test]
    fn test_scenario_slot_order() {
        let root = scenario_root();
        let slots = describe(&root);
        let keys: Vec<_> = slots.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["Enabled", "Speed", "Offset_x", "Offset_y", "Offset_z"]);
        assert_eq!(super::keys(&root), keys);
        assert_eq!(slot_count(&root), 5);

        assert_eq!(slots[2].display_name, "Offset x");
        assert_eq!(slots[2].group, "Motion");
        assert_eq!(slots[4].default_value, 3.0);
    }

    #[test]
    fn test_unexposed_inherited_and_unsupported_skipped() {
        let root = DynamicRoot::new("Mixed")
            .with(PropertyDef::new("Base", PropertyKind::Float).inherited(), 1.0f32)
            .with(
                PropertyDef::new("Hidden", PropertyKind::Float).with_flags(PropertyFlags::EDIT),
                1.0f32,
            )
            .with(
                PropertyDef::new("Locked", PropertyKind::Int)
                    .with_flags(PropertyFlags::EXPOSED | PropertyFlags::DISABLE_EDIT_ON_INSTANCE),
                1i32,
            )
            .with_unsupported("Transform", "FTransform")
            .with(PropertyDef::new("Count", PropertyKind::Int), 4i32);

        assert_eq!(keys(&root), vec!["Count".to_string()]);
    }

    #[test]
    fn test_metadata_defaults() {
        let root = DynamicRoot::new("Meta")
            .with(PropertyDef::new("On", PropertyKind::Bool), false)
            .with(PropertyDef::new("Level", PropertyKind::Byte), 7u8)
            .with(PropertyDef::new("Count", PropertyKind::Int).with_clamp(0.0, 10.0), 2i32)
            .with(PropertyDef::new("Gain", PropertyKind::Float), 0.25f32)
            .with(
                PropertyDef::new("Mode", PropertyKind::Byte).with_options(["A", "B", "C"]),
                1u8,
            )
            .with(PropertyDef::new("Tint", PropertyKind::Color), Color::new(255, 0, 51, 255));

        let slots = describe(&root);
        assert_eq!(slots[0].options, ["Off", "On"]);
        assert_eq!((slots[0].min, slots[0].max, slots[0].step), (0.0, 1.0, 1.0));
        assert_eq!((slots[1].min, slots[1].max), (0.0, 255.0));
        assert_eq!((slots[2].min, slots[2].max), (0.0, 10.0));
        assert_eq!((slots[3].min, slots[3].max, slots[3].step), (-1.0, 1.0, 0.001));
        assert_eq!((slots[4].min, slots[4].max, slots[4].step), (0.0, 3.0, 1.0));
        assert_eq!(slots[4].default_value, 1.0);
        assert_eq!(slots[5].key, "Tint_r");
        assert_eq!(slots[5].default_value, 1.0);
        assert_eq!(slots[7].default_value, 0.2);
        assert_eq!(slots[8].step, 0.0001);
    }

    #[test]
    fn test_apply_round_trip() {
        let mut root = DynamicRoot::new("Round")
            .with(PropertyDef::new("Enabled", PropertyKind::Bool), true)
            .with(PropertyDef::new("Level", PropertyKind::Byte), 200u8)
            .with(PropertyDef::new("Count", PropertyKind::Int), -12i32)
            .with(PropertyDef::new("Speed", PropertyKind::Float), 0.75f32)
            .with(PropertyDef::new("Offset", PropertyKind::Vector), Vec3::new(1.0, -2.0, 3.0))
            .with(PropertyDef::new("Tint", PropertyKind::Color), Color::new(255, 0, 255, 255))
            .with(
                PropertyDef::new("Glow", PropertyKind::LinearColor),
                LinearColor::new(0.1, 0.2, 0.3, 1.0),
            );
        let before = root.clone();

        let defaults: Vec<f32> = describe(&root).iter().map(|s| s.default_value).collect();
        assert_eq!(apply(&mut root, &defaults), Ok(defaults.len()));

        for (index, _) in before.properties().iter().enumerate() {
            assert_eq!(root.value(index), before.value(index));
        }
    }

    #[test]
    fn test_apply_conversions() {
        let mut root = scenario_root()
            .with(PropertyDef::new("Tint", PropertyKind::Color), Color::default());

        let values = [0.0, 4.0, 0.1, 0.2, 0.3, 1.0, 0.0, 1.0, 0.5];
        assert_eq!(apply(&mut root, &values), Ok(9));

        assert_eq!(root.get("Enabled"), Some(PropertyValue::Bool(false)));
        assert_eq!(root.get("Speed"), Some(PropertyValue::Float(4.0)));
        assert_eq!(
            root.get("Offset"),
            Some(PropertyValue::Vector(Vec3::new(0.1, 0.2, 0.3)))
        );
        assert_eq!(
            root.get("Tint"),
            Some(PropertyValue::Color(Color::new(255, 0, 255, 127)))
        );
    }

    #[test]
    fn test_apply_short_buffer_writes_nothing() {
        let mut root = scenario_root();
        let result = apply(&mut root, &[0.0, 1.0, 2.0]);
        assert_eq!(
            result,
            Err(ApplyError::OutOfRange {
                required: 5,
                available: 3
            })
        );
        assert_eq!(root.get("Enabled"), Some(PropertyValue::Bool(true)));
    }

    #[test]
    fn test_slot_count_matches_describe() {
        let root = scenario_root()
            .with(PropertyDef::new("Glow", PropertyKind::LinearColor), LinearColor::default())
            .with_unsupported("Mesh", "UStaticMesh");
        assert_eq!(describe(&root).len(), slot_count(&root));
    }

    /// A root whose reads disagree with its declared kinds
    struct MisreadRoot {
        properties: Vec<PropertyDef>,
    }

    impl PropertyRoot for MisreadRoot {
        fn class_name(&self) -> &str {
            "Misread"
        }

        fn properties(&self) -> &[PropertyDef] {
            &self.properties
        }

        fn value(&self, index: usize) -> Option<PropertyValue> {
            match index {
                0 => Some(PropertyValue::Float(1.0)),
                1 => Some(PropertyValue::Float(1.0)),
                _ => None,
            }
        }

        fn set_value(&mut self, _index: usize, _value: PropertyValue) -> bool {
            false
        }
    }

    #[test]
    fn test_unreadable_properties_keep_their_slots() {
        let root = MisreadRoot {
            properties: vec![
                PropertyDef::new("Speed", PropertyKind::Float),
                PropertyDef::new("Count", PropertyKind::Int),
                PropertyDef::new("Offset", PropertyKind::Vector),
            ],
        };

        let slots = describe(&root);
        assert_eq!(slots.len(), slot_count(&root));
        let described: Vec<_> = slots.iter().map(|s| s.key.clone()).collect();
        assert_eq!(described, keys(&root));

        assert_eq!(slots[0].default_value, 1.0);
        assert_eq!(slots[1].kind, SlotKind::Int);
        assert_eq!(slots[1].default_value, 0.0);
        assert_eq!(slots[4].default_value, 0.0);
    }
}
