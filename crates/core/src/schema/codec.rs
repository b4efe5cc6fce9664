//! Schema JSON: authoring from live roots and validating against them
//!
//! Both directions walk the persistent root first, then the scene root.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::SchemaError;
use super::hash::StreamingHash;
use super::walker::{self, ParameterSlot};
use crate::property::PropertyRoot;

/// DMX channel offset written for every parameter (unassigned)
pub const DMX_OFFSET_NONE: i32 = -1;

/// DMX encoding written for every parameter (16-bit little endian)
pub const DMX_TYPE_16_LE: i32 = 2;

/// One parameter of an authored schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub group: String,
    pub display_name: String,
    pub key: String,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default_value: f32,
    #[serde(default)]
    pub options: Vec<String>,
    pub dmx_offset: i32,
    pub dmx_type: i32,
}

impl From<ParameterSlot> for ParameterDescriptor {
    fn from(slot: ParameterSlot) -> Self {
        Self {
            group: slot.group,
            display_name: slot.display_name,
            key: slot.key,
            min: slot.min,
            max: slot.max,
            step: slot.step,
            default_value: slot.default_value,
            options: slot.options,
            dmx_offset: DMX_OFFSET_NONE,
            dmx_type: DMX_TYPE_16_LE,
        }
    }
}

/// Authored schema of one scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSchema {
    pub name: String,
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(rename = "nPersistentParameters")]
    pub persistent_parameters: usize,
    #[serde(rename = "nLevelParameters")]
    pub level_parameters: usize,
}

/// Build the schema of one scene from its roots
pub fn author(
    name: &str,
    persistent: Option<&dyn PropertyRoot>,
    root: Option<&dyn PropertyRoot>,
) -> SceneSchema {
    let persistent_slots = persistent.map(|r| walker::describe(r)).unwrap_or_default();
    let level_slots = root.map(|r| walker::describe(r)).unwrap_or_default();

    let persistent_parameters = persistent_slots.len();
    let level_parameters = level_slots.len();

    SceneSchema {
        name: name.to_string(),
        parameters: persistent_slots
            .into_iter()
            .chain(level_slots)
            .map(ParameterDescriptor::from)
            .collect(),
        persistent_parameters,
        level_parameters,
    }
}

/// Serialise scenes as the JSON array published to the controller
pub fn to_json(scenes: &[SceneSchema]) -> Result<String, SchemaError> {
    Ok(serde_json::to_string_pretty(scenes)?)
}

/// Outcome of validating one scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validated {
    /// Fingerprint over the live transport keys
    pub hash: u64,
    /// Total slot count
    pub count: usize,
    /// Slots contributed by the persistent root
    pub persistent_count: usize,
}

impl Validated {
    /// Zero-slot result with the hash of an empty stream
    pub fn empty() -> Self {
        Self {
            hash: StreamingHash::new().get_hash(),
            count: 0,
            persistent_count: 0,
        }
    }
}

/// Read a scene's `name`
pub fn scene_name(entry: &Value) -> Result<&str, SchemaError> {
    match entry {
        Value::Null => Err(SchemaError::NullSchema),
        Value::Object(object) => object
            .get("name")
            .and_then(Value::as_str)
            .ok_or(SchemaError::MissingField("name")),
        _ => Err(SchemaError::NonObjectSchema),
    }
}

struct Cursor<'a> {
    parameters: &'a [Value],
    hasher: StreamingHash,
    count: usize,
}

impl Cursor<'_> {
    fn check(&mut self, expected: &str) -> Result<(), SchemaError> {
        let parameter = self
            .parameters
            .get(self.count)
            .ok_or(SchemaError::InsufficientParameters)?;

        let object = match parameter {
            Value::Null => return Err(SchemaError::NullParameter),
            Value::Object(object) => object,
            _ => return Err(SchemaError::NonObjectParameter),
        };

        // A missing key reads as empty, a non-string key as its JSON text
        let found = match object.get("key") {
            Some(Value::String(key)) => key.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        if found != expected {
            return Err(SchemaError::KeyMismatch {
                index: self.count,
                expected: expected.to_string(),
                found,
            });
        }

        self.hasher.add_data(expected.as_bytes())?;
        self.count += 1;
        Ok(())
    }

    fn walk(&mut self, root: &dyn PropertyRoot) -> Result<(), SchemaError> {
        for key in walker::keys(root) {
            self.check(&key)?;
        }
        Ok(())
    }
}

/// Check an authored scene against the live roots and fingerprint it
///
/// Keys must match positionally; values in the descriptors are ignored.
/// With no roots at all the scene validates as zero slots without looking
/// at its parameters.
#[tracing::instrument(skip_all, fields(scene = tracing::field::Empty))]
pub fn validate(
    entry: &Value,
    persistent: Option<&dyn PropertyRoot>,
    root: Option<&dyn PropertyRoot>,
) -> Result<Validated, SchemaError> {
    let name = scene_name(entry)?;
    tracing::Span::current().record("scene", name);

    if persistent.is_none() && root.is_none() {
        return Ok(Validated::empty());
    }

    let parameters = entry
        .get("parameters")
        .and_then(Value::as_array)
        .ok_or(SchemaError::MissingField("parameters"))?;

    tracing::info!("Validating schema for {}", name);

    let mut cursor = Cursor {
        parameters,
        hasher: StreamingHash::new(),
        count: 0,
    };

    if let Some(persistent) = persistent {
        cursor.walk(persistent)?;
    }
    let persistent_count = cursor.count;

    if let Some(declared) = entry.get("nPersistentParameters").and_then(Value::as_u64) {
        let declared = declared as usize;
        if declared != persistent_count {
            return Err(SchemaError::PersistentCountMismatch {
                declared,
                actual: persistent_count,
            });
        }
    }

    if let Some(root) = root {
        cursor.walk(root)?;
    }

    if cursor.count != parameters.len() {
        return Err(SchemaError::ExcessParameters);
    }

    tracing::info!("Validated schema for {}: {} parameters", name, cursor.count);

    Ok(Validated {
        hash: cursor.hasher.get_hash(),
        count: cursor.count,
        persistent_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{DynamicRoot, PropertyDef, PropertyKind};
    use crate::schema::hash::fnv_hash;
    use glam::Vec3;
    use serde_json::json;

    fn scenario_root() -> DynamicRoot {
        DynamicRoot::new("Scenario")
            .with(PropertyDef::new("Enabled", PropertyKind::Bool), true)
            .with(PropertyDef::new("Speed", PropertyKind::Float), 0.5f32)
            .with(PropertyDef::new("Offset", PropertyKind::Vector), Vec3::ZERO)
    }

    fn authored(root: &DynamicRoot) -> Value {
        serde_json::to_value(author("Stage", None, Some(root))).unwrap()
    }

    #[test]
    fn test_author_json_shape() {
        let persistent = DynamicRoot::new("Persistent")
            .with(PropertyDef::new("Master", PropertyKind::Float).with_category("Global"), 1.0f32);
        let scene = author("Stage", Some(&persistent), Some(&scenario_root()));

        assert_eq!(scene.persistent_parameters, 1);
        assert_eq!(scene.level_parameters, 5);

        let value = serde_json::to_value(&scene).unwrap();
        assert_eq!(value["name"], "Stage");
        assert_eq!(value["nPersistentParameters"], 1);
        assert_eq!(value["nLevelParameters"], 5);
        assert_eq!(value["parameters"][0]["key"], "Master");
        assert_eq!(value["parameters"][0]["group"], "Global");
        assert_eq!(value["parameters"][0]["dmxOffset"], -1);
        assert_eq!(value["parameters"][0]["dmxType"], 2);
        assert_eq!(value["parameters"][1]["options"], json!(["Off", "On"]));
        assert_eq!(value["parameters"][3]["displayName"], "Offset x");
    }

    #[test]
    fn test_validate_matches_authored() {
        let root = scenario_root();
        let validated = validate(&authored(&root), None, Some(&root)).unwrap();

        assert_eq!(validated.count, 5);
        assert_eq!(validated.persistent_count, 0);
        assert_eq!(validated.hash, fnv_hash(b"EnabledSpeedOffset_xOffset_yOffset_z"));

        // Deterministic
        assert_eq!(validate(&authored(&root), None, Some(&root)).unwrap(), validated);
    }

    #[test]
    fn test_fingerprint_changes_with_fields() {
        let root = scenario_root();
        let base = validate(&authored(&root), None, Some(&root)).unwrap().hash;

        let mut without_speed = scenario_root();
        without_speed.remove("Speed");
        let removed = validate(&authored(&without_speed), None, Some(&without_speed))
            .unwrap()
            .hash;
        assert_ne!(base, removed);

        let extra = scenario_root().with(PropertyDef::new("Gain", PropertyKind::Float), 0.0f32);
        let added = validate(&authored(&extra), None, Some(&extra)).unwrap().hash;
        assert_ne!(base, added);
    }

    #[test]
    fn test_key_mismatch() {
        let root = scenario_root();
        let mut entry = authored(&root);
        entry["parameters"][1]["key"] = json!("Velocity");

        match validate(&entry, None, Some(&root)) {
            Err(SchemaError::KeyMismatch {
                index,
                expected,
                found,
            }) => {
                assert_eq!(index, 1);
                assert_eq!(expected, "Speed");
                assert_eq!(found, "Velocity");
            }
            other => panic!("expected key mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_or_non_string_key() {
        let root = scenario_root();

        let mut entry = authored(&root);
        entry["parameters"][0].as_object_mut().unwrap().remove("key");
        match validate(&entry, None, Some(&root)) {
            Err(SchemaError::KeyMismatch { index, expected, found }) => {
                assert_eq!(index, 0);
                assert_eq!(expected, "Enabled");
                assert_eq!(found, "");
            }
            other => panic!("expected key mismatch, got {:?}", other),
        }

        let mut entry = authored(&root);
        entry["parameters"][2]["key"] = json!(7);
        match validate(&entry, None, Some(&root)) {
            Err(SchemaError::KeyMismatch { index, expected, found }) => {
                assert_eq!(index, 2);
                assert_eq!(expected, "Offset_x");
                assert_eq!(found, "7");
            }
            other => panic!("expected key mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_initial_value_round_trips() {
        let root = DynamicRoot::new("Mixed")
            .with(PropertyDef::new("Speed", PropertyKind::Float), 1.0f32)
            .with(PropertyDef::new("Count", PropertyKind::Int), 1.0f32);

        let validated = validate(&authored(&root), None, Some(&root)).unwrap();
        assert_eq!(validated.count, 2);
        assert_eq!(validated.count, walker::slot_count(&root));
    }

    #[test]
    fn test_insufficient_parameters() {
        let root = scenario_root();
        let mut entry = authored(&root);
        entry["parameters"].as_array_mut().unwrap().pop();

        assert!(matches!(
            validate(&entry, None, Some(&root)),
            Err(SchemaError::InsufficientParameters)
        ));
    }

    #[test]
    fn test_excess_parameters() {
        let root = scenario_root();
        let mut entry = authored(&root);
        entry["parameters"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "key": "Extra" }));

        assert!(matches!(
            validate(&entry, None, Some(&root)),
            Err(SchemaError::ExcessParameters)
        ));
    }

    #[test]
    fn test_null_and_non_object_parameters() {
        let root = scenario_root();

        let mut entry = authored(&root);
        entry["parameters"][0] = Value::Null;
        assert!(matches!(
            validate(&entry, None, Some(&root)),
            Err(SchemaError::NullParameter)
        ));

        entry["parameters"][0] = json!(3);
        assert!(matches!(
            validate(&entry, None, Some(&root)),
            Err(SchemaError::NonObjectParameter)
        ));
    }

    #[test]
    fn test_null_and_non_object_schema() {
        let root = scenario_root();
        assert!(matches!(
            validate(&Value::Null, None, Some(&root)),
            Err(SchemaError::NullSchema)
        ));
        assert!(matches!(
            validate(&json!([]), None, Some(&root)),
            Err(SchemaError::NonObjectSchema)
        ));
    }

    #[test]
    fn test_no_roots_is_empty() {
        let entry = json!({ "name": "Missing", "parameters": [{ "key": "Anything" }] });
        let validated = validate(&entry, None, None).unwrap();
        assert_eq!(validated, Validated::empty());
        assert_eq!(validated.hash, fnv_hash(b""));
    }

    #[test]
    fn test_persistent_boundary() {
        let persistent = DynamicRoot::new("Persistent")
            .with(PropertyDef::new("Master", PropertyKind::Float), 1.0f32);
        let root = scenario_root();

        let mut entry =
            serde_json::to_value(author("Stage", Some(&persistent), Some(&root))).unwrap();
        let validated = validate(&entry, Some(&persistent), Some(&root)).unwrap();
        assert_eq!(validated.count, 6);
        assert_eq!(validated.persistent_count, 1);
        assert_eq!(
            validated.hash,
            fnv_hash(b"MasterEnabledSpeedOffset_xOffset_yOffset_z")
        );

        entry["nPersistentParameters"] = json!(2);
        assert!(matches!(
            validate(&entry, Some(&persistent), Some(&root)),
            Err(SchemaError::PersistentCountMismatch {
                declared: 2,
                actual: 1
            })
        ));
    }
}
