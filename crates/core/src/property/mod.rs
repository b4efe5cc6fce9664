//! Reflected property model
//!
//! A [`PropertyRoot`] is any object that can list its fields in declared
//! order and read or write them as [`PropertyValue`]s. Rust structs get an
//! implementation from `#[derive(ParameterRoot)]`; state that is only known
//! at runtime uses [`DynamicRoot`].

mod dynamic;

use bitflags::bitflags;
use glam::Vec3;

pub use dynamic::DynamicRoot;

bitflags! {
    /// Editor metadata flags attached to a property
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u32 {
        /// Editable in the editor
        const EDIT = 1 << 0;
        /// Visible to scripting
        const VISIBLE = 1 << 1;
        /// Editable on the class default only, not on placed instances
        const DISABLE_EDIT_ON_INSTANCE = 1 << 2;
    }
}

impl PropertyFlags {
    /// Flags of a property that is remotely controllable
    pub const EXPOSED: Self = Self::EDIT.union(Self::VISIBLE);

    /// Editable, visible and not locked on instances
    pub fn is_exposed(self) -> bool {
        self.contains(Self::EXPOSED) && !self.contains(Self::DISABLE_EDIT_ON_INSTANCE)
    }
}

/// Closed set of field kinds known to the parameter walker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Bool,
    /// 8-bit value, optionally an enum with display names
    Byte,
    Int,
    Float,
    /// 3D vector, three slots
    Vector,
    /// 8-bit RGBA colour, four slots normalised to `[0, 1]`
    Color,
    /// Float RGBA colour, four slots
    LinearColor,
    /// Anything else; never produces slots
    Unsupported,
}

impl PropertyKind {
    /// Transport key suffixes of the slots this kind flattens to
    pub fn suffixes(self) -> &'static [&'static str] {
        match self {
            PropertyKind::Bool | PropertyKind::Byte | PropertyKind::Int | PropertyKind::Float => {
                &[""]
            }
            PropertyKind::Vector => &["x", "y", "z"],
            PropertyKind::Color | PropertyKind::LinearColor => &["r", "g", "b", "a"],
            PropertyKind::Unsupported => &[],
        }
    }

    /// Number of scalar slots
    pub fn slot_count(self) -> usize {
        self.suffixes().len()
    }
}

/// Static description of one property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    /// Editor category, becomes the parameter group
    pub category: String,
    pub flags: PropertyFlags,
    pub kind: PropertyKind,
    /// Declared on a parent class rather than the root's own class
    pub inherited: bool,
    /// `ClampMin`/`ClampMax` metadata, only honoured when both are set
    pub clamp: Option<(f32, f32)>,
    /// Enum display names for byte and int properties
    pub options: Vec<String>,
    /// Type name used in log output
    pub type_name: String,
}

impl PropertyDef {
    /// Create an exposed property with no category, clamp or options
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            category: String::new(),
            flags: PropertyFlags::EXPOSED,
            kind,
            inherited: false,
            clamp: None,
            options: Vec::new(),
            type_name: format!("{:?}", kind),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_flags(mut self, flags: PropertyFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_clamp(mut self, min: f32, max: f32) -> Self {
        self.clamp = Some((min, max));
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn inherited(mut self) -> Self {
        self.inherited = true;
        self
    }
}

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Float RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl LinearColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Current value of a supported property
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Byte(u8),
    Int(i32),
    Float(f32),
    Vector(Vec3),
    Color(Color),
    LinearColor(LinearColor),
}

impl PropertyValue {
    /// Kind this value belongs to
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::Byte(_) => PropertyKind::Byte,
            PropertyValue::Int(_) => PropertyKind::Int,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::Vector(_) => PropertyKind::Vector,
            PropertyValue::Color(_) => PropertyKind::Color,
            PropertyValue::LinearColor(_) => PropertyKind::LinearColor,
        }
    }

    /// Zero value of a kind, `None` for [`PropertyKind::Unsupported`]
    pub fn zero(kind: PropertyKind) -> Option<Self> {
        let value = match kind {
            PropertyKind::Bool => PropertyValue::Bool(false),
            PropertyKind::Byte => PropertyValue::Byte(0),
            PropertyKind::Int => PropertyValue::Int(0),
            PropertyKind::Float => PropertyValue::Float(0.0),
            PropertyKind::Vector => PropertyValue::Vector(Vec3::ZERO),
            PropertyKind::Color => PropertyValue::Color(Color::default()),
            PropertyKind::LinearColor => PropertyValue::LinearColor(LinearColor::default()),
            PropertyKind::Unsupported => return None,
        };
        Some(value)
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PropertyValue {
                fn from(value: $ty) -> Self {
                    PropertyValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    u8 => Byte,
    i32 => Int,
    f32 => Float,
    Vec3 => Vector,
    Color => Color,
    LinearColor => LinearColor,
}

/// An object whose fields can be walked, read and written by index
///
/// Indices refer to positions in [`properties`](Self::properties), which
/// must list fields in declared order and stay stable for the lifetime of
/// the object.
pub trait PropertyRoot {
    /// Class name used in log output
    fn class_name(&self) -> &str;

    /// All properties in declared order
    fn properties(&self) -> &[PropertyDef];

    /// Read a property, `None` for unsupported kinds or bad indices
    fn value(&self, index: usize) -> Option<PropertyValue>;

    /// Write a property
    ///
    /// Returns `false` if the index is out of bounds or the value's kind
    /// does not match the property.
    fn set_value(&mut self, index: usize, value: PropertyValue) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposed_flags() {
        assert!(PropertyFlags::EXPOSED.is_exposed());
        assert!(!PropertyFlags::EDIT.is_exposed());
        assert!(!PropertyFlags::VISIBLE.is_exposed());
        assert!(!(PropertyFlags::EXPOSED | PropertyFlags::DISABLE_EDIT_ON_INSTANCE).is_exposed());
    }

    #[test]
    fn test_slot_counts() {
        assert_eq!(PropertyKind::Bool.slot_count(), 1);
        assert_eq!(PropertyKind::Vector.slot_count(), 3);
        assert_eq!(PropertyKind::Color.slot_count(), 4);
        assert_eq!(PropertyKind::LinearColor.slot_count(), 4);
        assert_eq!(PropertyKind::Unsupported.slot_count(), 0);
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(PropertyValue::from(true).kind(), PropertyKind::Bool);
        assert_eq!(PropertyValue::from(Vec3::ONE).kind(), PropertyKind::Vector);
        assert_eq!(
            PropertyValue::from(Color::new(1, 2, 3, 4)).kind(),
            PropertyKind::Color
        );
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(PropertyValue::zero(PropertyKind::Int), Some(PropertyValue::Int(0)));
        assert_eq!(
            PropertyValue::zero(PropertyKind::Vector).map(|v| v.kind()),
            Some(PropertyKind::Vector)
        );
        assert_eq!(PropertyValue::zero(PropertyKind::Unsupported), None);
    }

    #[derive(crate::ParameterRoot)]
    #[parameters(class = "StageScript")]
    struct StageScript {
        enabled: bool,
        #[param(category = "Motion", min = 0.0, max = 10.0)]
        speed: f32,
        offset: Vec3,
        #[param(option = "Off", option = "Slow", option = "Fast")]
        mode: u8,
        #[param(readonly)]
        frame: i32,
        #[param(skip)]
        #[allow(dead_code)]
        cache: Vec<u8>,
        #[allow(dead_code)]
        label: String,
    }

    fn stage() -> StageScript {
        StageScript {
            enabled: false,
            speed: 1.5,
            offset: Vec3::ZERO,
            mode: 0,
            frame: 0,
            cache: Vec::new(),
            label: String::new(),
        }
    }

    #[test]
    fn test_derived_properties() {
        let root = stage();
        assert_eq!(root.class_name(), "StageScript");

        let names: Vec<_> = root.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Enabled", "Speed", "Offset", "Mode", "Frame", "Label"]);

        let props = root.properties();
        assert_eq!(props[1].category, "Motion");
        assert_eq!(props[1].clamp, Some((0.0, 10.0)));
        assert_eq!(props[3].kind, PropertyKind::Byte);
        assert_eq!(props[3].options, ["Off", "Slow", "Fast"]);
        assert!(props[0].flags.is_exposed());
        assert!(!props[4].flags.is_exposed());
        assert_eq!(props[5].kind, PropertyKind::Unsupported);
    }

    #[test]
    fn test_derived_values() {
        let mut root = stage();
        assert_eq!(root.value(1), Some(PropertyValue::Float(1.5)));
        assert_eq!(root.value(5), None);
        assert_eq!(root.value(6), None);

        assert!(root.set_value(0, PropertyValue::Bool(true)));
        assert!(root.set_value(2, PropertyValue::Vector(Vec3::X)));
        assert!(!root.set_value(1, PropertyValue::Int(3)));
        assert!(!root.set_value(5, PropertyValue::Bool(true)));

        assert!(root.enabled);
        assert_eq!(root.offset, Vec3::X);
        assert_eq!(root.speed, 1.5);
    }
}
