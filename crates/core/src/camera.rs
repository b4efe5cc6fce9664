//! Camera data conversion and scene-graph receivers
//!
//! The controller sends positions in metres in a Y-up frame and rotations
//! as Euler angles in degrees. Receivers live in the host's Z-up frame in
//! the configured distance unit.

use glam::{Quat, Vec2, Vec3};
use rsbridge_sdk::CameraData;
use serde::{Deserialize, Serialize};

/// Distance unit of the host scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Millimeters,
    #[default]
    Centimeters,
    Meters,
    Inches,
    Feet,
}

impl DistanceUnit {
    /// Convert a distance in metres into this unit
    pub fn from_meters(self, meters: f32) -> f32 {
        match self {
            DistanceUnit::Millimeters => meters * 1000.0,
            DistanceUnit::Centimeters => meters * 100.0,
            DistanceUnit::Meters => meters,
            DistanceUnit::Inches => meters / 0.0254,
            DistanceUnit::Feet => meters / 0.3048,
        }
    }
}

/// Camera position in host axes (x forward from z, y right from x, z up from y)
pub fn camera_location(camera: &CameraData, unit: DistanceUnit) -> Vec3 {
    let (x, y, z) = (camera.x, camera.y, camera.z);
    Vec3::new(
        unit.from_meters(z),
        unit.from_meters(x),
        unit.from_meters(y),
    )
}

/// Orientation from pitch/yaw/roll in degrees
///
/// Yaw turns about Z, pitch about Y and roll about X, composed yaw first.
pub fn euler_to_quat(pitch: f32, yaw: f32, roll: f32) -> Quat {
    let (sp, cp) = (pitch.to_radians() * 0.5).sin_cos();
    let (sy, cy) = (yaw.to_radians() * 0.5).sin_cos();
    let (sr, cr) = (roll.to_radians() * 0.5).sin_cos();

    Quat::from_xyzw(
        cr * sp * sy - sr * cp * cy,
        -cr * sp * cy - sr * cp * sy,
        cr * cp * sy - sr * sp * cy,
        cr * cp * cy + sr * sp * sy,
    )
}

/// Camera orientation: rx is pitch, ry is yaw, rz is roll
pub fn camera_rotation(camera: &CameraData) -> Quat {
    let (rx, ry, rz) = (camera.rx, camera.ry, camera.rz);
    euler_to_quat(rx, ry, rz)
}

/// Horizontal field of view in degrees for a lens and sensor width
pub fn horizontal_fov(focal_length: f32, sensor_width: f32) -> f32 {
    let throw_ratio = focal_length / sensor_width;
    (2.0 * (0.5 / throw_ratio).atan()).to_degrees()
}

/// How a lens receiver models its optics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LensModel {
    /// Takes focal length and sensor size directly
    Physical,
    /// Only takes a horizontal field of view
    FieldOfView,
}

/// Lens update pushed into a [`LensReceiver`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LensUpdate {
    Physical { focal_length: f32, sensor: Vec2 },
    FieldOfView(f32),
}

impl LensUpdate {
    pub fn for_model(model: LensModel, camera: &CameraData) -> Self {
        let (focal_length, sensor_x, sensor_y) =
            (camera.focal_length, camera.sensor_x, camera.sensor_y);
        match model {
            LensModel::Physical => LensUpdate::Physical {
                focal_length,
                sensor: Vec2::new(sensor_x, sensor_y),
            },
            LensModel::FieldOfView => LensUpdate::FieldOfView(horizontal_fov(focal_length, sensor_x)),
        }
    }
}

/// Scene-graph node taking the tracked position
pub trait LocationReceiver: Send {
    /// Name of the owning object, used to name the output stream
    fn owner_name(&self) -> Option<String>;
    fn set_location(&mut self, location: Vec3);
}

/// Scene-graph node taking the tracked orientation
pub trait RotationReceiver: Send {
    fn owner_name(&self) -> Option<String>;
    fn set_rotation(&mut self, rotation: Quat);
}

/// Camera component taking lens data
pub trait LensReceiver: Send {
    fn owner_name(&self) -> Option<String>;
    fn lens_model(&self) -> LensModel;
    fn set_lens(&mut self, lens: LensUpdate);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_location_remap() {
        let camera = CameraData {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            ..Default::default()
        };
        assert_eq!(
            camera_location(&camera, DistanceUnit::Centimeters),
            Vec3::new(300.0, 100.0, 200.0)
        );
        assert_eq!(
            camera_location(&camera, DistanceUnit::Meters),
            Vec3::new(3.0, 1.0, 2.0)
        );
    }

    #[test]
    fn test_units() {
        assert!(approx(DistanceUnit::Millimeters.from_meters(1.5), 1500.0));
        assert!(approx(DistanceUnit::Inches.from_meters(0.0254), 1.0));
        assert!(approx(DistanceUnit::Feet.from_meters(0.3048), 1.0));
    }

    #[test]
    fn test_euler_identity_and_yaw() {
        assert!(euler_to_quat(0.0, 0.0, 0.0).abs_diff_eq(Quat::IDENTITY, 1e-6));

        let yaw = euler_to_quat(0.0, 90.0, 0.0);
        assert!(yaw.abs_diff_eq(Quat::from_rotation_z(90f32.to_radians()), 1e-6));

        let roll = euler_to_quat(0.0, 0.0, 90.0);
        assert!(roll.abs_diff_eq(Quat::from_rotation_x(-90f32.to_radians()), 1e-6));
    }

    #[test]
    fn test_horizontal_fov() {
        // Focal length equal to half the sensor width gives 90 degrees
        assert!(approx(horizontal_fov(18.0, 36.0), 90.0));
    }

    #[test]
    fn test_lens_update() {
        let camera = CameraData {
            focal_length: 35.0,
            sensor_x: 36.0,
            sensor_y: 24.0,
            ..Default::default()
        };
        assert_eq!(
            LensUpdate::for_model(LensModel::Physical, &camera),
            LensUpdate::Physical {
                focal_length: 35.0,
                sensor: Vec2::new(36.0, 24.0)
            }
        );
        assert!(matches!(
            LensUpdate::for_model(LensModel::FieldOfView, &camera),
            LensUpdate::FieldOfView(fov) if fov > 54.0 && fov < 55.0
        ));
    }
}
