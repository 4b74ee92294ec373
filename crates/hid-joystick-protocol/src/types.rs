//! Type definitions for the joystick capability model

use crate::DescriptorError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Top-level Generic Desktop usage announced by the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    #[default]
    Joystick,
    Gamepad,
    MultiAxis,
}

impl DeviceType {
    pub const fn usage(self) -> u8 {
        match self {
            DeviceType::Joystick => 0x04,
            DeviceType::Gamepad => 0x05,
            DeviceType::MultiAxis => 0x08,
        }
    }
}

pub const AXIS_COUNT: usize = 6;
pub const SIMULATION_CONTROL_COUNT: usize = 5;

/// Positional axis, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
    Rx,
    Ry,
    Rz,
}

impl Axis {
    pub const ALL: [Axis; AXIS_COUNT] = [Axis::X, Axis::Y, Axis::Z, Axis::Rx, Axis::Ry, Axis::Rz];

    /// Generic Desktop usage id.
    pub const fn usage(self) -> u8 {
        match self {
            Axis::X => 0x30,
            Axis::Y => 0x31,
            Axis::Z => 0x32,
            Axis::Rx => 0x33,
            Axis::Ry => 0x34,
            Axis::Rz => 0x35,
        }
    }

    pub const fn flag(self) -> AxisSet {
        match self {
            Axis::X => AxisSet::X,
            Axis::Y => AxisSet::Y,
            Axis::Z => AxisSet::Z,
            Axis::Rx => AxisSet::RX,
            Axis::Ry => AxisSet::RY,
            Axis::Rz => AxisSet::RZ,
        }
    }

    /// Position in [`Axis::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::Rx => "rx",
            Axis::Ry => "ry",
            Axis::Rz => "rz",
        }
    }
}

/// Simulation control, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationControl {
    Rudder,
    Throttle,
    Accelerator,
    Brake,
    Steering,
}

impl SimulationControl {
    pub const ALL: [SimulationControl; SIMULATION_CONTROL_COUNT] = [
        SimulationControl::Rudder,
        SimulationControl::Throttle,
        SimulationControl::Accelerator,
        SimulationControl::Brake,
        SimulationControl::Steering,
    ];

    /// Simulation Controls page usage id.
    pub const fn usage(self) -> u8 {
        match self {
            SimulationControl::Rudder => 0xBA,
            SimulationControl::Throttle => 0xBB,
            SimulationControl::Accelerator => 0xC4,
            SimulationControl::Brake => 0xC5,
            SimulationControl::Steering => 0xC8,
        }
    }

    pub const fn flag(self) -> SimulationSet {
        match self {
            SimulationControl::Rudder => SimulationSet::RUDDER,
            SimulationControl::Throttle => SimulationSet::THROTTLE,
            SimulationControl::Accelerator => SimulationSet::ACCELERATOR,
            SimulationControl::Brake => SimulationSet::BRAKE,
            SimulationControl::Steering => SimulationSet::STEERING,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            SimulationControl::Rudder => "rudder",
            SimulationControl::Throttle => "throttle",
            SimulationControl::Accelerator => "accelerator",
            SimulationControl::Brake => "brake",
            SimulationControl::Steering => "steering",
        }
    }
}

impl FromStr for DeviceType {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "joystick" => Ok(DeviceType::Joystick),
            "gamepad" => Ok(DeviceType::Gamepad),
            "multi_axis" => Ok(DeviceType::MultiAxis),
            other => Err(DescriptorError::InvalidConfig(format!(
                "unknown device type '{other}'"
            ))),
        }
    }
}

impl FromStr for Axis {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_ascii_lowercase();
        Axis::ALL
            .into_iter()
            .find(|axis| axis.name() == name)
            .ok_or_else(|| DescriptorError::InvalidConfig(format!("unknown axis '{s}'")))
    }
}

impl FromStr for SimulationControl {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_ascii_lowercase();
        SimulationControl::ALL
            .into_iter()
            .find(|control| control.name() == name)
            .ok_or_else(|| {
                DescriptorError::InvalidConfig(format!("unknown simulation control '{s}'"))
            })
    }
}

bitflags! {
    /// Positional axes present on the device.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AxisSet: u8 {
        const X  = 0b0000_0001;
        const Y  = 0b0000_0010;
        const Z  = 0b0000_0100;
        const RX = 0b0000_1000;
        const RY = 0b0001_0000;
        const RZ = 0b0010_0000;
    }
}

bitflags! {
    /// Simulation controls present on the device.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SimulationSet: u8 {
        const RUDDER      = 0b0000_0001;
        const THROTTLE    = 0b0000_0010;
        const ACCELERATOR = 0b0000_0100;
        const BRAKE       = 0b0000_1000;
        const STEERING    = 0b0001_0000;
    }
}

impl AxisSet {
    pub fn includes(&self, axis: Axis) -> bool {
        self.contains(axis.flag())
    }

    /// Included axes in report order.
    pub fn axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().filter(move |axis| self.includes(*axis))
    }

    pub fn count(&self) -> usize {
        self.bits().count_ones() as usize
    }
}

impl FromIterator<Axis> for AxisSet {
    fn from_iter<I: IntoIterator<Item = Axis>>(iter: I) -> Self {
        iter.into_iter()
            .fold(AxisSet::empty(), |set, axis| set | axis.flag())
    }
}

impl SimulationSet {
    pub fn includes(&self, control: SimulationControl) -> bool {
        self.contains(control.flag())
    }

    /// Included controls in report order.
    pub fn controls(&self) -> impl Iterator<Item = SimulationControl> + '_ {
        SimulationControl::ALL
            .into_iter()
            .filter(move |control| self.includes(*control))
    }

    pub fn count(&self) -> usize {
        self.bits().count_ones() as usize
    }
}

impl FromIterator<SimulationControl> for SimulationSet {
    fn from_iter<I: IntoIterator<Item = SimulationControl>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SimulationSet::empty(), |set, control| set | control.flag())
    }
}

/// Hat switch position.
///
/// Directions are numbered clockwise from north in 45° steps; `Released` is
/// encoded as the out-of-range value 8 so the host treats it as null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatDirection {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    #[default]
    Released,
}

/// Nibble value reported for a released hat switch.
pub const HAT_NULL: u8 = 8;

impl HatDirection {
    const DIRECTIONS: [HatDirection; 8] = [
        HatDirection::Up,
        HatDirection::UpRight,
        HatDirection::Right,
        HatDirection::DownRight,
        HatDirection::Down,
        HatDirection::DownLeft,
        HatDirection::Left,
        HatDirection::UpLeft,
    ];

    /// Converts a compass angle to a hat position.
    ///
    /// Negative angles mean released. Angles wrap at 360 and are truncated to
    /// the 45° sector they fall in.
    pub fn from_degrees(degrees: i16) -> Self {
        let Ok(degrees) = u16::try_from(degrees) else {
            return HatDirection::Released;
        };
        Self::from_nibble(u8::try_from((degrees % 360) / 45).unwrap_or(HAT_NULL))
    }

    pub fn from_nibble(nibble: u8) -> Self {
        Self::DIRECTIONS
            .get(usize::from(nibble))
            .copied()
            .unwrap_or(HatDirection::Released)
    }

    pub fn nibble(self) -> u8 {
        match self {
            HatDirection::Released => HAT_NULL,
            direction => direction as u8,
        }
    }

    pub fn to_degrees(self) -> Option<u16> {
        match self {
            HatDirection::Released => None,
            direction => Some(u16::from(direction as u8) * 45),
        }
    }
}

/// Packs up to two hat positions into one report byte.
///
/// Hat 0 lands in the low nibble. Hat 1 lands in the high nibble; when the
/// device only has one hat the high nibble is zero padding.
pub fn pack_hat_byte(hat0: HatDirection, hat1: Option<HatDirection>) -> u8 {
    let high = hat1.map_or(0, HatDirection::nibble);
    (high << 4) | (hat0.nibble() & 0x0F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() -> Result<(), DescriptorError> {
        assert_eq!("Rz".parse::<Axis>()?, Axis::Rz);
        assert_eq!("throttle".parse::<SimulationControl>()?, SimulationControl::Throttle);
        assert_eq!("multi-axis".parse::<DeviceType>()?, DeviceType::MultiAxis);
        assert!("w".parse::<Axis>().is_err());
        assert!("clutch".parse::<SimulationControl>().is_err());
        Ok(())
    }

    #[test]
    fn test_axis_usages_are_sequential() {
        for (offset, axis) in Axis::ALL.iter().enumerate() {
            assert_eq!(usize::from(axis.usage()), 0x30 + offset);
            assert_eq!(axis.index(), offset);
        }
    }

    #[test]
    fn test_axis_set_iterates_in_report_order() {
        let set: AxisSet = [Axis::Rz, Axis::X, Axis::Ry].into_iter().collect();
        assert_eq!(set.axes().collect::<Vec<_>>(), [Axis::X, Axis::Ry, Axis::Rz]);
        assert_eq!(set.count(), 3);
        assert!(set.includes(Axis::X));
        assert!(!set.includes(Axis::Y));
    }

    #[test]
    fn test_simulation_set_iterates_in_report_order() {
        let set = SimulationSet::STEERING | SimulationSet::RUDDER;
        assert_eq!(
            set.controls().collect::<Vec<_>>(),
            [SimulationControl::Rudder, SimulationControl::Steering]
        );
        assert_eq!(SimulationSet::all().count(), 5);
    }

    #[test]
    fn test_hat_from_degrees() {
        assert_eq!(HatDirection::from_degrees(0), HatDirection::Up);
        assert_eq!(HatDirection::from_degrees(44), HatDirection::Up);
        assert_eq!(HatDirection::from_degrees(90), HatDirection::Right);
        assert_eq!(HatDirection::from_degrees(315), HatDirection::UpLeft);
        assert_eq!(HatDirection::from_degrees(360), HatDirection::Up);
        assert_eq!(HatDirection::from_degrees(585), HatDirection::DownLeft);
        assert_eq!(HatDirection::from_degrees(-1), HatDirection::Released);
    }

    #[test]
    fn test_hat_nibbles() {
        assert_eq!(HatDirection::Up.nibble(), 0);
        assert_eq!(HatDirection::UpLeft.nibble(), 7);
        assert_eq!(HatDirection::Released.nibble(), HAT_NULL);
        assert_eq!(HatDirection::from_nibble(HAT_NULL), HatDirection::Released);
        assert_eq!(HatDirection::from_nibble(0x0F), HatDirection::Released);
        assert_eq!(HatDirection::DownRight.to_degrees(), Some(135));
        assert_eq!(HatDirection::Released.to_degrees(), None);
    }

    #[test]
    fn test_pack_hat_byte() {
        assert_eq!(pack_hat_byte(HatDirection::Released, None), 0x08);
        assert_eq!(pack_hat_byte(HatDirection::Right, None), 0x02);
        assert_eq!(
            pack_hat_byte(HatDirection::Right, Some(HatDirection::Released)),
            0x82
        );
        assert_eq!(
            pack_hat_byte(HatDirection::Released, Some(HatDirection::Left)),
            0x68
        );
    }

    #[test]
    fn test_device_type_usage() {
        assert_eq!(DeviceType::default().usage(), 0x04);
        assert_eq!(DeviceType::Gamepad.usage(), 0x05);
        assert_eq!(DeviceType::MultiAxis.usage(), 0x08);
    }
}
