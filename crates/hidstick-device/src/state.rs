//! Live controller state

use hidstick_calibration::AxisRange;
use hidstick_hid_joystick_protocol::{
    AXIS_COUNT, Axis, HatDirection, MAX_HAT_SWITCHES, SIMULATION_CONTROL_COUNT, SimulationControl,
};

/// Values the report serializer reads on every send.
///
/// Axis and simulation values are raw physical readings; they are clamped
/// and rescaled against the matching range only when a report is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeState {
    pub(crate) axes: [i16; AXIS_COUNT],
    pub(crate) axis_ranges: [AxisRange; AXIS_COUNT],
    pub(crate) simulation: [i16; SIMULATION_CONTROL_COUNT],
    pub(crate) simulation_ranges: [AxisRange; SIMULATION_CONTROL_COUNT],
    pub(crate) hats: [HatDirection; MAX_HAT_SWITCHES as usize],
    pub(crate) buttons: Vec<u8>,
}

impl RuntimeState {
    /// All values zero, hats released, buttons up, default ranges.
    pub fn new(button_bytes: usize) -> Self {
        Self {
            axes: [0; AXIS_COUNT],
            axis_ranges: [AxisRange::DEFAULT; AXIS_COUNT],
            simulation: [0; SIMULATION_CONTROL_COUNT],
            simulation_ranges: [AxisRange::DEFAULT; SIMULATION_CONTROL_COUNT],
            hats: [HatDirection::Released; MAX_HAT_SWITCHES as usize],
            buttons: vec![0; button_bytes],
        }
    }

    pub fn axis(&self, axis: Axis) -> i16 {
        self.axes.get(axis.index()).copied().unwrap_or_default()
    }

    pub fn axis_range(&self, axis: Axis) -> AxisRange {
        self.axis_ranges
            .get(axis.index())
            .copied()
            .unwrap_or_default()
    }

    pub fn simulation(&self, control: SimulationControl) -> i16 {
        self.simulation
            .get(control.index())
            .copied()
            .unwrap_or_default()
    }

    pub fn simulation_range(&self, control: SimulationControl) -> AxisRange {
        self.simulation_ranges
            .get(control.index())
            .copied()
            .unwrap_or_default()
    }

    pub fn hat(&self, index: usize) -> HatDirection {
        self.hats.get(index).copied().unwrap_or_default()
    }

    /// Button bit array; bit `n % 8` of byte `n / 8` is button `n`.
    pub fn buttons(&self) -> &[u8] {
        &self.buttons
    }

    pub fn button(&self, index: usize) -> bool {
        self.buttons
            .get(index / 8)
            .is_some_and(|byte| byte & (1 << (index % 8)) != 0)
    }

    /// Normalised report value of a positional axis.
    pub fn normalized_axis(&self, axis: Axis) -> i16 {
        self.axis_range(axis).normalize(self.axis(axis))
    }

    /// Normalised report value of a simulation control.
    pub fn normalized_simulation(&self, control: SimulationControl) -> i16 {
        self.simulation_range(control)
            .normalize(self.simulation(control))
    }

    pub(crate) fn set_button_bit(&mut self, index: usize, pressed: bool) -> bool {
        let Some(byte) = self.buttons.get_mut(index / 8) else {
            return false;
        };
        let mask = 1 << (index % 8);
        if pressed {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        true
    }
}
