//! The joystick controller

use crate::interpreter::CommandInterpreter;
use crate::{DeviceError, DeviceResult, RuntimeState};
use hidstick_calibration::{AxisRange, LOGICAL_MAXIMUM, LOGICAL_MINIMUM, map_range_i16};
use hidstick_hid_common::{HidTransport, ReportWriter};
use hidstick_hid_joystick_protocol::{
    Axis, CapabilityConfig, FieldKind, HatDirection, ReportLayout, SimulationControl,
    pack_hat_byte, synthesize,
};
use hidstick_settings::{
    DEFAULT_IDENTITY, DEFAULT_VERSION, SETTINGS_PAYLOAD_LEN, Settings, SettingsPayload,
    SettingsStore, StorageMedium,
};
use tracing::{debug, info, warn};

/// The PID sub-descriptor follows the application descriptor.
const PID_DESCRIPTOR_FIRST: bool = false;

const DEFAULT_MAX_HEALTH: i16 = 1000;

/// Game-facing counters kept on the device for host software.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Gameplay {
    ammo_count: i16,
    health: i16,
    max_health: i16,
    use_ammo_count: bool,
}

impl Default for Gameplay {
    fn default() -> Self {
        Self {
            ammo_count: 0,
            health: 0,
            max_health: DEFAULT_MAX_HEALTH,
            use_ammo_count: false,
        }
    }
}

/// One HID joystick instance.
///
/// The descriptor is fixed at construction. Input reports are built from
/// [`RuntimeState`] on demand, or after every setter once
/// [`Joystick::begin`] enabled auto-send.
///
/// # Examples
///
/// ```
/// use hidstick_device::Joystick;
/// use hidstick_hid_common::mock::MockTransport;
/// use hidstick_hid_joystick_protocol::{Axis, AxisSet, CapabilityConfig};
/// use hidstick_settings::MemoryStorage;
///
/// let config = CapabilityConfig::builder()
///     .buttons(8)
///     .axes(AxisSet::X | AxisSet::Y)
///     .build()?;
/// let mut joystick = Joystick::new(config, MockTransport::new(), MemoryStorage::default())?;
///
/// joystick.begin(true)?;
/// joystick.press_button(0)?;
/// joystick.set_axis(Axis::X, 1023)?;
///
/// let last = joystick.transport().last_report(1).map(|r| r.data.clone());
/// assert_eq!(last, Some(vec![0x01, 0xFF, 0x7F, 0x01, 0x80]));
/// # Ok::<(), hidstick_device::DeviceError>(())
/// ```
#[derive(Debug)]
pub struct Joystick<T, S> {
    config: CapabilityConfig,
    layout: ReportLayout,
    state: RuntimeState,
    transport: T,
    store: SettingsStore<S>,
    auto_send: bool,
    auto_recoil: bool,
    trigger_repeat_rate: u16,
    trigger_hold_time: u16,
    unique_id: u16,
    gameplay: Gameplay,
    pub(crate) commands: CommandInterpreter,
}

impl<T: HidTransport, S: StorageMedium> Joystick<T, S> {
    /// Creates the device, loads persisted settings and registers the
    /// report descriptor with `transport`.
    ///
    /// Settings that cannot be read fall back to defaults with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Descriptor`] if the descriptor cannot be
    /// synthesised and [`DeviceError::Hid`] if registration fails.
    pub fn new(config: CapabilityConfig, transport: T, medium: S) -> DeviceResult<Self> {
        let descriptor = synthesize(&config)?;

        let store = SettingsStore::new(medium);
        let settings = store.load(false).unwrap_or_else(|e| {
            warn!(error = %e, "failed to read settings, using defaults");
            Settings::defaults()
        });

        let layout = ReportLayout::new(&config);
        let mut joystick = Self {
            config,
            state: RuntimeState::new(config.button_bytes()),
            layout,
            transport,
            store,
            auto_send: false,
            auto_recoil: false,
            trigger_repeat_rate: 0,
            trigger_hold_time: 0,
            unique_id: 0,
            gameplay: Gameplay::default(),
            commands: CommandInterpreter::new(),
        };
        joystick.apply_settings(settings);

        let descriptor_len = descriptor.len();
        let node = descriptor.into_node(
            joystick.transport.pid_report_descriptor(),
            PID_DESCRIPTOR_FIRST,
        );
        joystick.transport.register_descriptor(node)?;
        info!(
            report_id = config.report_id(),
            descriptor_len,
            report_size = joystick.layout.report_size(),
            "registered joystick descriptor"
        );

        Ok(joystick)
    }

    /// Sets the auto-send policy and sends the initial report.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from [`Joystick::send_state`].
    pub fn begin(&mut self, auto_send: bool) -> DeviceResult<()> {
        self.auto_send = auto_send;
        self.send_state()
    }

    pub fn config(&self) -> &CapabilityConfig {
        &self.config
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn medium(&self) -> &S {
        self.store.medium()
    }

    pub fn medium_mut(&mut self) -> &mut S {
        self.store.medium_mut()
    }

    pub fn auto_send(&self) -> bool {
        self.auto_send
    }

    /// Turning auto-send off lets a caller change several fields and then
    /// publish them with one [`Joystick::send_state`].
    pub fn set_auto_send(&mut self, auto_send: bool) {
        self.auto_send = auto_send;
    }

    fn maybe_send(&mut self) -> DeviceResult<()> {
        if self.auto_send {
            self.send_state()?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates transport failures when auto-send is on.
    pub fn set_axis(&mut self, axis: Axis, value: i16) -> DeviceResult<()> {
        if let Some(slot) = self.state.axes.get_mut(axis.index()) {
            *slot = value;
        }
        self.maybe_send()
    }

    pub fn set_axis_range(&mut self, axis: Axis, range: AxisRange) {
        if let Some(slot) = self.state.axis_ranges.get_mut(axis.index()) {
            *slot = range;
        }
    }

    /// # Errors
    ///
    /// Propagates transport failures when auto-send is on.
    pub fn set_simulation(&mut self, control: SimulationControl, value: i16) -> DeviceResult<()> {
        if let Some(slot) = self.state.simulation.get_mut(control.index()) {
            *slot = value;
        }
        self.maybe_send()
    }

    pub fn set_simulation_range(&mut self, control: SimulationControl, range: AxisRange) {
        if let Some(slot) = self.state.simulation_ranges.get_mut(control.index()) {
            *slot = range;
        }
    }

    /// Sets one button. Indices at or beyond the configured button count are
    /// ignored without sending.
    ///
    /// # Errors
    ///
    /// Propagates transport failures when auto-send is on.
    pub fn set_button(&mut self, index: usize, pressed: bool) -> DeviceResult<()> {
        if index >= usize::from(self.config.button_count()) {
            debug!(index, "ignoring out-of-range button");
            return Ok(());
        }
        self.state.set_button_bit(index, pressed);
        self.maybe_send()
    }

    /// # Errors
    ///
    /// See [`Joystick::set_button`].
    pub fn press_button(&mut self, index: usize) -> DeviceResult<()> {
        self.set_button(index, true)
    }

    /// # Errors
    ///
    /// See [`Joystick::set_button`].
    pub fn release_button(&mut self, index: usize) -> DeviceResult<()> {
        self.set_button(index, false)
    }

    /// Sets a hat switch from a compass angle; negative means released.
    ///
    /// # Errors
    ///
    /// Propagates transport failures when auto-send is on.
    pub fn set_hat_switch(&mut self, index: usize, degrees: i16) -> DeviceResult<()> {
        self.set_hat_direction(index, HatDirection::from_degrees(degrees))
    }

    /// Indices at or beyond the configured hat count are ignored.
    ///
    /// # Errors
    ///
    /// Propagates transport failures when auto-send is on.
    pub fn set_hat_direction(&mut self, index: usize, direction: HatDirection) -> DeviceResult<()> {
        if index >= usize::from(self.config.hat_switch_count()) {
            debug!(index, "ignoring out-of-range hat switch");
            return Ok(());
        }
        if let Some(slot) = self.state.hats.get_mut(index) {
            *slot = direction;
        }
        self.maybe_send()
    }

    /// Serialises the current state into an input report body.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::ReportSizeMismatch`] if the written length
    /// differs from the layout size.
    pub fn build_report(&self) -> DeviceResult<Vec<u8>> {
        let expected = self.layout.report_size();
        let mut writer = ReportWriter::with_capacity(expected);

        for field in self.layout.fields() {
            match field.kind {
                FieldKind::Buttons => {
                    writer.write_bytes(self.state.buttons())?;
                }
                FieldKind::HatSwitches => {
                    let second = (self.config.hat_switch_count() > 1).then(|| self.state.hat(1));
                    writer.write_u8(pack_hat_byte(self.state.hat(0), second))?;
                }
                FieldKind::Axis(axis) => {
                    writer.write_i16_le(self.state.normalized_axis(axis))?;
                }
                FieldKind::Simulation(control) => {
                    writer.write_i16_le(self.state.normalized_simulation(control))?;
                }
            }
        }

        if writer.len() != expected {
            return Err(DeviceError::ReportSizeMismatch {
                expected,
                actual: writer.len(),
            });
        }
        Ok(writer.into_inner())
    }

    /// Sends one input report on the configured report id.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::ReportSizeMismatch`] from
    /// [`Joystick::build_report`] or [`DeviceError::Hid`] from the transport.
    pub fn send_state(&mut self) -> DeviceResult<()> {
        let report = self.build_report()?;
        let report_id = self.config.report_id();
        self.transport.send_report(report_id, &report)?;
        debug!(report_id, len = report.len(), "sent input report");
        Ok(())
    }

    pub fn auto_recoil(&self) -> bool {
        self.auto_recoil
    }

    pub fn set_auto_recoil(&mut self, enabled: bool) {
        self.auto_recoil = enabled;
    }

    pub fn trigger_repeat_rate(&self) -> u16 {
        self.trigger_repeat_rate
    }

    pub fn set_trigger_repeat_rate(&mut self, rate: u16) {
        self.trigger_repeat_rate = rate;
    }

    pub fn trigger_hold_time(&self) -> u16 {
        self.trigger_hold_time
    }

    pub fn set_trigger_hold_time(&mut self, hold: u16) {
        self.trigger_hold_time = hold;
    }

    pub fn unique_id(&self) -> u16 {
        self.unique_id
    }

    pub fn set_unique_id(&mut self, id: u16) {
        self.unique_id = id;
    }

    pub fn ammo_count(&self) -> i16 {
        self.gameplay.ammo_count
    }

    /// Negative counts are stored as zero.
    pub fn set_ammo_count(&mut self, count: i16) {
        self.gameplay.ammo_count = count.max(0);
    }

    pub fn health(&self) -> i16 {
        self.gameplay.health
    }

    pub fn set_health(&mut self, health: i16) {
        self.gameplay.health = health;
    }

    /// Never less than 1, so it is always safe to divide by.
    pub fn max_health(&self) -> i16 {
        self.gameplay.max_health.max(1)
    }

    pub fn set_max_health(&mut self, max_health: i16) {
        self.gameplay.max_health = max_health;
    }

    pub fn use_ammo_count(&self) -> bool {
        self.gameplay.use_ammo_count
    }

    pub fn set_use_ammo_count(&mut self, enabled: bool) {
        self.gameplay.use_ammo_count = enabled;
    }

    /// Always true unless ammo counting is enabled and the count is zero.
    pub fn has_ammo(&self) -> bool {
        !self.gameplay.use_ammo_count || self.gameplay.ammo_count > 0
    }

    /// Current persisted-settings view, with calibration in raw units.
    ///
    /// The identity and version tags are always this firmware's own, never
    /// the ones read back from storage.
    pub fn settings_snapshot(&self) -> Settings {
        Settings {
            identity: DEFAULT_IDENTITY.to_string(),
            version: DEFAULT_VERSION.to_string(),
            x_range: self.state.axis_range(Axis::X),
            y_range: self.state.axis_range(Axis::Y),
            auto_recoil: self.auto_recoil,
            trigger_repeat_rate: self.trigger_repeat_rate,
            trigger_hold_time: self.trigger_hold_time,
        }
    }

    /// Settings snapshot as reported to a configuration tool.
    ///
    /// Calibration bounds are mapped from the factory physical range onto
    /// the logical report range, saturating at the `i16` limits, so the tool
    /// can compare them with live axis values.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Settings`] if the identity or version tag does
    /// not fit its field.
    pub fn snapshot_payload(&self) -> DeviceResult<[u8; SETTINGS_PAYLOAD_LEN]> {
        let settings = self.settings_snapshot();
        let mut payload = SettingsPayload::from(&settings);
        for bound in &mut payload.bounds {
            *bound = map_range_i16(
                *bound,
                AxisRange::DEFAULT.minimum(),
                AxisRange::DEFAULT.maximum(),
                LOGICAL_MINIMUM,
                LOGICAL_MAXIMUM,
            )?;
        }
        Ok(payload.encode()?)
    }

    /// Replaces calibration and behaviour with `settings`. Stored identity
    /// and version tags are ignored.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.set_axis_range(Axis::X, settings.x_range);
        self.set_axis_range(Axis::Y, settings.y_range);
        self.auto_recoil = settings.auto_recoil;
        self.trigger_repeat_rate = settings.trigger_repeat_rate;
        self.trigger_hold_time = settings.trigger_hold_time;
    }

    /// Persists the current settings.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Settings`] if encoding or the medium fails.
    pub fn save_settings(&mut self) -> DeviceResult<()> {
        let settings = self.settings_snapshot();
        self.store.save(&settings)?;
        Ok(())
    }

    /// Reloads settings from storage; a bad record yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Settings`] if the medium cannot be read, in
    /// which case the current settings are kept.
    pub fn load_settings(&mut self) -> DeviceResult<()> {
        let settings = self.store.load(false)?;
        self.apply_settings(settings);
        Ok(())
    }

    /// Applies the compiled-in defaults without persisting them.
    pub fn load_default_settings(&mut self) {
        self.apply_settings(Settings::defaults());
    }
}
