//! Physical actuator seam

/// Something the device can fire, such as a recoil solenoid.
pub trait Actuator {
    /// Fires once. `recoil` drives the solenoid, `press_trigger` also
    /// reports a trigger press to the host.
    fn fire(&mut self, recoil: bool, press_trigger: bool);
}

/// Actuator for devices without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopActuator;

impl Actuator for NoopActuator {
    fn fire(&mut self, _recoil: bool, _press_trigger: bool) {}
}

pub mod mock {
    use super::Actuator;
    use tracing::trace;

    /// A single call to [`Actuator::fire`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FireEvent {
        pub recoil: bool,
        pub press_trigger: bool,
    }

    /// Actuator that records every fire request.
    #[derive(Debug, Default, Clone)]
    pub struct RecordingActuator {
        events: Vec<FireEvent>,
    }

    impl RecordingActuator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> &[FireEvent] {
            &self.events
        }
    }

    impl Actuator for RecordingActuator {
        fn fire(&mut self, recoil: bool, press_trigger: bool) {
            trace!(recoil, press_trigger, "mock actuator fire");
            self.events.push(FireEvent {
                recoil,
                press_trigger,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    #[test]
    fn test_recording_actuator() {
        let mut actuator = RecordingActuator::new();
        actuator.fire(true, false);
        assert_eq!(
            actuator.events(),
            &[FireEvent {
                recoil: true,
                press_trigger: false
            }]
        );
    }
}
