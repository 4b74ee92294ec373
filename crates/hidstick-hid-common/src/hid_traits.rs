//! HID transport traits

use crate::HidCommonResult;

/// A report descriptor handed to the transport for registration.
///
/// The transport takes ownership: once registered, the bytes stay fixed for
/// the lifetime of the device instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorNode {
    /// Application report descriptor synthesised for this device.
    pub descriptor: Vec<u8>,
    /// Vendor PID sub-descriptor supplied by the transport itself.
    pub pid_descriptor: Vec<u8>,
    /// Emit the PID sub-descriptor ahead of the application descriptor.
    pub pid_first: bool,
}

impl DescriptorNode {
    pub fn total_len(&self) -> usize {
        self.descriptor.len() + self.pid_descriptor.len()
    }
}

/// The USB stack as seen by the device core.
///
/// Implementations are expected to be non-blocking or bounded-latency; the
/// core calls them from its single control path.
pub trait HidTransport {
    /// Vendor-specific PID report sub-descriptor to register alongside the
    /// application descriptor.
    fn pid_report_descriptor(&self) -> Vec<u8>;

    /// Registers a descriptor. Called exactly once per device instance.
    fn register_descriptor(&mut self, node: DescriptorNode) -> HidCommonResult<()>;

    /// Sends one report tagged with `report_id`, returning the bytes written.
    fn send_report(&mut self, report_id: u8, data: &[u8]) -> HidCommonResult<usize>;

    /// Returns the next inbound command report, if one has arrived.
    fn receive_command(&mut self) -> HidCommonResult<Option<Vec<u8>>>;
}

pub mod mock {
    use super::*;
    use crate::HidCommonError;
    use std::collections::VecDeque;
    use tracing::trace;

    /// A report captured by [`MockTransport::send_report`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SentReport {
        pub report_id: u8,
        pub data: Vec<u8>,
    }

    /// In-memory transport that records everything the device sends.
    #[derive(Debug, Default)]
    pub struct MockTransport {
        pid_descriptor: Vec<u8>,
        registered: Vec<DescriptorNode>,
        sent: Vec<SentReport>,
        inbound: VecDeque<Vec<u8>>,
        disconnected: bool,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_pid_descriptor(pid_descriptor: impl Into<Vec<u8>>) -> Self {
            Self {
                pid_descriptor: pid_descriptor.into(),
                ..Self::default()
            }
        }

        pub fn queue_command(&mut self, data: impl Into<Vec<u8>>) {
            self.inbound.push_back(data.into());
        }

        pub fn registered(&self) -> &[DescriptorNode] {
            &self.registered
        }

        pub fn sent_reports(&self) -> &[SentReport] {
            &self.sent
        }

        pub fn reports_with_id(&self, report_id: u8) -> Vec<&SentReport> {
            self.sent
                .iter()
                .filter(|report| report.report_id == report_id)
                .collect()
        }

        pub fn last_report(&self, report_id: u8) -> Option<&SentReport> {
            self.sent
                .iter()
                .rev()
                .find(|report| report.report_id == report_id)
        }

        pub fn clear_sent(&mut self) {
            self.sent.clear();
        }

        pub fn disconnect(&mut self) {
            self.disconnected = true;
        }

        pub fn reconnect(&mut self) {
            self.disconnected = false;
        }
    }

    impl HidTransport for MockTransport {
        fn pid_report_descriptor(&self) -> Vec<u8> {
            self.pid_descriptor.clone()
        }

        fn register_descriptor(&mut self, node: DescriptorNode) -> HidCommonResult<()> {
            self.registered.push(node);
            Ok(())
        }

        fn send_report(&mut self, report_id: u8, data: &[u8]) -> HidCommonResult<usize> {
            if self.disconnected {
                return Err(HidCommonError::Disconnected);
            }
            trace!(report_id, len = data.len(), "mock transport send");
            self.sent.push(SentReport {
                report_id,
                data: data.to_vec(),
            });
            Ok(data.len())
        }

        fn receive_command(&mut self) -> HidCommonResult<Option<Vec<u8>>> {
            if self.disconnected {
                return Err(HidCommonError::Disconnected);
            }
            Ok(self.inbound.pop_front())
        }
    }
}
