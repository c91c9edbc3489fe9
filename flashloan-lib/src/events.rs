use borsh::{BorshDeserialize, BorshSerialize};
use flashloan_interface::EventLogEntry;
use tracing::info;

/// Append-only diagnostics of one flash loan call, in emission order.
#[derive(Clone, Debug, Default, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub struct EventLog(Vec<EventLogEntry>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, message: &str, value: u128) {
        info!(value, "{}", message);
        self.0.push(EventLogEntry {
            message: message.to_owned(),
            value,
        });
    }

    pub fn entries(&self) -> &[EventLogEntry] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventLogEntry> {
        self.0.iter()
    }

    /// Index of the first entry equal to (`message`, `value`)
    pub fn position(&self, message: &str, value: u128) -> Option<usize> {
        self.0
            .iter()
            .position(|e| e.message == message && e.value == value)
    }

    pub fn contains_message(&self, message: &str) -> bool {
        self.0.iter().any(|e| e.message == message)
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a EventLogEntry;
    type IntoIter = std::slice::Iter<'a, EventLogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
