//! Chat message records

/// A single chat message, positioned on the overlay clock
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChatMessage {
    /// Dense identity assigned by input order
    pub id: u32,
    /// Arrival time in seconds
    pub time: f64,
    /// Sender display name (may be empty)
    pub name: String,
    /// Message body (may be empty)
    pub body: String,
}

impl ChatMessage {
    /// Creates a new chat message
    pub fn new(id: u32, time: f64, name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            time,
            name: name.into(),
            body: body.into(),
        }
    }

    /// Returns true when the message has nothing to display
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.body.is_empty()
    }

    /// Time at which the message leaves the stack if it is never evicted
    pub fn expiry(&self, hold: f64) -> f64 {
        self.time + hold
    }
}
