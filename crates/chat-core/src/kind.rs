/// Message kind.
///
/// The discriminants are the integers carried in the first field of every
/// encoded line.
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Client asks to join the group.
    RegisterRequest = 1,

    /// Client asks to leave; the server also relays it to announce a
    /// departure.
    DeregisterRequest = 2,

    /// Comma-separated roster of active ids.
    ListResponse = 4,

    /// Text message, broadcast or direct.
    Chat = 6,

    /// Application-level failure report.
    Error = 7,

    /// Positive confirmation.
    Ack = 8,
}

impl MessageKind {
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(MessageKind::RegisterRequest),
            2 => Some(MessageKind::DeregisterRequest),
            4 => Some(MessageKind::ListResponse),
            6 => Some(MessageKind::Chat),
            7 => Some(MessageKind::Error),
            8 => Some(MessageKind::Ack),
            _ => None,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
