/// The current state of a session's connection.
/// Derived from socket open/close events, never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No socket, or the last socket closed.
    #[default]
    Disconnected,

    /// A socket has been created and the handshake is in flight.
    Connecting,

    /// The handshake completed and the socket accepts writes.
    Connected,
}

impl ConnectionState {
    /// Whether outbound payloads can be written to the socket.
    pub fn is_open(self) -> bool {
        self == ConnectionState::Connected
    }

    /// Short status label shown by the front end.
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Connected => "Online",
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Disconnected => "Offline",
        }
    }
}
