use std::net::{IpAddr, SocketAddr};

/// Connection information for an authentication request.
///
/// Supplied by the host; the impersonation backend records the client
/// address in the audit entry when one is available.
#[derive(Debug, Clone, Default)]
pub struct ConnectionInfo {
    /// Address of the connecting client, as reported by the host ("ip" or "ip:port")
    pub remote_addr: Option<String>,
}

impl ConnectionInfo {
    /// Create a new ConnectionInfo from a remote address string.
    pub fn new(remote_addr: Option<String>) -> Self {
        Self { remote_addr }
    }

    /// Parse the remote address into an IP, ignoring any port.
    ///
    /// Returns `None` when no address was supplied or it cannot be parsed.
    pub fn ip_address(&self) -> Option<IpAddr> {
        let addr = self.remote_addr.as_deref()?.trim();
        addr.parse::<IpAddr>()
            .ok()
            .or_else(|| addr.parse::<SocketAddr>().ok().map(|socket| socket.ip()))
    }
}
