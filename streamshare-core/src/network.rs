//! LAN address discovery

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

use tracing::debug;

/// Returns the host's LAN-facing IPv4 address, or loopback if there is none.
///
/// Connecting a UDP socket only asks the kernel for a route; no packet is
/// sent, so this works on networks without internet access as long as a
/// default route exists.
pub fn discover_lan_address() -> IpAddr {
    match routed_local_address() {
        Some(ip) => ip,
        None => {
            debug!("No routable LAN address found, falling back to loopback");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}

fn routed_local_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))).ok()?;
    // Any non-local address works, nothing is transmitted.
    socket
        .connect(SocketAddr::from((Ipv4Addr::new(10, 254, 254, 254), 1)))
        .ok()?;

    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_loopback() && !ip.is_unspecified()).then_some(ip)
}
