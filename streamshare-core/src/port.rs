//! Listening port allocation
//!
//! Probes consecutive ports starting at a base until one binds. The probe
//! is bounded: after `max_attempts` ports (or at the top of the port range)
//! allocation fails with [`PortError::Exhausted`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tokio::net::TcpListener;
use tracing::{debug, info};

/// Errors from port allocation.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("No free port after {attempts} attempts starting at {start}")]
    Exhausted { start: u16, attempts: u16 },

    #[error("Failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

/// Finds a free port by transient bind-probe on all interfaces.
///
/// The probe socket is released before returning, so another process may
/// claim the port before the caller binds it. Use [`bind_available_port`]
/// when the listener itself is wanted.
///
/// # Errors
/// - `PortError::Exhausted` - Every probed port was in use
/// - `PortError::Bind` - A bind failed for a reason other than `AddrInUse`
pub fn find_available_port(start_port: u16, max_attempts: u16) -> Result<u16, PortError> {
    let ip = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

    for port in candidate_ports(start_port, max_attempts) {
        match std::net::TcpListener::bind(SocketAddr::new(ip, port)) {
            Ok(listener) => {
                let bound = listener
                    .local_addr()
                    .map_err(|source| PortError::Bind { port, source })?;
                return Ok(bound.port());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                debug!(port, "Port in use, probing next");
            }
            Err(source) => return Err(PortError::Bind { port, source }),
        }
    }

    Err(PortError::Exhausted {
        start: start_port,
        attempts: max_attempts,
    })
}

/// Binds a listener on the first free port at or above `start_port`.
///
/// Same probing policy as [`find_available_port`], but the successful
/// socket is kept and returned.
///
/// # Errors
/// - `PortError::Exhausted` - Every probed port was in use
/// - `PortError::Bind` - A bind failed for a reason other than `AddrInUse`
pub async fn bind_available_port(
    ip: IpAddr,
    start_port: u16,
    max_attempts: u16,
) -> Result<TcpListener, PortError> {
    for port in candidate_ports(start_port, max_attempts) {
        match TcpListener::bind(SocketAddr::new(ip, port)).await {
            Ok(listener) => {
                if port != start_port {
                    info!(
                        requested = start_port,
                        bound = port,
                        "Base port busy, using fallback"
                    );
                }
                return Ok(listener);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                debug!(port, "Port in use, probing next");
            }
            Err(source) => return Err(PortError::Bind { port, source }),
        }
    }

    Err(PortError::Exhausted {
        start: start_port,
        attempts: max_attempts,
    })
}

fn candidate_ports(start_port: u16, max_attempts: u16) -> impl Iterator<Item = u16> {
    (start_port..=u16::MAX).take(usize::from(max_attempts))
}
