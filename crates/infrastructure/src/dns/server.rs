use super::wire;
use crate::config_watch::ConfigWatcher;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use switchyard_dns_application::{Resolution, ResolveQueryUseCase};
use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

const RECV_BUF_SIZE: usize = 4096;

/// The UDP request server. The accept loop only ever does `recv_from`;
/// each datagram is handled on its own spawned task, so upstream waits
/// never stall the socket.
pub struct DnsServer {
    socket: Arc<UdpSocket>,
    resolver: Arc<ResolveQueryUseCase>,
    watcher: Arc<ConfigWatcher>,
}

impl DnsServer {
    pub async fn bind(
        addr: SocketAddr,
        resolver: Arc<ResolveQueryUseCase>,
        watcher: Arc<ConfigWatcher>,
    ) -> io::Result<Self> {
        let socket = create_udp_socket(addr)?;
        info!(bind_address = %socket.local_addr()?, "DNS server listening");
        Ok(Self {
            socket: Arc::new(socket),
            resolver,
            watcher,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receives until the future is dropped (shutdown is a `select!` in the
    /// caller). In-flight handler tasks run to completion on the runtime.
    pub async fn run(&self) {
        let mut recv_buf = [0u8; RECV_BUF_SIZE];
        loop {
            let (len, peer) = match self.socket.recv_from(&mut recv_buf).await {
                Ok(received) => received,
                Err(e) => {
                    error!(error = %e, "UDP recv error");
                    continue;
                }
            };

            let datagram = recv_buf[..len].to_vec();
            let socket = self.socket.clone();
            let resolver = self.resolver.clone();
            let watcher = self.watcher.clone();

            tokio::spawn(async move {
                if let Some(response) = handle_datagram(&datagram, &resolver, &watcher).await {
                    if let Err(e) = socket.send_to(&response, peer).await {
                        warn!(peer = %peer, error = %e, "Failed to send response");
                    }
                }
            });
        }
    }
}

/// One datagram, start to finish: freshen the rule snapshot, decode, run
/// the resolution engine. Returns the bytes to send back, or `None` for
/// the drop cases.
///
/// Malformed-datagram policy: if the 12-byte header was readable the
/// client gets a SERVFAIL echoing its id; anything shorter is dropped.
async fn handle_datagram(
    datagram: &[u8],
    resolver: &ResolveQueryUseCase,
    watcher: &ConfigWatcher,
) -> Option<Vec<u8>> {
    watcher.reload_if_stale().await;
    let table = watcher.current();

    let query = match wire::decode_query(datagram) {
        Ok(query) => query,
        Err(error) => {
            return match wire::peek_id(datagram) {
                Some(id) => {
                    warn!(id, error = %error, "Malformed query, answering SERVFAIL");
                    Some(wire::encode_servfail_header(id))
                }
                None => {
                    debug!(len = datagram.len(), error = %error, "Dropping unreadable datagram");
                    None
                }
            };
        }
    };

    match resolver.execute(&query, datagram, &table).await {
        Resolution::Answered(response) => Some(wire::encode_response(&response)),
        Resolution::Relayed(bytes) => Some(bytes),
    }
}

fn create_udp_socket(addr: SocketAddr) -> io::Result<UdpSocket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}
