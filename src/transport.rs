use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use log::debug;

use crate::dns::question::Question;
use crate::trace::Tracer;

/// A UDP response larger than this arrives truncated; there is no TCP
/// fallback here.
pub const MAX_MESSAGE_SIZE: usize = 512;

pub const DNS_PORT: u16 = 53;

/// How long one receive waits before the query is sent again.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_millis(5000);

/// How often a query goes out before the exchange is abandoned.
pub const MAX_TRANSMISSIONS: usize = 3;

/// One blocking query/response exchange against a nameserver. Implemented
/// over UDP for real lookups and over scripted byte sequences in tests.
pub trait Transport {
    /// Sends the encoded query and waits for the datagram that answers it,
    /// retransmitting on timeout. `None` means the exchange failed in some
    /// way the resolver treats as "no answer".
    fn exchange(
        &mut self,
        server: Ipv4Addr,
        question: &Question,
        payload: &[u8],
        txid: u16,
        tracer: &dyn Tracer,
    ) -> Option<Vec<u8>>;
}

/// A datagram answers the exchange iff it carries the transaction id of the
/// query and has the QR bit set. Anything else on the socket is noise.
pub fn is_matching_reply(datagram: &[u8], txid: u16) -> bool {
    datagram.len() >= 12 && datagram[0..2] == txid.to_be_bytes() && datagram[2] & 0x80 != 0
}

/// The real transport: one socket on an ephemeral port, held for the
/// lifetime of the resolver and closed when it is dropped.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    pub fn bind() -> std::io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_read_timeout(Some(RECEIVE_TIMEOUT))?;
        Ok(Self { socket })
    }
}

impl Transport for UdpTransport {
    fn exchange(
        &mut self,
        server: Ipv4Addr,
        question: &Question,
        payload: &[u8],
        txid: u16,
        tracer: &dyn Tracer,
    ) -> Option<Vec<u8>> {
        let target = SocketAddrV4::new(server, DNS_PORT);
        for attempt in 1..=MAX_TRANSMISSIONS {
            tracer.query_to_send(question, server, txid);
            debug!(
                "sending query {:#06x} to {} (attempt {}/{})",
                txid, target, attempt, MAX_TRANSMISSIONS
            );
            if self.socket.send_to(payload, target).is_err() {
                return None;
            }

            loop {
                let mut buffer = [0u8; MAX_MESSAGE_SIZE];
                match self.socket.recv(&mut buffer) {
                    Ok(received) => {
                        let datagram = &buffer[..received];
                        if is_matching_reply(datagram, txid) {
                            return Some(datagram.to_vec());
                        }
                        debug!("ignoring datagram that does not answer {:#06x}", txid);
                    }
                    Err(error)
                        if matches!(error.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                    {
                        debug!("query {:#06x} timed out", txid);
                        break;
                    }
                    Err(error) => {
                        debug!("socket error while waiting for {:#06x}: {}", txid, error);
                        return None;
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::is_matching_reply;

    #[test]
    fn reply_matching() {
        let mut datagram = vec![0x12, 0x34, 0x80, 0x00];
        datagram.resize(12, 0);

        assert!(is_matching_reply(&datagram, 0x1234));

        // wrong id
        assert!(!is_matching_reply(&datagram, 0x1235));

        // QR bit clear: that is a query, not a response
        datagram[2] = 0x00;
        assert!(!is_matching_reply(&datagram, 0x1234));

        // too short to even hold a header
        assert!(!is_matching_reply(&[0x12, 0x34, 0x80], 0x1234));
    }
}
