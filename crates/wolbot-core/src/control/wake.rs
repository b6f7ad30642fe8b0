// ── Wake-on-LAN ──
//
// Magic packet: six 0xFF bytes followed by the target MAC repeated
// sixteen times, sent as a single UDP datagram.

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};

use tokio::net::UdpSocket;
use tracing::{debug, warn};

use crate::model::{MAC_OCTETS, MacAddress};

const SYNC_STREAM_LEN: usize = 6;
const MAC_REPETITIONS: usize = 16;

/// Size of a magic packet in bytes.
pub const MAGIC_PACKET_LEN: usize = SYNC_STREAM_LEN + MAC_OCTETS * MAC_REPETITIONS;

/// Build the magic packet for `mac`.
pub fn magic_packet(mac: &MacAddress) -> [u8; MAGIC_PACKET_LEN] {
    let octets = mac.octets();
    let mut packet = [0xFF; MAGIC_PACKET_LEN];
    for chunk in packet[SYNC_STREAM_LEN..].chunks_exact_mut(MAC_OCTETS) {
        chunk.copy_from_slice(&octets);
    }
    packet
}

/// Send a magic packet for `mac` to `target`.
///
/// `true` only when the whole datagram was handed to the OS. The protocol
/// has no acknowledgement, so this cannot tell whether the machine woke.
pub async fn send_magic_packet(mac: &MacAddress, target: SocketAddrV4) -> bool {
    match transmit(mac, target).await {
        Ok(sent) if sent == MAGIC_PACKET_LEN => {
            debug!(%mac, %target, "magic packet sent");
            true
        }
        Ok(sent) => {
            warn!(%mac, %target, sent, "magic packet truncated");
            false
        }
        Err(err) => {
            warn!(%mac, %target, error = %err, "wake-on-LAN transmission failed");
            false
        }
    }
}

async fn transmit(mac: &MacAddress, target: SocketAddrV4) -> io::Result<usize> {
    let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)).await?;
    socket.set_broadcast(true)?;
    socket.send_to(&magic_packet(mac), target).await
}
