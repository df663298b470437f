//! RSP packet framing: `$<payload>#<hex-checksum>`. The bytes `#$}*` are
//! escaped in the payload as `}` followed by the byte XOR'd with `0x20`; the
//! checksum covers both bytes of an escaped pair, matching what a real `gdb`
//! sends and expects back.

const ESCAPE: u8 = b'}';

fn needs_escape(b: u8) -> bool {
    matches!(b, b'#' | b'$' | b'}' | b'*')
}

/// Low byte of the arithmetic sum of `payload`'s bytes (post-escaping, as
/// sent on the wire).
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Frame `payload` as a complete `$...#cc` packet, escaping as needed.
pub fn encode(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 4);
    out.push(b'$');
    let mut body = Vec::with_capacity(payload.len());
    for &b in payload {
        if needs_escape(b) {
            body.push(ESCAPE);
            body.push(b ^ 0x20);
        } else {
            body.push(b);
        }
    }
    let csum = checksum(&body);
    out.extend_from_slice(&body);
    out.push(b'#');
    out.extend_from_slice(format!("{csum:02x}").as_bytes());
    out
}

/// Outcome of feeding one byte to a [`Receiver`].
#[derive(Debug)]
pub enum Event {
    /// No complete packet yet.
    Pending,
    /// A complete, checksum-valid packet. Caller should ack with `+` and dispatch.
    Packet(Vec<u8>),
    /// A complete packet whose checksum didn't match. Caller should send `-`.
    BadChecksum,
    /// The peer sent the out-of-band interrupt byte (`0x03`).
    Interrupt,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum State {
    WaitStart,
    WaitCsum,
    Escape,
    Csum1,
    Csum2,
}

/// Incremental RSP packet receiver, fed one byte at a time from a TCP stream.
/// State machine: `WaitStart -> WaitCsum -> {Escape, Csum1} -> Csum2 -> WaitStart`.
pub struct Receiver {
    state: State,
    buf: Vec<u8>,
    csum: u8,
    csum_hi: u8,
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Receiver {
    pub fn new() -> Self {
        Self {
            state: State::WaitStart,
            buf: Vec::new(),
            csum: 0,
            csum_hi: 0,
        }
    }

    pub fn feed(&mut self, byte: u8) -> Event {
        match self.state {
            State::WaitStart => {
                if byte == 0x03 {
                    return Event::Interrupt;
                }
                if byte == b'$' {
                    self.buf.clear();
                    self.csum = 0;
                    self.state = State::WaitCsum;
                }
                Event::Pending
            }
            State::WaitCsum => {
                if byte == b'}' {
                    self.csum = self.csum.wrapping_add(byte);
                    self.state = State::Escape;
                } else if byte == b'#' {
                    self.state = State::Csum1;
                } else {
                    self.buf.push(byte);
                    self.csum = self.csum.wrapping_add(byte);
                }
                Event::Pending
            }
            State::Escape => {
                self.csum = self.csum.wrapping_add(byte);
                self.buf.push(byte ^ 0x20);
                self.state = State::WaitCsum;
                Event::Pending
            }
            State::Csum1 => {
                self.csum_hi = byte;
                self.state = State::Csum2;
                Event::Pending
            }
            State::Csum2 => {
                self.state = State::WaitStart;
                let text = [self.csum_hi, byte];
                let expected = std::str::from_utf8(&text)
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok());
                if expected == Some(self.csum) {
                    Event::Packet(std::mem::take(&mut self.buf))
                } else {
                    Event::BadChecksum
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(recv: &mut Receiver, bytes: &[u8]) -> Vec<Event> {
        bytes.iter().map(|&b| recv.feed(b)).collect()
    }

    #[test]
    fn encode_known_packet() {
        // `$g#67` — matches the register-read scenario's request packet.
        assert_eq!(encode(b"g"), b"$g#67");
    }

    #[test]
    fn escape_and_checksum_special_bytes() {
        // '#' (0x23) escapes to "}\x03"; checksum covers the escaped pair:
        // 'a'=0x61 + '}'=0x7D + 0x03 + 'b'=0x62 = 0x143, low byte 0x43.
        let framed = encode(b"a#b");
        assert_eq!(framed, b"$a}\x03b#43");
    }

    #[test]
    fn round_trip_through_receiver() {
        for payload in [&b""[..], b"g", b"qSupported", b"a#$}*weird"] {
            let framed = encode(payload);
            let mut recv = Receiver::new();
            let mut got = None;
            for &b in &framed {
                if let Event::Packet(p) = recv.feed(b) {
                    got = Some(p);
                }
            }
            assert_eq!(got.as_deref(), Some(payload));
        }
    }

    #[test]
    fn bad_checksum_is_rejected() {
        let mut framed = encode(b"g");
        let last = framed.len() - 1;
        framed[last] = b'0' + ((framed[last] - b'0' + 1) % 10);
        let mut recv = Receiver::new();
        let events = feed_all(&mut recv, &framed);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::BadChecksum)));
    }

    #[test]
    fn ctrl_c_is_an_interrupt() {
        let mut recv = Receiver::new();
        assert!(matches!(recv.feed(0x03), Event::Interrupt));
    }
}
