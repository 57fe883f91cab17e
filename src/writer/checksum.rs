//! Adler-32 checksum (RFC 1950 section 8.2).
//!
//! The zlib container ends with the Adler-32 of the uncompressed data,
//! stored big-endian.

/// Largest prime smaller than 65536.
const MOD_ADLER: u32 = 65521;

/// Largest n such that 255n(n+1)/2 + (n+1)(MOD_ADLER-1) <= 2^32-1.
/// Sums can be deferred for this many bytes without overflowing a u32.
const NMAX: usize = 5552;

/// Rolling Adler-32 state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Adler32 {
    /// Fresh state (`a = 1, b = 0`).
    pub fn new() -> Self {
        Self { a: 1, b: 0 }
    }

    /// Feed bytes into the checksum.
    pub fn update(&mut self, data: &[u8]) {
        for block in data.chunks(NMAX) {
            for &byte in block {
                self.a += u32::from(byte);
                self.b += self.a;
            }
            self.a %= MOD_ADLER;
            self.b %= MOD_ADLER;
        }
    }

    /// Current checksum value, `(b << 16) | a`.
    pub fn checksum(&self) -> u32 {
        (self.b << 16) | self.a
    }
}

/// Compute the Adler-32 checksum of `data`.
pub fn adler32(data: &[u8]) -> u32 {
    let mut hasher = Adler32::new();
    hasher.update(data);
    hasher.checksum()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Byte-at-a-time reduction, exactly as written in RFC 1950.
    fn reference(data: &[u8]) -> u32 {
        let mut a: u32 = 1;
        let mut b: u32 = 0;
        for &byte in data {
            a = (a + byte as u32) % MOD_ADLER;
            b = (b + a) % MOD_ADLER;
        }
        (b << 16) | a
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(adler32(b""), 1);
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(adler32(b"a"), 0x0062_0062);
        assert_eq!(adler32(b"abc"), 0x024d_0127);
        assert_eq!(adler32(b"Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn test_long_input_matches_reference() {
        // Long runs of 0xFF stress the deferred modulo.
        let data = vec![0xFFu8; 100_000];
        assert_eq!(adler32(&data), reference(&data));

        let mixed: Vec<u8> = (0..70_000u32).map(|i| (i * 31 % 251) as u8).collect();
        assert_eq!(adler32(&mixed), reference(&mixed));
    }

    #[test]
    fn test_incremental_update() {
        let mut hasher = Adler32::new();
        hasher.update(b"BT\n/F1 12.00 Tf\n");
        hasher.update(b"(Hello) Tj\nET\n");
        assert_eq!(hasher.checksum(), adler32(b"BT\n/F1 12.00 Tf\n(Hello) Tj\nET\n"));
    }

    proptest::proptest! {
        #[test]
        fn prop_matches_reference(data in proptest::collection::vec(proptest::num::u8::ANY, 0..20_000)) {
            proptest::prop_assert_eq!(adler32(&data), reference(&data));
        }
    }
}
