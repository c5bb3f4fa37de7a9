// crypto/keccak.rs
//! Keccak-256 as used by Ethereum (original Keccak padding, not NIST SHA3).

/// Sponge rate for Keccak-256 in bytes (1088 bits).
pub const KECCAK256_RATE: usize = 136;

/// Digest length in bytes.
pub const KECCAK256_OUTPUT: usize = 32;

const ROUNDS: usize = 24;

const ROUND_CONSTANTS: [u64; ROUNDS] = [
    0x0000000000000001, 0x0000000000008082, 0x800000000000808a,
    0x8000000080008000, 0x000000000000808b, 0x0000000080000001,
    0x8000000080008081, 0x8000000000008009, 0x000000000000008a,
    0x0000000000000088, 0x0000000080008009, 0x000000008000000a,
    0x000000008000808b, 0x800000000000008b, 0x8000000000008089,
    0x8000000000008003, 0x8000000000008002, 0x8000000000000080,
    0x000000000000800a, 0x800000008000000a, 0x8000000080008081,
    0x8000000000008080, 0x0000000080000001, 0x8000000080008008,
];

// ROTATION_OFFSETS[x][y] is the rho rotation for lane (x, y)
const ROTATION_OFFSETS: [[u32; 5]; 5] = [
    [0, 36, 3, 41, 18],
    [1, 44, 10, 45, 2],
    [62, 6, 43, 15, 61],
    [28, 55, 25, 21, 56],
    [27, 20, 39, 8, 14],
];

/// Lane (x, y) lives at index x + 5 * y.
type State = [u64; 25];

fn keccak_f(state: &mut State) {
    for round_constant in ROUND_CONSTANTS.iter() {
        // theta
        let mut parity = [0u64; 5];
        for x in 0..5 {
            parity[x] = state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
        }
        for x in 0..5 {
            let d = parity[(x + 4) % 5] ^ parity[(x + 1) % 5].rotate_left(1);
            for y in 0..5 {
                state[x + 5 * y] ^= d;
            }
        }

        // rho + pi: B[y, 2x + 3y] = rot(A[x, y])
        let mut b = [0u64; 25];
        for x in 0..5 {
            for y in 0..5 {
                let target = y + 5 * ((2 * x + 3 * y) % 5);
                b[target] = state[x + 5 * y].rotate_left(ROTATION_OFFSETS[x][y]);
            }
        }

        // chi
        for y in 0..5 {
            for x in 0..5 {
                state[x + 5 * y] =
                    b[x + 5 * y] ^ (!b[(x + 1) % 5 + 5 * y] & b[(x + 2) % 5 + 5 * y]);
            }
        }

        // iota
        state[0] ^= round_constant;
    }
}

/// Incremental Keccak-256 hasher.
#[derive(Clone)]
pub struct Keccak256 {
    state: State,
    buffer: [u8; KECCAK256_RATE],
    buffered: usize,
}

impl Keccak256 {
    pub fn new() -> Self {
        Keccak256 {
            state: [0u64; 25],
            buffer: [0u8; KECCAK256_RATE],
            buffered: 0,
        }
    }

    pub fn update(&mut self, mut input: &[u8]) {
        while !input.is_empty() {
            let take = (KECCAK256_RATE - self.buffered).min(input.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&input[..take]);
            self.buffered += take;
            input = &input[take..];

            if self.buffered == KECCAK256_RATE {
                self.absorb_block();
            }
        }
    }

    /// Pads with `0x01 .. 0x80` and squeezes a single 32 byte block.
    pub fn finalize(mut self) -> [u8; KECCAK256_OUTPUT] {
        self.buffer[self.buffered..].fill(0);
        self.buffer[self.buffered] ^= 0x01;
        self.buffer[KECCAK256_RATE - 1] ^= 0x80;
        self.buffered = KECCAK256_RATE;
        self.absorb_block();

        let mut output = [0u8; KECCAK256_OUTPUT];
        for (i, chunk) in output.chunks_mut(8).enumerate() {
            chunk.copy_from_slice(&self.state[i].to_le_bytes());
        }
        output
    }

    fn absorb_block(&mut self) {
        for (i, lane) in self.buffer.chunks(8).enumerate() {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(lane);
            self.state[i] ^= u64::from_le_bytes(bytes);
        }
        keccak_f(&mut self.state);
        self.buffered = 0;
    }
}

impl Default for Keccak256 {
    fn default() -> Self {
        Self::new()
    }
}

pub fn keccak256(data: &[u8]) -> [u8; KECCAK256_OUTPUT] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize()
}

/// Digest as 64 lowercase hex characters.
pub fn keccak256_hex(data: &[u8]) -> String {
    hex::encode(keccak256(data))
}
