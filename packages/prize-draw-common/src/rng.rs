use sha2::{Digest, Sha256};

/// Hash several entropy sources into one seed. Each part is length-prefixed
/// so that `["ab", "c"]` and `["a", "bc"]` produce different seeds.
pub fn seed_from_parts(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Deterministic byte stream for draws.
///
/// Block `i` of the stream is `sha256(seed || i_u64_be)`. The stream itself
/// is reproducible from the seed; draws are independent because the contract
/// derives a fresh seed for every invocation.
pub struct DrawRng {
    seed: [u8; 32],
    counter: u64,
    block: [u8; 32],
    offset: usize,
}

impl DrawRng {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            seed,
            counter: 0,
            block: [0u8; 32],
            // forces a refill on first use
            offset: 32,
        }
    }

    pub fn from_parts(parts: &[&[u8]]) -> Self {
        Self::new(seed_from_parts(parts))
    }

    fn refill(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(self.seed);
        hasher.update(self.counter.to_be_bytes());
        self.block = hasher.finalize().into();
        self.counter += 1;
        self.offset = 0;
    }

    pub fn next_u64(&mut self) -> u64 {
        if self.offset + 8 > self.block.len() {
            self.refill();
        }
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.block[self.offset..self.offset + 8]);
        self.offset += 8;
        u64::from_be_bytes(bytes)
    }

    /// Uniform integer in `[0, bound)`. Rejection sampling keeps the result
    /// free of modulo bias. `bound` must be non-zero.
    pub fn below(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0, "bound must be non-zero");
        let zone = (u64::MAX / bound) * bound;
        loop {
            let value = self.next_u64();
            if value < zone {
                return value % bound;
            }
        }
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i as u64 + 1) as usize;
            items.swap(i, j);
        }
    }
}
