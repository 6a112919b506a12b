// Target selection randomness.

/// Source of uniform indices into the candidate emoji list.
pub trait TargetPicker {
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Picker backed by `getrandom` (the browser's `crypto.getRandomValues` on wasm).
#[derive(Debug, Default)]
pub struct EntropyPicker {
    // Round-robin index used only if the entropy source fails.
    fallback: usize,
}

impl EntropyPicker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TargetPicker for EntropyPicker {
    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let n = len as u32;
        // Reject the tail of the u32 range so every index is equally likely.
        let limit = u32::MAX - u32::MAX % n;
        loop {
            let mut buf = [0u8; 4];
            if getrandom::getrandom(&mut buf).is_err() {
                self.fallback = (self.fallback + 1) % len;
                return self.fallback;
            }
            let v = u32::from_le_bytes(buf);
            if v < limit {
                return (v % n) as usize;
            }
        }
    }
}

/// Replays a fixed list of indices (wrapping). Handy for deterministic games.
#[derive(Debug, Clone)]
pub struct ScriptedPicker {
    indices: Vec<usize>,
    pos: usize,
}

impl ScriptedPicker {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, pos: 0 }
    }
}

impl TargetPicker for ScriptedPicker {
    fn pick_index(&mut self, len: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let idx = self.indices[self.pos % self.indices.len()];
        self.pos += 1;
        idx % len
    }
}
