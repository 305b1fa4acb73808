// Default scoring, BLAST-style 11/1 where the first gap residue pays open + extend
pub const GAP_OPEN_PENALTY: u16 = 12;
pub const GAP_EXTEND_PENALTY: u16 = 1;

pub const X_DROP: i32 = 20;
pub const MIN_SCORE: i32 = 1;

/// Gap penalties must fit a signed 8-bit lane
pub const MAX_GAP_PENALTY: u16 = i8::MAX as u16;

/// Residues considered around each query position by the composition correction
pub const BIAS_WINDOW: usize = 40;
