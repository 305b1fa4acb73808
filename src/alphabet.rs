use std::convert::Infallible;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Encoded residue. Real letters are `0..alphabet_size`, never [`PADDING_LETTER`]
pub type Letter = u8;

/// Residue order shared by the amino acid matrices
pub const AMINO_ACIDS: &[u8; 25] = b"ARNDCQEGHILKMFPSTWYVBJZX*";
pub const AMINO_ACID_COUNT: usize = AMINO_ACIDS.len();

/// Letter that unknown residues encode to
pub const MASK_LETTER: Letter = 23;

/// Pads targets shorter than their batch and marks cells outside a band. Every lookup row
/// scores it as the lowest value of the lane type.
pub const PADDING_LETTER: Letter = 31;

/// Largest alphabet a lookup row can hold next to the padding letter
pub const MAX_ALPHABET_SIZE: usize = PADDING_LETTER as usize;

const ENCODING: [Letter; 256] = {
    let mut table = [MASK_LETTER; 256];
    let mut i = 0;
    while i < AMINO_ACIDS.len() {
        let residue = AMINO_ACIDS[i];
        table[residue as usize] = i as Letter;
        table[residue.to_ascii_lowercase() as usize] = i as Letter;
        i += 1;
    }
    // selenocysteine and pyrrolysine score like their closest standard residues
    table[b'U' as usize] = 4;
    table[b'u' as usize] = 4;
    table[b'O' as usize] = 11;
    table[b'o' as usize] = 11;
    table
};

#[inline]
pub fn encode(residue: u8) -> Letter {
    ENCODING[residue as usize]
}

pub fn decode(letter: Letter) -> u8 {
    AMINO_ACIDS.get(letter as usize).copied().unwrap_or(b'-')
}

/// An encoded amino acid sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sequence(Vec<Letter>);

impl Sequence {
    pub fn new(letters: Vec<Letter>) -> Self {
        Self(letters)
    }

    /// Encodes ASCII residues, skipping whitespace
    pub fn from_ascii(residues: &[u8]) -> Self {
        Self(
            residues
                .iter()
                .filter(|residue| !residue.is_ascii_whitespace())
                .map(|&residue| encode(residue))
                .collect(),
        )
    }

    pub fn letters(&self) -> &[Letter] {
        &self.0
    }

    pub fn into_letters(self) -> Vec<Letter> {
        self.0
    }
}

impl FromStr for Sequence {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_ascii(s.as_bytes()))
    }
}

impl From<Vec<Letter>> for Sequence {
    fn from(letters: Vec<Letter>) -> Self {
        Self(letters)
    }
}

impl Deref for Sequence {
    type Target = [Letter];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[Letter]> for Sequence {
    fn as_ref(&self) -> &[Letter] {
        &self.0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &letter in &self.0 {
            write!(f, "{}", decode(letter) as char)?;
        }
        Ok(())
    }
}
