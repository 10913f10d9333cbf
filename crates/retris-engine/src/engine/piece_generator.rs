use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Supplies the kinds of newly spawned pieces.
///
/// [`PieceGenerator`] is the in-game source; [`PieceSequence`] replays a fixed
/// order and is meant for tests and scripted scenarios.
pub trait PieceSource: fmt::Debug + Send {
    fn next_kind(&mut self) -> PieceKind;
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the generator's PCG stream. The same seed always yields the
/// same piece sequence. Its text form (used by `Display`, `FromStr` and serde) is
/// a 32-character hex string.
///
/// # Example
///
/// ```
/// use rand::Rng as _;
/// use retris_engine::{PieceGenerator, PieceSeed, PieceSource as _};
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = PieceGenerator::with_seed(seed);
/// let mut b = PieceGenerator::with_seed(seed.to_string().parse().unwrap());
/// for _ in 0..20 {
///     assert_eq!(a.next_kind(), b.next_kind());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid seed: expected 32 hex characters, got {_0}")]
    Length(#[error(not(source))] usize),
    #[display("invalid seed: {_0:?} is not a hex string")]
    Digits(#[error(not(source))] String),
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::Length(s.len()));
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError::Digits(s.to_owned()))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Random piece source: every kind is drawn independently and uniformly.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    seed: PieceSeed,
    rng: Pcg32,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a generator seeded from the thread RNG.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }
}

impl PieceSource for PieceGenerator {
    fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// Piece source that cycles through a fixed list of kinds.
#[derive(Debug, Clone)]
pub struct PieceSequence {
    kinds: Vec<PieceKind>,
    index: usize,
}

impl PieceSequence {
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    #[must_use]
    pub fn new(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "piece sequence must not be empty");
        Self { kinds, index: 0 }
    }

    /// A sequence that only ever yields `kind`.
    #[must_use]
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new([kind])
    }
}

impl PieceSource for PieceSequence {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.index];
        self.index = (self.index + 1) % self.kinds.len();
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let seed = PieceSeed::from_bytes([7; 16]);
        let mut a = PieceGenerator::with_seed(seed);
        let mut b = PieceGenerator::with_seed(seed);
        let a: Vec<_> = (0..50).map(|_| a.next_kind()).collect();
        let b: Vec<_> = (0..50).map(|_| b.next_kind()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generator_yields_every_kind() {
        let mut generator = PieceGenerator::with_seed(PieceSeed::from_bytes([1; 16]));
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..500 {
            seen[generator.next_kind() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_sequence_cycles() {
        let mut sequence = PieceSequence::new([PieceKind::I, PieceKind::O, PieceKind::T]);
        let kinds: Vec<_> = (0..5).map(|_| sequence.next_kind()).collect();
        assert_eq!(
            kinds,
            [
                PieceKind::I,
                PieceKind::O,
                PieceKind::T,
                PieceKind::I,
                PieceKind::O
            ]
        );
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_format_is_32_char_hex_string() {
            let seed = PieceSeed::from_bytes([0xab; 16]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, format!("\"{}\"", "ab".repeat(16)));
        }

        #[test]
        fn test_leading_zeros_are_kept() {
            let mut bytes = [0; 16];
            bytes[15] = 1;
            let seed = PieceSeed::from_bytes(bytes);
            assert_eq!(seed.to_string(), format!("{}1", "0".repeat(31)));
            assert_eq!(seed.to_string().parse::<PieceSeed>(), Ok(seed));
        }

        #[test]
        fn test_deserialize_rejects_bad_input() {
            assert!(serde_json::from_str::<PieceSeed>("\"abc\"").is_err());
            let not_hex = format!("\"{}\"", "zz".repeat(16));
            assert!(serde_json::from_str::<PieceSeed>(&not_hex).is_err());
            assert_eq!(
                "abc".parse::<PieceSeed>(),
                Err(ParseSeedError::Length(3))
            );
        }
    }
}
