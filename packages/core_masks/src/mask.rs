use std::fmt::{self, Display};

use serde::{Serialize, Serializer};

use crate::CoreId;

const WORD_BITS: CoreId = u64::BITS;

/// A CPU affinity mask where bit `n` set means "core `n` is included".
///
/// The mask has no upper bound on core IDs, so it can describe large multi-socket hosts with
/// hundreds of cores.
///
/// It is displayed in the canonical form expected by Open vSwitch and DPDK: lowercase hexadecimal
/// with a `0x` prefix and no leading zeros. The empty mask is displayed as an empty string, never
/// as `0x0`.
///
/// ```
/// use core_masks::CoreMask;
///
/// assert_eq!(CoreMask::from_iter([1, 2]).to_string(), "0x6");
/// assert_eq!(CoreMask::default().to_string(), "");
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct CoreMask {
    // Least significant word first. Never has trailing zero words, so the empty mask has no words.
    words: Vec<u64>,
}

impl CoreMask {
    /// Whether no core is included in the mask.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether the given core is included in the mask.
    #[must_use]
    pub fn contains(&self, core: CoreId) -> bool {
        let (word_index, bit) = Self::position(core);

        self.words
            .get(word_index)
            .is_some_and(|word| word & (1_u64 << bit) != 0)
    }

    /// Includes the given core in the mask.
    pub fn insert(&mut self, core: CoreId) {
        let (word_index, bit) = Self::position(core);

        if self.words.len() <= word_index {
            self.words.resize(word_index.saturating_add(1), 0);
        }

        if let Some(word) = self.words.get_mut(word_index) {
            *word |= 1_u64 << bit;
        }
    }

    #[expect(
        clippy::integer_division,
        reason = "word index is the quotient, the remainder is the bit"
    )]
    fn position(core: CoreId) -> (usize, CoreId) {
        ((core / WORD_BITS) as usize, core % WORD_BITS)
    }
}

impl FromIterator<CoreId> for CoreMask {
    fn from_iter<I: IntoIterator<Item = CoreId>>(iter: I) -> Self {
        let mut mask = Self::default();

        for core in iter {
            mask.insert(core);
        }

        mask
    }
}

impl Display for CoreMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = self.words.iter().rev();

        let Some(most_significant) = words.next() else {
            return Ok(());
        };

        write!(f, "0x{most_significant:x}")?;

        for word in words {
            write!(f, "{word:016x}")?;
        }

        Ok(())
    }
}

impl Serialize for CoreMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
