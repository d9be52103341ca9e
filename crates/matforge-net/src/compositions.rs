//! Enumeration of the row splits a generator checks.
//!
//! Both enumerations run on one successor function over strictly increasing
//! position vectors ([`advance_positions`]):
//! - [`Compositions`]: every split of `total` rows into `parts` ordered
//!   non-negative counts, encoded as `parts - 1` separator positions.
//! - [`Combinations`]: every `choose`-subset of `0..among`, used by
//!   [`balanced_partitions`] to spread a remainder.

/// Advance `positions` to the next strictly increasing vector with entries
/// in `0..=max`.
///
/// Returns `false`, leaving `positions` untouched, once every entry is packed
/// against `max`.
pub fn advance_positions(positions: &mut [usize], max: usize) -> bool {
    let len = positions.len();
    let mut packed = 0;
    while packed < len && Some(positions[len - 1 - packed]) == max.checked_sub(packed) {
        packed += 1;
    }
    if packed == len {
        return false;
    }

    let pivot = len - 1 - packed;
    positions[pivot] += 1;
    for index in pivot + 1..len {
        positions[index] = positions[index - 1] + 1;
    }
    true
}

/// Spread between the largest and smallest nonzero part, 0 when all parts
/// are zero.
pub fn balance(parts: &[usize]) -> usize {
    let mut nonzero = parts.iter().copied().filter(|part| *part != 0);
    let Some(first) = nonzero.next() else {
        return 0;
    };
    let (low, high) = nonzero.fold((first, first), |(low, high), part| {
        (low.min(part), high.max(part))
    });
    high - low
}

/// Ordered splits of `total` into `parts` non-negative counts.
///
/// Visits `C(total + parts - 1, parts - 1)` compositions, the first one
/// putting everything into the last part.
#[derive(Debug, Clone)]
pub struct Compositions {
    total: usize,
    positions: Vec<usize>,
    max: usize,
    done: bool,
}

impl Compositions {
    pub fn new(total: usize, parts: usize) -> Self {
        let separators = parts.saturating_sub(1);
        Self {
            total,
            positions: (0..separators).collect(),
            max: (total + parts).saturating_sub(2),
            done: parts == 0,
        }
    }

    fn current(&self) -> Vec<usize> {
        let Some(last) = self.positions.last() else {
            return vec![self.total];
        };
        let mut parts = Vec::with_capacity(self.positions.len() + 1);
        parts.push(self.positions[0]);
        parts.extend(self.positions.windows(2).map(|pair| pair[1] - pair[0] - 1));
        parts.push(self.max - last);
        parts
    }
}

impl Iterator for Compositions {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let parts = self.current();
        self.done = !advance_positions(&mut self.positions, self.max);
        Some(parts)
    }
}

/// Strictly increasing `choose`-subsets of `0..among`, lexicographic.
#[derive(Debug, Clone)]
pub struct Combinations {
    positions: Vec<usize>,
    max: usize,
    done: bool,
}

impl Combinations {
    pub fn new(choose: usize, among: usize) -> Self {
        Self {
            positions: (0..choose).collect(),
            max: among.saturating_sub(1),
            done: choose > among,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let subset = self.positions.clone();
        self.done = !advance_positions(&mut self.positions, self.max);
        Some(subset)
    }
}

/// Splits of `total` into `parts` counts differing by at most one.
///
/// Each part gets `total / parts`; the remainder adds one to every subset
/// of that size in turn.
pub fn balanced_partitions(total: usize, parts: usize) -> impl Iterator<Item = Vec<usize>> {
    let (base, remainder) = match parts {
        0 => (0, 1),
        _ => (total / parts, total % parts),
    };
    Combinations::new(remainder, parts).map(move |subset| {
        let mut split = vec![base; parts];
        for index in subset {
            split[index] += 1;
        }
        split
    })
}
