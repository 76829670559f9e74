use super::{Urn, checked_total};
use crate::color::Color;
use crate::error::UrnError;
use crate::random::UniformSource;

/// Urn storing one live counter per color next to the initial snapshot.
///
/// Memory is proportional to the number of colors; draw and reset walk the
/// color classes.
#[derive(Debug, Clone)]
pub struct CountUrn<S> {
    initial: Box<[u32]>,
    live: Vec<u32>,
    total: usize,
    source: S,
}

impl<S: UniformSource> CountUrn<S> {
    pub fn new(counts: &[u32], source: S) -> Result<Self, UrnError> {
        let total = checked_total(counts)?;
        Ok(Self {
            initial: counts.into(),
            live: counts.to_vec(),
            total,
            source,
        })
    }

    /// Remaining balls per color.
    pub fn live_counts(&self) -> &[u32] {
        &self.live
    }

    pub fn initial_counts(&self) -> &[u32] {
        &self.initial
    }
}

impl<S: UniformSource> Urn for CountUrn<S> {
    fn draw(&mut self) -> Result<Color, UrnError> {
        if self.total == 0 {
            return Err(UrnError::Exhausted);
        }

        let mut index = self.source.index_below(self.total);
        for (color_index, count) in self.live.iter_mut().enumerate() {
            let live = *count as usize;
            if index < live {
                *count -= 1;
                self.total -= 1;
                return Ok(Color::new(color_index as u32));
            }
            index -= live;
        }

        // Live counts always sum to `total`, so the walk above returns.
        Err(UrnError::Exhausted)
    }

    fn reset(&mut self) {
        self.live.copy_from_slice(&self.initial);
        self.total = self.live.iter().map(|&count| count as usize).sum();
    }

    fn remaining(&self) -> usize {
        self.total
    }

    fn initial_total(&self) -> usize {
        self.initial.iter().map(|&count| count as usize).sum()
    }

    fn colors(&self) -> usize {
        self.initial.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::from_fn;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn index_walks_color_classes_in_order() {
        let mut urn = CountUrn::new(&[2, 0, 3], from_fn(|_| 2)).expect("valid counts");
        assert_eq!(urn.draw(), Ok(Color::BLUE));
        assert_eq!(urn.live_counts(), &[2, 0, 2]);
        assert_eq!(urn.draw(), Ok(Color::BLUE));
        assert_eq!(urn.draw(), Ok(Color::BLUE));
        assert_eq!(urn.live_counts(), &[2, 0, 0]);
        assert_eq!(urn.draw(), Ok(Color::RED));
        assert_eq!(urn.remaining(), 1);
    }

    #[test]
    fn live_counts_never_exceed_initial() {
        let mut urn = CountUrn::new(&[4, 1, 6], SmallRng::seed_from_u64(17)).expect("valid");
        while !urn.is_empty() {
            urn.draw().expect("balls remain");
            for (live, initial) in urn.live_counts().iter().zip(urn.initial_counts()) {
                assert!(live <= initial);
            }
            let sum: usize = urn.live_counts().iter().map(|&c| c as usize).sum();
            assert_eq!(sum, urn.remaining());
        }
        assert_eq!(urn.draw(), Err(UrnError::Exhausted));
    }

    #[test]
    fn reset_copies_snapshot_back() {
        let mut urn = CountUrn::new(&[3, 2], SmallRng::seed_from_u64(2)).expect("valid");
        urn.draw().expect("draw");
        urn.draw().expect("draw");
        urn.reset();
        assert_eq!(urn.live_counts(), &[3, 2]);
        assert_eq!(urn.remaining(), 5);
        assert_eq!(urn.initial_total(), 5);
    }
}
