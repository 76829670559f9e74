//! Urns holding colored balls, drawn without replacement.
//!
//! This module is composed of:
//! - `list`: one slot per ball, O(1) draw via swap-to-end, O(1) reset.
//! - `count`: one counter per color, O(colors) draw and reset.

mod count;
mod list;

pub use count::CountUrn;
pub use list::ListUrn;

use crate::color::Color;
use crate::error::UrnError;

/// Draw-without-replacement contract shared by every urn representation.
pub trait Urn {
    /// Removes one ball chosen uniformly among the remaining balls and returns its color.
    fn draw(&mut self) -> Result<Color, UrnError>;

    /// Restores the composition the urn was constructed with.
    fn reset(&mut self);

    /// Number of balls still in the urn.
    fn remaining(&self) -> usize;

    /// Number of balls the urn was constructed with.
    fn initial_total(&self) -> usize;

    /// Number of color classes.
    fn colors(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

impl<U: Urn + ?Sized> Urn for &mut U {
    fn draw(&mut self) -> Result<Color, UrnError> {
        (**self).draw()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn remaining(&self) -> usize {
        (**self).remaining()
    }

    fn initial_total(&self) -> usize {
        (**self).initial_total()
    }

    fn colors(&self) -> usize {
        (**self).colors()
    }
}

impl<U: Urn + ?Sized> Urn for Box<U> {
    fn draw(&mut self) -> Result<Color, UrnError> {
        (**self).draw()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn remaining(&self) -> usize {
        (**self).remaining()
    }

    fn initial_total(&self) -> usize {
        (**self).initial_total()
    }

    fn colors(&self) -> usize {
        (**self).colors()
    }
}

/// Sums per-color counts into a ball total addressable by a `usize`.
///
/// Also rejects more color classes than a [`Color`] can label.
pub(crate) fn checked_total(counts: &[u32]) -> Result<usize, UrnError> {
    check_color_classes(counts.len())?;
    let total: u64 = counts.iter().map(|&count| u64::from(count)).sum();
    usize::try_from(total).map_err(|_| UrnError::TooManyBalls { total })
}

fn check_color_classes(colors: usize) -> Result<(), UrnError> {
    match Color::from_index(colors.saturating_sub(1)) {
        Some(_) => Ok(()),
        None => Err(UrnError::TooManyColors { colors }),
    }
}
