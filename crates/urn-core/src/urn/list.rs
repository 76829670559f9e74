use super::{Urn, checked_total};
use crate::color::Color;
use crate::error::UrnError;
use crate::random::UniformSource;

/// Urn storing one color label per ball.
///
/// Live balls occupy `balls[..active]`. A draw swaps the chosen slot with the
/// last live slot and shrinks `active`, so drawn balls collect at the tail and
/// `reset` only has to restore `active`.
#[derive(Debug, Clone)]
pub struct ListUrn<S> {
    balls: Vec<Color>,
    active: usize,
    colors: usize,
    source: S,
}

impl<S: UniformSource> ListUrn<S> {
    pub fn new(counts: &[u32], source: S) -> Result<Self, UrnError> {
        let total = checked_total(counts)?;
        let mut balls = Vec::with_capacity(total);
        for (index, &count) in counts.iter().enumerate() {
            balls.extend(std::iter::repeat_n(Color::new(index as u32), count as usize));
        }

        Ok(Self {
            active: balls.len(),
            balls,
            colors: counts.len(),
            source,
        })
    }

    /// Live balls in their current (permuted) order.
    pub fn live(&self) -> &[Color] {
        &self.balls[..self.active]
    }
}

impl<S: UniformSource> Urn for ListUrn<S> {
    fn draw(&mut self) -> Result<Color, UrnError> {
        if self.active == 0 {
            return Err(UrnError::Exhausted);
        }

        let index = self.source.index_below(self.active);
        let color = self.balls[index];
        self.active -= 1;
        self.balls.swap(index, self.active);
        Ok(color)
    }

    fn reset(&mut self) {
        self.active = self.balls.len();
    }

    fn remaining(&self) -> usize {
        self.active
    }

    fn initial_total(&self) -> usize {
        self.balls.len()
    }

    fn colors(&self) -> usize {
        self.colors
    }
}
