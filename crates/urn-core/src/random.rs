//! Injectable uniform index source used by the urns.
//!
//! Every `rand::Rng` is a source, so a seeded `SmallRng` or `StdRng` plugs in
//! directly. [`FromFn`] turns a closure into a source for scripted draws.

use rand::Rng;

/// Produces uniformly distributed indices over a half-open range.
pub trait UniformSource {
    /// Returns an index in `[0, bound)`. Callers guarantee `bound >= 1`.
    fn index_below(&mut self, bound: usize) -> usize;
}

impl<R: Rng + ?Sized> UniformSource for R {
    fn index_below(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/// Source backed by a closure receiving the current bound.
///
/// Results at or above the bound are clamped to `bound - 1`, so a script can
/// never index past the live region of an urn.
#[derive(Debug, Clone)]
pub struct FromFn<F> {
    pick: F,
}

pub fn from_fn<F>(pick: F) -> FromFn<F>
where
    F: FnMut(usize) -> usize,
{
    FromFn { pick }
}

impl<F> UniformSource for FromFn<F>
where
    F: FnMut(usize) -> usize,
{
    fn index_below(&mut self, bound: usize) -> usize {
        (self.pick)(bound).min(bound.saturating_sub(1))
    }
}
