use crate::cache::CacheLine;

/// Memory operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Read,
    Write,
}

/// Outcome of a single cache access, handed to the registered observer just
/// before [`Cache::access`] returns.
///
/// The event borrows the touched line; observers get a read-only view.
///
/// [`Cache::access`]: crate::cache::Cache::access
#[derive(Debug)]
pub struct AccessEvent<'a> {
    pub op: Op,
    pub hit: bool,
    /// Decoded address fields for this access.
    pub tag: u32,
    pub index: usize,
    pub offset: usize,
    /// Field widths, fixed by the cache geometry.
    pub tag_bits: u32,
    pub index_bits: u32,
    pub offset_bits: u32,
    /// The line that was filled or refreshed.
    pub line: &'a CacheLine,
}

/// Per-access callback capability. Registered at construction time; the
/// default does nothing.
///
/// Invoked synchronously from inside `access()`, so an observer must not call
/// back into the cache.
pub trait Observer {
    fn on_access(&mut self, event: &AccessEvent<'_>);
}

impl<F: FnMut(&AccessEvent<'_>)> Observer for F {
    fn on_access(&mut self, event: &AccessEvent<'_>) {
        self(event)
    }
}
