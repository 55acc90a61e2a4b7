/// Limit/offset window over a listing, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: usize,
    pub offset: usize,
}

impl Pagination {
    /// Page size used when the caller gives none.
    pub const DEFAULT_LIMIT: usize = 10;

    /// Largest page a caller may request.
    pub const MAX_LIMIT: usize = 100;

    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Normalises caller-supplied values.
    ///
    /// A limit of zero or less becomes [`Self::DEFAULT_LIMIT`], a limit above
    /// [`Self::MAX_LIMIT`] is capped, and a negative offset becomes zero.
    pub fn clamped(limit: i64, offset: i64) -> Self {
        let limit = if limit <= 0 {
            Self::DEFAULT_LIMIT
        } else {
            usize::try_from(limit).map_or(Self::MAX_LIMIT, |l| l.min(Self::MAX_LIMIT))
        };
        let offset = usize::try_from(offset).unwrap_or(0);
        Self { limit, offset }
    }

    /// Applies the window to an iterator.
    pub fn apply<I: Iterator>(self, items: I) -> impl Iterator<Item = I::Item> {
        items.skip(self.offset).take(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}
