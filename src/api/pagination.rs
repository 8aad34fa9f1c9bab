use serde::Serialize;

/// Page size when the query string omits `limit`.
pub(crate) const DEFAULT_PAGE_SIZE: i64 = 100;

/// Hard ceiling on `limit`; larger values are clamped, never rejected.
pub(crate) const MAX_PAGE_SIZE: i64 = 500;

pub(crate) const fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// One page of a collection, echoing the offsets the client asked for so it
/// can compute whether more pages remain.
#[derive(Debug, Serialize)]
pub(crate) struct PaginatedResponse<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total_count: i64,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}

/// Normalizes raw query offsets: negative `skip` becomes zero and `limit` is
/// clamped to `1..=MAX_PAGE_SIZE`.
pub(crate) fn clamp_window(skip: i64, limit: i64) -> (i64, i64) {
    (skip.max(0), limit.clamp(1, MAX_PAGE_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_clamped_to_sane_bounds() {
        assert_eq!(clamp_window(-5, 0), (0, 1));
        assert_eq!(clamp_window(20, 10_000), (20, MAX_PAGE_SIZE));
        assert_eq!(clamp_window(0, default_limit()), (0, DEFAULT_PAGE_SIZE));
    }
}
