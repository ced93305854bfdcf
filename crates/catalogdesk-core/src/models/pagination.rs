/// Page arithmetic for the product listing.
///
/// Pages are 1-based. `skip` is derived from the page, `total_pages` from
/// the total the server reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl Pagination {
    pub fn new(limit: u64) -> Self {
        Self {
            page: 1,
            limit,
            total: 0,
        }
    }

    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1) * self.limit
    }

    /// `ceil(total / limit)`; zero when nothing is known yet
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Page-number controls to render, `1..=total_pages`
    pub fn page_numbers(&self) -> Vec<u64> {
        (1..=self.total_pages()).collect()
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn next(&mut self) {
        self.page = (self.page + 1).min(self.total_pages().max(1));
    }

    /// Jump to `page`, clamped to the known range
    pub fn go_to(&mut self, page: u64) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let p = Pagination { page: 1, limit: 20, total: 57 };
        assert_eq!(p.total_pages(), 3);
        assert_eq!(p.page_numbers(), vec![1, 2, 3]);

        let p = Pagination { page: 1, limit: 20, total: 60 };
        assert_eq!(p.total_pages(), 3);

        let p = Pagination { page: 1, limit: 20, total: 0 };
        assert_eq!(p.total_pages(), 0);
        assert!(p.page_numbers().is_empty());
    }

    #[test]
    fn test_skip() {
        let mut p = Pagination::new(20);
        assert_eq!(p.skip(), 0);
        p.total = 57;
        p.go_to(3);
        assert_eq!(p.skip(), 40);
    }

    #[test]
    fn test_prev_next_bounds() {
        let mut p = Pagination { page: 1, limit: 20, total: 57 };
        assert!(!p.has_prev());
        assert!(p.has_next());

        p.prev();
        assert_eq!(p.page, 1);

        p.next();
        p.next();
        assert_eq!(p.page, 3);
        assert!(!p.has_next());
        p.next();
        assert_eq!(p.page, 3);
        assert!(p.has_prev());
    }

    #[test]
    fn test_go_to_clamps() {
        let mut p = Pagination { page: 1, limit: 20, total: 57 };
        p.go_to(9);
        assert_eq!(p.page, 3);
        p.go_to(0);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn test_zero_limit() {
        let p = Pagination { page: 1, limit: 0, total: 10 };
        assert_eq!(p.total_pages(), 0);
    }
}
