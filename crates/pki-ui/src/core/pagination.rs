//! Pagination arithmetic for fixed-size table pages.
//!
//! # Design
//! - Pages are 1-based; there is always at least one page.
//! - Navigation clamps into `[1, total_pages]` instead of rejecting input.

/// Number of pages needed to show `total_entries` rows, never less than one.
#[must_use]
pub const fn total_pages(total_entries: u64, page_size: u32) -> u32 {
    let page_size = if page_size == 0 { 1 } else { page_size as u64 };
    let pages = total_entries.saturating_sub(1) / page_size + 1;
    if pages > u32::MAX as u64 {
        u32::MAX
    } else {
        pages as u32
    }
}

/// Parse a page number the way the page field is read: leading whitespace,
/// an optional sign and leading digits; anything unparseable yields `1`.
#[must_use]
pub fn parse_page_input(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) if end > 0 => i64::MAX,
        Err(_) => 1,
    }
}

/// Current page, page size and derived page count for one table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    page_size: u32,
    total_pages: u32,
}

impl Pager {
    /// Start on page one with a single page; a zero page size becomes one.
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: if page_size == 0 { 1 } else { page_size },
            total_pages: 1,
        }
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Page count derived from the last reported total.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Zero-based offset of the first row on the current page.
    #[must_use]
    pub const fn start(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Recompute the page count from a reported total.
    pub const fn set_total_entries(&mut self, total_entries: u64) {
        self.total_pages = total_pages(total_entries, self.page_size);
    }

    /// Jump to page one.
    pub const fn first(&mut self) {
        self.page = 1;
    }

    /// Step back one page, stopping at one.
    pub const fn prev(&mut self) {
        self.page = if self.page > 1 { self.page - 1 } else { 1 };
    }

    /// Step forward one page, stopping at the last page.
    pub fn next(&mut self) {
        self.page = self.page.saturating_add(1).min(self.total_pages).max(1);
    }

    /// Jump to the last page.
    pub const fn last(&mut self) {
        self.page = self.total_pages;
    }

    /// Jump to an arbitrary page, clamped into range.
    pub fn go_to(&mut self, page: i64) {
        let clamped = page.clamp(1, i64::from(self.total_pages.max(1)));
        self.page = u32::try_from(clamped).unwrap_or(1);
    }

    /// Jump to the page typed into the page field.
    pub fn jump(&mut self, raw: &str) {
        self.go_to(parse_page_input(raw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_follows_formula() {
        for page_size in 1..=7u32 {
            for total in 0..=40u64 {
                let expected = total.saturating_sub(1) / u64::from(page_size) + 1;
                let pages = total_pages(total, page_size);
                assert_eq!(u64::from(pages), expected);
                assert!(pages >= 1);
            }
        }
    }

    #[test]
    fn twelve_entries_in_pages_of_five() {
        let mut pager = Pager::new(5);
        pager.set_total_entries(12);
        assert_eq!(pager.total_pages(), 3);
        pager.last();
        assert_eq!(pager.page(), 3);
        pager.next();
        assert_eq!(pager.page(), 3);
        assert_eq!(pager.start(), 10);
    }

    #[test]
    fn navigation_always_stays_in_range() {
        let mut pager = Pager::new(5);
        pager.set_total_entries(12);
        for input in [-10_i64, 0, 1, 2, 3, 4, 99, i64::MAX, i64::MIN] {
            pager.go_to(input);
            assert!((1..=3).contains(&pager.page()), "input {input}");
        }
        pager.first();
        pager.prev();
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn page_input_parses_like_the_page_field() {
        assert_eq!(parse_page_input("3"), 3);
        assert_eq!(parse_page_input("  2abc"), 2);
        assert_eq!(parse_page_input("-4"), -4);
        assert_eq!(parse_page_input("abc"), 1);
        assert_eq!(parse_page_input(""), 1);
    }

    #[test]
    fn jump_clamps_typed_pages() {
        let mut pager = Pager::new(5);
        pager.set_total_entries(12);
        pager.jump("7");
        assert_eq!(pager.page(), 3);
        pager.jump("0");
        assert_eq!(pager.page(), 1);
        pager.jump("x");
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let pager = Pager::new(0);
        assert_eq!(pager.page_size(), 1);
        assert_eq!(total_pages(3, 0), 3);
    }
}
