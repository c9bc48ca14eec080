use serde::Serialize;

pub(crate) const PAGE_SIZE: usize = 9;

pub(crate) struct Paginator<T> {
    items: Vec<T>,
    per_page: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Page<T> {
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<usize>,
    pub previous_page_number: Option<usize>,
    /// 1-based position of the first item, 0 on an empty page
    pub start_index: usize,
    pub items: Vec<T>,
}

impl<T> Paginator<T> {
    pub(crate) fn new(items: Vec<T>, per_page: usize) -> Self {
        assert!(per_page > 0, "per_page must be positive");
        Self { items, per_page }
    }

    /// Always at least one page, even with no items.
    pub(crate) fn num_pages(&self) -> usize {
        std::cmp::max(1, (self.items.len() + self.per_page - 1) / self.per_page)
    }

    /// Page for a raw query-string value. Missing or non-numeric input gives
    /// the first page; a number outside 1..=num_pages gives the last.
    pub(crate) fn get_page(self, raw: Option<&str>) -> Page<T> {
        let num_pages = self.num_pages();
        let number = match raw.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if n >= 1 && (n as u64) <= num_pages as u64 => n as usize,
            Some(Ok(_)) => num_pages,
        };
        self.page(number)
    }

    fn page(self, number: usize) -> Page<T> {
        let num_pages = self.num_pages();
        let count = self.items.len();
        let start = (number - 1) * self.per_page;
        let items: Vec<T> = self
            .items
            .into_iter()
            .skip(start)
            .take(self.per_page)
            .collect();
        Page {
            number,
            num_pages,
            count,
            has_next: number < num_pages,
            has_previous: number > 1,
            next_page_number: (number < num_pages).then(|| number + 1),
            previous_page_number: (number > 1).then(|| number - 1),
            start_index: if items.is_empty() { 0 } else { start + 1 },
            items,
        }
    }
}

impl<T> Page<T> {
    pub(crate) fn is_paginated(&self) -> bool {
        self.num_pages > 1
    }
}
