//! This modules defines the common functionality for paging data.

use maud::{Markup, html};
use serde::Serialize;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum number of items to display per page.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 5,
            max_pages: 5,
        }
    }
}

/// The page a client asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    /// A specific, one-based page number.
    Number(u64),
    /// Whichever page is the last one.
    Last,
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::Number(1)
    }
}

impl PageNumber {
    /// Interpret the raw `page` query parameter.
    ///
    /// `"last"` selects the last page. Anything that is not a positive
    /// integer, including a missing value, selects the first page.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("last") => Self::Last,
            Some(text) => match text.parse::<u64>() {
                Ok(number) if number > 0 => Self::Number(number),
                _ => Self::default(),
            },
            None => Self::default(),
        }
    }
}

/// One page of a larger, ordered collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// The items on this page, in the order of the full collection.
    pub items: Vec<T>,
    /// The one-based number of this page.
    pub number: u64,
    /// The total number of pages, at least one.
    pub page_count: u64,
    /// The number of items across all pages.
    pub item_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Slice `items` into the page selected by `requested`.
///
/// Pages past the end are clamped to the last page and an empty collection
/// still produces a single, empty page.
pub fn paginate<T>(items: Vec<T>, page_size: u64, requested: PageNumber) -> Page<T> {
    let page_size = page_size.max(1);
    let item_count = items.len() as u64;
    let page_count = item_count.div_ceil(page_size).max(1);

    let number = match requested {
        PageNumber::Last => page_count,
        PageNumber::Number(number) => number.clamp(1, page_count),
    };

    let offset = ((number - 1) * page_size) as usize;
    let items = items
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect();

    Page {
        items,
        number,
        page_count,
        item_count,
        has_next: number < page_count,
        has_previous: number > 1,
    }
}

/// One entry in the row of page links.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

/// Lay out the page links around `curr_page`.
///
/// At most `max_pages` consecutive pages are listed. The first and last pages
/// are always reachable, with an ellipsis marking any gap.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let window = max_pages.clamp(1, page_count.max(1));
    let half = window / 2;
    let window_start = curr_page
        .saturating_sub(half)
        .clamp(1, page_count.saturating_sub(window) + 1);
    let window_end = window_start + window - 1;

    let mut indicators = Vec::new();

    if curr_page > 1 {
        indicators.push(PaginationIndicator::BackButton(curr_page - 1));
    }

    if window_start > 1 {
        indicators.push(PaginationIndicator::Page(1));
    }
    if window_start > 2 {
        indicators.push(PaginationIndicator::Ellipsis);
    }

    indicators.extend((window_start..=window_end).map(|page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    }));

    if window_end + 1 < page_count {
        indicators.push(PaginationIndicator::Ellipsis);
    }
    if window_end < page_count {
        indicators.push(PaginationIndicator::Page(page_count));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

/// Render the page links for `page`, using `page_url` to build the link for a page number.
///
/// Nothing is rendered when everything fits on one page.
pub fn pagination_view<T>(
    page: &Page<T>,
    max_pages: u64,
    page_url: impl Fn(u64) -> String,
) -> Markup {
    if page.page_count <= 1 {
        return html!();
    }

    let indicators = create_pagination_indicators(page.number, page.page_count, max_pages);
    let link_style = "block px-3 py-2 rounded-sm text-blue-600 hover:underline";

    html! {
        nav class="pagination flex justify-center"
        {
            ul class="pagination flex list-none gap-2 p-0 m-0 items-center"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::CurrPage(number) => {
                                p
                                    aria-current="page"
                                    class="block px-3 py-2 rounded-sm font-bold text-black dark:text-white"
                                { (number) }
                            }
                            PaginationIndicator::Page(number) => {
                                a href=(page_url(number)) class=(link_style) { (number) }
                            }
                            PaginationIndicator::Ellipsis => {
                                p class="px-3 py-2 text-gray-500" { "..." }
                            }
                            PaginationIndicator::NextButton(number) => {
                                a href=(page_url(number)) role="button" class=(link_style) { "Next" }
                            }
                            PaginationIndicator::BackButton(number) => {
                                a href=(page_url(number)) role="button" class=(link_style) { "Back" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod paginate_tests {
    use super::{PageNumber, paginate};

    #[test]
    fn first_page_of_seven_items_has_five() {
        let items: Vec<u32> = (1..=7).collect();

        let page = paginate(items, 5, PageNumber::Number(1));

        assert_eq!(page.items, vec![1, 2, 3, 4, 5]);
        assert_eq!(page.number, 1);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.item_count, 7);
        assert!(page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn second_page_of_seven_items_has_remainder() {
        let items: Vec<u32> = (1..=7).collect();

        let page = paginate(items, 5, PageNumber::Number(2));

        assert_eq!(page.items, vec![6, 7]);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn page_past_the_end_is_clamped_to_last_page() {
        let items: Vec<u32> = (1..=7).collect();

        let page = paginate(items, 5, PageNumber::Number(99));

        assert_eq!(page.number, 2);
        assert_eq!(page.items, vec![6, 7]);
    }

    #[test]
    fn last_selects_final_page() {
        let items: Vec<u32> = (1..=12).collect();

        let page = paginate(items, 5, PageNumber::Last);

        assert_eq!(page.number, 3);
        assert_eq!(page.items, vec![11, 12]);
    }

    #[test]
    fn empty_collection_has_one_empty_page() {
        let page = paginate(Vec::<u32>::new(), 5, PageNumber::Last);

        assert!(page.items.is_empty());
        assert_eq!(page.number, 1);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.item_count, 0);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn exact_multiple_of_page_size_has_no_trailing_empty_page() {
        let items: Vec<u32> = (1..=10).collect();

        let page = paginate(items, 5, PageNumber::Number(2));

        assert_eq!(page.page_count, 2);
        assert_eq!(page.items.len(), 5);
        assert!(!page.has_next);
    }
}

#[cfg(test)]
mod page_number_tests {
    use super::PageNumber;

    #[test]
    fn parses_positive_integers() {
        assert_eq!(PageNumber::parse(Some("3")), PageNumber::Number(3));
    }

    #[test]
    fn parses_last() {
        assert_eq!(PageNumber::parse(Some("last")), PageNumber::Last);
    }

    #[test]
    fn falls_back_to_first_page() {
        for raw in [None, Some(""), Some("0"), Some("-2"), Some("two"), Some("1.5")] {
            assert_eq!(
                PageNumber::parse(raw),
                PageNumber::Number(1),
                "want first page for {raw:?}"
            );
        }
    }
}
