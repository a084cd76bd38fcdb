use crate::error::Result;

/// Upper bound on pages fetched by [`fetch_all_pages`]
pub const MAX_PAGES: usize = 200;

/// Fetch every page of a page-numbered listing (GitHub style, first page is 1).
///
/// Stops at the first empty or short page.
pub fn fetch_all_pages<T, F>(mut fetch_page: F, page_size: usize) -> Result<Vec<T>>
where
    F: FnMut(usize, usize) -> Result<Vec<T>>,
{
    let mut all_results = Vec::new();

    for page in 1..=MAX_PAGES {
        let page_results = fetch_page(page, page_size)?;
        let page_len = page_results.len();
        all_results.extend(page_results);

        if page_len < page_size {
            break;
        }
    }

    Ok(all_results)
}
