/// Page-number pagination for list endpoints.
///
/// Lists respond with a `{count, next, previous, results}` envelope where
/// `next`/`previous` are request-relative URLs or null. Page sizes are fixed
/// per endpoint.
use actix_web::HttpRequest;

use crate::error::{AppError, Result};
use crate::models::Paginated;

pub const POSTS_PAGE_SIZE: i64 = 5;
pub const HASHTAGS_PAGE_SIZE: i64 = 10;

/// Resolve the requested page number against the total count.
/// Out-of-range pages are a 404 with detail "Invalid page.".
pub fn resolve_page(page: Option<i64>, count: i64, page_size: i64) -> Result<i64> {
    let page = page.unwrap_or(1);

    if page < 1 || (page > 1 && (page - 1) * page_size >= count) {
        return Err(AppError::NotFound("Invalid page.".to_string()));
    }

    Ok(page)
}

/// Build the pagination envelope for one page of results
pub fn paginate<T>(
    req: &HttpRequest,
    count: i64,
    page: i64,
    page_size: i64,
    results: Vec<T>,
) -> Paginated<T> {
    let next = (page * page_size < count).then(|| page_url(req, page + 1));
    let previous = (page > 1).then(|| page_url(req, page - 1));

    Paginated {
        count,
        next,
        previous,
        results,
    }
}

/// Rebuild the request URL with `page` replaced; a link back to the first
/// page drops the parameter entirely
fn page_url(req: &HttpRequest, page: i64) -> String {
    let mut params: Vec<&str> = req
        .query_string()
        .split('&')
        .filter(|p| !p.is_empty() && !p.starts_with("page="))
        .collect();

    let page_param;
    if page > 1 {
        page_param = format!("page={}", page);
        params.push(&page_param);
    }

    if params.is_empty() {
        req.path().to_string()
    } else {
        format!("{}?{}", req.path(), params.join("&"))
    }
}
