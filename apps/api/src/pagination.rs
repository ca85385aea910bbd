use serde::Serialize;

use crate::errors::AppError;

/// One page of a listing. Page numbers start at 1.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub num_pages: i64,
    pub total: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Resolved window for a requested page of `total` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub page: i64,
    pub num_pages: i64,
    pub limit: i64,
    pub offset: i64,
}

impl Window {
    /// An empty listing still has one (empty) page. Any other page outside
    /// `1..=num_pages` is a 404, like an out-of-range link.
    pub fn resolve(requested: Option<i64>, total: i64, per_page: i64) -> Result<Self, AppError> {
        let num_pages = ((total + per_page - 1) / per_page).max(1);
        let page = requested.unwrap_or(1);
        if page < 1 || page > num_pages {
            return Err(AppError::NotFound(format!("Invalid page {page}")));
        }
        Ok(Window {
            page,
            num_pages,
            limit: per_page,
            offset: (page - 1) * per_page,
        })
    }

    pub fn into_page<T>(self, items: Vec<T>, total: i64) -> Page<T> {
        Page {
            items,
            page: self.page,
            num_pages: self.num_pages,
            total,
            has_next: self.page < self.num_pages,
            has_previous: self.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing_has_one_page() {
        let window = Window::resolve(None, 0, 12).unwrap();
        assert_eq!(window.num_pages, 1);
        assert_eq!(window.offset, 0);
        let page = window.into_page(Vec::<i64>::new(), 0);
        assert!(!page.has_next && !page.has_previous);
    }

    #[test]
    fn last_partial_page() {
        let window = Window::resolve(Some(3), 25, 12).unwrap();
        assert_eq!(window.num_pages, 3);
        assert_eq!(window.offset, 24);
        let page = window.into_page(vec![1], 25);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn out_of_range_page_is_not_found() {
        assert!(matches!(
            Window::resolve(Some(4), 25, 12),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            Window::resolve(Some(0), 25, 12),
            Err(AppError::NotFound(_))
        ));
    }
}
