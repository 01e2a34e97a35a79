use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;

pub const DEFAULT_PAGE: i64 = 0;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Paging and sorting parameters extracted from the query string
/// All fields are optional; defaults are applied by [`QueryValidator`]
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page number (default 0)
    pub page: Option<i64>,
    /// Items per page, 1..=100 (default 10)
    pub size: Option<i64>,
    /// id, title, description, content, created_at or updated_at (default id)
    pub sort_by: Option<String>,
    /// "asc" (default); any other value sorts descending
    pub sort_order: Option<String>,
}

/// Columns posts can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSortField {
    Id,
    Title,
    Description,
    Content,
    CreatedAt,
    UpdatedAt,
}

impl PostSortField {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            "content" => Some(Self::Content),
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            "updated_at" | "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Description => "description",
            Self::Content => "content",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Validated and normalized paging request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub sort_field: PostSortField,
    pub sort_order: SortOrder,
}

impl PageRequest {
    /// Never overflows: [`QueryValidator::validate`] bounds `page * size`
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    /// ORDER BY body; both parts come from closed enums so the string is safe to splice.
    /// `id` is appended as a tiebreaker so pages are stable.
    pub fn order_clause(&self) -> String {
        let order = match self.sort_order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        if self.sort_field == PostSortField::Id {
            format!("id {}", order)
        } else {
            format!("{} {}, id {}", self.sort_field.column(), order, order)
        }
    }
}

/// Page bookkeeping returned alongside the content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub last: bool,
}

impl PageMeta {
    pub fn new(request: &PageRequest, total_elements: i64) -> Self {
        let total_elements = total_elements.max(0);
        let mut total_pages = total_elements / request.size;
        if total_elements % request.size != 0 {
            total_pages += 1;
        }
        Self {
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
            last: request.page >= total_pages.saturating_sub(1),
        }
    }
}

/// Query parameter validator
pub struct QueryValidator;

impl QueryValidator {
    /// Applies defaults and rejects out-of-range values
    pub fn validate(params: PageParams) -> Result<PageRequest, ApiError> {
        let page = params.page.unwrap_or(DEFAULT_PAGE);
        if page < 0 {
            return Err(ApiError::BadRequest("page must not be negative".to_string()));
        }

        let size = params.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(ApiError::BadRequest(format!(
                "size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if page.checked_mul(size).is_none() {
            return Err(ApiError::BadRequest("page is too large".to_string()));
        }

        let sort_field = match params.sort_by.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => PostSortField::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("cannot sort by '{}'", raw)))?,
            None => PostSortField::Id,
        };

        let sort_order = match params.sort_order.as_deref() {
            Some(raw) if !raw.trim().eq_ignore_ascii_case("asc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        };

        Ok(PageRequest {
            page,
            size,
            sort_field,
            sort_order,
        })
    }

    /// Normalizes a free-text search term, rejecting blanks
    pub fn search_term(raw: &str) -> Result<String, ApiError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ApiError::BadRequest("query must not be blank".to_string()));
        }
        Ok(trimmed.to_string())
    }
}

/// Builds an ILIKE pattern matching `term` anywhere, with wildcards escaped
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, size: Option<i64>, sort_by: Option<&str>, order: Option<&str>) -> PageParams {
        PageParams {
            page,
            size,
            sort_by: sort_by.map(String::from),
            sort_order: order.map(String::from),
        }
    }

    #[test]
    fn test_defaults() {
        let request = QueryValidator::validate(PageParams::default()).unwrap();
        assert_eq!(request.page, 0);
        assert_eq!(request.size, 10);
        assert_eq!(request.sort_field, PostSortField::Id);
        assert_eq!(request.sort_order, SortOrder::Asc);
        assert_eq!(request.offset(), 0);
        assert_eq!(request.order_clause(), "id ASC");
    }

    #[test]
    fn test_sort_order_is_case_insensitive_and_defaults_to_desc() {
        let asc = QueryValidator::validate(params(None, None, None, Some("ASC"))).unwrap();
        assert_eq!(asc.sort_order, SortOrder::Asc);

        let desc = QueryValidator::validate(params(None, None, None, Some("desc"))).unwrap();
        assert_eq!(desc.sort_order, SortOrder::Desc);

        let other = QueryValidator::validate(params(None, None, None, Some("sideways"))).unwrap();
        assert_eq!(other.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_sort_field_whitelist() {
        let request = QueryValidator::validate(params(Some(2), Some(5), Some("title"), Some("desc"))).unwrap();
        assert_eq!(request.offset(), 10);
        assert_eq!(request.order_clause(), "title DESC, id DESC");

        let camel = QueryValidator::validate(params(None, None, Some("createdAt"), None)).unwrap();
        assert_eq!(camel.sort_field, PostSortField::CreatedAt);

        let injected = QueryValidator::validate(params(None, None, Some("id; DROP TABLE posts"), None));
        assert!(injected.is_err());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(QueryValidator::validate(params(Some(-1), None, None, None)).is_err());
        assert!(QueryValidator::validate(params(None, Some(0), None, None)).is_err());
        assert!(QueryValidator::validate(params(None, Some(101), None, None)).is_err());
        assert!(QueryValidator::validate(params(None, Some(100), None, None)).is_ok());
    }

    #[test]
    fn test_rejects_page_whose_offset_overflows() {
        let err = QueryValidator::validate(params(Some(i64::MAX / 5), Some(10), None, None)).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

        // The largest page that still fits stays usable end to end
        let request = QueryValidator::validate(params(Some(i64::MAX), Some(1), None, None)).unwrap();
        assert_eq!(request.offset(), i64::MAX);
        let meta = PageMeta::new(&request, 5);
        assert_eq!(meta.total_pages, 5);
        assert!(meta.last);
    }

    #[test]
    fn test_page_meta() {
        let request = QueryValidator::validate(params(Some(0), Some(10), None, None)).unwrap();
        let meta = PageMeta::new(&request, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(!meta.last);

        let request = QueryValidator::validate(params(Some(2), Some(10), None, None)).unwrap();
        assert!(PageMeta::new(&request, 25).last);

        let empty = PageMeta::new(&request, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.last);
    }

    #[test]
    fn test_search_term() {
        assert_eq!(QueryValidator::search_term("  rust ").unwrap(), "rust");
        assert!(QueryValidator::search_term("   ").is_err());
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("rust"), "%rust%");
        assert_eq!(contains_pattern("100%_x"), "%100\\%\\_x%");
    }
}
