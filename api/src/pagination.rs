//! Page requests, pages, and the pagination headers sent with list responses

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Vec::new(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, property: &str, direction: SortDirection) -> Self {
        self.sort.push(SortOrder {
            property: property.to_string(),
            direction,
        });
        self
    }

    pub fn offset(&self) -> i64 {
        self.page as i64 * self.size as i64
    }

    /// Reads `page`, `size` and repeated `sort=prop[,prop...][,asc|desc]` parameters.
    /// Sort properties must appear in `sortable`.
    pub fn from_params(params: &[(String, String)], sortable: &[&str]) -> Result<Self, String> {
        let mut request = PageRequest::default();

        for (key, raw) in params {
            match key.as_str() {
                "page" => {
                    let page: i64 = raw
                        .parse()
                        .map_err(|_| format!("Invalid page number: {}", raw))?;
                    request.page = page.clamp(0, u32::MAX as i64) as u32;
                }
                "size" => {
                    let size: i64 = raw
                        .parse()
                        .map_err(|_| format!("Invalid page size: {}", raw))?;
                    request.size = if size < 1 {
                        DEFAULT_PAGE_SIZE
                    } else {
                        size.min(MAX_PAGE_SIZE as i64) as u32
                    };
                }
                "sort" => request.sort.extend(parse_sort(raw, sortable)?),
                _ => {}
            }
        }

        Ok(request)
    }
}

fn parse_sort(raw: &str, sortable: &[&str]) -> Result<Vec<SortOrder>, String> {
    let mut parts: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let direction = match parts.last().map(|p| p.to_ascii_lowercase()) {
        Some(last) if last == "asc" => {
            parts.pop();
            SortDirection::Asc
        }
        Some(last) if last == "desc" => {
            parts.pop();
            SortDirection::Desc
        }
        _ => SortDirection::Asc,
    };

    parts
        .into_iter()
        .map(|property| {
            if sortable.contains(&property) {
                Ok(SortOrder {
                    property: property.to_string(),
                    direction,
                })
            } else {
                Err(format!("Cannot sort by unknown property: {}", property))
            }
        })
        .collect()
}

/// One page of results plus the total number of matches
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            return 0;
        }
        let size = self.size as i64;
        ((self.total_elements + size - 1) / size) as u32
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            page: self.page,
            size: self.size,
        }
    }
}

/// Builds an RFC 5988 `Link` header with next/prev/last/first relations.
/// Filter parameters from the original request are carried into every link.
pub fn link_header<T>(path: &str, params: &[(String, String)], page: &Page<T>) -> String {
    let kept: Vec<String> = params
        .iter()
        .filter(|(key, _)| key != "page" && key != "size")
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect();

    let link = |number: u32, rel: &str| {
        let mut query = kept.clone();
        query.push(format!("page={}", number));
        query.push(format!("size={}", page.size));
        format!("<{}?{}>; rel=\"{}\"", path, query.join("&"), rel)
    };

    let total_pages = page.total_pages();
    let mut links = Vec::new();
    if page.page.saturating_add(1) < total_pages {
        links.push(link(page.page + 1, "next"));
    }
    if page.page > 0 {
        links.push(link(page.page - 1, "prev"));
    }
    let last = total_pages.saturating_sub(1);
    links.push(link(last, "last"));
    links.push(link(0, "first"));
    links.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn page_of(page: u32, size: u32, total: i64) -> Page<()> {
        Page {
            content: Vec::new(),
            total_elements: total,
            page,
            size,
        }
    }

    #[test]
    fn test_defaults_when_no_params() {
        let request = PageRequest::from_params(&[], &["id"]).unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_page_and_size() {
        let request =
            PageRequest::from_params(&params(&[("page", "3"), ("size", "10")]), &[]).unwrap();
        assert_eq!(request.page, 3);
        assert_eq!(request.size, 10);
        assert_eq!(request.offset(), 30);
    }

    #[test]
    fn test_size_is_clamped() {
        let request = PageRequest::from_params(&params(&[("size", "999999")]), &[]).unwrap();
        assert_eq!(request.size, MAX_PAGE_SIZE);

        let request = PageRequest::from_params(&params(&[("size", "0")]), &[]).unwrap();
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);

        let request = PageRequest::from_params(&params(&[("page", "-4")]), &[]).unwrap();
        assert_eq!(request.page, 0);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(PageRequest::from_params(&params(&[("page", "abc")]), &[]).is_err());
        assert!(PageRequest::from_params(&params(&[("size", "1.5")]), &[]).is_err());
    }

    #[test]
    fn test_sort_parsing() {
        let sortable = ["id", "name", "hardware"];
        let request = PageRequest::from_params(
            &params(&[("sort", "name,desc"), ("sort", "id"), ("sort", "hardware,id,ASC")]),
            &sortable,
        )
        .unwrap();

        assert_eq!(
            request.sort,
            vec![
                SortOrder {
                    property: "name".to_string(),
                    direction: SortDirection::Desc
                },
                SortOrder {
                    property: "id".to_string(),
                    direction: SortDirection::Asc
                },
                SortOrder {
                    property: "hardware".to_string(),
                    direction: SortDirection::Asc
                },
                SortOrder {
                    property: "id".to_string(),
                    direction: SortDirection::Asc
                },
            ]
        );
    }

    #[test]
    fn test_unknown_sort_property_rejected() {
        let err = PageRequest::from_params(&params(&[("sort", "password,asc")]), &["id"])
            .unwrap_err();
        assert!(err.contains("password"));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(page_of(0, 20, 0).total_pages(), 0);
        assert_eq!(page_of(0, 20, 20).total_pages(), 1);
        assert_eq!(page_of(0, 20, 21).total_pages(), 2);
    }

    #[test]
    fn test_link_header_first_page() {
        let header = link_header("/api/computers", &[], &page_of(0, 10, 25));
        assert_eq!(
            header,
            "</api/computers?page=1&size=10>; rel=\"next\",\
             </api/computers?page=2&size=10>; rel=\"last\",\
             </api/computers?page=0&size=10>; rel=\"first\""
        );
    }

    #[test]
    fn test_link_header_middle_page_keeps_filters() {
        let query = params(&[("name.contains", "Mac Book"), ("page", "1"), ("size", "10")]);
        let header = link_header("/api/computers", &query, &page_of(1, 10, 25));

        assert!(header.contains(
            "</api/computers?name.contains=Mac%20Book&page=2&size=10>; rel=\"next\""
        ));
        assert!(header.contains(
            "</api/computers?name.contains=Mac%20Book&page=0&size=10>; rel=\"prev\""
        ));
        assert!(header.contains("rel=\"last\""));
        assert!(header.contains("rel=\"first\""));
    }

    #[test]
    fn test_link_header_last_page_has_no_next() {
        let header = link_header("/api/computers", &[], &page_of(2, 10, 25));
        assert!(!header.contains("rel=\"next\""));
        assert!(header.contains("page=1&size=10>; rel=\"prev\""));
    }

    #[test]
    fn test_link_header_past_the_end() {
        let request = PageRequest::from_params(&params(&[("page", "4294967295")]), &[]).unwrap();
        assert_eq!(request.page, u32::MAX);
        assert_eq!(request.offset(), u32::MAX as i64 * DEFAULT_PAGE_SIZE as i64);

        let header = link_header("/api/companies", &[], &page_of(u32::MAX, 20, 3));
        assert!(!header.contains("rel=\"next\""));
        assert!(header.contains("page=4294967294&size=20>; rel=\"prev\""));
        assert!(header.contains("page=0&size=20>; rel=\"last\""));
    }

    #[test]
    fn test_page_map() {
        let page = Page {
            content: vec![1, 2, 3],
            total_elements: 3,
            page: 0,
            size: 20,
        };
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.content, vec![10, 20, 30]);
        assert_eq!(mapped.total_elements, 3);
    }
}
