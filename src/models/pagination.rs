use leptos::*;
use leptos_router::*;
use serde::Deserialize;

/// Article listing state kept in the page URL. `page` is one-based.
#[derive(Debug, Params, PartialEq, Clone)]
pub struct ListQuery {
    keyword: Option<String>,
    status: Option<i32>,
    author: Option<String>,
    page: Option<u32>,
    size: Option<u32>,
}

impl ListQuery {
    #[inline]
    pub fn get_keyword(&self) -> &str {
        self.keyword.as_deref().map(str::trim).unwrap_or_default()
    }

    #[inline]
    pub fn get_status(&self) -> Option<i32> {
        self.status
    }

    #[inline]
    pub fn get_author(&self) -> Option<&str> {
        self.author.as_deref().filter(|x| !x.is_empty())
    }

    #[inline]
    pub fn get_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    #[inline]
    pub fn get_size(&self) -> u32 {
        self.size
            .unwrap_or_else(|| crate::config::Config::global().page_size)
            .clamp(1, 100)
    }

    /// A new keyword starts over from the first page.
    #[inline]
    pub fn set_keyword<T: ToString + ?Sized>(mut self, keyword: &T) -> Self {
        self.keyword = Some(keyword.to_string()).filter(|x| !x.trim().is_empty());
        self.page = Some(1);
        self
    }

    #[inline]
    pub fn set_status(mut self, status: Option<i32>) -> Self {
        self.status = status;
        self.page = Some(1);
        self
    }

    #[inline]
    pub fn set_author<T: ToString + ?Sized>(mut self, author: &T) -> Self {
        self.author = Some(author.to_string());
        self
    }

    #[inline]
    pub fn set_size(mut self, size: u32) -> Self {
        self.size = Some(size.clamp(1, 100));
        self
    }

    #[inline]
    pub fn set_page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    #[inline]
    pub fn next_page(mut self) -> Self {
        self.page = Some(self.get_page().saturating_add(1));
        self
    }

    #[inline]
    pub fn previous_page(mut self) -> Self {
        self.page = Some(self.get_page().saturating_sub(1).max(1));
        self
    }

    /// Backend path for this query. Keyword searches go to the search
    /// endpoint, which counts pages from zero.
    pub fn api_path(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if !self.get_keyword().is_empty() {
            query
                .append_pair("keyword", self.get_keyword())
                .append_pair("page", &(self.get_page() - 1).to_string())
                .append_pair("size", &self.get_size().to_string());
            return format!("/api/article/search?{}", query.finish());
        }

        query
            .append_pair("pageNum", &self.get_page().to_string())
            .append_pair("pageSize", &self.get_size().to_string());
        if let Some(author) = self.get_author() {
            query.append_pair("authorId", author);
        }
        if let Some(status) = self.status {
            query.append_pair("status", &status.to_string());
        }
        format!("/api/articles?{}", query.finish())
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            status: None,
            author: None,
            page: Some(1),
            size: None,
        }
    }
}

impl std::fmt::Display for ListQuery {
    /// Route of the listing page that reproduces this query.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if !self.get_keyword().is_empty() {
            query.append_pair("keyword", self.get_keyword());
        }
        if let Some(status) = self.status {
            query.append_pair("status", &status.to_string());
        }
        if self.get_page() > 1 {
            query.append_pair("page", &self.get_page().to_string());
        }
        if let Some(size) = self.size {
            query.append_pair("size", &size.to_string());
        }

        let query = query.finish();
        if query.is_empty() {
            f.write_str("/articles")
        } else {
            write!(f, "/articles?{query}")
        }
    }
}

/// The two page envelopes the backend produces.
#[derive(Debug, Deserialize)]
#[serde(untagged, bound(deserialize = "T: Deserialize<'de>"))]
pub enum RawPage<T> {
    /// Zero-based page from the search endpoint.
    Spring {
        #[serde(deserialize_with = "super::null_as_default")]
        content: Vec<T>,
        #[serde(rename = "totalElements", default, deserialize_with = "super::lenient_count")]
        total_elements: u64,
        #[serde(rename = "totalPages", default, deserialize_with = "super::lenient_count")]
        total_pages: u64,
        #[serde(default, deserialize_with = "super::lenient_count")]
        number: u64,
        #[serde(default, deserialize_with = "super::lenient_count")]
        size: u64,
    },
    /// One-based page from the listing endpoints.
    Records {
        #[serde(deserialize_with = "super::null_as_default")]
        records: Vec<T>,
        #[serde(default, deserialize_with = "super::lenient_count")]
        total: u64,
        #[serde(default, deserialize_with = "super::lenient_count")]
        pages: u64,
        #[serde(default, deserialize_with = "super::lenient_count")]
        current: u64,
        #[serde(default, deserialize_with = "super::lenient_count")]
        size: u64,
    },
}

/// A page of results with a one-based `current` index.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: u64,
    pub pages: u64,
    pub current: u64,
    pub size: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            total: 0,
            pages: 0,
            current: 1,
            size: 0,
        }
    }
}

impl<T> From<RawPage<T>> for Page<T> {
    fn from(raw: RawPage<T>) -> Self {
        match raw {
            RawPage::Spring {
                content,
                total_elements,
                total_pages,
                number,
                size,
            } => Page {
                records: content,
                total: total_elements,
                pages: total_pages,
                current: number + 1,
                size,
            },
            RawPage::Records {
                records,
                total,
                pages,
                current,
                size,
            } => Page {
                records,
                total,
                pages,
                current: current.max(1),
                size,
            },
        }
    }
}

impl<T> Page<T> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.current < self.pages
    }
}
