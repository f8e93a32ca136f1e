//! Page requests and paged responses.

use crate::error::ValidationError;
use crate::validation::messages;
use serde::{Deserialize, Serialize};

/// Default page number.
pub const DEFAULT_PAGE_NUMBER: u32 = 1;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Largest allowed page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query for one page of todos.
///
/// Deserializes from `?pageNumber=&pageSize=&isArchived=`; every parameter is
/// optional. Values are signed on the wire so that out-of-range input such as
/// `pageNumber=0` or `pageSize=-5` reaches [`PageRequest::validate`] instead of
/// failing to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    /// 1-based page number
    pub page_number: i64,
    /// Items per page
    pub page_size: i64,
    /// List archived todos instead of active ones
    pub is_archived: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: i64::from(DEFAULT_PAGE_NUMBER),
            page_size: i64::from(DEFAULT_PAGE_SIZE),
            is_archived: false,
        }
    }
}

impl PageRequest {
    /// First page of active todos with the default size.
    #[must_use]
    pub fn active() -> Self {
        Self::default()
    }

    /// First page of archived todos with the default size.
    #[must_use]
    pub fn archived() -> Self {
        Self {
            is_archived: true,
            ..Self::default()
        }
    }

    /// Set the page number and size.
    #[must_use]
    pub const fn page(mut self, page_number: i64, page_size: i64) -> Self {
        self.page_number = page_number;
        self.page_size = page_size;
        self
    }

    /// Checks the paging values.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `page_number < 1` or `page_size` is
    /// outside `1..=100`.
    pub fn validate(&self) -> Result<ValidPage, ValidationError> {
        let mut errors = ValidationError::new();

        let page_number = u32::try_from(self.page_number)
            .ok()
            .filter(|n| *n >= 1);
        if page_number.is_none() {
            errors.push("pageNumber", messages::PAGE_NUMBER_RANGE);
        }

        let page_size = u32::try_from(self.page_size)
            .ok()
            .filter(|n| (1..=MAX_PAGE_SIZE).contains(n));
        if page_size.is_none() {
            errors.push("pageSize", messages::PAGE_SIZE_RANGE);
        }

        match (page_number, page_size) {
            (Some(page_number), Some(page_size)) => Ok(ValidPage {
                page_number,
                page_size,
                is_archived: self.is_archived,
            }),
            _ => Err(errors),
        }
    }
}

/// A [`PageRequest`] whose values are known to be in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidPage {
    /// 1-based page number
    pub page_number: u32,
    /// Items per page, `1..=100`
    pub page_size: u32,
    /// List archived todos instead of active ones
    pub is_archived: bool,
}

impl ValidPage {
    /// Number of matching items to skip.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page_number as usize - 1).saturating_mul(self.page_size as usize)
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.page_size as usize
    }
}

/// One page of results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Number of matching items across all pages
    pub total_count: usize,
    /// Echoed page number
    pub page_number: u32,
    /// Echoed page size
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Convert every item, keeping the paging values.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}
