//! Envelope types shared by several endpoints

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Acknowledgement returned by write endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    /// Treat an explicit `success: false` as a failure
    pub fn into_result(self) -> Result<Ack> {
        match self.success {
            Some(false) => Err(Error::Other(
                self.message
                    .unwrap_or_else(|| "Backend rejected the update".to_string()),
            )),
            _ => Ok(self),
        }
    }
}

/// Paging information returned by list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub pages: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    /// Build a page, falling back to the requested page number and a single
    /// page when the backend omitted pagination
    pub fn new(items: Vec<T>, pagination: Option<Pagination>, requested: u32, limit: u32) -> Self {
        let (page, pages) = match pagination {
            Some(p) => (p.page.max(1), p.pages.max(1)),
            None => (requested, 1),
        };
        Self {
            items,
            page,
            pages,
            limit,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// One-based row number of the item at `index` across all pages
    pub fn row_number(&self, index: usize) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.limit as u64 + index as u64 + 1
    }
}
