//! Prospect source port trait
//!
//! Company search and enrichment.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Prospect;
use crate::error::ExternalServiceError;

/// Search filters forwarded to the prospect source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProspectFilters {
    #[serde(default)]
    pub industries: Vec<String>,
    /// Employee range, e.g. "50-1000"
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default = "default_keywords")]
    pub keywords: String,
}

fn default_keywords() -> String {
    "payment processing".to_string()
}

impl Default for ProspectFilters {
    fn default() -> Self {
        Self {
            industries: Vec::new(),
            company_size: None,
            locations: Vec::new(),
            keywords: default_keywords(),
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProspectPage {
    pub prospects: Vec<Prospect>,
    /// Cursor for the next page; `None` on the last page
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[async_trait]
pub trait ProspectSource: Send + Sync {
    async fn search_page(
        &self,
        filters: &ProspectFilters,
        cursor: Option<&str>,
    ) -> Result<ProspectPage, ExternalServiceError>;

    /// Enrich a company by name; `None` when the source does not know it
    async fn lookup_company(&self, name: &str) -> Result<Option<Prospect>, ExternalServiceError>;
}
