//! Prospect service
//!
//! Targeted company search over the paginated prospect source.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::entities::Prospect;
use crate::domain::ports::{ProspectFilters, ProspectSource};
use crate::error::AppError;

/// Company search with local filtering
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProspectSearch {
    #[serde(flatten)]
    pub filters: ProspectFilters,
    /// Company names to leave out, e.g. existing customers
    #[serde(default)]
    pub exclude_existing: Vec<String>,
    /// Companies with a known revenue below this are dropped
    #[serde(default)]
    pub min_revenue: Option<f64>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    1000
}

impl Default for ProspectSearch {
    fn default() -> Self {
        Self {
            filters: ProspectFilters::default(),
            exclude_existing: Vec::new(),
            min_revenue: None,
            max_results: default_max_results(),
        }
    }
}

pub struct ProspectService<P>
where
    P: ProspectSource,
{
    source: Arc<P>,
}

impl<P> ProspectService<P>
where
    P: ProspectSource,
{
    pub fn new(source: Arc<P>) -> Self {
        Self { source }
    }

    /// Page through the source until `max_results` prospects pass the filters
    /// or the last page is reached
    pub async fn targeted_companies(
        &self,
        search: &ProspectSearch,
    ) -> Result<Vec<Prospect>, AppError> {
        let excluded: HashSet<String> = search
            .exclude_existing
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect();

        let mut results = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        while results.len() < search.max_results {
            let page = self
                .source
                .search_page(&search.filters, cursor.as_deref())
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Error in company search");
                    e
                })?;
            pages += 1;

            for prospect in page.prospects {
                if results.len() >= search.max_results {
                    break;
                }
                if excluded.contains(&prospect.company_name.trim().to_lowercase()) {
                    continue;
                }
                if let (Some(min), Some(revenue)) = (search.min_revenue, prospect.estimated_revenue)
                {
                    if revenue < min {
                        continue;
                    }
                }
                results.push(prospect);
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tracing::info!(count = results.len(), pages, "Company search finished");
        Ok(results)
    }
}
