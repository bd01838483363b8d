//
// Copyright © 2025 Hardcore Engineering Inc.
//
// Licensed under the Eclipse Public License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License. You may
// obtain a copy of the License at https://www.eclipse.org/legal/epl-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//
// See the License for the specific language governing permissions and
// limitations under the License.
//

use chrono::NaiveDate;
use reqwest_middleware::ClientWithMiddleware as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;
use crate::services::types::{BranchId, ExpenditureId, lenient_date};
use crate::services::{Ack, JsonClient, TokenProvider};
use crate::Result;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expenditure {
    pub id: ExpenditureId,

    #[serde(default)]
    pub branch_id: Option<BranchId>,

    #[serde(default)]
    pub category: Option<String>,

    pub amount: f64,

    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize, Debug, Clone, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
pub struct ExpenditureParams {
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub amount: f64,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One dashboard card: a category's spend and its share of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,
    pub share: f64,
}

/// Per-category totals and percentage shares, largest first. Uncategorized
/// spend lands under "Other".
pub fn summarize(items: &[Expenditure]) -> Vec<CategoryShare> {
    let mut totals: Vec<(String, f64)> = Vec::new();

    for item in items {
        let category = item.category.as_deref().unwrap_or("Other");

        match totals.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => *total += item.amount,
            None => totals.push((category.to_owned(), item.amount)),
        }
    }

    let grand_total: f64 = totals.iter().map(|(_, total)| total).sum();

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, total)| CategoryShare {
            category,
            total,
            share: if grand_total > 0.0 {
                total * 100.0 / grand_total
            } else {
                0.0
            },
        })
        .collect();

    shares.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    shares
}

#[derive(Clone)]
pub struct ExpenditureClient {
    token: SecretString,
    base: Url,
    http: HttpClient,
}

impl PartialEq for ExpenditureClient {
    fn eq(&self, other: &Self) -> bool {
        self.token.expose_secret() == other.token.expose_secret() && self.base == other.base
    }
}

impl TokenProvider for &ExpenditureClient {
    fn provide_token(&self) -> Option<&str> {
        Some(self.token.expose_secret())
    }
}

impl ExpenditureClient {
    pub(crate) fn new(config: &Config, http: HttpClient, token: impl Into<SecretString>) -> Self {
        Self {
            http,
            base: config.api_service.clone(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    pub async fn list(&self) -> Result<Vec<Expenditure>> {
        self.http.get_json(self, self.url("expenditures")?).await
    }

    pub async fn create(&self, params: &ExpenditureParams) -> Result<Expenditure> {
        self.http.post_json(self, self.url("expenditures")?, params).await
    }

    pub async fn update(
        &self,
        id: ExpenditureId,
        params: &ExpenditureParams,
    ) -> Result<Expenditure> {
        self.http
            .put_json(self, self.url(&format!("expenditures/{id}"))?, params)
            .await
    }

    pub async fn delete(&self, id: ExpenditureId) -> Result<()> {
        let ack: Ack = self
            .http
            .delete_json(self, self.url(&format!("expenditures/{id}"))?)
            .await?;

        ack.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn expenditure(category: Option<&str>, amount: f64) -> Expenditure {
        Expenditure {
            id: Uuid::from_u128(1),
            branch_id: None,
            category: category.map(str::to_owned),
            amount,
            date: None,
            description: None,
        }
    }

    #[test]
    fn summarize_totals_and_shares_by_category() {
        let items = [
            expenditure(Some("Rent"), 6000.0),
            expenditure(Some("Salaries"), 3000.0),
            expenditure(Some("Rent"), 2000.0),
            expenditure(None, 1000.0),
        ];

        let shares = summarize(&items);

        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0].category, "Rent");
        assert_eq!(shares[0].total, 8000.0);
        assert!((shares[0].share - 8000.0 / 12000.0 * 100.0).abs() < 1e-9);
        assert_eq!(shares[2].category, "Other");
    }

    #[test]
    fn summarize_of_nothing_is_empty() {
        assert!(summarize(&[]).is_empty());
    }
}
