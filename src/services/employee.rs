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

use std::collections::HashMap;

use chrono::NaiveDate;
use reqwest_middleware::ClientWithMiddleware as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;
use crate::reports::expiry::{DocumentHolder, FieldSpec};
use crate::services::types::{
    BranchId, DocumentKind, DocumentRecord, EmployeeId, EmployeeStatus, lenient_date,
};
use crate::services::{Ack, JsonClient};
use crate::{Result, services::TokenProvider};

/// Expiry dates of the personal documents tracked per person, kept as the
/// raw strings the backend stores. Parsing happens in the expiry classifier,
/// which tolerates junk.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentExpiries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_card: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub branch_id: Option<BranchId>,

    /// Denormalized branch display name as the backend still returns it.
    /// Joins go through `BranchIndex` on `branch_id`.
    #[serde(default)]
    pub branch: Option<String>,

    #[serde(default)]
    pub status: EmployeeStatus,

    #[serde(default)]
    pub qid_number: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "lenient_date")]
    pub join_date: Option<NaiveDate>,

    #[serde(default)]
    pub document_expiries: DocumentExpiries,

    #[serde(default)]
    pub documents: HashMap<DocumentKind, DocumentRecord>,
}

impl DocumentHolder for Employee {
    fn holder_name(&self) -> &str {
        &self.name
    }

    fn holder_location(&self) -> Option<&str> {
        self.branch.as_deref()
    }
}

impl Employee {
    pub fn document_fields() -> Vec<FieldSpec<Employee>> {
        vec![
            FieldSpec::new("QID", |e: &Employee| e.document_expiries.qid.as_deref()),
            FieldSpec::new("Passport", |e: &Employee| {
                e.document_expiries.passport.as_deref()
            }),
            FieldSpec::new("Visa", |e: &Employee| e.document_expiries.visa.as_deref()),
            FieldSpec::new("Medical Card", |e: &Employee| {
                e.document_expiries.medical_card.as_deref()
            }),
        ]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TempEmployee {
    pub id: EmployeeId,
    pub name: String,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub work_location: Option<String>,

    /// Branch that sponsored the visa, when different from the work
    /// location.
    #[serde(default)]
    pub visa_added_branch: Option<String>,

    #[serde(default)]
    pub status: EmployeeStatus,

    #[serde(default)]
    pub qid_number: Option<String>,

    #[serde(default)]
    pub document_expiries: DocumentExpiries,

    #[serde(default)]
    pub documents: HashMap<DocumentKind, DocumentRecord>,
}

impl DocumentHolder for TempEmployee {
    fn holder_name(&self) -> &str {
        &self.name
    }

    fn holder_location(&self) -> Option<&str> {
        self.work_location.as_deref()
    }
}

impl TempEmployee {
    pub fn document_fields() -> Vec<FieldSpec<TempEmployee>> {
        vec![
            FieldSpec::new("QID", |e: &TempEmployee| e.document_expiries.qid.as_deref()),
            FieldSpec::new("Passport", |e: &TempEmployee| {
                e.document_expiries.passport.as_deref()
            }),
            FieldSpec::new("Visa", |e: &TempEmployee| {
                e.document_expiries.visa.as_deref()
            }),
            FieldSpec::new("Medical Card", |e: &TempEmployee| {
                e.document_expiries.medical_card.as_deref()
            }),
        ]
    }
}

#[derive(Serialize, Debug, Clone, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeParams {
    #[builder(setter(into))]
    pub name: String,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,

    #[builder(default)]
    pub status: EmployeeStatus,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qid_number: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<NaiveDate>,

    #[builder(default)]
    pub document_expiries: DocumentExpiries,
}

#[derive(Serialize, Debug, Clone, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
pub struct TempEmployeeParams {
    #[builder(setter(into))]
    pub name: String,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_location: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visa_added_branch: Option<String>,

    #[builder(default)]
    pub status: EmployeeStatus,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qid_number: Option<String>,

    #[builder(default)]
    pub document_expiries: DocumentExpiries,
}

#[derive(Clone)]
pub struct EmployeeClient {
    token: SecretString,
    base: Url,
    http: HttpClient,
}

impl PartialEq for EmployeeClient {
    fn eq(&self, other: &Self) -> bool {
        self.token.expose_secret() == other.token.expose_secret() && self.base == other.base
    }
}

impl TokenProvider for &EmployeeClient {
    fn provide_token(&self) -> Option<&str> {
        Some(self.token.expose_secret())
    }
}

impl EmployeeClient {
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

    pub async fn list(&self) -> Result<Vec<Employee>> {
        self.http.get_json(self, self.url("employees")?).await
    }

    pub async fn get(&self, id: EmployeeId) -> Result<Employee> {
        self.http.get_json(self, self.url(&format!("employees/{id}"))?).await
    }

    pub async fn create(&self, params: &EmployeeParams) -> Result<Employee> {
        self.http.post_json(self, self.url("employees")?, params).await
    }

    pub async fn update(&self, id: EmployeeId, params: &EmployeeParams) -> Result<Employee> {
        self.http
            .put_json(self, self.url(&format!("employees/{id}"))?, params)
            .await
    }

    pub async fn delete(&self, id: EmployeeId) -> Result<()> {
        let ack: Ack = self
            .http
            .delete_json(self, self.url(&format!("employees/{id}"))?)
            .await?;

        ack.into_result()
    }

    pub async fn list_temp(&self) -> Result<Vec<TempEmployee>> {
        self.http.get_json(self, self.url("temp-employees")?).await
    }

    pub async fn create_temp(&self, params: &TempEmployeeParams) -> Result<TempEmployee> {
        self.http
            .post_json(self, self.url("temp-employees")?, params)
            .await
    }

    pub async fn update_temp(
        &self,
        id: EmployeeId,
        params: &TempEmployeeParams,
    ) -> Result<TempEmployee> {
        self.http
            .put_json(self, self.url(&format!("temp-employees/{id}"))?, params)
            .await
    }

    pub async fn delete_temp(&self, id: EmployeeId) -> Result<()> {
        let ack: Ack = self
            .http
            .delete_json(self, self.url(&format!("temp-employees/{id}"))?)
            .await?;

        ack.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_backend_records_deserialize_with_defaults() {
        let raw = r#"{
            "id": "7f1c6a2e-9f1b-4c64-8d9e-2f6a1b3c4d5e",
            "name": "Ahmed",
            "documentExpiries": {"qid": "2024-06-03"}
        }"#;

        let employee: Employee = serde_json::from_str(raw).unwrap();

        assert_eq!(employee.status, EmployeeStatus::Active);
        assert!(employee.branch_id.is_none());
        assert!(employee.documents.is_empty());
        assert_eq!(employee.document_expiries.qid.as_deref(), Some("2024-06-03"));
        assert!(employee.document_expiries.passport.is_none());
    }

    #[test]
    fn malformed_join_date_does_not_fail_the_record() {
        let raw = r#"{
            "id": "7f1c6a2e-9f1b-4c64-8d9e-2f6a1b3c4d5e",
            "name": "Ahmed",
            "joinDate": "unknown"
        }"#;

        let employee: Employee = serde_json::from_str(raw).unwrap();

        assert!(employee.join_date.is_none());
    }

    #[test]
    fn params_builder_produces_camel_case_payload() {
        let params = EmployeeParamsBuilder::default()
            .name("Maryam")
            .role("Cashier")
            .build()
            .unwrap();

        let value = serde_json::to_value(&params).unwrap();

        assert_eq!(value["name"], "Maryam");
        assert_eq!(value["role"], "Cashier");
        assert_eq!(value["status"], "active");
        assert!(value.get("branchId").is_none());
        assert!(value.get("joinDate").is_none());
    }

    #[test]
    fn document_fields_cover_the_four_personal_documents() {
        let labels: Vec<&str> = Employee::document_fields()
            .iter()
            .map(|f| f.label)
            .collect();

        assert_eq!(labels, vec!["QID", "Passport", "Visa", "Medical Card"]);
    }
}
