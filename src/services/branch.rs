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

use reqwest_middleware::ClientWithMiddleware as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;
use crate::reports::expiry::{DocumentHolder, FieldSpec};
use crate::services::employee::Employee;
use crate::services::types::{BranchId, DocumentKind, DocumentRecord, VehicleStatus};
use crate::services::{Ack, JsonClient, TokenProvider};
use crate::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BranchDocuments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cr_expiry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruksa_expiry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computer_card_expiry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification_expiry: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Natural key; a vehicle belongs to exactly one branch at a time.
    pub license_number: String,

    #[serde(default)]
    pub make: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default, deserialize_with = "crate::optional_rounded_float")]
    pub year: Option<u16>,

    #[serde(default)]
    pub license_expiry: Option<String>,

    #[serde(default)]
    pub insurance_expiry: Option<String>,

    #[serde(default)]
    pub status: VehicleStatus,
}

impl DocumentHolder for Vehicle {
    fn holder_name(&self) -> &str {
        &self.license_number
    }
}

impl Vehicle {
    pub fn document_fields() -> Vec<FieldSpec<Vehicle>> {
        vec![
            FieldSpec::new("Vehicle License", |v: &Vehicle| v.license_expiry.as_deref()),
            FieldSpec::new("Vehicle Insurance", |v: &Vehicle| {
                v.insurance_expiry.as_deref()
            }),
        ]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: BranchId,
    pub name: String,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub manager: Option<String>,

    #[serde(default)]
    pub contact_number: Option<String>,

    #[serde(default)]
    pub vehicles: Vec<Vehicle>,

    #[serde(default)]
    pub branch_documents: BranchDocuments,

    #[serde(default)]
    pub documents: HashMap<DocumentKind, DocumentRecord>,
}

impl DocumentHolder for Branch {
    fn holder_name(&self) -> &str {
        &self.name
    }

    fn holder_location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl Branch {
    pub fn document_fields() -> Vec<FieldSpec<Branch>> {
        vec![
            FieldSpec::new("CR", |b: &Branch| b.branch_documents.cr_expiry.as_deref()),
            FieldSpec::new("Ruksa", |b: &Branch| {
                b.branch_documents.ruksa_expiry.as_deref()
            }),
            FieldSpec::new("Computer Card", |b: &Branch| {
                b.branch_documents.computer_card_expiry.as_deref()
            }),
            FieldSpec::new("Certification", |b: &Branch| {
                b.branch_documents.certification_expiry.as_deref()
            }),
        ]
    }

    pub fn vehicle(&self, license_number: &str) -> Option<&Vehicle> {
        self.vehicles
            .iter()
            .find(|v| v.license_number == license_number)
    }
}

#[derive(Serialize, Debug, Clone, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
pub struct BranchParams {
    #[builder(setter(into))]
    pub name: String,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,

    #[builder(default)]
    pub branch_documents: BranchDocuments,
}

/// Branch-id keyed membership index, built once per employee snapshot.
/// Replaces render-time name-equality scans over the employee list.
pub struct BranchIndex<'a> {
    members: HashMap<BranchId, Vec<&'a Employee>>,
}

impl<'a> BranchIndex<'a> {
    pub fn build(employees: &'a [Employee]) -> Self {
        let mut members: HashMap<BranchId, Vec<&Employee>> = HashMap::new();

        for employee in employees {
            if let Some(branch_id) = employee.branch_id {
                members.entry(branch_id).or_default().push(employee);
            }
        }

        Self { members }
    }

    pub fn members(&self, branch: BranchId) -> &[&'a Employee] {
        self.members.get(&branch).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn headcount(&self, branch: BranchId) -> usize {
        self.members(branch).len()
    }
}

#[derive(Clone)]
pub struct BranchClient {
    token: SecretString,
    base: Url,
    http: HttpClient,
}

impl PartialEq for BranchClient {
    fn eq(&self, other: &Self) -> bool {
        self.token.expose_secret() == other.token.expose_secret() && self.base == other.base
    }
}

impl TokenProvider for &BranchClient {
    fn provide_token(&self) -> Option<&str> {
        Some(self.token.expose_secret())
    }
}

impl BranchClient {
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

    pub async fn list(&self) -> Result<Vec<Branch>> {
        self.http.get_json(self, self.url("branches")?).await
    }

    pub async fn get(&self, id: BranchId) -> Result<Branch> {
        self.http.get_json(self, self.url(&format!("branches/{id}"))?).await
    }

    pub async fn create(&self, params: &BranchParams) -> Result<Branch> {
        self.http.post_json(self, self.url("branches")?, params).await
    }

    pub async fn update(&self, id: BranchId, params: &BranchParams) -> Result<Branch> {
        self.http
            .put_json(self, self.url(&format!("branches/{id}"))?, params)
            .await
    }

    pub async fn delete(&self, id: BranchId) -> Result<()> {
        let ack: Ack = self
            .http
            .delete_json(self, self.url(&format!("branches/{id}"))?)
            .await?;

        ack.into_result()
    }

    pub async fn add_vehicle(&self, branch: BranchId, vehicle: &Vehicle) -> Result<Branch> {
        self.http
            .post_json(self, self.url(&format!("branches/{branch}/vehicles"))?, vehicle)
            .await
    }

    pub async fn remove_vehicle(&self, branch: BranchId, license_number: &str) -> Result<Branch> {
        let ack: Ack = self
            .http
            .delete_json(
                self,
                self.url(&format!("branches/{branch}/vehicles/{license_number}"))?,
            )
            .await?;

        ack.into_result()?;
        self.get(branch).await
    }

    /// Two requests, not a transaction: the vehicle is removed from the
    /// source branch, then added to the target. A failed second leg is
    /// reported as `Error::VehicleDetached` so the caller knows the vehicle
    /// is currently attached to no branch.
    pub async fn move_vehicle(
        &self,
        from: BranchId,
        to: BranchId,
        license_number: &str,
    ) -> Result<Branch> {
        let source = self.get(from).await?;

        let vehicle = source
            .vehicle(license_number)
            .cloned()
            .ok_or(Error::Other("vehicle not found on source branch"))?;

        self.remove_vehicle(from, license_number).await?;

        match self.add_vehicle(to, &vehicle).await {
            Ok(branch) => Ok(branch),
            Err(error) => Err(Error::VehicleDetached(
                license_number.to_owned(),
                Box::new(error),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn employee(id: u128, name: &str, branch_id: Option<BranchId>) -> Employee {
        serde_json::from_value(serde_json::json!({
            "id": Uuid::from_u128(id),
            "name": name,
            "branchId": branch_id,
        }))
        .unwrap()
    }

    #[test]
    fn index_groups_employees_by_branch_id() {
        let main = Uuid::from_u128(1);
        let airport = Uuid::from_u128(2);

        let employees = vec![
            employee(10, "Ahmed", Some(main)),
            employee(11, "Maryam", Some(main)),
            employee(12, "Jassim", Some(airport)),
            employee(13, "Noor", None),
        ];

        let index = BranchIndex::build(&employees);

        assert_eq!(index.headcount(main), 2);
        assert_eq!(index.headcount(airport), 1);
        assert_eq!(index.members(main)[0].name, "Ahmed");
        assert!(index.members(Uuid::from_u128(99)).is_empty());
    }

    #[test]
    fn vehicle_year_tolerates_float_json() {
        let vehicle: Vehicle = serde_json::from_str(
            r#"{"licenseNumber": "123456", "year": 2019.0, "status": "maintenance"}"#,
        )
        .unwrap();

        assert_eq!(vehicle.year, Some(2019));
        assert_eq!(vehicle.status, VehicleStatus::Maintenance);
    }

    #[test]
    fn branch_document_fields_cover_the_four_licenses() {
        let labels: Vec<&str> = Branch::document_fields().iter().map(|f| f.label).collect();

        assert_eq!(labels, vec!["CR", "Ruksa", "Computer Card", "Certification"]);
    }
}
