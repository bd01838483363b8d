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
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub type EmployeeId = Uuid;
pub type BranchId = Uuid;
pub type VacationId = Uuid;
pub type ExpenditureId = Uuid;

pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Every document kind tracked across employees, temp employees, branches
/// and vehicles. Also the key under which an uploaded file is stored on the
/// owning entity.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DocumentKind {
    Qid,
    Passport,
    Visa,
    MedicalCard,
    Cr,
    Ruksa,
    ComputerCard,
    Certification,
    VehicleLicense,
    VehicleInsurance,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    OnVacation,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VehicleStatus {
    #[default]
    Active,
    Maintenance,
    OutOfService,
}

/// An uploaded file as stored per document kind on the owning entity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub url: String,
    pub file_name: String,
    pub uploaded_at: Timestamp,
}

/// Backend dates arrive as ISO strings and are occasionally absent or junk;
/// reads degrade to `None` instead of failing the whole entity.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    Ok(raw
        .as_deref()
        .and_then(crate::reports::expiry::parse_expiry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_kinds_serialize_camel_case() {
        assert_eq!(
            serde_json::to_string(&DocumentKind::MedicalCard).unwrap(),
            "\"medicalCard\""
        );
        assert_eq!(DocumentKind::ComputerCard.to_string(), "computerCard");
    }

    #[test]
    fn lenient_date_tolerates_junk() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default, deserialize_with = "lenient_date")]
            date: Option<NaiveDate>,
        }

        let ok: Probe = serde_json::from_str(r#"{"date": "2024-06-01"}"#).unwrap();
        assert!(ok.date.is_some());

        let junk: Probe = serde_json::from_str(r#"{"date": "soon"}"#).unwrap();
        assert!(junk.date.is_none());

        let absent: Probe = serde_json::from_str("{}").unwrap();
        assert!(absent.date.is_none());
    }
}
