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

use crate::Result;
use crate::config::Config;
use crate::services::types::{EmployeeId, VacationId};
use crate::services::{Ack, JsonClient, TokenProvider};

/// Fixed vacation spans. A "month" is exactly 30 days here, deliberately not
/// calendar-accurate: stored end dates were produced with this table and
/// `infer` assumes the same fixed widths.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
pub enum DurationCode {
    #[serde(rename = "1week")]
    #[strum(serialize = "1week")]
    OneWeek,

    #[serde(rename = "2weeks")]
    #[strum(serialize = "2weeks")]
    TwoWeeks,

    #[serde(rename = "1month")]
    #[strum(serialize = "1month")]
    OneMonth,

    #[serde(rename = "2months")]
    #[strum(serialize = "2months")]
    TwoMonths,

    #[serde(rename = "3months")]
    #[strum(serialize = "3months")]
    ThreeMonths,

    #[serde(rename = "6months")]
    #[strum(serialize = "6months")]
    SixMonths,

    #[serde(rename = "1year")]
    #[strum(serialize = "1year")]
    OneYear,
}

impl DurationCode {
    /// Days added to the start date. The span is inclusive of the start day,
    /// so one week adds 6.
    pub const fn days_added(self) -> i64 {
        match self {
            DurationCode::OneWeek => 6,
            DurationCode::TwoWeeks => 13,
            DurationCode::OneMonth => 29,
            DurationCode::TwoMonths => 59,
            DurationCode::ThreeMonths => 89,
            DurationCode::SixMonths => 179,
            DurationCode::OneYear => 359,
        }
    }

    pub fn resolve_end_date(self, start: NaiveDate) -> NaiveDate {
        start + chrono::Duration::days(self.days_added())
    }

    /// Inverse of `resolve_end_date` for the edit path, mapping a stored
    /// span to the smallest bucket that covers it. Many-to-one and lossy: a
    /// hand-stored 40-day range infers as two months.
    pub fn infer(start: NaiveDate, end: NaiveDate) -> Self {
        let diff_days = (end - start).num_days().abs() + 1;

        match diff_days {
            i64::MIN..=7 => DurationCode::OneWeek,
            8..=14 => DurationCode::TwoWeeks,
            15..=30 => DurationCode::OneMonth,
            31..=60 => DurationCode::TwoMonths,
            61..=90 => DurationCode::ThreeMonths,
            91..=180 => DurationCode::SixMonths,
            _ => DurationCode::OneYear,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vacation {
    pub id: VacationId,
    pub employee_id: EmployeeId,
    pub employee_name: String,

    #[serde(default)]
    pub qid: Option<String>,

    pub start_date: NaiveDate,

    /// Derived once from `start_date` plus the chosen duration when the
    /// vacation is created or edited, then stored as-is.
    pub end_date: NaiveDate,

    #[serde(default)]
    pub reason: Option<String>,
}

impl Vacation {
    /// Duration dropdown preselection when a stored vacation is opened for
    /// editing.
    pub fn duration(&self) -> DurationCode {
        DurationCode::infer(self.start_date, self.end_date)
    }
}

/// Form state for creating or editing a vacation. The stored `end_date` is
/// computed from `(start_date, duration)` at submission time.
#[derive(Debug, Clone, derive_builder::Builder)]
pub struct VacationDraft {
    pub employee_id: EmployeeId,

    #[builder(setter(into))]
    pub employee_name: String,

    #[builder(setter(into, strip_option), default)]
    pub qid: Option<String>,

    pub start_date: NaiveDate,
    pub duration: DurationCode,

    #[builder(setter(into, strip_option), default)]
    pub reason: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VacationPayload<'a> {
    employee_id: EmployeeId,
    employee_name: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    qid: Option<&'a str>,

    start_date: NaiveDate,
    end_date: NaiveDate,

    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

impl VacationDraft {
    fn payload(&self) -> VacationPayload<'_> {
        VacationPayload {
            employee_id: self.employee_id,
            employee_name: &self.employee_name,
            qid: self.qid.as_deref(),
            start_date: self.start_date,
            end_date: self.duration.resolve_end_date(self.start_date),
            reason: self.reason.as_deref(),
        }
    }
}

#[derive(Clone)]
pub struct VacationClient {
    token: SecretString,
    base: Url,
    http: HttpClient,
}

impl PartialEq for VacationClient {
    fn eq(&self, other: &Self) -> bool {
        self.token.expose_secret() == other.token.expose_secret() && self.base == other.base
    }
}

impl TokenProvider for &VacationClient {
    fn provide_token(&self) -> Option<&str> {
        Some(self.token.expose_secret())
    }
}

impl VacationClient {
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

    pub async fn list(&self) -> Result<Vec<Vacation>> {
        self.http.get_json(self, self.url("vacations")?).await
    }

    pub async fn create(&self, draft: &VacationDraft) -> Result<Vacation> {
        self.http
            .post_json(self, self.url("vacations")?, &draft.payload())
            .await
    }

    /// Recomputes `end_date` from the draft's current start date and
    /// duration, so editing either reshapes the stored span.
    pub async fn update(&self, id: VacationId, draft: &VacationDraft) -> Result<Vacation> {
        self.http
            .put_json(self, self.url(&format!("vacations/{id}"))?, &draft.payload())
            .await
    }

    pub async fn delete(&self, id: VacationId) -> Result<()> {
        let ack: Ack = self
            .http
            .delete_json(self, self.url(&format!("vacations/{id}"))?)
            .await?;

        ack.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn one_month_adds_twenty_nine_days() {
        let end = DurationCode::OneMonth.resolve_end_date(date(2024, 1, 1));

        assert_eq!(end, date(2024, 1, 30));
    }

    #[test]
    fn resolution_is_deterministic() {
        let start = date(2024, 3, 15);

        assert_eq!(
            DurationCode::SixMonths.resolve_end_date(start),
            DurationCode::SixMonths.resolve_end_date(start),
        );
    }

    #[test]
    fn every_code_round_trips_through_infer() {
        let start = date(2024, 1, 1);

        for code in [
            DurationCode::OneWeek,
            DurationCode::TwoWeeks,
            DurationCode::OneMonth,
            DurationCode::TwoMonths,
            DurationCode::ThreeMonths,
            DurationCode::SixMonths,
            DurationCode::OneYear,
        ] {
            let end = code.resolve_end_date(start);
            assert_eq!(DurationCode::infer(start, end), code);
        }
    }

    #[test]
    fn sixty_day_span_infers_two_months() {
        // 2024-01-01 .. 2024-02-29 spans 60 days inclusive
        let inferred = DurationCode::infer(date(2024, 1, 1), date(2024, 2, 29));

        assert_eq!(inferred, DurationCode::TwoMonths);
    }

    #[test]
    fn infer_is_lossy_over_odd_spans() {
        let inferred = DurationCode::infer(date(2024, 1, 1), date(2024, 2, 9));

        // 40 days inclusive, covered by the two-month bucket
        assert_eq!(inferred, DurationCode::TwoMonths);
    }

    #[test]
    fn duration_codes_use_the_backend_spelling() {
        assert_eq!(
            serde_json::to_string(&DurationCode::TwoWeeks).unwrap(),
            "\"2weeks\""
        );
        assert_eq!(DurationCode::OneYear.to_string(), "1year");
        assert_eq!("3months".parse::<DurationCode>().unwrap(), DurationCode::ThreeMonths);
    }

    #[test]
    fn draft_payload_carries_the_derived_end_date() {
        let draft = VacationDraftBuilder::default()
            .employee_id(Uuid::from_u128(7))
            .employee_name("Ahmed")
            .start_date(date(2024, 1, 1))
            .duration(DurationCode::OneMonth)
            .build()
            .unwrap();

        let value = serde_json::to_value(draft.payload()).unwrap();

        assert_eq!(value["startDate"], "2024-01-01");
        assert_eq!(value["endDate"], "2024-01-30");
        assert!(value.get("qid").is_none());
    }
}
