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

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};

/// Implemented by any record whose tracked documents can appear in an expiry
/// report.
pub trait DocumentHolder {
    fn holder_name(&self) -> &str;

    fn holder_location(&self) -> Option<&str> {
        None
    }
}

/// One tracked document field on a record: a display label and an accessor
/// for the raw date string as stored by the backend.
pub struct FieldSpec<T> {
    pub label: &'static str,
    pub get: fn(&T) -> Option<&str>,
}

impl<T> FieldSpec<T> {
    pub fn new(label: &'static str, get: fn(&T) -> Option<&str>) -> Self {
        Self { label, get }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ExpiryBucket {
    Expired,
    Critical,
    Warning,
    Valid,
}

pub fn bucket_for(days_left: i64) -> ExpiryBucket {
    match days_left {
        i64::MIN..=-1 => ExpiryBucket::Expired,
        0..=7 => ExpiryBucket::Critical,
        8..=30 => ExpiryBucket::Warning,
        _ => ExpiryBucket::Valid,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedDocument {
    pub owner: String,
    pub location: Option<String>,
    pub document_type: &'static str,
    pub expiry_date: NaiveDate,
    pub days_left: i64,
}

impl ClassifiedDocument {
    pub fn bucket(&self) -> ExpiryBucket {
        bucket_for(self.days_left)
    }

    pub fn days_overdue(&self) -> Option<i64> {
        (self.days_left < 0).then(|| -self.days_left)
    }
}

/// Unparseable input yields `None`, never an error: a malformed date on one
/// record must not take the whole report down.
pub(crate) fn parse_expiry(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketCounts {
    pub expired: usize,
    pub critical: usize,
    pub warning: usize,
    pub valid: usize,
}

impl BucketCounts {
    fn add(&mut self, bucket: ExpiryBucket) {
        match bucket {
            ExpiryBucket::Expired => self.expired += 1,
            ExpiryBucket::Critical => self.critical += 1,
            ExpiryBucket::Warning => self.warning += 1,
            ExpiryBucket::Valid => self.valid += 1,
        }
    }

    pub fn tracked(&self) -> usize {
        self.expired + self.critical + self.warning + self.valid
    }

    pub fn expiring_soon(&self) -> usize {
        self.critical + self.warning
    }

    /// Percentage share of a bucket among all tracked documents, 0.0 when
    /// nothing is tracked.
    pub fn share(&self, bucket: ExpiryBucket) -> f64 {
        let tracked = self.tracked();

        if tracked == 0 {
            return 0.0;
        }

        let count = match bucket {
            ExpiryBucket::Expired => self.expired,
            ExpiryBucket::Critical => self.critical,
            ExpiryBucket::Warning => self.warning,
            ExpiryBucket::Valid => self.valid,
        };

        count as f64 * 100.0 / tracked as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub entries: Vec<ClassifiedDocument>,
}

impl Classification {
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }

    pub fn expired(&self) -> impl Iterator<Item = &ClassifiedDocument> {
        self.entries
            .iter()
            .filter(|e| e.bucket() == ExpiryBucket::Expired)
    }

    pub fn expiring_soon(&self) -> impl Iterator<Item = &ClassifiedDocument> {
        self.entries.iter().filter(|e| {
            matches!(e.bucket(), ExpiryBucket::Critical | ExpiryBucket::Warning)
        })
    }

    pub fn valid_count(&self) -> usize {
        self.tracked() - self.expired().count() - self.expiring_soon().count()
    }

    pub fn counts(&self) -> BucketCounts {
        let mut counts = BucketCounts::default();

        for entry in &self.entries {
            counts.add(entry.bucket());
        }

        counts
    }

    pub fn counts_by_type(&self) -> BTreeMap<&'static str, BucketCounts> {
        let mut by_type = BTreeMap::new();

        for entry in &self.entries {
            by_type
                .entry(entry.document_type)
                .or_insert_with(BucketCounts::default)
                .add(entry.bucket());
        }

        by_type
    }

    pub fn counts_by_owner(&self) -> BTreeMap<String, BucketCounts> {
        let mut by_owner = BTreeMap::new();

        for entry in &self.entries {
            by_owner
                .entry(entry.owner.clone())
                .or_insert_with(BucketCounts::default)
                .add(entry.bucket());
        }

        by_owner
    }
}

/// Classifies every tracked document of every record against `today`.
///
/// Pure function of its inputs. Absent and unparseable dates are skipped
/// rather than reported; `days_left == 0` means "expires today" and lands in
/// `Critical`, not `Expired`.
pub fn classify<T: DocumentHolder>(
    today: NaiveDate,
    records: &[T],
    fields: &[FieldSpec<T>],
) -> Classification {
    let mut entries = Vec::new();

    for record in records {
        for field in fields {
            let Some(raw) = (field.get)(record) else {
                continue;
            };

            let Some(expiry_date) = parse_expiry(raw) else {
                continue;
            };

            entries.push(ClassifiedDocument {
                owner: record.holder_name().to_owned(),
                location: record.holder_location().map(str::to_owned),
                document_type: field.label,
                expiry_date,
                days_left: (expiry_date - today).num_days(),
            });
        }
    }

    Classification { entries }
}
