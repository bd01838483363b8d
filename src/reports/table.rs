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

use std::fmt::Write as _;

use super::expiry::{BucketCounts, Classification, ClassifiedDocument};
use super::list::{Accessor, ListManager, ListPage, SortDir, SortValue};

pub const REPORT_PAGE_SIZE: usize = 10;

/// Presentation status of a row in the expiring-soon view. Narrower than the
/// classifier's 30-day tracking window: Warning here caps at 15 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RowSeverity {
    Critical,
    Warning,
    Expiring,
}

pub fn row_severity(days_left: i64) -> RowSeverity {
    match days_left {
        i64::MIN..=7 => RowSeverity::Critical,
        8..=15 => RowSeverity::Warning,
        _ => RowSeverity::Expiring,
    }
}

fn owner(d: &ClassifiedDocument) -> Option<SortValue> {
    Some(d.owner.clone().into())
}

fn location(d: &ClassifiedDocument) -> Option<SortValue> {
    d.location.clone().map(SortValue::Text)
}

fn document_type(d: &ClassifiedDocument) -> Option<SortValue> {
    Some(d.document_type.into())
}

fn days_left(d: &ClassifiedDocument) -> Option<SortValue> {
    Some(d.days_left.into())
}

/// The two document-expiry report views, each with its own search, type
/// filter, sort and pagination state over a shared classification snapshot.
pub struct ExpiryReport {
    expired_rows: Vec<ClassifiedDocument>,
    expiring_rows: Vec<ClassifiedDocument>,
    counts: BucketCounts,

    pub expired: ListManager<ClassifiedDocument>,
    pub expiring: ListManager<ClassifiedDocument>,
}

impl ExpiryReport {
    pub fn new(classification: &Classification) -> Self {
        Self::with_page_size(classification, REPORT_PAGE_SIZE)
    }

    pub fn with_page_size(classification: &Classification, page_size: usize) -> Self {
        let search = [owner as Accessor<ClassifiedDocument>, location];

        // Ascending days_left puts the most negative first, i.e. the most
        // overdue document tops the expired view.
        let expired = ListManager::new(page_size)
            .search_on(search)
            .filter_on("type", document_type)
            .sorted_by("daysLeft", days_left, SortDir::Asc);

        let expiring = ListManager::new(page_size)
            .search_on(search)
            .filter_on("type", document_type)
            .sorted_by("daysLeft", days_left, SortDir::Asc);

        Self {
            expired_rows: classification.expired().cloned().collect(),
            expiring_rows: classification.expiring_soon().cloned().collect(),
            counts: classification.counts(),
            expired,
            expiring,
        }
    }

    pub fn counts(&self) -> BucketCounts {
        self.counts
    }

    pub fn expired_page(&self) -> ListPage<ClassifiedDocument> {
        self.expired.apply(&self.expired_rows)
    }

    pub fn expiring_page(&self) -> ListPage<ClassifiedDocument> {
        self.expiring.apply(&self.expiring_rows)
    }

    /// CSV over the currently filtered and sorted rows of the expired view,
    /// all pages.
    pub fn export_expired_csv(&self) -> String {
        to_csv(&self.expired.apply_all(&self.expired_rows))
    }

    pub fn export_expiring_csv(&self) -> String {
        to_csv(&self.expiring.apply_all(&self.expiring_rows))
    }
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_owned()
    }
}

fn to_csv(rows: &[ClassifiedDocument]) -> String {
    let mut out = String::from("Owner,Location,Document,Expiry Date,Days\n");

    for row in rows {
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            csv_field(&row.owner),
            csv_field(row.location.as_deref().unwrap_or("N/A")),
            csv_field(row.document_type),
            row.expiry_date.format("%Y-%m-%d"),
            row.days_left,
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::expiry::{DocumentHolder, FieldSpec, classify};
    use chrono::NaiveDate;

    struct Holder {
        name: &'static str,
        location: &'static str,
        qid: Option<&'static str>,
        passport: Option<&'static str>,
    }

    impl DocumentHolder for Holder {
        fn holder_name(&self) -> &str {
            self.name
        }

        fn holder_location(&self) -> Option<&str> {
            Some(self.location)
        }
    }

    fn report() -> ExpiryReport {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let records = [
            Holder {
                name: "Ahmed",
                location: "Doha",
                qid: Some("2024-05-20"), // 12 days overdue
                passport: Some("2024-06-03"), // 2 days left
            },
            Holder {
                name: "Maryam",
                location: "Al Wakrah",
                qid: Some("2024-04-01"), // 61 days overdue
                passport: Some("2024-06-13"), // 12 days left
            },
            Holder {
                name: "Jassim",
                location: "Doha",
                qid: Some("2025-06-01"), // valid, unreported
                passport: Some("2024-06-25"), // 24 days left
            },
        ];

        let fields = vec![
            FieldSpec::new("QID", |h: &Holder| h.qid),
            FieldSpec::new("Passport", |h: &Holder| h.passport),
        ];

        ExpiryReport::new(&classify(today, &records, &fields))
    }

    #[test]
    fn expired_view_orders_most_overdue_first() {
        let page = report().expired_page();

        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].owner, "Maryam");
        assert_eq!(page.items[0].days_overdue(), Some(61));
        assert_eq!(page.items[1].owner, "Ahmed");
    }

    #[test]
    fn expiring_view_orders_soonest_first() {
        let page = report().expiring_page();

        assert_eq!(page.total, 3);
        assert_eq!(
            page.items.iter().map(|d| d.days_left).collect::<Vec<_>>(),
            vec![2, 12, 24]
        );
    }

    #[test]
    fn row_severity_uses_the_fifteen_day_warning_cap() {
        assert_eq!(row_severity(0), RowSeverity::Critical);
        assert_eq!(row_severity(7), RowSeverity::Critical);
        assert_eq!(row_severity(8), RowSeverity::Warning);
        assert_eq!(row_severity(15), RowSeverity::Warning);
        assert_eq!(row_severity(16), RowSeverity::Expiring);
    }

    #[test]
    fn views_filter_independently() {
        let mut report = report();

        report.expired.set_filter("type", "QID");
        report.expiring.set_search("doha");

        assert_eq!(report.expired_page().total, 2);
        assert_eq!(report.expiring_page().total, 2);

        report.expired.set_search("maryam");
        assert_eq!(report.expired_page().total, 1);
    }

    #[test]
    fn export_reflects_the_current_filter_and_sort() {
        let mut report = report();
        report.expiring.set_search("doha");

        let csv = report.export_expiring_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Owner,Location,Document,Expiry Date,Days");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Ahmed,Doha,Passport,2024-06-03,2"));
        assert!(lines[2].starts_with("Jassim,Doha,Passport,2024-06-25,24"));
    }

    #[test]
    fn summary_counts_cover_all_buckets() {
        let counts = report().counts();

        assert_eq!(counts.expired, 2);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.warning, 2);
        assert_eq!(counts.valid, 1);
        assert_eq!(counts.tracked(), 6);
    }
}
