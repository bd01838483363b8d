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

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

/// Comparable column value. Numeric and date columns are coerced here so
/// they never compare as raw strings.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Text(_) => 0,
            SortValue::Number(_) => 1,
            SortValue::Date(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => {
                a.to_lowercase().cmp(&b.to_lowercase())
            }
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for SortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortValue::Text(text) => write!(f, "{text}"),
            SortValue::Number(number) => write!(f, "{number}"),
            SortValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_owned())
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        SortValue::Text(value)
    }
}

impl From<f64> for SortValue {
    fn from(value: f64) -> Self {
        SortValue::Number(value)
    }
}

impl From<i64> for SortValue {
    fn from(value: i64) -> Self {
        SortValue::Number(value as f64)
    }
}

impl From<usize> for SortValue {
    fn from(value: usize) -> Self {
        SortValue::Number(value as f64)
    }
}

impl From<NaiveDate> for SortValue {
    fn from(value: NaiveDate) -> Self {
        SortValue::Date(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    fn flip(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// `All` disables the filter; any other value is an exact match against the
/// stringified column value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterValue {
    #[default]
    All,
    Is(String),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        if value == "all" {
            FilterValue::All
        } else {
            FilterValue::Is(value.to_owned())
        }
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::from(value.as_str())
    }
}

pub type Accessor<T> = fn(&T) -> Option<SortValue>;

struct Filter<T> {
    get: Accessor<T>,
    value: FilterValue,
}

struct Sort<T> {
    key: &'static str,
    get: Accessor<T>,
    dir: SortDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub total_pages: usize,
    pub page: usize,
}

/// Generic search + filter + sort + paginate over a client-held array.
///
/// Holds view state only; `apply` recomputes the page from scratch on every
/// call and never mutates the source slice.
pub struct ListManager<T> {
    search: String,
    search_fields: Vec<Accessor<T>>,
    filters: BTreeMap<&'static str, Filter<T>>,
    sort: Option<Sort<T>>,
    page: usize,
    page_size: usize,
}

impl<T> ListManager<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            search_fields: Vec::new(),
            filters: BTreeMap::new(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn search_on(mut self, fields: impl IntoIterator<Item = Accessor<T>>) -> Self {
        self.search_fields.extend(fields);
        self
    }

    pub fn filter_on(mut self, key: &'static str, get: Accessor<T>) -> Self {
        self.filters.insert(
            key,
            Filter {
                get,
                value: FilterValue::All,
            },
        );
        self
    }

    pub fn sorted_by(mut self, key: &'static str, get: Accessor<T>, dir: SortDir) -> Self {
        self.sort = Some(Sort { key, get, dir });
        self
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// No-op for keys that were never registered with `filter_on`.
    pub fn set_filter(&mut self, key: &str, value: impl Into<FilterValue>) {
        if let Some(filter) = self.filters.get_mut(key) {
            filter.value = value.into();
            self.page = 1;
        }
    }

    /// Repeated requests on the same key flip the direction; a new key
    /// resets to ascending.
    pub fn toggle_sort(&mut self, key: &'static str, get: Accessor<T>) {
        match &mut self.sort {
            Some(sort) if sort.key == key => sort.dir = sort.dir.flip(),
            _ => {
                self.sort = Some(Sort {
                    key,
                    get,
                    dir: SortDir::Asc,
                })
            }
        }
    }

    pub fn sort_key(&self) -> Option<(&'static str, SortDir)> {
        self.sort.as_ref().map(|sort| (sort.key, sort.dir))
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    fn matches(&self, item: &T) -> bool {
        let term = self.search.trim().to_lowercase();

        let search_ok = term.is_empty()
            || self.search_fields.iter().any(|get| {
                get(item).is_some_and(|value| value.to_string().to_lowercase().contains(&term))
            });

        let filters_ok = self.filters.values().all(|filter| match &filter.value {
            FilterValue::All => true,
            FilterValue::Is(want) => {
                (filter.get)(item).is_some_and(|value| value.to_string() == *want)
            }
        });

        search_ok && filters_ok
    }

    fn select<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut rows: Vec<&T> = items.iter().filter(|item| self.matches(item)).collect();

        if let Some(sort) = &self.sort {
            rows.sort_by(|a, b| {
                let ordering = match ((sort.get)(a), (sort.get)(b)) {
                    (Some(a), Some(b)) => a.compare(&b),
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };

                match sort.dir {
                    SortDir::Asc => ordering,
                    SortDir::Desc => ordering.reverse(),
                }
            });
        }

        rows
    }

    /// Filtered and sorted rows with the current page sliced out. Requests
    /// past the last page clamp to it instead of erroring.
    pub fn apply(&self, items: &[T]) -> ListPage<T>
    where
        T: Clone,
    {
        let rows = self.select(items);
        let total = rows.len();
        let total_pages = total.div_ceil(self.page_size).max(1);
        let page = self.page.min(total_pages);

        let items = rows
            .into_iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .cloned()
            .collect();

        ListPage {
            items,
            total,
            total_pages,
            page,
        }
    }

    /// The full filtered and sorted row set, unpaginated. Feeds the report
    /// export path.
    pub fn apply_all(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        self.select(items).into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Branch {
        name: &'static str,
        location: &'static str,
        status: &'static str,
        vehicles: usize,
    }

    fn name(b: &Branch) -> Option<SortValue> {
        Some(b.name.into())
    }

    fn location(b: &Branch) -> Option<SortValue> {
        Some(b.location.into())
    }

    fn status(b: &Branch) -> Option<SortValue> {
        Some(b.status.into())
    }

    fn vehicles(b: &Branch) -> Option<SortValue> {
        Some(b.vehicles.into())
    }

    fn branches() -> Vec<Branch> {
        vec![
            Branch {
                name: "Main Branch",
                location: "Doha",
                status: "active",
                vehicles: 3,
            },
            Branch {
                name: "Airport Branch",
                location: "Dubai",
                status: "active",
                vehicles: 12,
            },
            Branch {
                name: "Souq Branch",
                location: "Doha",
                status: "closed",
                vehicles: 2,
            },
        ]
    }

    fn manager() -> ListManager<Branch> {
        ListManager::new(10)
            .search_on([location as Accessor<Branch>, name])
            .filter_on("status", status)
    }

    #[test]
    fn identity_query_returns_all_items_sorted() {
        let items = branches();
        let mut manager = manager();
        manager.toggle_sort("name", name);

        let page = manager.apply(&items);

        assert_eq!(page.total, 3);
        assert_eq!(
            page.items.iter().map(|b| b.name).collect::<Vec<_>>(),
            vec!["Airport Branch", "Main Branch", "Souq Branch"]
        );
    }

    #[test]
    fn search_matches_any_configured_field() {
        let items = branches();
        let mut manager = manager();
        manager.set_search("doha");

        let page = manager.apply(&items);

        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|b| b.location == "Doha"));
    }

    #[test]
    fn clearing_a_filter_restores_the_full_set() {
        let items = branches();
        let mut manager = manager();

        manager.set_filter("status", "closed");
        assert_eq!(manager.apply(&items).total, 1);

        manager.set_filter("status", "all");
        assert_eq!(manager.apply(&items).total, 3);
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn numeric_columns_sort_numerically() {
        let items = branches();
        let mut manager = manager();
        manager.toggle_sort("vehicles", vehicles);

        let page = manager.apply(&items);

        // 12 sorts after 2 and 3, which a string comparison would not give
        assert_eq!(
            page.items.iter().map(|b| b.vehicles).collect::<Vec<_>>(),
            vec![2, 3, 12]
        );
    }

    #[test]
    fn repeated_sort_flips_direction_and_new_key_resets() {
        let items = branches();
        let mut manager = manager();

        manager.toggle_sort("vehicles", vehicles);
        assert_eq!(manager.sort_key(), Some(("vehicles", SortDir::Asc)));

        manager.toggle_sort("vehicles", vehicles);
        assert_eq!(manager.sort_key(), Some(("vehicles", SortDir::Desc)));
        assert_eq!(manager.apply(&items).items[0].vehicles, 12);

        manager.toggle_sort("name", name);
        assert_eq!(manager.sort_key(), Some(("name", SortDir::Asc)));
    }

    #[test]
    fn pagination_slices_and_clamps() {
        let items: Vec<Branch> = (0..23)
            .map(|i| Branch {
                name: "b",
                location: "Doha",
                status: "active",
                vehicles: i,
            })
            .collect();

        let mut manager = ListManager::<Branch>::new(10);

        assert_eq!(manager.apply(&items).items.len(), 10);
        assert_eq!(manager.apply(&items).total, 23);
        assert_eq!(manager.apply(&items).total_pages, 3);

        manager.set_page(3);
        assert_eq!(manager.apply(&items).items.len(), 3);

        manager.set_page(99);
        let page = manager.apply(&items);
        assert_eq!(page.page, 3);
        assert_eq!(page.items.len(), 3);
    }

    #[test]
    fn changing_search_resets_the_page() {
        let mut manager = manager();
        manager.set_page(4);
        manager.set_search("doha");

        assert_eq!(manager.page(), 1);
    }

    #[test]
    fn empty_input_yields_one_empty_page() {
        let manager = manager();
        let page = manager.apply(&[]);

        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }
}
