//! Collection queries in json-server style.
//!
//! Supported query parameters:
//!
//! | Parameter | Meaning |
//! |---|---|
//! | `field=value` | equality on the rendered field value; repeat the key to OR values |
//! | `field_ne=value` | inequality |
//! | `field_gte=n` / `field_lte=n` | numeric (or lexical) range |
//! | `field_like=text` | case-insensitive substring |
//! | `q=text` | case-insensitive substring over every string in the record |
//! | `_sort=a,b` / `_order=asc,desc` | ordering |
//! | `_start` / `_end` / `_limit` | slicing |
//! | `_page` / `_limit` | paging, `_limit` defaults to 10 |
//!
//! Fields may be dotted paths into nested objects (`author.name=ann`).
//! The total returned in [`Page`] counts matches before slicing.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::Value;

const DEFAULT_PAGE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Ne,
    Gte,
    Lte,
    Like,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Filter {
    field: String,
    operator: Operator,
    values: Vec<String>,
}

/// Parsed list parameters for a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    filters: Vec<Filter>,
    search: Option<String>,
    sort: Vec<String>,
    order: Vec<String>,
    start: Option<usize>,
    end: Option<usize>,
    limit: Option<usize>,
    page: Option<usize>,
}

/// One slice of a filtered collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub total: usize,
}

fn split_operator(key: &str) -> (&str, Operator) {
    [
        ("_ne", Operator::Ne),
        ("_gte", Operator::Gte),
        ("_lte", Operator::Lte),
        ("_like", Operator::Like),
    ]
    .into_iter()
    .find_map(|(suffix, operator)| {
        key.strip_suffix(suffix)
            .filter(|field| !field.is_empty())
            .map(|field| (field, operator))
    })
    .unwrap_or((key, Operator::Eq))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl ListQuery {
    /// Builds a query from raw `key=value` pairs. Unparseable numeric
    /// parameters are ignored rather than rejected.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = ListQuery::default();
        // BTreeMap keeps filter order stable for equality comparisons in tests.
        let mut filters: BTreeMap<(String, u8), Filter> = BTreeMap::new();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "q" => query.search = Some(value.to_lowercase()).filter(|q| !q.is_empty()),
                "_sort" => query.sort = split_list(value),
                "_order" => query.order = split_list(value),
                "_start" => query.start = value.parse().ok(),
                "_end" => query.end = value.parse().ok(),
                "_limit" => query.limit = value.parse().ok(),
                "_page" => query.page = value.parse::<usize>().ok().filter(|page| *page > 0),
                _ if key.starts_with('_') => {}
                _ => {
                    let (field, operator) = split_operator(key);
                    filters
                        .entry((field.to_string(), operator as u8))
                        .or_insert_with(|| Filter {
                            field: field.to_string(),
                            operator,
                            values: Vec::new(),
                        })
                        .values
                        .push(value.to_string());
                }
            }
        }

        query.filters = filters.into_values().collect();
        query
    }

    /// Filters, sorts and slices `records`.
    pub fn apply(&self, records: &[Value]) -> Page {
        let mut matched: Vec<&Value> = records
            .iter()
            .filter(|record| self.filters.iter().all(|filter| filter.matches(record)))
            .filter(|record| {
                self.search
                    .as_deref()
                    .is_none_or(|needle| contains_text(record, needle))
            })
            .collect();

        if !self.sort.is_empty() {
            matched.sort_by(|a, b| self.compare(a, b));
        }

        let total = matched.len();
        let (start, end) = self.bounds(total);

        Page {
            items: matched
                .into_iter()
                .skip(start)
                .take(end.saturating_sub(start))
                .cloned()
                .collect(),
            total,
        }
    }

    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        for (index, field) in self.sort.iter().enumerate() {
            let descending = self
                .order
                .get(index)
                .or(self.order.first())
                .is_some_and(|order| order.eq_ignore_ascii_case("desc"));

            let ordering = compare_values(lookup(a, field), lookup(b, field));
            let ordering = if descending {
                ordering.reverse()
            } else {
                ordering
            };

            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    fn bounds(&self, total: usize) -> (usize, usize) {
        if let Some(page) = self.page {
            let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
            let start = (page - 1).saturating_mul(limit);
            return (start.min(total), start.saturating_add(limit).min(total));
        }

        let start = self.start.unwrap_or(0).min(total);
        let end = match (self.end, self.limit) {
            (Some(end), _) => end,
            (None, Some(limit)) => start.saturating_add(limit),
            (None, None) => total,
        };
        (start, end.min(total).max(start))
    }
}

impl Filter {
    fn matches(&self, record: &Value) -> bool {
        let Some(actual) = lookup(record, &self.field) else {
            return self.operator == Operator::Ne;
        };

        match self.operator {
            Operator::Eq => self.values.iter().any(|v| render(actual) == *v),
            Operator::Ne => self.values.iter().all(|v| render(actual) != *v),
            Operator::Like => {
                let haystack = render(actual).to_lowercase();
                self.values
                    .iter()
                    .any(|v| haystack.contains(&v.to_lowercase()))
            }
            Operator::Gte => self
                .values
                .iter()
                .all(|v| compare_to_text(actual, v) != Ordering::Less),
            Operator::Lte => self
                .values
                .iter()
                .all(|v| compare_to_text(actual, v) != Ordering::Greater),
        }
    }
}

/// Resolves a dotted path (`author.name`) inside a record.
fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |current, segment| current.get(segment))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Array(items) => items.iter().any(|item| contains_text(item, needle)),
        Value::Object(map) => map.values().any(|item| contains_text(item, needle)),
        Value::Bool(_) | Value::Null => false,
    }
}

fn compare_to_text(actual: &Value, expected: &str) -> Ordering {
    match (actual.as_f64(), expected.parse::<f64>().ok()) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => render(actual).as_str().cmp(expected),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => render(a).cmp(&render(b)),
        },
    }
}
