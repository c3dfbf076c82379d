//! Content insights over the well-known form fields.

use indexmap::IndexMap;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::aggregate::Dataset;
use crate::models::record::FieldValue;

const POSITION: &str = "position";
const EXPERIENCE: &str = "experience";
const EMAIL: &str = "email";
const RATING: &str = "rating";

/// A value and how many records carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub value: String,
    pub count: usize,
}

/// Patterns in the extracted values. Each part is `None` when the field is
/// not registered or no record has a usable value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DatasetInsights {
    pub most_common_position: Option<Tally>,
    pub average_experience: Option<f64>,
    pub most_common_email_domain: Option<Tally>,
    pub average_rating: Option<f64>,
}

impl DatasetInsights {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn present<'a>(dataset: &'a Dataset, field: &'a str) -> impl Iterator<Item = &'a FieldValue> + 'a {
    dataset
        .records()
        .iter()
        .filter_map(move |r| r.get(field))
        .filter(|v| v.is_present())
}

/// Most frequent value; the first one seen wins ties.
fn most_common<I: Iterator<Item = String>>(values: I) -> Option<Tally> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .fold(None, |best: Option<Tally>, (value, count)| match best {
            Some(b) if b.count >= count => Some(b),
            _ => Some(Tally { value, count }),
        })
}

fn mean<I: Iterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn number(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) => n.to_f64(),
        _ => None,
    }
}

/// Compute insights for the position, experience, email and rating fields.
pub fn compute_insights(dataset: &Dataset) -> DatasetInsights {
    let most_common_position = most_common(present(dataset, POSITION).map(|v| v.to_string()));

    let average_experience = mean(present(dataset, EXPERIENCE).filter_map(number));

    let most_common_email_domain = most_common(present(dataset, EMAIL).map(|v| {
        let email = v.to_string();
        match email.split_once('@') {
            Some((_, domain)) if !domain.is_empty() => domain.to_string(),
            _ => "unknown".to_string(),
        }
    }));

    let average_rating = mean(present(dataset, RATING).filter_map(number));

    DatasetInsights {
        most_common_position,
        average_experience,
        most_common_email_domain,
        average_rating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use crate::models::record::NormalizedRecord;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn columns() -> Vec<String> {
        [POSITION, EXPERIENCE, EMAIL, RATING]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn row(position: FieldValue, experience: FieldValue, email: FieldValue, rating: FieldValue) -> IndexMap<String, FieldValue> {
        columns()
            .into_iter()
            .zip([position, experience, email, rating])
            .collect()
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn num(n: i64) -> FieldValue {
        FieldValue::Number(Decimal::from(n))
    }

    #[test]
    fn test_insights() {
        let mut aggregator = Aggregator::with_columns(columns());
        let rows = [
            row(text("Data Analyst"), num(6), text("a@acme.com"), num(4)),
            row(text("Engineer"), num(2), text("b@mail.org"), num(5)),
            row(text("Data Analyst"), FieldValue::Absent, text("c@acme.com"), FieldValue::Absent),
            row(FieldValue::Absent, num(1), text("broken"), num(3)),
        ];
        for (i, values) in rows.into_iter().enumerate() {
            aggregator
                .append(NormalizedRecord::new(format!("{}.txt", i), values))
                .unwrap();
        }

        let insights = compute_insights(&aggregator.finalize());

        assert_eq!(
            insights.most_common_position,
            Some(Tally {
                value: "Data Analyst".into(),
                count: 2
            })
        );
        assert_eq!(insights.average_experience, Some(3.0));
        assert_eq!(
            insights.most_common_email_domain,
            Some(Tally {
                value: "acme.com".into(),
                count: 2
            })
        );
        assert_eq!(insights.average_rating, Some(4.0));
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let tally = most_common(["b", "a", "a", "b"].iter().map(|s| s.to_string()));
        assert_eq!(tally.unwrap().value, "b");
    }

    #[test]
    fn test_unregistered_fields_give_nothing() {
        let mut aggregator = Aggregator::with_columns(vec!["name".to_string()]);
        let values = [("name".to_string(), text("Jane"))].into_iter().collect();
        aggregator.append(NormalizedRecord::new("a.txt", values)).unwrap();

        let insights = compute_insights(&aggregator.finalize());
        assert!(insights.is_empty());
    }

    #[test]
    fn test_empty_dataset() {
        let insights = compute_insights(&Aggregator::with_columns(columns()).finalize());
        assert_eq!(insights, DatasetInsights::default());
    }
}
