//! Conversions from records, ranked lists, and archives into the template
//! [`Value`]s that get attached onto designated files.

use crate::archive::{Archive, FlatYear, Month, Year};
use crate::date::{article_date, day_of_month};
use crate::file::{File, CREATED_AT, ID};
use gtmpl_value::Value;
use std::collections::HashMap;

/// The derived display field holding an archived post's zero-padded day.
pub const CREATED_AT_DAY: &str = "createdAtDay";

/// The `yyyy/mm/dd` rendering of a post's creation date.
pub const ARTICLE_DATE: &str = "articleDate";

impl From<&File> for Value {
    /// Every passthrough field, plus `id`, `created_at` (RFC 3339), and
    /// `articleDate` for the ones the file has.
    fn from(file: &File) -> Value {
        let mut m: HashMap<String, Value> = file.fields.clone();
        if let Some(id) = file.id {
            m.insert(ID.to_owned(), Value::from(id));
        }
        if let Some(created_at) = &file.created_at {
            m.insert(
                CREATED_AT.to_owned(),
                Value::String(created_at.to_rfc3339()),
            );
            m.insert(
                ARTICLE_DATE.to_owned(),
                Value::String(article_date(created_at)),
            );
        }
        Value::Object(m)
    }
}

/// A ranked list, in rank order.
pub fn list_value(files: &[&File]) -> Value {
    Value::Array(files.iter().map(|&file| Value::from(file)).collect())
}

/// An archived post: the file's value with `createdAtDay` added.
fn article_value(file: &File) -> Value {
    let mut value = Value::from(file);
    if let (Value::Object(m), Some(created_at)) = (&mut value, &file.created_at) {
        m.insert(
            CREATED_AT_DAY.to_owned(),
            Value::String(day_of_month(created_at)),
        );
    }
    value
}

fn articles_value(files: &[&File]) -> Value {
    Value::Array(files.iter().map(|&file| article_value(file)).collect())
}

impl From<&Month<&File>> for Value {
    /// `{ month: { name, number }, articles }`.
    fn from(month: &Month<&File>) -> Value {
        let mut label: HashMap<String, Value> = HashMap::new();
        label.insert("name".to_owned(), Value::from(month.name()));
        label.insert("number".to_owned(), Value::String(month.number()));

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("month".to_owned(), Value::Object(label));
        m.insert("articles".to_owned(), articles_value(&month.items));
        Value::Object(m)
    }
}

impl From<&Year<&File>> for Value {
    /// `{ year, months }`.
    fn from(year: &Year<&File>) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("year".to_owned(), Value::from(i64::from(year.year)));
        m.insert(
            "months".to_owned(),
            Value::Array(year.months.iter().map(Value::from).collect()),
        );
        Value::Object(m)
    }
}

impl From<&Archive<&File>> for Value {
    /// The list of years, in archive order.
    fn from(archive: &Archive<&File>) -> Value {
        Value::Array(archive.years.iter().map(Value::from).collect())
    }
}

/// The flattened archive: `[{ year, articles }]`.
pub fn flat_archive_value(years: &[FlatYear<&&File>]) -> Value {
    Value::Array(
        years
            .iter()
            .map(|year| {
                let articles = year.items.iter().map(|&&file| article_value(file));
                let mut m: HashMap<String, Value> = HashMap::new();
                m.insert("year".to_owned(), Value::from(i64::from(year.year)));
                m.insert("articles".to_owned(), Value::Array(articles.collect()));
                Value::Object(m)
            })
            .collect(),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::archive::{build_archive, Order, YearRange};
    use chrono::{TimeZone, Utc};

    fn post(id: u64, y: i32, m: u32, d: u32, title: &str) -> File {
        let mut file = File {
            id: Some(id),
            created_at: Some(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()),
            fields: HashMap::new(),
        };
        file.fields
            .insert("title".to_owned(), Value::String(title.to_owned()));
        file
    }

    fn object(value: &Value) -> &HashMap<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected an object"),
        }
    }

    fn array(value: &Value) -> &Vec<Value> {
        match value {
            Value::Array(a) => a,
            _ => panic!("expected an array"),
        }
    }

    fn string<'a>(m: &'a HashMap<String, Value>, key: &str) -> &'a str {
        match m.get(key) {
            Some(Value::String(s)) => s,
            _ => panic!("expected a string at `{}`", key),
        }
    }

    #[test]
    fn test_file_value() {
        let value = Value::from(&post(4, 2023, 1, 5, "Hello"));
        let m = object(&value);
        assert_eq!(string(m, "title"), "Hello");
        assert_eq!(string(m, ARTICLE_DATE), "2023/01/05");
        assert_eq!(string(m, CREATED_AT), "2023-01-05T00:00:00+00:00");
        assert!(m.contains_key(ID));
        assert!(!m.contains_key(CREATED_AT_DAY));
    }

    #[test]
    fn test_undated_file_value() {
        let value = Value::from(&File::default());
        assert!(object(&value).is_empty());
    }

    #[test]
    fn test_list_value_keeps_order() {
        let a = post(2, 2023, 1, 5, "a");
        let b = post(1, 2023, 1, 6, "b");
        let value = list_value(&[&a, &b]);
        let titles: Vec<&str> = array(&value)
            .iter()
            .map(|v| string(object(v), "title"))
            .collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_archive_value_shape() {
        let posts = vec![post(1, 2023, 1, 5, "a"), post(2, 2023, 1, 20, "b")];
        let archive = build_archive(
            &posts,
            YearRange::new(2022, 2023).unwrap(),
            Order::Descending,
        );
        let value = Value::from(&archive);
        let years = array(&value);
        assert_eq!(years.len(), 1);

        let months = array(object(&years[0]).get("months").unwrap());
        let month = object(&months[0]);
        let label = object(month.get("month").unwrap());
        assert_eq!(string(label, "name"), "January");
        assert_eq!(string(label, "number"), "01");

        let days: Vec<&str> = array(month.get("articles").unwrap())
            .iter()
            .map(|v| string(object(v), CREATED_AT_DAY))
            .collect();
        assert_eq!(days, vec!["20", "05"]);
    }

    #[test]
    fn test_flat_archive_value() {
        let posts = vec![post(1, 2023, 1, 5, "a"), post(2, 2022, 6, 1, "b")];
        let archive = build_archive(
            &posts,
            YearRange::new(2022, 2023).unwrap(),
            Order::Descending,
        );
        let value = flat_archive_value(&archive.flatten());
        let years = array(&value);
        assert_eq!(years.len(), 2);
        let articles = array(object(&years[1]).get("articles").unwrap());
        assert_eq!(string(object(&articles[0]), "title"), "b");
        assert_eq!(string(object(&articles[0]), CREATED_AT_DAY), "01");
    }
}
