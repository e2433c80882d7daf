//! Defines the [`File`] record handed over by the build pipeline, the
//! [`Files`] map of output path to record, and the parsing of a record's YAML
//! frontmatter.

use crate::archive::Dated;
use crate::date::parse_timestamp;
use crate::latest::Identified;
use chrono::{DateTime, Utc};
use gtmpl_value::Value;
use serde_yaml::{Mapping, Value as Yaml};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::warn;

/// The frontmatter key holding a post's identifier.
pub const ID: &str = "id";

/// The frontmatter key holding a post's creation timestamp.
pub const CREATED_AT: &str = "created_at";

/// The field under which [`File::from_source`] keeps the text following the
/// frontmatter.
pub const CONTENTS: &str = "contents";

/// All files of one build, keyed by output path. The map is ordered, so
/// iterating it is deterministic.
pub type Files = BTreeMap<String, File>;

/// One file of the build. Only `id` and `created_at` are interpreted; every
/// other frontmatter entry is carried along untouched in `fields`, which is
/// also where derived view data gets attached.
#[derive(Clone, Debug, Default)]
pub struct File {
    /// Assigned in increasing order as posts are written; pages that aren't
    /// posts have none.
    pub id: Option<u64>,

    pub created_at: Option<DateTime<Utc>>,

    pub fields: HashMap<String, Value>,
}

impl File {
    /// Looks up a passthrough field as a string, if it is one.
    pub fn string_field(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Builds a [`File`] from a YAML frontmatter document. An `id` that isn't
    /// a non-negative integer, or a `created_at` that isn't a recognizable
    /// timestamp, is logged and dropped rather than failing the build.
    pub fn from_frontmatter(yaml: &str) -> Result<File> {
        let mut mapping = if yaml.trim().is_empty() {
            Mapping::new()
        } else {
            match serde_yaml::from_str::<Yaml>(yaml)? {
                Yaml::Mapping(mapping) => mapping,
                Yaml::Null => Mapping::new(),
                _ => return Err(Error::FrontmatterNotAMapping),
            }
        };

        let id = mapping.remove(&Yaml::from(ID)).and_then(|value| {
            let id = parse_id(&value);
            if id.is_none() {
                warn!(value = ?value, "ignoring malformed post id");
            }
            id
        });
        let created_at = mapping.remove(&Yaml::from(CREATED_AT)).and_then(|value| {
            let created_at = value.as_str().and_then(parse_timestamp);
            if created_at.is_none() {
                warn!(value = ?value, "ignoring malformed creation date");
            }
            created_at
        });

        Ok(File {
            id,
            created_at,
            fields: mapping
                .iter()
                .filter_map(|(k, v)| k.as_str().map(|k| (k.to_owned(), yaml_to_value(v))))
                .collect(),
        })
    }

    /// Parses a source document of the form
    ///
    /// ```md
    /// ---
    /// id: 12
    /// created_at: 2021-04-16
    /// title: Hello, world!
    /// ---
    /// # Hello
    /// ```
    ///
    /// The text after the closing fence is stored verbatim under
    /// [`CONTENTS`].
    pub fn from_source(input: &str) -> Result<File> {
        // The closing fence must sit on a line of its own, so `---` inside a
        // frontmatter value doesn't end the frontmatter.
        fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
            const FENCE: &str = "---";
            const CLOSING_FENCE: &str = "\n---";
            if !input.starts_with(FENCE) {
                return Err(Error::FrontmatterMissingStartFence);
            }
            let mut from = FENCE.len();
            while let Some(offset) = input[from..].find(CLOSING_FENCE) {
                let yaml_stop = from + offset + 1;
                let body_start = yaml_stop + FENCE.len();
                let rest = &input[body_start..];
                if rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n") {
                    return Ok((FENCE.len(), yaml_stop, body_start));
                }
                from = body_start;
            }
            Err(Error::FrontmatterMissingEndFence)
        }

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let mut file = File::from_frontmatter(&input[yaml_start..yaml_stop])?;
        file.fields.insert(
            CONTENTS.to_owned(),
            Value::String(input[body_start..].trim_start_matches('\n').to_owned()),
        );
        Ok(file)
    }
}

impl Identified for File {
    type Id = u64;

    fn identifier(&self) -> Option<&u64> {
        self.id.as_ref()
    }
}

impl Dated for File {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

fn parse_id(value: &Yaml) -> Option<u64> {
    match value {
        Yaml::Number(n) => n.as_u64(),
        Yaml::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Converts frontmatter YAML into a template [`Value`]. Mapping entries whose
/// keys aren't strings are dropped.
fn yaml_to_value(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::Null => Value::Nil,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => Value::from(i),
            (None, Some(u), _) => Value::from(u),
            (None, None, Some(f)) => Value::from(f),
            (None, None, None) => Value::Nil,
        },
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(seq) => Value::Array(seq.iter().map(yaml_to_value).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .iter()
                .filter_map(|(k, v)| k.as_str().map(|k| (k.to_owned(), yaml_to_value(v))))
                .collect(),
        ),
    }
}

/// Represents the result of a [`File`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`File`].
#[derive(Debug)]
pub enum Error {
    /// Returned when a source document is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a source document is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when the frontmatter is valid YAML but not a mapping.
    FrontmatterNotAMapping,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Document must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::FrontmatterNotAMapping => {
                write!(f, "Frontmatter must be a YAML mapping")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::FrontmatterNotAMapping => None,
            Error::DeserializeYaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use tracing_test::traced_test;

    // this makes traced_test happy
    use std::result::Result;

    #[test]
    fn test_from_frontmatter() -> Result<(), Error> {
        let file = File::from_frontmatter(
            "id: 12\ncreated_at: 2021-04-16\ntitle: Hello\ntags: [a, b]\n",
        )?;
        assert_eq!(file.id, Some(12));
        assert_eq!(
            file.created_at,
            Some(Utc.with_ymd_and_hms(2021, 4, 16, 0, 0, 0).unwrap())
        );
        assert_eq!(file.string_field("title"), Some("Hello"));
        assert!(matches!(
            file.fields.get("tags"),
            Some(Value::Array(tags)) if tags.len() == 2
        ));
        assert!(!file.fields.contains_key(ID));
        assert!(!file.fields.contains_key(CREATED_AT));
        Ok(())
    }

    #[test]
    fn test_from_frontmatter_numeric_string_id() -> Result<(), Error> {
        assert_eq!(File::from_frontmatter("id: \"7\"")?.id, Some(7));
        Ok(())
    }

    #[test]
    fn test_from_frontmatter_zero_id() -> Result<(), Error> {
        assert_eq!(File::from_frontmatter("id: 0")?.id, Some(0));
        Ok(())
    }

    #[test]
    fn test_from_frontmatter_missing_fields() -> Result<(), Error> {
        let file = File::from_frontmatter("title: About")?;
        assert_eq!(file.id, None);
        assert_eq!(file.created_at, None);

        let empty = File::from_frontmatter("")?;
        assert!(empty.fields.is_empty());
        Ok(())
    }

    #[traced_test]
    #[test]
    fn test_from_frontmatter_malformed_fields_are_dropped() {
        let file = File::from_frontmatter("id: -3\ncreated_at: someday\n").unwrap();
        assert_eq!(file.id, None);
        assert_eq!(file.created_at, None);
        assert!(logs_contain("ignoring malformed post id"));
        assert!(logs_contain("ignoring malformed creation date"));
    }

    #[test]
    fn test_from_frontmatter_rejects_non_mapping() {
        assert!(matches!(
            File::from_frontmatter("- a\n- b\n"),
            Err(Error::FrontmatterNotAMapping)
        ));
        assert!(matches!(
            File::from_frontmatter("title: [unclosed"),
            Err(Error::DeserializeYaml(_))
        ));
    }

    #[test]
    fn test_from_source() -> Result<(), Error> {
        let file = File::from_source("---\nid: 3\ntitle: Simple\n---\n# Hello\n\nWorld\n")?;
        assert_eq!(file.id, Some(3));
        assert_eq!(file.string_field(CONTENTS), Some("# Hello\n\nWorld\n"));
        Ok(())
    }

    #[test]
    fn test_from_source_dashes_outside_fences() -> Result<(), Error> {
        let file = File::from_source(
            "---\nid: 5\ntitle: Java --- the good parts\n---\nBody.\n\n---\n\nMore.\n",
        )?;
        assert_eq!(file.id, Some(5));
        assert_eq!(file.string_field("title"), Some("Java --- the good parts"));
        assert_eq!(file.string_field(CONTENTS), Some("Body.\n\n---\n\nMore.\n"));
        Ok(())
    }

    #[test]
    fn test_from_source_fence_must_be_alone_on_its_line() {
        assert!(matches!(
            File::from_source("---\ntitle: x\n---y\n"),
            Err(Error::FrontmatterMissingEndFence)
        ));
    }

    #[test]
    fn test_from_source_fences() {
        assert!(matches!(
            File::from_source("title: x\n"),
            Err(Error::FrontmatterMissingStartFence)
        ));
        assert!(matches!(
            File::from_source("---\ntitle: x\n"),
            Err(Error::FrontmatterMissingEndFence)
        ));
    }
}
