use failure::Fail;
use log::warn;
use regex::Regex;

use std::sync::LazyLock;

// name (type) share%
static NAME_TYPE_SHARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^(]*?)\s*\((.*)\)\s*([^%]*)").expect("valid holder pattern")
});

/// One owner or royalty holder of a property.
#[derive(Debug, Clone, PartialEq)]
pub struct HolderEntry {
    pub name: String,
    pub holder_type: String,
    /// As written in the source. Can be blank or not a number.
    pub share: String,
}

#[derive(Debug, Fail, PartialEq)]
pub enum HolderError {
    #[fail(display = "Malformed owner/royalty entry: {:?}", _0)]
    MalformedEntry(String),
}

/// Splits a raw `;` delimited holder list. Absent input is an empty list.
pub fn split_holders(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(raw) => raw
            .split(';')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(String::from)
            .collect(),
        None => Vec::new(),
    }
}

pub fn parse_holder(segment: &str) -> Result<HolderEntry, HolderError> {
    let captures = NAME_TYPE_SHARE
        .captures(segment)
        .ok_or_else(|| HolderError::MalformedEntry(segment.to_owned()))?;

    let name = captures.get(1).map_or("", |m| m.as_str());
    if name.is_empty() {
        return Err(HolderError::MalformedEntry(segment.to_owned()));
    }

    Ok(HolderEntry {
        name: name.to_owned(),
        holder_type: captures.get(2).map_or("", |m| m.as_str()).trim().to_owned(),
        share: captures.get(3).map_or("", |m| m.as_str()).trim().to_owned(),
    })
}

/// Parses every segment of a raw holder list, skipping the malformed ones.
#[cfg_attr(not(test), allow(dead_code))]
pub fn parse_holders(raw: Option<&str>) -> Vec<HolderEntry> {
    split_holders(raw)
        .iter()
        .filter_map(|segment| match parse_holder(segment) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping entry. {}", err);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn it_should_split_nothing_into_an_empty_list() {
        assert_eq!(split_holders(None), Vec::<String>::new());
        assert_eq!(split_holders(Some("")), Vec::<String>::new());
    }

    #[test]
    fn it_should_split_and_trim_segments() {
        let segments = split_holders(Some("X (Owner) 50%; Y (Royalty) 10%"));

        assert_eq!(segments, vec!["X (Owner) 50%", "Y (Royalty) 10%"]);

        let names: Vec<_> = segments
            .iter()
            .map(|s| parse_holder(s).unwrap().name)
            .collect();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn it_should_drop_empty_segments() {
        assert_eq!(split_holders(Some(" A (Owner) 1% ;; ")), vec!["A (Owner) 1%"]);
    }

    #[test]
    fn it_should_parse_a_holder() {
        let entry = parse_holder("  Barrick Gold Corp.  (Owner)  100%").unwrap();

        assert_eq!(
            entry,
            HolderEntry {
                name: "Barrick Gold Corp.".to_owned(),
                holder_type: "Owner".to_owned(),
                share: "100".to_owned(),
            }
        );
    }

    #[test]
    fn it_should_keep_blank_and_non_numeric_shares() {
        assert_eq!(parse_holder("Franco-Nevada (Royalty)").unwrap().share, "");
        assert_eq!(parse_holder("Osisko (Royalty) NSR 2%").unwrap().share, "NSR 2");
    }

    #[test]
    fn it_should_fail_without_a_type() {
        let result = parse_holder("Barrick Gold Corp. 100%");

        assert_matches!(result, Err(HolderError::MalformedEntry(_)));
    }

    #[test]
    fn it_should_fail_without_a_name() {
        let result = parse_holder("(Owner) 100%");

        assert_matches!(result, Err(HolderError::MalformedEntry(_)));
    }

    #[test]
    fn it_should_skip_malformed_holders() {
        let entries = parse_holders(Some("A (Owner) 60%; nonsense; B (Owner) 40%"));

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
