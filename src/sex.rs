//! Loads a sex file (`sample_name<whitespace>M|F`, one per line) into a
//! `Vec<Sex>` aligned with a given sample ordering. Samples absent from
//! the file, or carrying an unrecognised code, resolve to `Sex::Unknown`.

use std::collections::HashMap;
use std::path::Path;

use crate::errors::Error;
use crate::record::Sex;

pub fn load_sex_file(path: impl AsRef<Path>, sample_order: &[String]) -> Result<Vec<Sex>, Error> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::SexFileRead {
        path: path.to_path_buf(),
        msg: e.to_string(),
    })?;
    let by_name = parse_sex_lines(&content);
    Ok(sample_order.iter().map(|s| by_name.get(s).copied().unwrap_or_default()).collect())
}

fn parse_sex_lines(content: &str) -> HashMap<String, Sex> {
    let mut by_name = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let name = match fields.next() {
            Some(n) => n,
            None => continue,
        };
        let sex = match fields.next().map(str::to_ascii_uppercase).as_deref() {
            Some("M") => Sex::Male,
            Some("F") => Sex::Female,
            _ => Sex::Unknown,
        };
        by_name.insert(name.to_string(), sex);
    }
    by_name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlisted_samples_default_to_unknown() {
        let by_name = parse_sex_lines("s1\tM\ns2\tF\n");
        let order = vec!["s1".to_string(), "s2".to_string(), "s3".to_string()];
        let sexes: Vec<Sex> = order.iter().map(|s| by_name.get(s).copied().unwrap_or_default()).collect();
        assert_eq!(sexes, vec![Sex::Male, Sex::Female, Sex::Unknown]);
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        let by_name = parse_sex_lines("# header\n\ns1 M\n");
        assert_eq!(by_name.get("s1"), Some(&Sex::Male));
        assert_eq!(by_name.len(), 1);
    }

    #[test]
    fn unrecognised_code_is_unknown() {
        let by_name = parse_sex_lines("s1 X\n");
        assert_eq!(by_name.get("s1"), Some(&Sex::Unknown));
    }
}
