//! Sample-subset selection grammar: a comma/newline-separated list of
//! names, optionally entirely `^`-prefixed to mean "exclude these", with
//! an `@file` indirection form. Kept as a pure string-parsing module with
//! no VCF header type at its boundary, so it is testable without
//! fixtures.

use std::collections::HashSet;
use std::path::Path;

use crate::errors::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleSelection {
    All,
    Include(Vec<String>),
    Exclude(HashSet<String>),
}

pub fn parse_sample_spec(spec: &str) -> Result<SampleSelection, Error> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Ok(SampleSelection::All);
    }

    let body = if let Some(rest) = spec.strip_prefix('@') {
        let path = Path::new(rest);
        std::fs::read_to_string(path).map_err(|e| Error::SampleFileRead {
            path: path.to_path_buf(),
            msg: e.to_string(),
        })?
    } else {
        spec.to_string()
    };

    let entries: Vec<&str> = body
        .split(|c: char| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if entries.is_empty() {
        return Ok(SampleSelection::All);
    }

    let all_excluded = entries.iter().all(|e| e.starts_with('^'));
    let all_included = entries.iter().all(|e| !e.starts_with('^'));
    if !all_excluded && !all_included {
        return Err(Error::ContradictorySampleSelection);
    }

    if all_excluded {
        Ok(SampleSelection::Exclude(entries.iter().map(|e| e.trim_start_matches('^').to_string()).collect()))
    } else {
        Ok(SampleSelection::Include(entries.iter().map(|s| s.to_string()).collect()))
    }
}

/// Resolves a selection against the VCF header's sample order, returning
/// the 0-based indices to keep, in header order.
pub fn resolve_indices(
    selection: &SampleSelection,
    header_samples: &[String],
    force_samples: bool,
) -> Result<Vec<usize>, Error> {
    match selection {
        SampleSelection::All => Ok((0..header_samples.len()).collect()),
        SampleSelection::Include(names) => {
            let mut idx = Vec::with_capacity(names.len());
            for name in names {
                match header_samples.iter().position(|s| s == name) {
                    Some(i) => idx.push(i),
                    None if force_samples => {}
                    None => return Err(Error::UnknownSample { name: name.clone() }),
                }
            }
            Ok(idx)
        }
        SampleSelection::Exclude(excluded) => {
            if !force_samples {
                for name in excluded {
                    if !header_samples.iter().any(|s| s == name) {
                        return Err(Error::UnknownSample { name: name.clone() });
                    }
                }
            }
            Ok((0..header_samples.len()).filter(|&i| !excluded.contains(&header_samples[i])).collect())
        }
    }
}
