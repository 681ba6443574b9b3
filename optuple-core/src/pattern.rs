// Pattern-match results as optional values

use crate::error::OptionError;
use crate::option::Opt;
use regex::{Captures, Match, Regex};

/// The overall match of `regex` in `haystack`
pub fn find<'h>(regex: &Regex, haystack: &'h str) -> Opt<Match<'h>> {
    Opt::from_nullable(regex.find(haystack))
}

/// Capture group `index`, absent when the group did not participate.
///
/// An index past the pattern's group count is an invalid argument rather
/// than an absent value.
pub fn group<'h>(captures: &Captures<'h>, index: usize) -> Result<Opt<Match<'h>>, OptionError> {
    if index >= captures.len() {
        return Err(OptionError::invalid_argument(
            "index",
            format!(
                "group {} out of range for a pattern with {} groups",
                index,
                captures.len()
            ),
        ));
    }
    Ok(Opt::from_nullable(captures.get(index)))
}

/// Named capture group, absent when the group did not participate.
///
/// `regex` must be the pattern that produced `captures`; a name it does not
/// declare is an invalid argument.
pub fn named<'h>(
    regex: &Regex,
    captures: &Captures<'h>,
    name: &str,
) -> Result<Opt<Match<'h>>, OptionError> {
    check_name(regex, name)?;
    Ok(Opt::from_nullable(captures.name(name)))
}

/// Check that `regex` has a group `index`, before any input is matched
pub fn check_index(regex: &Regex, index: usize) -> Result<(), OptionError> {
    if index >= regex.captures_len() {
        return Err(OptionError::invalid_argument(
            "index",
            format!(
                "group {} out of range for a pattern with {} groups",
                index,
                regex.captures_len()
            ),
        ));
    }
    Ok(())
}

/// Check that `regex` declares a group called `name`, before any input is matched
pub fn check_name(regex: &Regex, name: &str) -> Result<(), OptionError> {
    if !regex.capture_names().flatten().any(|n| n == name) {
        return Err(OptionError::invalid_argument(
            "name",
            format!("pattern '{}' has no group named '{}'", regex.as_str(), name),
        ));
    }
    Ok(())
}
