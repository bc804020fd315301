//! Compiles user-entered search filters into a JSONPath filter predicate.
//!
//! Filters are typed key/value constraints (`key:value` for equality,
//! `key~value` for a regular expression match) or free text searched over
//! the whole serialized document. A [`FilterSet`] merges them per key and
//! kind and compiles the conjunction into a `$[?(...)]` string for an
//! external JSONPath engine.

mod errors;
mod filter_set;
mod kind;
mod term;

pub use errors::FilterError;
pub use filter_set::{FilterEvent, FilterSet, FilterSubscriber};
pub use kind::ComparisonKind;
pub use term::{Term, TermJson, WHOLE_DOCUMENT};

/// Parses every compact filter string and compiles them into one JSONPath
/// predicate. Returns `Ok(None)` when no filters were given.
pub fn compile_filter_strings<I, S>(filters: I) -> Result<Option<String>, FilterError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut filter_set = FilterSet::new();
    for filter in filters {
        filter_set.add_from_string(filter.as_ref())?;
    }
    Ok(filter_set.create_json_path())
}
