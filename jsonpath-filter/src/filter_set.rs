use crate::{ComparisonKind, FilterError, Term};
use log::debug;
use std::fmt;

/// Change notification raised after each mutation of a [`FilterSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    Added {
        key: String,
        kind: ComparisonKind,
    },
    Merged {
        key: String,
        kind: ComparisonKind,
        values: Vec<String>,
    },
    Removed {
        key: String,
        kind: ComparisonKind,
    },
    Cleared,
}

pub type FilterSubscriber = Box<dyn FnMut(&FilterEvent)>;

/// Ordered collection of terms, unique per `(kind, key)`, compiled into a
/// single JSONPath filter predicate by conjunction.
#[derive(Default)]
pub struct FilterSet {
    terms: Vec<Term>,
    subscribers: Vec<FilterSubscriber>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only snapshot of the terms, in insertion order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Registers a subscriber. Subscribers are called synchronously, in
    /// registration order, after every mutation.
    pub fn subscribe(&mut self, subscriber: FilterSubscriber) {
        self.subscribers.push(subscriber);
    }

    fn notify(&mut self, event: &FilterEvent) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(event);
        }
    }

    /// Merges `term` into the existing term with the same kind and key, or
    /// appends it when there is none.
    pub fn add_or_update(&mut self, term: Term) -> &mut Self {
        let kind = term.kind();
        let existing = self
            .terms
            .iter_mut()
            .find(|existing| existing.kind() == kind && existing.key() == term.key());

        let event = match existing {
            Some(existing) => {
                existing.add(term.into_values());
                debug!("Merged values into {} term {:?}", kind, existing.key());
                FilterEvent::Merged {
                    key: existing.key().to_string(),
                    kind,
                    values: existing.values().iter().cloned().collect(),
                }
            }
            None => {
                debug!("Added {} term {:?}", kind, term.key());
                let event = FilterEvent::Added {
                    key: term.key().to_string(),
                    kind,
                };
                self.terms.push(term);
                event
            }
        };
        self.notify(&event);
        self
    }

    /// Field `key` must equal `value` exactly.
    pub fn add_prop_eq(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, FilterError> {
        let term = Term::new(ComparisonKind::Equals, value, key, None)?;
        Ok(self.add_or_update(term))
    }

    /// Field `key` must match the regular expression `value`.
    pub fn add_prop_like(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, FilterError> {
        let term = Term::new(ComparisonKind::Matches, value, key, None)?;
        Ok(self.add_or_update(term))
    }

    /// The serialized document must match the regular expression `value`.
    pub fn set_all_like(&mut self, value: impl Into<String>) -> &mut Self {
        self.add_or_update(Term::whole_document(value))
    }

    /// Parses a compact filter string and adds the resulting term.
    pub fn add_from_string(&mut self, input: &str) -> Result<&mut Self, FilterError> {
        let term: Term = input.parse()?;
        Ok(self.add_or_update(term))
    }

    /// Removes the term matching exactly `(key, kind)`. Returns whether a
    /// term was removed.
    pub fn remove(&mut self, key: &str, kind: ComparisonKind) -> bool {
        let before = self.terms.len();
        self.terms
            .retain(|term| !(term.kind() == kind && term.key() == key));
        if self.terms.len() == before {
            return false;
        }
        debug!("Removed {} term {:?}", kind, key);
        self.notify(&FilterEvent::Removed {
            key: key.to_string(),
            kind,
        });
        true
    }

    pub fn clear(&mut self) {
        if self.terms.is_empty() {
            return;
        }
        self.terms.clear();
        self.notify(&FilterEvent::Cleared);
    }

    /// Compact string for each term, in order.
    pub fn to_filter_strings(&self) -> Vec<String> {
        self.terms.iter().map(Term::to_string).collect()
    }

    /// Compiles all terms into `$[?(...)]`, or `None` when there is nothing
    /// to filter on.
    pub fn create_json_path(&self) -> Option<String> {
        let clauses: Vec<String> = self.terms.iter().map(Term::to_json_path).collect();
        let predicate = match clauses.as_slice() {
            [] => return None,
            [single] => single.clone(),
            many => many
                .iter()
                .map(|clause| format!("({})", clause))
                .collect::<Vec<_>>()
                .join("&&"),
        };
        let json_path = format!("$[?({})]", predicate);
        debug!("Compiled {} terms into {}", clauses.len(), json_path);
        Some(json_path)
    }
}

impl fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSet")
            .field("terms", &self.terms)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Extend<Term> for FilterSet {
    fn extend<I: IntoIterator<Item = Term>>(&mut self, terms: I) {
        for term in terms {
            self.add_or_update(term);
        }
    }
}

impl FromIterator<Term> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Term>>(terms: I) -> Self {
        let mut filters = FilterSet::new();
        filters.extend(terms);
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_add_or_update_merges_same_kind_and_key() {
        let mut filters = FilterSet::new();
        filters
            .add_or_update(Term::new(ComparisonKind::Equals, "brown", "quick", None).unwrap())
            .add_or_update(Term::new(ComparisonKind::Matches, "fox", "quick", None).unwrap())
            .add_or_update(Term::new(ComparisonKind::Equals, "lazy", "quick", None).unwrap());
        assert_eq!(filters.len(), 2);
        let values: Vec<&str> = filters.terms()[0]
            .values()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(values, vec!["lazy", "brown"]);
    }

    #[test]
    fn test_merge_keeps_position() {
        let mut filters = FilterSet::new();
        filters.add_prop_eq("a", "1").unwrap();
        filters.add_prop_eq("b", "2").unwrap();
        filters.add_prop_eq("a", "3").unwrap();
        assert_eq!(filters.to_filter_strings(), vec!["a:3,1", "b:2"]);
    }

    #[test]
    fn test_remove_only_exact_kind_and_key() {
        let mut filters = FilterSet::new();
        filters.add_prop_eq("quick", "brown").unwrap();
        filters.add_prop_like("quick", "fox").unwrap();
        assert!(filters.remove("quick", ComparisonKind::Equals));
        assert!(!filters.remove("quick", ComparisonKind::Equals));
        assert_eq!(filters.to_filter_strings(), vec!["quick~fox"]);
    }

    #[test]
    fn test_clear() {
        let mut filters = FilterSet::new();
        filters.set_all_like("quick");
        filters.clear();
        assert!(filters.is_empty());
        assert_eq!(filters.create_json_path(), None);
    }

    #[test]
    fn test_add_prop_eq_rejects_whole_document_key() {
        let mut filters = FilterSet::new();
        assert!(matches!(
            filters.add_prop_eq("@", "brown"),
            Err(FilterError::InvalidArgument(_))
        ));
        assert!(filters.is_empty());
    }

    #[test]
    fn test_three_terms_conjoined() {
        let mut filters = FilterSet::new();
        filters
            .add_from_string("quick:brown")
            .unwrap()
            .add_from_string("jumps~fox")
            .unwrap()
            .set_all_like("lazy");
        assert_eq!(
            filters.create_json_path().unwrap(),
            r#"$[?((@.quick=="brown")&&(/fox/.test(@.jumps))&&(/lazy/.test(JSON.stringify(@))))]"#
        );
    }

    #[test]
    fn test_from_iterator_merges() {
        let filters: FilterSet = ["quick:brown", "quick:fox", "lazy"]
            .iter()
            .map(|s| s.parse::<Term>().unwrap())
            .collect();
        assert_eq!(filters.to_filter_strings(), vec!["quick:fox,brown", "lazy"]);
    }

    #[test]
    fn test_subscribers_receive_events_in_order() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut filters = FilterSet::new();
        let sink = Rc::clone(&events);
        filters.subscribe(Box::new(move |event: &FilterEvent| sink.borrow_mut().push(event.clone())));

        filters.add_prop_eq("quick", "brown").unwrap();
        filters.add_prop_eq("quick", "fox").unwrap();
        filters.remove("quick", ComparisonKind::Matches);
        filters.remove("quick", ComparisonKind::Equals);
        filters.clear();
        filters.set_all_like("lazy");
        filters.clear();

        assert_eq!(
            *events.borrow(),
            vec![
                FilterEvent::Added {
                    key: "quick".to_string(),
                    kind: ComparisonKind::Equals,
                },
                FilterEvent::Merged {
                    key: "quick".to_string(),
                    kind: ComparisonKind::Equals,
                    values: vec!["fox".to_string(), "brown".to_string()],
                },
                FilterEvent::Removed {
                    key: "quick".to_string(),
                    kind: ComparisonKind::Equals,
                },
                FilterEvent::Added {
                    key: "@".to_string(),
                    kind: ComparisonKind::Matches,
                },
                FilterEvent::Cleared,
            ]
        );
    }
}
