//! Batch planning
//!
//! Several variables may point at the same parameter; each name is fetched
//! once. Names are sorted before slicing, but any order gives the same merged
//! result.

use std::collections::BTreeSet;

use super::ParameterBinding;

/// A group of unique parameter names fetched in one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Position of the batch in the plan, used for logging
    pub index: usize,
    pub names: Vec<String>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Deduplicated parameter names referenced by `bindings`
pub fn unique_names(bindings: &[ParameterBinding]) -> BTreeSet<&str> {
    bindings.iter().map(|b| b.parameter.as_str()).collect()
}

/// Slice the unique names of `bindings` into batches of at most `batch_size`.
///
/// A `batch_size` of zero is treated as one.
pub fn plan(bindings: &[ParameterBinding], batch_size: usize) -> Vec<Batch> {
    let names: Vec<&str> = unique_names(bindings).into_iter().collect();

    names
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(index, chunk)| Batch {
            index,
            names: chunk.iter().map(|n| n.to_string()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn bindings_for(count: usize) -> Vec<ParameterBinding> {
        (0..count)
            .map(|i| ParameterBinding::new(format!("VAR_{i}"), format!("app/param-{i:02}")))
            .collect()
    }

    #[test]
    fn test_empty_bindings_produce_no_batches() {
        assert!(plan(&[], 10).is_empty());
    }

    #[test]
    fn test_duplicates_are_requested_once() {
        let bindings = vec![
            ParameterBinding::new("A", "db/pass"),
            ParameterBinding::new("B", "db/pass"),
            ParameterBinding::new("C", "db/user"),
        ];

        let batches = plan(&bindings, 10);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].names, vec!["db/pass", "db/user"]);
    }

    #[test]
    fn test_names_differing_in_case_are_distinct() {
        let bindings = vec![
            ParameterBinding::new("A", "db/pass"),
            ParameterBinding::new("B", "DB/PASS"),
        ];
        assert_eq!(unique_names(&bindings).len(), 2);
    }

    #[test]
    fn test_twenty_three_names_make_three_batches() {
        let batches = plan(&bindings_for(23), 10);
        let sizes: Vec<usize> = batches.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![10, 10, 3]);
        assert_eq!(
            batches.iter().map(|b| b.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_batches_partition_unique_names() {
        for (count, size) in [(1, 1), (7, 3), (10, 10), (11, 10), (30, 7)] {
            let bindings = bindings_for(count);
            let batches = plan(&bindings, size);

            assert_eq!(batches.len(), count.div_ceil(size));
            assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= size));

            let all: Vec<&String> = batches.iter().flat_map(|b| &b.names).collect();
            let distinct: HashSet<&String> = all.iter().copied().collect();
            assert_eq!(all.len(), count);
            assert_eq!(distinct.len(), count);
        }
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        let batches = plan(&bindings_for(2), 0);
        assert_eq!(batches.len(), 2);
    }
}
