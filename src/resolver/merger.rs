//! Writing resolved values back into the config map

use std::collections::HashMap;

use super::{normalize, ConfigMap, Outcomes, ParameterBinding, ResolutionOutcome, VALUE_NOT_EXISTS};

/// Counts of what happened to each binding during a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub resolved: usize,
    pub invalid: usize,
    /// Bindings whose parameter had no outcome at all
    pub untouched: usize,
}

/// Apply `outcomes` to every binding in `config`.
///
/// A resolved outcome for the exact parameter name is used first. Otherwise
/// outcomes for names differing only by case are consulted, and a resolved
/// value beats an invalid one. Invalid parameters become [`VALUE_NOT_EXISTS`]
/// with one warning per local variable. Parameters without any outcome keep
/// their original value.
pub fn merge(
    bindings: &[ParameterBinding],
    outcomes: &Outcomes,
    config: &mut ConfigMap,
) -> MergeSummary {
    let mut summary = MergeSummary::default();
    let folded = fold_case(outcomes);

    for binding in bindings {
        let outcome = match outcomes.get(&binding.parameter) {
            Some(resolved @ ResolutionOutcome::Resolved(_)) => Some(resolved),
            _ => folded.get(&normalize(&binding.parameter)).copied(),
        };

        match outcome {
            Some(ResolutionOutcome::Resolved(value)) => {
                config.insert(binding.env_var.clone(), value.clone());
                summary.resolved += 1;
            }
            Some(ResolutionOutcome::NotFound) => {
                tracing::warn!(
                    "Value for parameter: {} not exists in AWS Parameter Store. Environment variable: {}",
                    binding.parameter,
                    binding.env_var
                );
                config.insert(binding.env_var.clone(), VALUE_NOT_EXISTS.to_string());
                summary.invalid += 1;
            }
            None => {
                tracing::debug!(
                    parameter = %binding.parameter,
                    variable = %binding.env_var,
                    "No outcome for parameter, keeping original value"
                );
                summary.untouched += 1;
            }
        }
    }

    summary
}

/// Best outcome per lower-cased name. Resolved beats invalid; among several
/// resolved spellings the lexically smallest name wins.
fn fold_case(outcomes: &Outcomes) -> HashMap<String, &ResolutionOutcome> {
    let mut names: Vec<&String> = outcomes.keys().collect();
    names.sort_unstable();

    let mut folded: HashMap<String, &ResolutionOutcome> = HashMap::with_capacity(names.len());
    for name in names {
        let outcome = &outcomes[name];
        folded
            .entry(normalize(name))
            .and_modify(|best| {
                if matches!(best, ResolutionOutcome::NotFound)
                    && matches!(outcome, ResolutionOutcome::Resolved(_))
                {
                    *best = outcome;
                }
            })
            .or_insert(outcome);
    }
    folded
}
