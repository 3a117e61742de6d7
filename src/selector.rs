//! Instance selection: filter, score and pick the best machine type for one workload.

use log::{debug, log_enabled, trace, Level};
use crate::filter::{filter, first_rejection, Predicate};
use crate::fit::{score, ScoreBreakdown};
use crate::machine::MachineSpec;
use crate::strategy::SelectionStrategy;
use crate::workload::WorkloadProfile;

/// Score reported when no candidate survives filtering.
pub const NO_MACHINE_SCORE: f64 = -1.0;

/// Outcome of a selection. Finding no machine is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub machine: Option<MachineSpec>,
    pub score: f64,
}

impl Selection {
    pub fn none() -> Self {
        Self {
            machine: None,
            score: NO_MACHINE_SCORE,
        }
    }

    pub fn is_found(&self) -> bool {
        self.machine.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct RankedCandidate<'a> {
    pub machine: &'a MachineSpec,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// All feasible candidates, best first. Equal scores keep catalog order.
pub fn rank<'a>(
    candidates: &'a [MachineSpec],
    workload: &WorkloadProfile,
    strategy: SelectionStrategy,
) -> Vec<RankedCandidate<'a>> {
    let weights = strategy.weights();
    let mut ranked: Vec<RankedCandidate> = filter(candidates, workload, &Predicate::STANDARD)
        .into_iter()
        .map(|machine| {
            let breakdown = ScoreBreakdown::compute(machine, workload);
            RankedCandidate {
                machine,
                score: breakdown.weighted(weights),
                breakdown,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Best feasible candidate under `strategy`. The first listed candidate wins a tie.
pub fn select(candidates: &[MachineSpec], workload: &WorkloadProfile, strategy: SelectionStrategy) -> Selection {
    let best = filter(candidates, workload, &Predicate::STANDARD)
        .into_iter()
        .map(|machine| (machine, score(machine, workload, strategy)))
        .fold(None, |best: Option<(&MachineSpec, f64)>, (machine, machine_score)| match best {
            Some((_, best_score)) if best_score >= machine_score => best,
            _ => Some((machine, machine_score)),
        });

    match best {
        Some((machine, best_score)) => {
            debug!("Selected {} for {} with {} strategy, score {:.4}", machine, workload, strategy, best_score);
            Selection {
                machine: Some(machine.clone()),
                score: best_score,
            }
        }
        None => {
            debug!("No machine type among {} candidates fits {}", candidates.len(), workload);
            if log_enabled!(Level::Trace) {
                for machine in candidates {
                    if let Some(predicate) = first_rejection(machine, workload, &Predicate::STANDARD) {
                        trace!("{} rejected by {} predicate", machine.name, predicate);
                    }
                }
            }
            Selection::none()
        }
    }
}
