// ============================================================================
// cqscout-core/src/search/strategy.rs
// ============================================================================
//
// PROBE STRATEGIES: Which Parameter to Try Next
//
// A strategy only looks at the search bounds; it never encodes or measures
// anything itself. Both implementations rely on quality falling as the
// parameter rises: every parameter at or below an accepted one is assumed
// acceptable, every parameter at or above a rejected one is assumed rejected.
//
// AI-ASSISTANT-INFO: Probe ordering for the parameter search

use super::SearchState;
use crate::config::SearchStrategy;
use crate::quality::QualityParameter;

/// Chooses probes and narrows the search bounds from their verdicts.
pub trait ProbeStrategy {
    /// The next parameter to probe, or `None` once the bounds have met.
    fn next_probe(&self, state: &SearchState) -> Option<QualityParameter>;

    /// Narrows the bounds after `parameter` was accepted or rejected.
    fn advance(&self, state: &mut SearchState, parameter: QualityParameter, accepted: bool);
}

/// Classic binary search over `[low, high]`.
///
/// Probes the midpoint (rounded down). Terminates after at most
/// `ceil(log2(52)) = 6` probes on the full domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bisection;

impl ProbeStrategy for Bisection {
    fn next_probe(&self, state: &SearchState) -> Option<QualityParameter> {
        if state.low > state.high {
            return None;
        }
        QualityParameter::try_from((state.low + state.high) / 2).ok()
    }

    fn advance(&self, state: &mut SearchState, parameter: QualityParameter, accepted: bool) {
        let probed = i32::from(parameter.value());
        if accepted {
            state.low = probed + 1;
        } else {
            state.high = probed - 1;
        }
    }
}

/// Ascending scan from the low bound, stopping at the first rejection.
///
/// Uses one probe per accepted parameter plus one, which is only worth it
/// when the boundary is expected near the top quality end.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScan;

impl ProbeStrategy for LinearScan {
    fn next_probe(&self, state: &SearchState) -> Option<QualityParameter> {
        if state.low > state.high {
            return None;
        }
        QualityParameter::try_from(state.low).ok()
    }

    fn advance(&self, state: &mut SearchState, parameter: QualityParameter, accepted: bool) {
        let probed = i32::from(parameter.value());
        if accepted {
            state.low = probed + 1;
        } else {
            // Everything above a rejection is assumed rejected too.
            state.high = probed - 1;
        }
    }
}

impl SearchStrategy {
    /// Instantiates the strategy this setting names.
    #[must_use]
    pub fn probe_strategy(self) -> Box<dyn ProbeStrategy> {
        match self {
            SearchStrategy::Bisection => Box::new(Bisection),
            SearchStrategy::Linear => Box::new(LinearScan),
        }
    }
}
