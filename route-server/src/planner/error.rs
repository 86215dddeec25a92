//! Fuel-stop planner error types.

/// Errors from start-price selection and fuel-stop planning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    /// Corridor search found no stations at all.
    #[error("no fuel stations available on route")]
    NoStations,

    /// No station close enough to the start to anchor the start price.
    #[error("no fuel stations found near the start location")]
    NoStartCandidate,

    /// A single segment between purchase opportunities is longer than the
    /// vehicle's full-tank range.
    #[error("route segment exceeds vehicle range")]
    RangeExceeded,

    /// The fuel ledger went negative. Guarded by the range check, so this
    /// indicates an internal inconsistency rather than a bad request.
    #[error("insufficient fuel to reach next stop")]
    InsufficientFuel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            PlannerError::NoStations.to_string(),
            "no fuel stations available on route"
        );
        assert_eq!(
            PlannerError::RangeExceeded.to_string(),
            "route segment exceeds vehicle range"
        );
    }
}
