// Graduated per-case decay used by the time-based pillars

/// Score a case from minutes past its grace window: 1.0 when on time,
/// falling linearly to 0.0 at `floor_minutes`.
pub fn graduated_case_score(minutes_over: f64, floor_minutes: f64) -> f64 {
    if minutes_over <= 0.0 {
        return 1.0;
    }
    if minutes_over >= floor_minutes {
        return 0.0;
    }
    1.0 - minutes_over / floor_minutes
}

/// Minutes past a grace allowance, never negative
pub fn minutes_over_grace(delta_minutes: f64, grace_minutes: f64) -> f64 {
    (delta_minutes - grace_minutes).max(0.0)
}
