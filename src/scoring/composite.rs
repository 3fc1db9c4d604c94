// Composite score - weighted sum of the four pillars, see Pillar::weight

use crate::model::{Grade, Pillar, PillarScores};

/// Weighted composite of the pillar scores, rounded
pub fn composite_score(pillars: &PillarScores) -> u32 {
    let weighted: f64 = Pillar::ALL
        .iter()
        .map(|&pillar| pillars.get(pillar) as f64 * pillar.weight())
        .sum();
    weighted.round() as u32
}

/// Composite and its grade band
pub fn grade_pillars(pillars: &PillarScores) -> (u32, Grade) {
    let composite = composite_score(pillars);
    (composite, Grade::from_composite(composite))
}
