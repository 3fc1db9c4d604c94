use crate::scoring::diagnostics::SurgeonDiagnostics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four weighted sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    /// Margin per OR minute against procedure peers
    Profitability,
    /// Case duration variability against procedure peers
    Consistency,
    /// On-time starts against all peers
    SchedAdherence,
    /// Readiness at incision and attributable delays
    Availability,
}

impl Pillar {
    pub const ALL: [Pillar; 4] = [
        Pillar::Profitability,
        Pillar::Consistency,
        Pillar::SchedAdherence,
        Pillar::Availability,
    ];

    /// Weight in the composite; the four weights sum to 1.0
    pub fn weight(self) -> f64 {
        match self {
            Pillar::Profitability => 0.30,
            Pillar::Consistency => 0.25,
            Pillar::SchedAdherence => 0.25,
            Pillar::Availability => 0.20,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pillar::Profitability => "Profitability",
            Pillar::Consistency => "Consistency",
            Pillar::SchedAdherence => "Schedule Adherence",
            Pillar::Availability => "Availability",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Pillar scores, each within [10, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarScores {
    pub profitability: u32,
    pub consistency: u32,
    pub sched_adherence: u32,
    pub availability: u32,
}

impl PillarScores {
    pub fn get(&self, pillar: Pillar) -> u32 {
        match pillar {
            Pillar::Profitability => self.profitability,
            Pillar::Consistency => self.consistency,
            Pillar::SchedAdherence => self.sched_adherence,
            Pillar::Availability => self.availability,
        }
    }
}

/// Letter grade derived from the composite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::A, Grade::B, Grade::C, Grade::D];

    /// Grade band for a composite score (inclusive lower bounds)
    pub fn from_composite(composite: u32) -> Self {
        if composite >= 90 {
            Grade::A
        } else if composite >= 80 {
            Grade::B
        } else if composite >= 70 {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::A => "Elite",
            Grade::B => "Strong",
            Grade::C => "Developing",
            Grade::D => "Needs Improvement",
        }
    }

    pub fn text_color(self) -> &'static str {
        match self {
            Grade::A => "#047857",
            Grade::B => "#1D4ED8",
            Grade::C => "#B45309",
            Grade::D => "#B91C1C",
        }
    }

    pub fn bg_color(self) -> &'static str {
        match self {
            Grade::A => "#ECFDF5",
            Grade::B => "#EFF6FF",
            Grade::C => "#FFFBEB",
            Grade::D => "#FEF2F2",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        write!(f, "{}", letter)
    }
}

/// Direction of the composite against the prior period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// Compare a composite against the prior one; no prior score is `Stable`
    pub fn between(current: u32, previous: Option<u32>) -> Self {
        match previous {
            Some(prev) if current > prev => Trend::Up,
            Some(prev) if current < prev => Trend::Down,
            _ => Trend::Stable,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Case count for one procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureCount {
    pub name: String,
    pub count: usize,
}

/// Scored result for one surgeon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub surgeon_id: String,
    pub surgeon_name: String,
    /// Cases in the window
    pub case_count: usize,
    /// Cases per procedure name, busiest first
    pub procedure_breakdown: Vec<ProcedureCount>,
    /// Worked more than one room on the same day at least once
    pub flip_room: bool,
    pub pillars: PillarScores,
    pub composite: u32,
    pub grade: Grade,
    pub trend: Trend,
    /// Composite from the prior period, if the surgeon qualified there
    pub previous_composite: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<SurgeonDiagnostics>,
}
