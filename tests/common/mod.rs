#![allow(dead_code)]

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use orbit_score::model::{Case, CaseFinancials, CaseFlag, DateRange, PeriodData, ScoringInput};
use orbit_score::ScoringSettings;

pub const HIP: &str = "hip-arthroplasty";

pub fn march() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    )
}

pub fn february() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
    )
}

/// An on-time hip case: scheduled 07:30, patient in 07:30 UTC, prep/drape
/// complete 07:50, incision 07:52, patient out `duration` minutes after in.
pub fn hip_case(surgeon: &str, n: usize, month: u32, duration: i64) -> Case {
    hip_case_at(surgeon, n, month, (7, 30), duration)
}

/// Hip case scheduled for 07:30 whose patient comes in at `utc_in` (UTC)
pub fn hip_case_at(surgeon: &str, n: usize, month: u32, utc_in: (u32, u32), duration: i64) -> Case {
    let day = (n % 28) as u32 + 1;
    let date = NaiveDate::from_ymd_opt(2024, month, day).unwrap();
    let patient_in = Utc
        .with_ymd_and_hms(2024, month, day, utc_in.0, utc_in.1, 0)
        .unwrap();
    let stamp = |minutes: i64| Some((patient_in + Duration::minutes(minutes)).to_rfc3339());

    Case {
        case_id: format!("{}-{}-{}", surgeon, month, n),
        surgeon_id: surgeon.to_string(),
        surgeon_name: format!("Dr. {}", surgeon.to_uppercase()),
        procedure_type_id: HIP.to_string(),
        procedure_name: "Hip Arthroplasty".to_string(),
        or_room_id: Some("or-1".to_string()),
        scheduled_date: date,
        start_time: Some("07:30".to_string()),
        patient_in_at: stamp(0),
        incision_at: stamp(22),
        prep_drape_complete_at: stamp(20),
        closing_at: stamp(duration - 10),
        patient_out_at: stamp(duration),
    }
}

pub fn financial(case: &Case, profit: Option<f64>) -> CaseFinancials {
    CaseFinancials {
        case_id: case.case_id.clone(),
        profit,
        reimbursement: None,
        or_time_cost: None,
    }
}

pub fn delay_flag(case: &Case) -> CaseFlag {
    CaseFlag {
        case_id: case.case_id.clone(),
        flag_type: "delay".to_string(),
        severity: Some("warning".to_string()),
        delay_type_name: Some("Surgeon late".to_string()),
    }
}

/// Records for one period, built surgeon by surgeon
#[derive(Default)]
pub struct PeriodBuilder {
    cases: Vec<Case>,
    financials: Vec<CaseFinancials>,
    flags: Vec<CaseFlag>,
}

impl PeriodBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` 100-minute hip cases earning `margin` per OR minute
    pub fn surgeon(mut self, surgeon: &str, count: usize, month: u32, margin: Option<f64>) -> Self {
        for n in 0..count {
            let case = hip_case(surgeon, n, month, 100);
            self.financials
                .push(financial(&case, margin.map(|m| m * 100.0)));
            self.cases.push(case);
        }
        self
    }

    pub fn case(mut self, case: Case, profit: Option<f64>) -> Self {
        self.financials.push(financial(&case, profit));
        self.cases.push(case);
        self
    }

    pub fn flag(mut self, case_id: &str) -> Self {
        if let Some(case) = self.cases.iter().find(|c| c.case_id == case_id) {
            self.flags.push(delay_flag(case));
        }
        self
    }

    pub fn build(self, range: DateRange) -> PeriodData {
        PeriodData {
            range,
            cases: self.cases,
            financials: self.financials,
            flags: self.flags,
        }
    }
}

/// Five three-case peers earning 10, 12, 14, 16 and 18 per minute
pub fn hip_peers(builder: PeriodBuilder, month: u32) -> PeriodBuilder {
    [("p1", 10.0), ("p2", 12.0), ("p3", 14.0), ("p4", 16.0), ("p5", 18.0)]
        .into_iter()
        .fold(builder, |b, (peer, margin)| b.surgeon(peer, 3, month, Some(margin)))
}

/// March period: surgeon `x` with 20 hip cases at `margin`, plus the peers
pub fn hip_scenario(margin: f64) -> PeriodData {
    hip_peers(PeriodBuilder::new().surgeon("x", 20, 3, Some(margin)), 3).build(march())
}

pub fn input(current: PeriodData, prior: Option<PeriodData>) -> ScoringInput {
    ScoringInput {
        current,
        prior,
        settings: ScoringSettings::default(),
        timezone: "UTC".to_string(),
        utc_offset_minutes: None,
        enable_diagnostics: false,
    }
}
