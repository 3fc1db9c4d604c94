use crate::model::{DateRange, Grade, Pillar, Scorecard, Trend};
use crate::scoring::diagnostics::SurgeonDiagnostics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Count of scorecards per grade
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCounts {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub d: usize,
}

impl GradeCounts {
    fn add(&mut self, grade: Grade) {
        match grade {
            Grade::A => self.a += 1,
            Grade::B => self.b += 1,
            Grade::C => self.c += 1,
            Grade::D => self.d += 1,
        }
    }

    pub fn get(&self, grade: Grade) -> usize {
        match grade {
            Grade::A => self.a,
            Grade::B => self.b,
            Grade::C => self.c,
            Grade::D => self.d,
        }
    }
}

/// Facility-level summary of a scoring run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Surgeons that met the case-volume gate
    pub surgeons_scored: usize,
    /// Cases across scored surgeons
    pub cases_scored: usize,
    /// Mean composite, one decimal
    pub average_composite: f64,
    pub grades: GradeCounts,
    /// Highest composite
    pub top_surgeon: Option<String>,
    /// Lowest composite
    pub bottom_surgeon: Option<String>,
    pub trending_up: usize,
    pub trending_down: usize,
}

impl ScoreSummary {
    pub fn from_scorecards(scorecards: &[Scorecard]) -> Self {
        let mut grades = GradeCounts::default();
        for card in scorecards {
            grades.add(card.grade);
        }

        let average_composite = if scorecards.is_empty() {
            0.0
        } else {
            let total: u32 = scorecards.iter().map(|c| c.composite).sum();
            (total as f64 / scorecards.len() as f64 * 10.0).round() / 10.0
        };

        Self {
            surgeons_scored: scorecards.len(),
            cases_scored: scorecards.iter().map(|c| c.case_count).sum(),
            average_composite,
            grades,
            top_surgeon: scorecards.first().map(|c| c.surgeon_name.clone()),
            bottom_surgeon: scorecards.last().map(|c| c.surgeon_name.clone()),
            trending_up: scorecards.iter().filter(|c| c.trend == Trend::Up).count(),
            trending_down: scorecards.iter().filter(|c| c.trend == Trend::Down).count(),
        }
    }
}

/// A completed scoring run, ready to save or render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Run name
    pub name: String,
    /// Unique report ID
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    /// Scored window
    pub period: DateRange,
    /// Window used for trend
    pub prior_period: Option<DateRange>,
    pub summary: ScoreSummary,
    /// Scorecards, best composite first
    pub scorecards: Vec<Scorecard>,
}

impl ScoreReport {
    pub fn new(
        name: &str,
        period: DateRange,
        prior_period: Option<DateRange>,
        scorecards: Vec<Scorecard>,
    ) -> Self {
        Self {
            name: name.to_string(),
            report_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            period,
            prior_period,
            summary: ScoreSummary::from_scorecards(&scorecards),
            scorecards,
        }
    }

    pub fn scorecard(&self, surgeon_id: &str) -> Option<&Scorecard> {
        self.scorecards.iter().find(|c| c.surgeon_id == surgeon_id)
    }

    /// Save the report to a JSON file
    pub fn save_json(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Generate a human-readable report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!("# ORbit Score Report: {}\n\n", self.name));
        report.push_str(&format!("Report ID: {}\n", self.report_id));
        report.push_str(&format!("Generated: {}\n", self.generated_at));
        report.push_str(&format!("Period: {}\n", self.period));
        if let Some(prior) = self.prior_period {
            report.push_str(&format!("Compared against: {}\n", prior));
        }
        report.push('\n');

        report.push_str("## Summary\n\n");
        report.push_str(&format!(
            "- Surgeons Scored: {}\n",
            self.summary.surgeons_scored
        ));
        report.push_str(&format!("- Cases Scored: {}\n", self.summary.cases_scored));
        report.push_str(&format!(
            "- Average Composite: {:.1}\n",
            self.summary.average_composite
        ));
        for grade in Grade::ALL {
            report.push_str(&format!(
                "- Grade {} ({}): {}\n",
                grade,
                grade.label(),
                self.summary.grades.get(grade)
            ));
        }
        report.push_str(&format!("- Trending Up: {}\n", self.summary.trending_up));
        report.push_str(&format!("- Trending Down: {}\n\n", self.summary.trending_down));

        report.push_str("## Rankings\n\n");
        report.push_str(
            "| Rank | Surgeon | Cases | Profit | Consist | Sched | Avail | Composite | Grade | Trend |\n",
        );
        report.push_str(
            "|------|---------|-------|--------|---------|-------|-------|-----------|-------|-------|\n",
        );
        for (i, card) in self.scorecards.iter().enumerate() {
            let trend = match card.previous_composite {
                Some(prev) => format!("{} (was {})", card.trend, prev),
                None => card.trend.to_string(),
            };
            report.push_str(&format!(
                "| {} | {}{} | {} | {} | {} | {} | {} | {} | {} {} | {} |\n",
                i + 1,
                card.surgeon_name,
                if card.flip_room { " (flip)" } else { "" },
                card.case_count,
                card.pillars.profitability,
                card.pillars.consistency,
                card.pillars.sched_adherence,
                card.pillars.availability,
                card.composite,
                card.grade,
                card.grade.label(),
                trend
            ));
        }

        report.push_str("\n## Procedure Mix\n\n");
        for card in &self.scorecards {
            report.push_str(&format!("### {}\n", card.surgeon_name));
            for procedure in &card.procedure_breakdown {
                report.push_str(&format!("- {}: {}\n", procedure.name, procedure.count));
            }
            report.push('\n');
        }

        report
    }

    /// Render the cohort diagnostics of one surgeon, if they were collected
    pub fn explain(&self, surgeon_id: &str) -> Option<String> {
        let card = self.scorecard(surgeon_id)?;
        let diagnostics = card.diagnostics.as_ref()?;
        Some(render_diagnostics(card, diagnostics))
    }
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}

fn render_diagnostics(card: &Scorecard, diagnostics: &SurgeonDiagnostics) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({}): composite {} grade {}\n\n",
        card.surgeon_name, card.surgeon_id, card.composite, card.grade
    ));

    for pillar in Pillar::ALL {
        let Some(entry) = diagnostics.pillar(pillar) else {
            continue;
        };
        out.push_str(&format!(
            "{} [{}] weight {:.2}\n",
            pillar,
            card.pillars.get(pillar),
            pillar.weight()
        ));

        for procedure in &entry.procedures {
            match &procedure.skip_reason {
                Some(reason) => out.push_str(&format!(
                    "  {} ({} cases): skipped, {}\n",
                    procedure.procedure_name, procedure.case_count, reason
                )),
                None => {
                    out.push_str(&format!(
                        "  {} ({} cases, {} valid): value {} vs {} peers -> {}\n",
                        procedure.procedure_name,
                        procedure.case_count,
                        procedure.valid_count,
                        fmt_value(procedure.surgeon_value),
                        procedure.peer_values.len(),
                        fmt_value(procedure.score)
                    ));
                    if let Some(cohort) = &procedure.cohort {
                        out.push_str(&format!(
                            "    median {:.3} mad {:.3} floor {:.3} effective {:.3} ({:?})\n",
                            cohort.median,
                            cohort.mad,
                            cohort.mad_floor,
                            cohort.effective_mad,
                            cohort.method
                        ));
                    }
                }
            }
        }

        for metric in &entry.metrics {
            out.push_str(&format!(
                "  {} ({} cases): value {} vs {} peers -> {:.1}\n",
                metric.metric,
                metric.scoreable_cases,
                fmt_value(metric.surgeon_value),
                metric.peer_values.len(),
                metric.score
            ));
            if let Some(note) = &metric.note {
                out.push_str(&format!("    {}\n", note));
            }
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PillarScores, ProcedureCount};
    use chrono::NaiveDate;

    fn card(id: &str, composite: u32, trend: Trend, cases: usize) -> Scorecard {
        Scorecard {
            surgeon_id: id.to_string(),
            surgeon_name: format!("Dr. {}", id),
            case_count: cases,
            procedure_breakdown: vec![ProcedureCount {
                name: "Hip Arthroplasty".to_string(),
                count: cases,
            }],
            flip_room: false,
            pillars: PillarScores {
                profitability: composite,
                consistency: composite,
                sched_adherence: composite,
                availability: composite,
            },
            composite,
            grade: Grade::from_composite(composite),
            trend,
            previous_composite: None,
            diagnostics: None,
        }
    }

    fn period() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
    }

    #[test]
    fn test_summary() {
        let cards = vec![
            card("a", 91, Trend::Up, 20),
            card("b", 74, Trend::Stable, 16),
            card("c", 60, Trend::Down, 30),
        ];
        let summary = ScoreSummary::from_scorecards(&cards);

        assert_eq!(summary.surgeons_scored, 3);
        assert_eq!(summary.cases_scored, 66);
        // 225 / 3
        assert_eq!(summary.average_composite, 75.0);
        assert_eq!(summary.grades, GradeCounts { a: 1, b: 0, c: 1, d: 1 });
        assert_eq!(summary.top_surgeon, Some("Dr. a".to_string()));
        assert_eq!(summary.bottom_surgeon, Some("Dr. c".to_string()));
        assert_eq!(summary.trending_up, 1);
        assert_eq!(summary.trending_down, 1);
    }

    #[test]
    fn test_empty_summary() {
        let summary = ScoreSummary::from_scorecards(&[]);
        assert_eq!(summary.average_composite, 0.0);
        assert_eq!(summary.top_surgeon, None);
    }

    #[test]
    fn test_generate_report() {
        let report = ScoreReport::new(
            "Q1",
            period(),
            None,
            vec![card("a", 91, Trend::Up, 20), card("b", 74, Trend::Stable, 16)],
        );
        let text = report.generate_report();
        assert!(text.contains("# ORbit Score Report: Q1"));
        assert!(text.contains("| 1 | Dr. a |"));
        assert!(text.contains("A Elite"));
        assert!(text.contains("- Hip Arthroplasty: 16"));
        assert!(text.contains("- Grade A (Elite): 1\n"));
        assert!(text.contains("- Trending Down: 0\n\n## Rankings\n"));
    }

    #[test]
    fn test_explain_requires_diagnostics() {
        let report = ScoreReport::new("Q1", period(), None, vec![card("a", 91, Trend::Up, 20)]);
        assert!(report.explain("a").is_none());
        assert!(report.explain("missing").is_none());

        let mut with_diagnostics = card("b", 50, Trend::Stable, 15);
        with_diagnostics.diagnostics = Some(SurgeonDiagnostics::default());
        let report = ScoreReport::new("Q1", period(), None, vec![with_diagnostics]);
        let text = report.explain("b").unwrap();
        assert!(text.starts_with("Dr. b (b): composite 50 grade D"));
    }

    #[test]
    fn test_save_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = ScoreReport::new("Q1", period(), None, vec![card("a", 88, Trend::Stable, 18)]);
        report.save_json(&path).unwrap();

        let loaded: ScoreReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, report);
    }
}
