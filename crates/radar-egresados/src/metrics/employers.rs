use super::domain::{EmployerRecord, InterviewAppointment, MetricsError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable seam between stored employer records and what the dashboard
/// renders; order is preserved.
pub fn build_employer_view(employers: &[EmployerRecord]) -> Vec<EmployerRecord> {
    employers.to_vec()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployerRollup {
    pub employer_count: usize,
    pub total_interviews: u64,
    pub mean_satisfaction: f64,
    /// Satisfaction weighted by interview count. Equals the plain mean when
    /// no interviews were recorded.
    pub weighted_satisfaction: f64,
    pub top_employer: String,
    pub lowest_employer: String,
}

pub fn compute_employer_rollup(employers: &[EmployerRecord]) -> Result<EmployerRollup, MetricsError> {
    let (first, rest) = employers.split_first().ok_or(MetricsError::EmptyInput {
        operation: "employer rollup",
    })?;

    let mut satisfaction_sum = 0.0;
    let mut weighted_sum = 0.0;
    let mut total_interviews = 0u64;
    let mut top = first;
    let mut lowest = first;

    for employer in employers {
        let satisfaction = employer.satisfaction_pct.value();
        satisfaction_sum += satisfaction;
        weighted_sum += satisfaction * f64::from(employer.interview_count);
        total_interviews += u64::from(employer.interview_count);
    }

    for employer in rest {
        if employer.satisfaction_pct > top.satisfaction_pct {
            top = employer;
        }
        if employer.satisfaction_pct < lowest.satisfaction_pct {
            lowest = employer;
        }
    }

    let mean_satisfaction = satisfaction_sum / employers.len() as f64;
    let weighted_satisfaction = if total_interviews > 0 {
        weighted_sum / total_interviews as f64
    } else {
        mean_satisfaction
    };

    Ok(EmployerRollup {
        employer_count: employers.len(),
        total_interviews,
        mean_satisfaction,
        weighted_satisfaction,
        top_employer: top.name.clone(),
        lowest_employer: lowest.name.clone(),
    })
}

/// Appointments on or after `today`, soonest first, at most `limit` of them.
pub fn upcoming_interviews(
    appointments: &[InterviewAppointment],
    today: NaiveDate,
    limit: usize,
) -> Vec<InterviewAppointment> {
    let mut upcoming: Vec<_> = appointments
        .iter()
        .filter(|appointment| appointment.scheduled_on >= today)
        .cloned()
        .collect();
    upcoming.sort_by_key(|appointment| appointment.scheduled_on);
    upcoming.truncate(limit);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employers() -> Vec<EmployerRecord> {
        vec![
            EmployerRecord::new("Nacional de Chocolates", 82.0, 7).expect("valid"),
            EmployerRecord::new("Bancolombia", 78.0, 9).expect("valid"),
            EmployerRecord::new("Cámara de Comercio", 74.0, 4).expect("valid"),
            EmployerRecord::new("Zona Franca", 69.0, 3).expect("valid"),
        ]
    }

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
    }

    fn appointment(employer: &str, scheduled_on: NaiveDate) -> InterviewAppointment {
        InterviewAppointment {
            employer: employer.to_string(),
            scheduled_on,
        }
    }

    #[test]
    fn employer_view_is_identity() {
        let employers = employers();
        assert_eq!(build_employer_view(&employers), employers);
        assert!(build_employer_view(&[]).is_empty());
    }

    #[test]
    fn rollup_weights_by_interviews() {
        let rollup = compute_employer_rollup(&employers()).expect("rollup");
        assert_eq!(rollup.employer_count, 4);
        assert_eq!(rollup.total_interviews, 23);
        assert_eq!(rollup.mean_satisfaction, 75.75);
        // (82*7 + 78*9 + 74*4 + 69*3) / 23 = 1777 / 23
        assert!((rollup.weighted_satisfaction - 1777.0 / 23.0).abs() < 1e-9);
        assert_eq!(rollup.top_employer, "Nacional de Chocolates");
        assert_eq!(rollup.lowest_employer, "Zona Franca");
    }

    #[test]
    fn rollup_without_interviews_falls_back_to_mean() {
        let employers = vec![
            EmployerRecord::new("EPM", 80.0, 0).expect("valid"),
            EmployerRecord::new("Nutresa", 70.0, 0).expect("valid"),
        ];
        let rollup = compute_employer_rollup(&employers).expect("rollup");
        assert_eq!(rollup.weighted_satisfaction, 75.0);
    }

    #[test]
    fn rollup_rejects_empty_input() {
        assert!(matches!(
            compute_employer_rollup(&[]),
            Err(MetricsError::EmptyInput { .. })
        ));
    }

    #[test]
    fn upcoming_interviews_skip_past_dates_and_sort() {
        let appointments = vec![
            appointment("Ruta N", date(9, 22)),
            appointment("EPM", date(9, 15)),
            appointment("Sura", date(9, 1)),
            appointment("Nutresa", date(9, 18)),
        ];

        let upcoming = upcoming_interviews(&appointments, date(9, 10), 2);
        let names: Vec<_> = upcoming.iter().map(|a| a.employer.as_str()).collect();
        assert_eq!(names, vec!["EPM", "Nutresa"]);

        let same_day = upcoming_interviews(&appointments, date(9, 22), 5);
        assert_eq!(same_day.len(), 1);
        assert_eq!(same_day[0].employer, "Ruta N");
    }
}
