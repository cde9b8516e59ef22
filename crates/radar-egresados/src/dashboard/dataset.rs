use crate::metrics::{
    CompetencyRecord, EmployerRecord, GraduateRecord, InterviewAppointment, MonthCalendar,
    MonthlySnapshot, Percentage,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const SAMPLE_COMPETENCIES: [(&str, u8, u8, u8); 6] = [
    ("Comunicación", 82, 64, 85),
    ("Trabajo en equipo", 88, 76, 80),
    ("Pensamiento crítico", 74, 58, 85),
    ("Tecnología", 69, 72, 90),
    ("Ética", 91, 83, 85),
    ("Inglés", 63, 47, 80),
];

const SAMPLE_EMPLOYERS: [(&str, u8, u32); 4] = [
    ("Nacional de Chocolates", 82, 7),
    ("Bancolombia", 78, 9),
    ("Cámara de Comercio", 74, 4),
    ("Zona Franca", 69, 3),
];

const SAMPLE_SNAPSHOTS: [(&str, u8, u8); 6] = [
    ("Jul", 68, 72),
    ("Ago", 71, 74),
    ("Sep", 70, 73),
    ("Oct", 74, 76),
    ("Nov", 77, 79),
    ("Dic", 76, 81),
];

const SAMPLE_PROGRAMS: [&str; 8] = [
    "Ingeniería de Sistemas",
    "Contaduría",
    "Administración",
    "Derecho",
    "Trabajo Social",
    "Ambiental",
    "Electrónica",
    "Inglés",
];

const SAMPLE_EMPLOYABILITY: [u8; 8] = [72, 81, 65, 90, 77, 58, 84, 79];

const SAMPLE_INTERVIEWS: [(&str, u32); 3] = [("EPM", 15), ("Nutresa", 18), ("Ruta N", 22)];

/// Every record kind the dashboard is computed from, plus the month order
/// the trend series must follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardDataset {
    pub competencies: Vec<CompetencyRecord>,
    #[serde(default)]
    pub employers: Vec<EmployerRecord>,
    #[serde(default)]
    pub snapshots: Vec<MonthlySnapshot>,
    #[serde(default)]
    pub graduates: Vec<GraduateRecord>,
    #[serde(default)]
    pub interviews: Vec<InterviewAppointment>,
    #[serde(default)]
    pub calendar: MonthCalendar,
}

impl DashboardDataset {
    /// Reference date for the sample dataset; its interviews fall shortly after.
    pub fn sample_as_of() -> NaiveDate {
        sample_date(9, 10)
    }

    /// Fixed demonstration dataset: six competencies, four employers, a
    /// July-December trend and eight surveyed graduates.
    pub fn sample() -> Self {
        let competencies = SAMPLE_COMPETENCIES
            .iter()
            .map(|&(name, declared, observed, target)| CompetencyRecord {
                name: name.to_string(),
                declared: score(declared),
                observed: score(observed),
                target: score(target),
            })
            .collect();

        let employers = SAMPLE_EMPLOYERS
            .iter()
            .map(|&(name, satisfaction, interviews)| EmployerRecord {
                name: name.to_string(),
                satisfaction_pct: score(satisfaction),
                interview_count: interviews,
            })
            .collect();

        let snapshots = SAMPLE_SNAPSHOTS
            .iter()
            .map(|&(month, employability, satisfaction)| MonthlySnapshot {
                month: month.to_string(),
                employability_pct: score(employability),
                satisfaction_pct: score(satisfaction),
            })
            .collect();

        let graduates = SAMPLE_EMPLOYABILITY
            .iter()
            .enumerate()
            .map(|(idx, &employability)| GraduateRecord {
                id: idx as u32 + 1,
                name: format!("Egresado {}", idx + 1),
                program: SAMPLE_PROGRAMS[idx % SAMPLE_PROGRAMS.len()].to_string(),
                cohort_year: 2023 + (idx as i32 % 3),
                employability_6m: score(employability),
            })
            .collect();

        let interviews = SAMPLE_INTERVIEWS
            .iter()
            .map(|&(employer, day)| InterviewAppointment {
                employer: employer.to_string(),
                scheduled_on: sample_date(9, day),
            })
            .collect();

        Self {
            competencies,
            employers,
            snapshots,
            graduates,
            interviews,
            calendar: MonthCalendar::spanish(),
        }
    }
}

fn score(value: u8) -> Percentage {
    Percentage::from_score(value)
}

fn sample_date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap_or(NaiveDate::MIN)
}
