use radar_egresados::import::{SurveyImportError, SurveyImporter};
use radar_egresados::metrics::MetricsError;
use std::fs;
use std::path::PathBuf;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "radar-egresados-{}-{name}",
        std::process::id()
    ));
    fs::write(&path, contents).expect("scratch file written");
    path
}

#[test]
fn graduates_import_from_path_normalizes_labels() {
    let path = scratch_file(
        "graduates.csv",
        "id,name,program,year,employability_6m\n\
1,\u{feff}Egresado  1,Ingeniería   de Sistemas,2023,72\n\
2,Egresado 2,Administración,2024,81%\n",
    );

    let graduates = SurveyImporter::graduates_from_path(&path).expect("import succeeds");
    fs::remove_file(&path).expect("scratch file removed");

    assert_eq!(graduates.len(), 2);
    assert_eq!(graduates[0].name, "Egresado 1");
    assert_eq!(graduates[0].program, "Ingeniería de Sistemas");
    assert_eq!(graduates[1].employability_6m.value(), 81.0);
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("radar-egresados-does-not-exist.csv");
    let error = SurveyImporter::competencies_from_path(path).expect_err("missing file");
    assert!(matches!(error, SurveyImportError::Io(_)));
}

#[test]
fn out_of_range_cell_reports_row_number() {
    let csv = "competency,declared,observed,target\n\
Comunicación,82,64,85\n\
Inglés,63,147,80\n";

    let error =
        SurveyImporter::competencies_from_reader(csv.as_bytes()).expect_err("invalid row");

    match error {
        SurveyImportError::InvalidRow { row, source } => {
            assert_eq!(row, 2);
            assert!(matches!(
                source,
                MetricsError::OutOfRange {
                    field: "observed",
                    ..
                }
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_numeric_cell_is_a_csv_error() {
    let csv = "employer,satisfaction,interviews\nEPM,alta,3\n";
    let error = SurveyImporter::employers_from_reader(csv.as_bytes()).expect_err("bad cell");
    assert!(matches!(error, SurveyImportError::Csv(_)));
}

#[test]
fn duplicate_competencies_keep_first_row() {
    let csv = "competency,declared,observed,target\n\
Inglés,63,47,80\n\
inglés,90,90,90\n";

    let records = SurveyImporter::competencies_from_reader(csv.as_bytes()).expect("import");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].observed.value(), 47.0);
}
