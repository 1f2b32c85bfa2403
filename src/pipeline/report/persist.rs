use std::path::{Path, PathBuf};

use super::PersistenceError;
use crate::models::ReportDocument;
use crate::ndc::NdcCode;

/// `<dir>/<ndc>_drug_report.<ext>`, with path-hostile NDC characters replaced.
pub fn report_path(dir: &Path, ndc: &NdcCode, extension: &str) -> PathBuf {
    dir.join(format!("{}_drug_report.{extension}", ndc.file_stem()))
}

fn ensure_dir(dir: &Path) -> Result<(), PersistenceError> {
    std::fs::create_dir_all(dir).map_err(|source| PersistenceError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_bytes(path: PathBuf, bytes: &[u8]) -> Result<PathBuf, PersistenceError> {
    std::fs::write(&path, bytes).map_err(|source| PersistenceError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Report artifact written");
    Ok(path)
}

/// Write the report as pretty-printed JSON. Returns the file path.
pub fn write_json_report(
    report: &ReportDocument,
    dir: &Path,
    ndc: &NdcCode,
) -> Result<PathBuf, PersistenceError> {
    let json = serde_json::to_vec_pretty(report)?;
    ensure_dir(dir)?;
    write_bytes(report_path(dir, ndc, "json"), &json)
}

/// Save rendered PDF bytes. Returns the file path.
pub fn write_pdf_report(
    pdf_bytes: &[u8],
    dir: &Path,
    ndc: &NdcCode,
) -> Result<PathBuf, PersistenceError> {
    ensure_dir(dir)?;
    write_bytes(report_path(dir, ndc, "pdf"), pdf_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DrugRecord, InsightSet, NdcEntry};
    use crate::ndc::normalize;
    use crate::pipeline::report::compile;

    fn report(ndc: &NdcCode) -> ReportDocument {
        let record = DrugRecord::from_entry(NdcEntry {
            brand_name: Some("Acme".into()),
            ..NdcEntry::default()
        });
        compile(&record, None, &InsightSet::new(), ndc)
    }

    #[test]
    fn paths_are_named_by_ndc() {
        let ndc = normalize("12345678901");
        assert_eq!(
            report_path(Path::new("reports"), &ndc, "json"),
            PathBuf::from("reports/12345-6789-01_drug_report.json")
        );
    }

    #[test]
    fn hostile_characters_are_replaced() {
        let ndc = normalize("../etc/passwd");
        let path = report_path(Path::new("reports"), &ndc, "pdf");
        assert_eq!(path.parent(), Some(Path::new("reports")));
        assert!(!path.file_name().unwrap().to_string_lossy().contains('/'));
    }

    #[test]
    fn json_report_is_written_to_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("reports");
        let ndc = normalize("12345678901");

        let path = write_json_report(&report(&ndc), &out, &ndc).unwrap();
        assert!(path.exists());

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["drug_information"]["brand_name"], "Acme");
        assert_eq!(written["meta"]["ndc_code"], "12345-6789-01");
    }

    #[test]
    fn pdf_bytes_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let ndc = normalize("0123456789");
        let pdf_bytes = b"%PDF-1.4 test content";

        let path = write_pdf_report(pdf_bytes, dir.path(), &ndc).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "0123-4567-89_drug_report.pdf"
        );
        assert_eq!(std::fs::read(&path).unwrap(), pdf_bytes);
    }

    #[test]
    fn unwritable_dir_is_create_dir_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let ndc = normalize("12345678901");

        let err = write_pdf_report(b"%PDF", &blocker.join("sub"), &ndc).unwrap_err();
        assert!(matches!(err, PersistenceError::CreateDir { .. }));
    }
}
