//! CSV export of the current selection.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::api::{ExportRequest, Fetcher};
use crate::error::ViewError;
use crate::models::{NavigationState, SessionMode};

pub const SELECT_TOPIC_FIRST: &str = "Please select a research topic first";

/// An exported file ready to hand to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Build the request body for the session mode. Topic mode needs a topic.
pub fn export_request(
    mode: SessionMode,
    state: &NavigationState,
) -> Result<ExportRequest, ViewError> {
    match mode {
        SessionMode::Topics => {
            let topic = state
                .topic
                .ok_or_else(|| ViewError::EmptySelection(SELECT_TOPIC_FIRST.to_string()))?;
            Ok(ExportRequest::Selection {
                topic,
                subtopic: state.subtopic.unwrap_or(0),
            })
        }
        SessionMode::Sorting => Ok(ExportRequest::Filters(state.clone())),
    }
}

/// Download filename for a request made on `date` (UTC).
pub fn export_filename(request: &ExportRequest, date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    match request {
        ExportRequest::Selection { topic, .. } => {
            format!("hypotheses_topic_{}_export_{}.csv", topic, date)
        }
        ExportRequest::Filters(_) => format!("hypotheses_export_{}.csv", date),
    }
}

/// Request an export from the API.
pub async fn export_hypotheses(
    fetcher: &dyn Fetcher,
    mode: SessionMode,
    state: &NavigationState,
    date: NaiveDate,
) -> Result<ExportFile, ViewError> {
    let request = export_request(mode, state)?;
    let filename = export_filename(&request, date);
    let bytes = fetcher.request_export(&request).await?;
    tracing::info!("Exported {} ({} bytes)", filename, bytes.len());
    Ok(ExportFile { filename, bytes })
}

/// Write an export into `dir`, creating it if needed.
pub fn write_export(dir: &Path, file: &ExportFile) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&file.filename);
    fs::write(&path, &file.bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_topic_export_defaults_subtopic() {
        let mut state = NavigationState::default();
        state.select_topic(5);
        let req = export_request(SessionMode::Topics, &state).unwrap();
        assert_eq!(
            req,
            ExportRequest::Selection {
                topic: 5,
                subtopic: 0
            }
        );
        assert_eq!(
            export_filename(&req, date()),
            "hypotheses_topic_5_export_2024-03-09.csv"
        );
    }

    #[test]
    fn test_topic_export_requires_topic() {
        let err = export_request(SessionMode::Topics, &NavigationState::default()).unwrap_err();
        assert_eq!(err, ViewError::EmptySelection(SELECT_TOPIC_FIRST.to_string()));
    }

    #[test]
    fn test_sorting_export_filename() {
        let state = NavigationState::for_mode(SessionMode::Sorting);
        let req = export_request(SessionMode::Sorting, &state).unwrap();
        assert_eq!(
            export_filename(&req, date()),
            "hypotheses_export_2024-03-09.csv"
        );
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let file = ExportFile {
            filename: "out.csv".to_string(),
            bytes: b"id,title\n1,A\n".to_vec(),
        };
        let path = write_export(&dir.path().join("nested"), &file).unwrap();
        assert_eq!(fs::read(path).unwrap(), file.bytes);
    }
}
