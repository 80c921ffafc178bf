//! Job DTOs for the backend HTTP contract

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::job::{Job, JobId, JobStatus};

/// One entry of the `GET /jobs` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,

    #[serde(default)]
    pub prompt: String,

    /// Integer, numeric string, empty string or null on the wire
    #[serde(default, deserialize_with = "lenient_frames")]
    pub frames: Option<u32>,

    pub status: JobStatus,

    /// Output path for completed jobs, error text for failed ones
    #[serde(default)]
    pub result: Option<String>,
}

impl From<JobRecord> for Job {
    fn from(record: JobRecord) -> Self {
        let failure_detail = match record.status {
            JobStatus::Failed => record.result.filter(|r| !r.trim().is_empty()),
            _ => None,
        };

        Self {
            id: record.job_id,
            prompt: record.prompt,
            frame_count: record.frames,
            status: record.status,
            failure_detail,
        }
    }
}

/// Body of `POST /jobs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateJob {
    pub prompt: String,
    pub frames: u32,
}

/// Body returned by `POST /jobs` when the backend reports the new id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub job_id: Option<JobId>,
}

/// Body of `GET /jobs/{job_id}/result`
///
/// A missing or null `url` means the result is not ready yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultResponse {
    #[serde(default)]
    pub url: Option<String>,
}

impl ResultResponse {
    /// The url, if the backend provided a non-empty one
    pub fn into_url(self) -> Option<String> {
        self.url.filter(|u| !u.trim().is_empty())
    }
}

fn lenient_frames<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    let frames = match value {
        Some(JsonValue::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(JsonValue::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    Ok(frames.filter(|n| *n > 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> JobRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_frames_accepts_number_and_text() {
        let record = parse(r#"{"job_id":"a","prompt":"p","frames":24,"status":"PENDING"}"#);
        assert_eq!(record.frames, Some(24));

        let record = parse(r#"{"job_id":"a","prompt":"p","frames":"30","status":"PENDING"}"#);
        assert_eq!(record.frames, Some(30));
    }

    #[test]
    fn test_frames_absent_when_missing_or_invalid() {
        for json in [
            r#"{"job_id":"a","status":"PENDING"}"#,
            r#"{"job_id":"a","frames":null,"status":"PENDING"}"#,
            r#"{"job_id":"a","frames":"","status":"PENDING"}"#,
            r#"{"job_id":"a","frames":0,"status":"PENDING"}"#,
            r#"{"job_id":"a","frames":-3,"status":"PENDING"}"#,
        ] {
            assert_eq!(parse(json).frames, None, "{}", json);
        }
    }

    #[test]
    fn test_failure_detail_only_for_failed_jobs() {
        let failed: Job = parse(
            r#"{"job_id":"a","prompt":"p","status":"FAILED","result":"FAILED: out of memory"}"#,
        )
        .into();
        assert_eq!(
            failed.failure_detail.as_deref(),
            Some("FAILED: out of memory")
        );

        let completed: Job = parse(
            r#"{"job_id":"b","prompt":"p","status":"COMPLETED","result":"/mnt/data/output/b.mp4"}"#,
        )
        .into();
        assert_eq!(completed.failure_detail, None);

        let failed_empty: Job =
            parse(r#"{"job_id":"c","prompt":"p","status":"FAILED","result":""}"#).into();
        assert_eq!(failed_empty.failure_detail, None);
    }

    #[test]
    fn test_result_response_without_url_is_not_ready() {
        let pending: ResultResponse = serde_json::from_str(r#"{"status":"RUNNING"}"#).unwrap();
        assert_eq!(pending.into_url(), None);

        let null: ResultResponse = serde_json::from_str(r#"{"url":null}"#).unwrap();
        assert_eq!(null.into_url(), None);

        let ready: ResultResponse =
            serde_json::from_str(r#"{"url":"/static/a.mp4"}"#).unwrap();
        assert_eq!(ready.into_url().as_deref(), Some("/static/a.mp4"));
    }
}
