use anyhow::{Context, Result};
use log::{info, warn};
use reqwest::Client;
use crate::config::Endpoints;
use crate::models::{CgpaAck, CgpaRoster, SelectedCourse, SemesterAck, SemesterResult, SemesterSubmission, SubmittedCourse};
use crate::utils::gpa::credit_points;

/// Result of a best-effort remote call. `Offline` means the local value is
/// the one to show.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome<T> {
    Synced(T),
    Offline { reason: String },
}

impl<T> SyncOutcome<T> {
    pub fn is_offline(&self) -> bool {
        matches!(self, SyncOutcome::Offline { .. })
    }

    // Logs the failure and degrades it to an offline outcome.
    fn from_result(what: &str, result: Result<T>) -> Self {
        match result {
            Ok(ack) => {
                info!("{} synced", what);
                SyncOutcome::Synced(ack)
            },
            Err(e) => {
                warn!("Error saving {}: {:#}", what, e);
                SyncOutcome::Offline { reason: format!("{:#}", e) }
            },
        }
    }
}

// Request body for a finalized semester. Ungraded courses never reach here,
// but they would be sent with zero points.
pub fn semester_submission(courses: &[SelectedCourse], result: &SemesterResult) -> SemesterSubmission {
    SemesterSubmission {
        level: result.level_id.clone(),
        semester: result.semester_id.clone(),
        courses: courses
            .iter()
            .map(|c| SubmittedCourse {
                id: c.course.id,
                code: c.course.code.clone(),
                credit_units: c.course.credit_units,
                grade: c.grade.clone(),
                credit_points: credit_points(c).unwrap_or(0.0),
            })
            .collect(),
    }
}

#[derive(Debug, Clone)]
pub struct SyncClient {
    client: Client,
    endpoints: Endpoints,
}

impl SyncClient {
    pub fn new(client: Client, endpoints: Endpoints) -> Self {
        SyncClient { client, endpoints }
    }

    pub async fn submit_semester(&self, submission: &SemesterSubmission) -> Result<SemesterAck> {
        let response = self.client.post(self.endpoints.calculate_gpa.clone())
            .json(submission)
            .send()
            .await
            .context("Failed to send semester")?
            .error_for_status()
            .context("Semester was rejected")?;

        response.json().await.context("Failed to parse semester response")
    }

    pub async fn submit_cgpa(&self, roster: &CgpaRoster<'_>) -> Result<CgpaAck> {
        let response = self.client.post(self.endpoints.calculate_cgpa.clone())
            .json(roster)
            .send()
            .await
            .context("Failed to send CGPA roster")?
            .error_for_status()
            .context("CGPA roster was rejected")?;

        response.json().await.context("Failed to parse CGPA response")
    }

    pub async fn sync_semester(&self, submission: &SemesterSubmission) -> SyncOutcome<SemesterAck> {
        SyncOutcome::from_result("GPA", self.submit_semester(submission).await)
    }

    pub async fn sync_cgpa(&self, roster: &CgpaRoster<'_>) -> SyncOutcome<CgpaAck> {
        SyncOutcome::from_result("CGPA", self.submit_cgpa(roster).await)
    }
}
