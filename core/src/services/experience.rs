//! Work experience records.

use serde::Serialize;

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::http::RequestOptions;
use crate::patch::{keep_if_changed, keep_if_other_instant, same_instant, DateInput, Patch, UpdateOutcome};
use crate::routes;
use crate::transport::Transport;
use crate::types::{ApiResponse, Experience};

/// Payload for a new experience entry. `end_date: None` marks a current position.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateExperienceRequest {
    pub company: String,
    pub position: String,
    pub bullet_points: Vec<String>,
    pub skills: Vec<String>,
    pub start_date: DateInput,
    pub end_date: Option<DateInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateExperienceBody<'a> {
    company: &'a str,
    position: &'a str,
    bullet_points: &'a [String],
    skills: &'a [String],
    start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<String>,
}

/// Fields to change on an experience entry.
///
/// `end_date: Patch::Clear` turns the entry into a current position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateExperienceRequest {
    pub company: Option<String>,
    pub position: Option<String>,
    pub bullet_points: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub start_date: Option<DateInput>,
    pub end_date: Patch<DateInput>,
}

impl UpdateExperienceRequest {
    /// Coerce dates and produce the wire body.
    pub fn into_body(self) -> Result<ExperiencePatchBody, ApiError> {
        Ok(ExperiencePatchBody {
            company: self.company,
            position: self.position,
            bullet_points: self.bullet_points,
            skills: self.skills,
            start_date: self
                .start_date
                .map(|d| d.to_utc_iso_string("startDate"))
                .transpose()?,
            end_date: self.end_date.try_map(|d| d.to_utc_iso_string("endDate"))?,
        })
    }
}

/// Outgoing PATCH body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePatchBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet_points: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    pub end_date: Patch<String>,
}

impl ExperiencePatchBody {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Drop every field whose value already matches `baseline`.
    pub fn without_unchanged(self, baseline: &Experience) -> Self {
        Self {
            company: keep_if_changed(self.company, &baseline.company),
            position: keep_if_changed(self.position, &baseline.position),
            bullet_points: keep_if_changed(self.bullet_points, &baseline.bullet_points),
            skills: keep_if_changed(self.skills, &baseline.skills),
            start_date: keep_if_other_instant(self.start_date, &baseline.start_date),
            end_date: self
                .end_date
                .unless_equal(baseline.end_date.as_ref(), |new, old| same_instant(new, old)),
        }
    }
}

pub struct ExperienceService<'a, T> {
    client: &'a HttpClient<T>,
}

impl<'a, T: Transport> ExperienceService<'a, T> {
    pub fn new(client: &'a HttpClient<T>) -> Self {
        Self { client }
    }

    pub fn get_all_experiences(&self) -> Result<ApiResponse<Vec<Experience>>, ApiError> {
        self.client
            .get(routes::experience::GET_ALL, &RequestOptions::default())
    }

    pub fn create_experience(
        &self,
        payload: &CreateExperienceRequest,
    ) -> Result<ApiResponse<Experience>, ApiError> {
        let body = CreateExperienceBody {
            company: &payload.company,
            position: &payload.position,
            bullet_points: &payload.bullet_points,
            skills: &payload.skills,
            start_date: payload.start_date.to_utc_iso_string("startDate")?,
            end_date: payload
                .end_date
                .as_ref()
                .map(|d| d.to_utc_iso_string("endDate"))
                .transpose()?,
        };
        self.client.post(
            routes::experience::CREATE,
            Some(&body),
            &RequestOptions::credentialed(),
        )
    }

    /// An empty change set returns `UpdateOutcome::NoChanges` without a request.
    pub fn update_experience(
        &self,
        id: &str,
        changes: UpdateExperienceRequest,
    ) -> Result<UpdateOutcome<Experience>, ApiError> {
        self.send_update(id, changes.into_body()?)
    }

    pub fn update_experience_from(
        &self,
        baseline: &Experience,
        changes: UpdateExperienceRequest,
    ) -> Result<UpdateOutcome<Experience>, ApiError> {
        let body = changes.into_body()?.without_unchanged(baseline);
        self.send_update(&baseline.id, body)
    }

    /// `None` when the backend answers 204 with no body.
    pub fn delete_experience(&self, id: &str) -> Result<Option<ApiResponse<()>>, ApiError> {
        self.client
            .delete(&routes::experience::delete(id), &RequestOptions::credentialed())
    }

    fn send_update(
        &self,
        id: &str,
        body: ExperiencePatchBody,
    ) -> Result<UpdateOutcome<Experience>, ApiError> {
        if body.is_empty() {
            tracing::info!(id, "no experience changes to save");
            return Ok(UpdateOutcome::NoChanges);
        }
        self.client
            .patch(
                &routes::experience::update(id),
                Some(&body),
                &RequestOptions::credentialed(),
            )
            .map(UpdateOutcome::Updated)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;
    use crate::transport::RecordingTransport;

    fn client() -> HttpClient<RecordingTransport> {
        HttpClient::new("https://api.example.com/", RecordingTransport::new())
    }

    fn experience() -> Experience {
        Experience {
            id: "x1".to_string(),
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            bullet_points: vec!["Shipped the thing".to_string()],
            skills: vec!["rust".to_string(), "sql".to_string()],
            start_date: "2021-03-01T00:00:00.000Z".to_string(),
            end_date: None,
        }
    }

    fn updated_envelope() -> serde_json::Value {
        json!({
            "success": true,
            "statusCode": 200,
            "message": "updated",
            "data": serde_json::to_value(experience()).unwrap(),
            "timestamp": "2024-01-01T00:00:00.000Z"
        })
    }

    #[test]
    fn empty_change_set_sends_nothing() {
        let c = client();
        let outcome = ExperienceService::new(&c)
            .update_experience("x1", UpdateExperienceRequest::default())
            .unwrap();
        assert!(outcome.is_no_changes());
        assert_eq!(c.transport().request_count(), 0);
    }

    #[test]
    fn create_omits_missing_end_date() {
        let c = client();
        c.transport().push_json(201, updated_envelope());
        let payload = CreateExperienceRequest {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            bullet_points: Vec::new(),
            skills: vec!["rust".to_string()],
            start_date: "2021-03-01".into(),
            end_date: None,
        };
        ExperienceService::new(&c).create_experience(&payload).unwrap();

        let sent = &c.transport().requests()[0];
        assert_eq!(sent.url, "https://api.example.com/experiences");
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "company": "Acme",
                "position": "Engineer",
                "bulletPoints": [],
                "skills": ["rust"],
                "startDate": "2021-03-01T00:00:00.000Z"
            })
        );
    }

    #[test]
    fn create_with_bad_end_date_fails_locally() {
        let c = client();
        let payload = CreateExperienceRequest {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            bullet_points: Vec::new(),
            skills: Vec::new(),
            start_date: "2021-03-01".into(),
            end_date: Some("whenever".into()),
        };
        let err = ExperienceService::new(&c).create_experience(&payload).unwrap_err();
        assert!(matches!(err, ApiError::InvalidDate { field: "endDate", .. }));
        assert_eq!(c.transport().request_count(), 0);
    }

    #[test]
    fn clearing_end_date_sends_explicit_null() {
        let c = client();
        c.transport().push_json(200, updated_envelope());
        let changes = UpdateExperienceRequest {
            end_date: Patch::Clear,
            ..Default::default()
        };
        ExperienceService::new(&c).update_experience("x1", changes).unwrap();

        let sent = &c.transport().requests()[0];
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.url, "https://api.example.com/experiences/x1");
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "endDate": null }));
    }

    #[test]
    fn baseline_diff_keeps_only_real_changes() {
        let c = client();
        c.transport().push_json(200, updated_envelope());
        let changes = UpdateExperienceRequest {
            company: Some("Acme".to_string()),
            skills: Some(vec!["rust".to_string()]),
            end_date: Patch::Set("2024-01-31".into()),
            ..Default::default()
        };
        ExperienceService::new(&c)
            .update_experience_from(&experience(), changes)
            .unwrap();

        let body: serde_json::Value =
            serde_json::from_str(c.transport().requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({ "skills": ["rust"], "endDate": "2024-01-31T00:00:00.000Z" })
        );
    }

    #[test]
    fn clearing_an_already_open_end_date_is_no_change() {
        let c = client();
        let changes = UpdateExperienceRequest {
            end_date: Patch::Clear,
            ..Default::default()
        };
        let outcome = ExperienceService::new(&c)
            .update_experience_from(&experience(), changes)
            .unwrap();
        assert!(outcome.is_no_changes());
        assert_eq!(c.transport().request_count(), 0);
    }

    #[test]
    fn delete_is_credentialed() {
        let c = client();
        c.transport().push_json(
            200,
            json!({ "success": true, "statusCode": 200, "message": "deleted", "data": null, "timestamp": "" }),
        );
        let res = ExperienceService::new(&c).delete_experience("x1").unwrap().unwrap();
        assert!(res.success);
        let sent = &c.transport().requests()[0];
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.credentials, crate::http::Credentials::Include);
    }

    #[test]
    fn delete_with_no_content_succeeds() {
        let c = client();
        c.transport().push_response(crate::http::HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: String::new(),
        });
        let res = ExperienceService::new(&c).delete_experience("x1").unwrap();
        assert_eq!(res, None);
    }

    #[test]
    fn invalid_end_date_on_update_fails_before_sending() {
        let c = client();
        let changes = UpdateExperienceRequest {
            end_date: Patch::Set(DateInput::from("whenever")),
            ..Default::default()
        };
        let err = ExperienceService::new(&c)
            .update_experience("x1", changes)
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidDate { field: "endDate", ref value } if value == "whenever"
        ));
        assert_eq!(c.transport().request_count(), 0);
    }
}
