//! Education records.

use serde::Serialize;

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::http::RequestOptions;
use crate::patch::{keep_if_changed, keep_if_other_instant, DateInput, UpdateOutcome};
use crate::routes;
use crate::transport::Transport;
use crate::types::{ApiResponse, Education};

/// Payload for a new education entry. Every field is required.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateEducationRequest {
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub description: String,
    pub start_date: DateInput,
    pub end_date: DateInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateEducationBody<'a> {
    school: &'a str,
    degree: &'a str,
    field_of_study: &'a str,
    description: &'a str,
    start_date: String,
    end_date: String,
}

/// Fields to change on an education entry; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateEducationRequest {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateInput>,
    pub end_date: Option<DateInput>,
}

impl UpdateEducationRequest {
    /// Coerce dates and produce the wire body.
    pub fn into_body(self) -> Result<EducationPatchBody, ApiError> {
        Ok(EducationPatchBody {
            school: self.school,
            degree: self.degree,
            field_of_study: self.field_of_study,
            description: self.description,
            start_date: self
                .start_date
                .map(|d| d.to_utc_iso_string("startDate"))
                .transpose()?,
            end_date: self
                .end_date
                .map(|d| d.to_utc_iso_string("endDate"))
                .transpose()?,
        })
    }
}

/// Outgoing PATCH body; absent fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPatchBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl EducationPatchBody {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Drop every field whose value already matches `baseline`.
    pub fn without_unchanged(self, baseline: &Education) -> Self {
        Self {
            school: keep_if_changed(self.school, &baseline.school),
            degree: keep_if_changed(self.degree, &baseline.degree),
            field_of_study: keep_if_changed(self.field_of_study, &baseline.field_of_study),
            description: keep_if_changed(self.description, &baseline.description),
            start_date: keep_if_other_instant(self.start_date, &baseline.start_date),
            end_date: keep_if_other_instant(self.end_date, &baseline.end_date),
        }
    }
}

pub struct EducationService<'a, T> {
    client: &'a HttpClient<T>,
}

impl<'a, T: Transport> EducationService<'a, T> {
    pub fn new(client: &'a HttpClient<T>) -> Self {
        Self { client }
    }

    pub fn get_all_education(&self) -> Result<ApiResponse<Vec<Education>>, ApiError> {
        self.client
            .get(routes::education::GET_ALL, &RequestOptions::default())
    }

    /// Fails with `ApiError::InvalidDate` before sending if a date does not parse.
    pub fn create_education(
        &self,
        payload: &CreateEducationRequest,
    ) -> Result<ApiResponse<Education>, ApiError> {
        let body = CreateEducationBody {
            school: &payload.school,
            degree: &payload.degree,
            field_of_study: &payload.field_of_study,
            description: &payload.description,
            start_date: payload.start_date.to_utc_iso_string("startDate")?,
            end_date: payload.end_date.to_utc_iso_string("endDate")?,
        };
        self.client.post(
            routes::education::CREATE,
            Some(&body),
            &RequestOptions::credentialed(),
        )
    }

    pub fn update_education(
        &self,
        id: &str,
        changes: UpdateEducationRequest,
    ) -> Result<UpdateOutcome<Education>, ApiError> {
        self.send_update(id, changes.into_body()?)
    }

    /// Like `update_education`, but first drops changes that match `baseline`.
    pub fn update_education_from(
        &self,
        baseline: &Education,
        changes: UpdateEducationRequest,
    ) -> Result<UpdateOutcome<Education>, ApiError> {
        let body = changes.into_body()?.without_unchanged(baseline);
        self.send_update(&baseline.id, body)
    }

    pub fn delete_education(&self, id: &str) -> Result<Option<ApiResponse<()>>, ApiError> {
        self.client
            .delete(&routes::education::delete(id), &RequestOptions::credentialed())
    }

    fn send_update(
        &self,
        id: &str,
        body: EducationPatchBody,
    ) -> Result<UpdateOutcome<Education>, ApiError> {
        if body.is_empty() {
            tracing::info!(id, "no education changes to save");
            return Ok(UpdateOutcome::NoChanges);
        }
        self.client
            .patch(
                &routes::education::update(id),
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
    use crate::http::{Credentials, HttpMethod};
    use crate::transport::RecordingTransport;

    fn client() -> HttpClient<RecordingTransport> {
        HttpClient::new("https://api.example.com", RecordingTransport::new())
    }

    fn education() -> Education {
        Education {
            id: "ed1".to_string(),
            school: "State University".to_string(),
            degree: "BSc".to_string(),
            field_of_study: "Computer Science".to_string(),
            description: "Systems track".to_string(),
            start_date: "2016-09-01T00:00:00.000Z".to_string(),
            end_date: "2020-06-01T00:00:00.000Z".to_string(),
        }
    }

    fn envelope(status: u16, data: serde_json::Value) -> serde_json::Value {
        json!({
            "success": (200..300).contains(&status),
            "statusCode": status,
            "message": "ok",
            "data": data,
            "timestamp": "2024-01-01T00:00:00.000Z"
        })
    }

    fn create_request(start: &str) -> CreateEducationRequest {
        CreateEducationRequest {
            school: "State University".to_string(),
            degree: "BSc".to_string(),
            field_of_study: "Computer Science".to_string(),
            description: "Systems track".to_string(),
            start_date: start.into(),
            end_date: "2020-06-01".into(),
        }
    }

    #[test]
    fn create_sends_all_fields_with_coerced_dates() {
        let c = client();
        c.transport()
            .push_json(201, envelope(201, serde_json::to_value(education()).unwrap()));

        let res = EducationService::new(&c)
            .create_education(&create_request("2016-09-01T02:00:00+02:00"))
            .unwrap();
        assert_eq!(res.into_data().unwrap(), education());

        let sent = &c.transport().requests()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.url, "https://api.example.com/education");
        assert_eq!(sent.credentials, Credentials::Include);
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "school": "State University",
                "degree": "BSc",
                "fieldOfStudy": "Computer Science",
                "description": "Systems track",
                "startDate": "2016-09-01T00:00:00.000Z",
                "endDate": "2020-06-01T00:00:00.000Z"
            })
        );
    }

    #[test]
    fn create_with_bad_start_date_never_reaches_transport() {
        let c = client();
        let err = EducationService::new(&c)
            .create_education(&create_request("sometime in 2016"))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidDate { field: "startDate", .. }));
        assert_eq!(c.transport().request_count(), 0);
    }

    #[test]
    fn get_all_is_anonymous() {
        let c = client();
        c.transport().push_json(200, envelope(200, json!([])));
        let res = EducationService::new(&c).get_all_education().unwrap();
        assert_eq!(res.data, Some(Vec::new()));
        assert_eq!(c.transport().requests()[0].credentials, Credentials::Omit);
    }

    #[test]
    fn update_sends_only_present_fields() {
        let c = client();
        c.transport()
            .push_json(200, envelope(200, serde_json::to_value(education()).unwrap()));

        let changes = UpdateEducationRequest {
            degree: Some("MSc".to_string()),
            end_date: Some("2022-06-01".into()),
            ..Default::default()
        };
        let outcome = EducationService::new(&c).update_education("ed1", changes).unwrap();
        assert!(!outcome.is_no_changes());

        let sent = &c.transport().requests()[0];
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.url, "https://api.example.com/education/ed1");
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "degree": "MSc", "endDate": "2022-06-01T00:00:00.000Z" }));
    }

    #[test]
    fn update_from_baseline_skips_identical_values() {
        let c = client();
        let changes = UpdateEducationRequest {
            school: Some("State University".to_string()),
            start_date: Some("2016-09-01".into()),
            ..Default::default()
        };
        let outcome = EducationService::new(&c)
            .update_education_from(&education(), changes)
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NoChanges);
        assert_eq!(c.transport().request_count(), 0);
    }

    #[test]
    fn delete_targets_record_route() {
        let c = client();
        c.transport().push_json(200, envelope(200, json!(null)));
        EducationService::new(&c).delete_education("ed1").unwrap();
        let sent = &c.transport().requests()[0];
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.url, "https://api.example.com/education/ed1");
        assert!(sent.body.is_none());
    }

    #[test]
    fn invalid_start_date_on_update_fails_before_sending() {
        let c = client();
        let changes = UpdateEducationRequest {
            start_date: Some(DateInput::from("not a date")),
            ..Default::default()
        };
        let err = EducationService::new(&c)
            .update_education("ed1", changes)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidDate { field: "startDate", .. }));
        assert_eq!(c.transport().request_count(), 0);
    }
}
