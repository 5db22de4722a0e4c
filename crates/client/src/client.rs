use std::time::Duration;

use liftlog_core::{
    DEFAULT_OWNER_HEADER, DashboardStats, Exercise, ExerciseFilter, ExerciseId, NewPrescription,
    NewRoutine, NewSet, NewWorkout, NewWorkoutExercise, PaginatedResult, PrescriptionPatch,
    Routine, RoutinePatch, RoutineSummary, SetPatch, WorkoutDetail, WorkoutPatch, WorkoutSummary,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Request timeout applied to every call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Server build information from `/api/version`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerVersion {
    pub version: String,
    pub storage: String,
}

#[derive(Serialize)]
struct PageQuery {
    offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct StartBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    field: Option<String>,
}

/// Client for the liftlog HTTP API.
///
/// One request per call. Nothing is retried: a mutation whose response never
/// arrived may or may not have been applied, so the caller decides.
#[derive(Clone)]
pub struct LiftlogClient {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    owner: Option<String>,
    owner_header: String,
}

impl std::fmt::Debug for LiftlogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiftlogClient")
            .field("base_url", &self.base_url)
            .field("owner", &self.owner)
            .field("owner_header", &self.owner_header)
            .finish_non_exhaustive()
    }
}

impl LiftlogClient {
    /// Creates a client with the default timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            owner: None,
            owner_header: DEFAULT_OWNER_HEADER.to_owned(),
        })
    }

    /// Act as `owner`. Without one the server's default owner applies.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn with_owner_header(mut self, header: impl Into<String>) -> Self {
        self.owner_header = header.into();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{path}", self.base_url));
        match &self.owner {
            Some(owner) => builder.header(self.owner_header.as_str(), owner),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        context: &str,
    ) -> Result<T, ClientError> {
        let response = check_status(builder.send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|source| ClientError::Decode { context: context.to_owned(), source })
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        check_status(builder.send().await?).await?;
        Ok(())
    }

    pub async fn health(&self) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::GET, "/health")).await
    }

    pub async fn version(&self) -> Result<ServerVersion, ClientError> {
        self.send(self.request(Method::GET, "/api/version"), "version").await
    }

    // ── Exercises ────────────────────────────────────────────────

    pub async fn search_exercises(
        &self,
        filter: &ExerciseFilter,
    ) -> Result<Vec<Exercise>, ClientError> {
        let builder = self.request(Method::GET, "/api/exercises").query(filter);
        self.send(builder, "search_exercises").await
    }

    pub async fn get_exercise(&self, id: ExerciseId) -> Result<Exercise, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/exercises/{id}")), "get_exercise")
            .await
    }

    // ── Routines ─────────────────────────────────────────────────

    pub async fn list_routines(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<PaginatedResult<RoutineSummary>, ClientError> {
        let builder =
            self.request(Method::GET, "/api/routines").query(&PageQuery { offset, limit });
        self.send(builder, "list_routines").await
    }

    pub async fn get_routine(&self, id: &str) -> Result<Routine, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/routines/{id}")), "get_routine").await
    }

    pub async fn create_routine(&self, input: &NewRoutine) -> Result<Routine, ClientError> {
        let builder = self.request(Method::POST, "/api/routines").json(input);
        self.send(builder, "create_routine").await
    }

    pub async fn update_routine(
        &self,
        id: &str,
        patch: &RoutinePatch,
    ) -> Result<Routine, ClientError> {
        let builder = self.request(Method::PATCH, &format!("/api/routines/{id}")).json(patch);
        self.send(builder, "update_routine").await
    }

    pub async fn delete_routine(&self, id: &str) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, &format!("/api/routines/{id}"))).await
    }

    pub async fn add_prescription(
        &self,
        routine_id: &str,
        input: &NewPrescription,
    ) -> Result<Routine, ClientError> {
        let builder =
            self.request(Method::POST, &format!("/api/routines/{routine_id}/exercises")).json(input);
        self.send(builder, "add_prescription").await
    }

    pub async fn update_prescription(
        &self,
        routine_id: &str,
        prescription_id: &str,
        patch: &PrescriptionPatch,
    ) -> Result<Routine, ClientError> {
        let path = format!("/api/routines/{routine_id}/exercises/{prescription_id}");
        self.send(self.request(Method::PATCH, &path).json(patch), "update_prescription").await
    }

    pub async fn remove_prescription(
        &self,
        routine_id: &str,
        prescription_id: &str,
    ) -> Result<Routine, ClientError> {
        let path = format!("/api/routines/{routine_id}/exercises/{prescription_id}");
        self.send(self.request(Method::DELETE, &path), "remove_prescription").await
    }

    /// Instantiate a session from a routine's prescriptions.
    pub async fn start_workout(
        &self,
        routine_id: &str,
        notes: Option<&str>,
    ) -> Result<WorkoutDetail, ClientError> {
        let path = format!("/api/routines/{routine_id}/start-workout");
        self.send(self.request(Method::POST, &path).json(&StartBody { notes }), "start_workout")
            .await
    }

    // ── Workouts ─────────────────────────────────────────────────

    pub async fn list_workouts(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<PaginatedResult<WorkoutSummary>, ClientError> {
        let builder =
            self.request(Method::GET, "/api/workouts").query(&PageQuery { offset, limit });
        self.send(builder, "list_workouts").await
    }

    pub async fn get_workout(&self, id: &str) -> Result<WorkoutDetail, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/workouts/{id}")), "get_workout").await
    }

    pub async fn create_workout(&self, input: &NewWorkout) -> Result<WorkoutDetail, ClientError> {
        let builder = self.request(Method::POST, "/api/workouts").json(input);
        self.send(builder, "create_workout").await
    }

    pub async fn update_workout(
        &self,
        id: &str,
        patch: &WorkoutPatch,
    ) -> Result<WorkoutDetail, ClientError> {
        let builder = self.request(Method::PATCH, &format!("/api/workouts/{id}")).json(patch);
        self.send(builder, "update_workout").await
    }

    pub async fn delete_workout(&self, id: &str) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, &format!("/api/workouts/{id}"))).await
    }

    pub async fn add_exercise(
        &self,
        workout_id: &str,
        input: &NewWorkoutExercise,
    ) -> Result<WorkoutDetail, ClientError> {
        let path = format!("/api/workouts/{workout_id}/exercises");
        self.send(self.request(Method::POST, &path).json(input), "add_exercise").await
    }

    pub async fn remove_exercise(
        &self,
        workout_id: &str,
        exercise_id: &str,
    ) -> Result<WorkoutDetail, ClientError> {
        let path = format!("/api/workouts/{workout_id}/exercises/{exercise_id}");
        self.send(self.request(Method::DELETE, &path), "remove_exercise").await
    }

    pub async fn add_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        input: &NewSet,
    ) -> Result<WorkoutDetail, ClientError> {
        let path = format!("/api/workouts/{workout_id}/exercises/{exercise_id}/sets");
        self.send(self.request(Method::POST, &path).json(input), "add_set").await
    }

    pub async fn update_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set_id: &str,
        patch: &SetPatch,
    ) -> Result<WorkoutDetail, ClientError> {
        let path = format!("/api/workouts/{workout_id}/exercises/{exercise_id}/sets/{set_id}");
        self.send(self.request(Method::PATCH, &path).json(patch), "update_set").await
    }

    pub async fn remove_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set_id: &str,
    ) -> Result<WorkoutDetail, ClientError> {
        let path = format!("/api/workouts/{workout_id}/exercises/{exercise_id}/sets/{set_id}");
        self.send(self.request(Method::DELETE, &path), "remove_set").await
    }

    pub async fn finish_workout(&self, workout_id: &str) -> Result<WorkoutDetail, ClientError> {
        let path = format!("/api/workouts/{workout_id}/finish");
        self.send(self.request(Method::POST, &path), "finish_workout").await
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, ClientError> {
        self.send(self.request(Method::GET, "/api/dashboard"), "dashboard").await
    }
}

/// Map non-success responses to typed errors using the `{"error", "field"}` body.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorBody>(&body).ok();
    tracing::debug!(status = status.as_u16(), body = %body, "API request rejected");
    Err(match (status, parsed) {
        (StatusCode::NOT_FOUND, Some(err)) => ClientError::NotFound(err.error),
        (StatusCode::CONFLICT, Some(err)) => ClientError::Conflict(err.error),
        (StatusCode::UNPROCESSABLE_ENTITY, Some(err)) => ClientError::Validation {
            field: err.field.unwrap_or_default(),
            message: err.error,
        },
        _ => ClientError::HttpStatus { code: status.as_u16(), body },
    })
}
