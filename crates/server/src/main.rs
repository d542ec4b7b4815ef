// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use ovation_api::{
    AddParticipantRequest, AddParticipantResponse, ApiError, ContestantVotesResponse,
    CreatePoolRequest, CreatePoolResponse, CredentialPolicy, ForgotCredentialRequest, GeoCache,
    GeoSource, InMemoryMediaStore, InitiateFeeRequest, LoggingEmailDispatcher, MessageResponse,
    PaymentApplicationResponse, PaymentIntentResponse, Pricing, ResetCredentialRequest,
    SetCredentialRequest, StartRegistrationRequest, StartRegistrationResponse,
    SubmitRegistrationResponse, TicketOrderRequest, TicketOrderResponse, UpdateStepRequest,
    UpdateStepResponse, VerifyEmailRequest, VoteIntentRequest, add_participant,
    apply_gateway_payload, create_pool, forgot_credential, get_contestant_votes,
    get_payment_status, get_pool, get_ticket_order, initiate_fee_payment, order_tickets,
    record_vote_intent, reset_credential, review_registration, set_credential,
    start_registration, submit_registration, update_step, upload_step_media, verify_email,
};
use ovation_audit::{Actor, Cause};
use ovation_domain::{GatewayDialect, RawGatewayPayload, SlotPool};
use ovation_persistence::Persistence;

/// Ovation Server - HTTP server for the Ovation talent platform
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// Cross-request coordination lives in the persistence layer's
/// conditional updates; the mutex only serializes connection access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Platform pricing configuration.
    pricing: Arc<Pricing>,
    /// Credential policy configuration.
    credential_policy: Arc<CredentialPolicy>,
    /// The status conventions accepted from the gateway.
    dialect: GatewayDialect,
    /// Outbound email dispatch (logging transport until SMTP is wired).
    dispatcher: Arc<LoggingEmailDispatcher>,
    /// Media storage.
    media_store: Arc<InMemoryMediaStore>,
    /// Injected geographic lookup cache.
    geo: Arc<Mutex<GeoCache>>,
    /// The geo lookup source behind the cache.
    geo_source: Arc<StaticGeoSource>,
}

/// A fixed region list standing in for the external lookup service.
struct StaticGeoSource;

impl GeoSource for StaticGeoSource {
    fn fetch_regions(&self) -> Result<Vec<String>, String> {
        Ok(vec![
            String::from("Lagos"),
            String::from("Abuja"),
            String::from("Port Harcourt"),
            String::from("Kano"),
            String::from("Enugu"),
        ])
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            // Never a 2xx: the gateway must retry ambiguous deliveries.
            ApiError::AmbiguousUpstream { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::FatalInconsistency { .. } | ApiError::Internal { .. } => {
                error!(error = %err, "Server-side failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Builds a cause for a client-originated request.
fn request_cause(endpoint: &str, id: &str) -> Cause {
    Cause::new(format!("{endpoint}:{id}"), format!("HTTP {endpoint} request"))
}

/// Builds the actor for a client-originated request.
fn client_actor(email: &str) -> Actor {
    Actor::new(email.to_lowercase(), String::from("identity"))
}

/// Serializable pool representation for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PoolResponse {
    pool_id: i64,
    owner_identity_id: i64,
    total_slots: u32,
    used_slots: u32,
    remaining_slots: u32,
    total_amount: i64,
    status: String,
    participants: Vec<PoolParticipantResponse>,
}

/// Serializable pool participant for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PoolParticipantResponse {
    email: String,
    first_name: String,
    last_name: String,
    invitation_status: String,
}

fn pool_to_response(pool: &SlotPool) -> PoolResponse {
    PoolResponse {
        pool_id: pool.pool_id,
        owner_identity_id: pool.owner_identity_id,
        total_slots: pool.total_slots,
        used_slots: pool.used_slots,
        remaining_slots: pool.remaining_slots(),
        total_amount: pool.total_amount(),
        status: pool.status.as_str().to_string(),
        participants: pool
            .participants
            .iter()
            .map(|participant| PoolParticipantResponse {
                email: participant.email.value().to_string(),
                first_name: participant.first_name.clone(),
                last_name: participant.last_name.clone(),
                invitation_status: participant.invitation_status.as_str().to_string(),
            })
            .collect(),
    }
}

/// Handler for POST `/registrations`.
async fn handle_start_registration(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<StartRegistrationRequest>,
) -> Result<Json<StartRegistrationResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let cause: Cause = request_cause("start_registration", &request.email);
    let response: StartRegistrationResponse = start_registration(
        &mut persistence,
        state.dispatcher.as_ref(),
        &state.pricing,
        request,
        cause,
    )?;
    Ok(Json(response))
}

/// Handler for POST `/verify_email`.
async fn handle_verify_email(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let cause: Cause = request_cause("verify_email", &request.email);
    Ok(Json(verify_email(&mut persistence, request, cause)?))
}

/// Handler for POST `/credentials`.
async fn handle_set_credential(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<SetCredentialRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let cause: Cause = request_cause("set_credential", &request.email);
    Ok(Json(set_credential(
        &mut persistence,
        &state.credential_policy,
        request,
        cause,
    )?))
}

/// Handler for POST `/forgot_credential`.
///
/// Always answers 200 with a generic message; the response never
/// reveals whether an account exists.
async fn handle_forgot_credential(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<ForgotCredentialRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    Ok(Json(forgot_credential(
        &mut persistence,
        state.dispatcher.as_ref(),
        request,
    )?))
}

/// Handler for POST `/reset_credential`.
async fn handle_reset_credential(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<ResetCredentialRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let cause: Cause = request_cause("reset_credential", &request.email);
    Ok(Json(reset_credential(
        &mut persistence,
        &state.credential_policy,
        request,
        cause,
    )?))
}

/// Handler for PUT `/registrations/{id}/steps`.
async fn handle_update_step(
    AxumState(state): AxumState<AppState>,
    Path(registration_id): Path<i64>,
    Json(request): Json<UpdateStepRequest>,
) -> Result<Json<UpdateStepResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let actor: Actor = Actor::new(
        format!("registration-{registration_id}"),
        String::from("identity"),
    );
    let cause: Cause = request_cause("update_step", &registration_id.to_string());
    Ok(Json(update_step(
        &mut persistence,
        registration_id,
        request,
        actor,
        cause,
    )?))
}

/// Handler for POST `/registrations/{id}/media`.
///
/// Accepts the raw media bytes, stores them, and merges the resulting
/// URL into the media step.
async fn handle_upload_media(
    AxumState(state): AxumState<AppState>,
    Path(registration_id): Path<i64>,
    body: Bytes,
) -> Result<Json<UpdateStepResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let actor: Actor = Actor::new(
        format!("registration-{registration_id}"),
        String::from("identity"),
    );
    let cause: Cause = request_cause("upload_media", &registration_id.to_string());
    Ok(Json(upload_step_media(
        &mut persistence,
        state.media_store.as_ref(),
        registration_id,
        &body,
        actor,
        cause,
    )?))
}

/// Handler for POST `/registrations/{id}/submit`.
async fn handle_submit_registration(
    AxumState(state): AxumState<AppState>,
    Path(registration_id): Path<i64>,
) -> Result<Json<SubmitRegistrationResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let actor: Actor = Actor::new(
        format!("registration-{registration_id}"),
        String::from("identity"),
    );
    let cause: Cause = request_cause("submit_registration", &registration_id.to_string());
    Ok(Json(submit_registration(
        &mut persistence,
        registration_id,
        actor,
        cause,
    )?))
}

/// Review request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReviewRequest {
    /// The requested status.
    target: String,
    /// The reviewing administrator.
    reviewer: String,
}

/// Handler for POST `/registrations/{id}/review`.
async fn handle_review_registration(
    AxumState(state): AxumState<AppState>,
    Path(registration_id): Path<i64>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<SubmitRegistrationResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let actor: Actor = Actor::new(request.reviewer.clone(), String::from("admin"));
    let cause: Cause = request_cause("review_registration", &registration_id.to_string());
    Ok(Json(review_registration(
        &mut persistence,
        registration_id,
        &request.target,
        actor,
        cause,
    )?))
}

/// Handler for POST `/registrations/{id}/payment`.
async fn handle_initiate_fee(
    AxumState(state): AxumState<AppState>,
    Path(registration_id): Path<i64>,
    Json(request): Json<InitiateFeeRequest>,
) -> Result<Json<PaymentIntentResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    Ok(Json(initiate_fee_payment(
        &mut persistence,
        &state.pricing,
        registration_id,
        request,
    )?))
}

/// Handler for POST `/bulk_registrations`.
async fn handle_create_pool(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<CreatePoolRequest>,
) -> Result<Json<CreatePoolResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let actor: Actor = Actor::new(
        format!("identity-{}", request.owner_identity_id),
        String::from("identity"),
    );
    let cause: Cause = request_cause("create_pool", &request.reference);
    Ok(Json(create_pool(
        &mut persistence,
        &state.pricing,
        request,
        actor,
        cause,
    )?))
}

/// Handler for GET `/bulk_registrations/{id}`.
async fn handle_get_pool(
    AxumState(state): AxumState<AppState>,
    Path(pool_id): Path<i64>,
) -> Result<Json<PoolResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let pool: SlotPool = get_pool(&mut persistence, pool_id)?;
    Ok(Json(pool_to_response(&pool)))
}

/// Handler for POST `/bulk_registrations/{id}/participants`.
async fn handle_add_participant(
    AxumState(state): AxumState<AppState>,
    Path(pool_id): Path<i64>,
    Json(request): Json<AddParticipantRequest>,
) -> Result<Json<AddParticipantResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let actor: Actor = client_actor(&request.email);
    let cause: Cause = request_cause("add_participant", &pool_id.to_string());
    Ok(Json(add_participant(
        &mut persistence,
        state.dispatcher.as_ref(),
        pool_id,
        request,
        actor,
        cause,
    )?))
}

/// Handler for POST `/votes`.
async fn handle_record_vote_intent(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<VoteIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let actor: Actor = Actor::new(
        format!("contestant-{}", request.contestant_id),
        String::from("identity"),
    );
    let cause: Cause = request_cause("record_vote_intent", &request.reference);
    Ok(Json(record_vote_intent(
        &mut persistence,
        &state.pricing,
        request,
        actor,
        cause,
    )?))
}

/// Contestant creation request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CreateContestantRequest {
    /// Public display name.
    stage_name: String,
}

/// Contestant creation response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CreateContestantResponse {
    /// The contestant's canonical ID.
    contestant_id: i64,
}

/// Handler for POST `/contestants`.
async fn handle_create_contestant(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<CreateContestantRequest>,
) -> Result<Json<CreateContestantResponse>, HttpError> {
    if request.stage_name.trim().is_empty() {
        return Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: String::from("stage_name cannot be empty"),
        });
    }

    let mut persistence = state.persistence.lock().await;
    let contestant_id: i64 = persistence
        .create_contestant(request.stage_name.trim())
        .map_err(|e| HttpError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Failed to create contestant: {e}"),
        })?;
    Ok(Json(CreateContestantResponse { contestant_id }))
}

/// Handler for GET `/contestants/{id}/votes`.
async fn handle_get_contestant_votes(
    AxumState(state): AxumState<AppState>,
    Path(contestant_id): Path<i64>,
) -> Result<Json<ContestantVotesResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    Ok(Json(get_contestant_votes(&mut persistence, contestant_id)?))
}

/// Handler for POST `/tickets`.
async fn handle_order_tickets(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<TicketOrderRequest>,
) -> Result<Json<TicketOrderResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let actor: Actor = client_actor(&request.email);
    let cause: Cause = request_cause("order_tickets", &request.reference);
    Ok(Json(order_tickets(
        &mut persistence,
        &state.pricing,
        request,
        actor,
        cause,
    )?))
}

/// Handler for GET `/tickets/{reference}`.
async fn handle_get_ticket_order(
    AxumState(state): AxumState<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<TicketOrderResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    Ok(Json(get_ticket_order(&mut persistence, &reference)?))
}

/// Handler for POST `/payments/webhook`.
///
/// The gateway's at-least-once delivery path. Duplicate deliveries are
/// absorbed by the idempotency key; ambiguous statuses answer 422 so
/// the gateway retries.
async fn handle_payment_webhook(
    AxumState(state): AxumState<AppState>,
    Json(payload): Json<RawGatewayPayload>,
) -> Result<Json<PaymentApplicationResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let cause: Cause = Cause::new(
        payload.reference.clone(),
        String::from("Gateway webhook delivery"),
    );
    Ok(Json(apply_gateway_payload(
        &mut persistence,
        &payload,
        state.dialect,
        Actor::gateway(),
        cause,
    )?))
}

/// Handler for POST `/payments/{reference}/verify`.
///
/// The client-initiated verification path: a payer who timed out
/// re-posts the gateway's response. Same application, same idempotency
/// key, so a duplicate of the webhook is harmless.
async fn handle_verify_payment(
    AxumState(state): AxumState<AppState>,
    Path(reference): Path<String>,
    Json(payload): Json<RawGatewayPayload>,
) -> Result<Json<PaymentApplicationResponse>, HttpError> {
    if payload.reference != reference {
        return Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!(
                "Payload reference '{}' does not match path reference '{reference}'",
                payload.reference
            ),
        });
    }

    let mut persistence = state.persistence.lock().await;
    let cause: Cause = Cause::new(reference, String::from("Client verification call"));
    Ok(Json(apply_gateway_payload(
        &mut persistence,
        &payload,
        state.dialect,
        Actor::new(String::from("client-verify"), String::from("identity")),
        cause,
    )?))
}

/// Handler for GET `/payments/{reference}`.
async fn handle_get_payment_status(
    AxumState(state): AxumState<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<PaymentApplicationResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    Ok(Json(get_payment_status(&mut persistence, &reference)?))
}

/// Geo region hints response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeoRegionsResponse {
    /// Known region names.
    regions: Vec<String>,
}

/// Handler for GET `/geo/regions`.
///
/// Optional address-field hints; a degraded lookup serves stale data
/// and never fails the caller.
async fn handle_geo_regions(
    AxumState(state): AxumState<AppState>,
) -> Json<GeoRegionsResponse> {
    let mut geo = state.geo.lock().await;
    let regions: Vec<String> = geo
        .regions(state.geo_source.as_ref(), time::OffsetDateTime::now_utc())
        .to_vec();
    Json(GeoRegionsResponse { regions })
}

/// Handler for GET `/health`.
async fn handle_health() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: String::from("ok"),
    })
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/registrations", post(handle_start_registration))
        .route("/verify_email", post(handle_verify_email))
        .route("/credentials", post(handle_set_credential))
        .route("/forgot_credential", post(handle_forgot_credential))
        .route("/reset_credential", post(handle_reset_credential))
        .route("/registrations/{id}/steps", put(handle_update_step))
        .route("/registrations/{id}/media", post(handle_upload_media))
        .route("/registrations/{id}/submit", post(handle_submit_registration))
        .route("/registrations/{id}/review", post(handle_review_registration))
        .route("/registrations/{id}/payment", post(handle_initiate_fee))
        .route("/bulk_registrations", post(handle_create_pool))
        .route("/bulk_registrations/{id}", get(handle_get_pool))
        .route(
            "/bulk_registrations/{id}/participants",
            post(handle_add_participant),
        )
        .route("/votes", post(handle_record_vote_intent))
        .route("/contestants", post(handle_create_contestant))
        .route("/contestants/{id}/votes", get(handle_get_contestant_votes))
        .route("/tickets", post(handle_order_tickets))
        .route("/tickets/{reference}", get(handle_get_ticket_order))
        .route("/payments/webhook", post(handle_payment_webhook))
        .route("/payments/{reference}/verify", post(handle_verify_payment))
        .route("/payments/{reference}", get(handle_get_payment_status))
        .route("/geo/regions", get(handle_geo_regions))
        .route("/health", get(handle_health))
        .with_state(app_state)
}

/// Builds the shared application state.
fn build_app_state(persistence: Persistence) -> AppState {
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        pricing: Arc::new(Pricing::default()),
        credential_policy: Arc::new(CredentialPolicy::default()),
        dialect: GatewayDialect::Lenient,
        dispatcher: Arc::new(LoggingEmailDispatcher),
        media_store: Arc::new(InMemoryMediaStore),
        geo: Arc::new(Mutex::new(GeoCache::new(time::Duration::minutes(30)))),
        geo_source: Arc::new(StaticGeoSource),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Ovation Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = build_app_state(persistence);

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
