//! A stand-in for the election backend, served by Rocket in-process and
//! reached through a [`LocalTransport`]. Test builds only.

use std::collections::HashSet;
use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use rocket::{
    http::{ContentType, Header, RawStr, Status},
    local::asynchronous::Client,
    request::{self, FromRequest},
    response::{self, Responder},
    serde::json::Json,
    Data, Request, Response, Route, State,
};
use rocket::data::ToByteUnit;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::{ApiClient, ApiRequest, ApiResponse, Body, Method, Transport, TransportError};
use crate::model::{
    auth::{Acknowledgement, Credentials, ForgotPassword, NewOfficer, PasswordReset, Registration, StatusChange},
    ballot::{Ballot, CastBallot, VoteChoice},
    nomination::{NewNomination, Nomination, NominationStatus, Rejection},
    otp::{Code, RegistrationNumber},
    position::{NewPosition, Position},
    report::{AuditEntry, AuditPage, CandidateTally, PositionResult, Summary, Turnout},
    voter::{BallotGrant, ImportSummary, OtpConfirmation, OtpRequest, Voter},
    AccountStatus, ApiId, Role, Session, User,
};
use crate::pages::AppContext;
use crate::router::Navigator;
use crate::storage::{MemoryStorage, SessionStore};
use crate::ui::Toasts;

pub const PASSWORD: &str = "password123";
pub const EXPIRED_TOKEN: &str = "expired-token";
pub const DEACTIVATED_TOKEN: &str = "deactivated-token";
pub const BALLOT_TOKEN: &str = "ballot-abc";
pub const USED_BALLOT_TOKEN: &str = "ballot-used";
pub const CLOSED_BALLOT_TOKEN: &str = "ballot-closed";
pub const REVOKED_BALLOT_TOKEN: &str = "ballot-revoked";
pub const FAILING_BALLOT_TOKEN: &str = "ballot-failing";
pub const UNKNOWN_VOTER: &str = "UNKNOWN";

/// Everything the mock backend remembers between requests.
#[derive(Debug, Default)]
pub struct MockData {
    pub positions: Vec<Position>,
    pub nominations: Vec<Nomination>,
    pub voters: Vec<Voter>,
    pub officers: Vec<User>,
    pub otp_requested: HashSet<RegistrationNumber>,
    pub used_ballots: HashSet<String>,
    pub casts: Vec<Vec<VoteChoice>>,
    pub imports: Vec<String>,
    next_id: u64,
}

impl MockData {
    fn next_id(&mut self) -> ApiId {
        self.next_id += 1;
        ApiId::Number(1000 + self.next_id)
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    data: Mutex<MockData>,
}

impl MockState {
    fn seeded() -> Self {
        let ballot = Ballot::example();
        let positions = ballot
            .positions
            .iter()
            .map(|p| Position {
                id: p.id.clone(),
                title: p.title.clone(),
                description: p.description.clone(),
                seats: 1,
                nomination_start: None,
                nomination_end: None,
                voting_start: None,
                voting_end: None,
            })
            .collect();
        let nomination = |id: u64, name: &str, status| Nomination {
            id: ApiId::Number(id),
            position_id: ApiId::Number(10),
            position_title: Some("President".into()),
            candidate_name: name.into(),
            manifesto: None,
            status,
            rejection_reason: None,
        };
        let voter = |id: u64, reg_no: &str, has_voted| Voter {
            id: ApiId::Number(id),
            registration_number: reg_no.parse().unwrap(),
            name: format!("Voter {id}"),
            email: None,
            phone: None,
            has_voted,
        };
        let mut inactive = User::example(Role::Officer);
        inactive.id = ApiId::Number(22);
        inactive.email = "inactive.officer@example.com".into();
        inactive.status = AccountStatus::Inactive;

        Self {
            data: Mutex::new(MockData {
                positions,
                nominations: vec![
                    nomination(500, "Cara Candidate", NominationStatus::Pending),
                    nomination(501, "Alice", NominationStatus::Approved),
                    nomination(502, "Mallory", NominationStatus::Rejected),
                ],
                voters: vec![
                    voter(1, "REG/2024/001", false),
                    voter(2, "REG/2024/002", true),
                    voter(3, "REG/2024/003", false),
                    voter(4, "REG/2024/004", true),
                ],
                officers: vec![User::example(Role::Officer), inactive],
                ..MockData::default()
            }),
        }
    }

    pub fn data(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().unwrap()
    }
}

type Failure = (Status, Json<Value>);
type MockResult<T> = Result<Json<T>, Failure>;

fn fail(status: Status, body: Value) -> Failure {
    (status, Json(body))
}

/// The raw `Authorization` header, if any.
pub struct Bearer(Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Bearer {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let token = req
            .headers()
            .get_one("Authorization")
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_string);
        request::Outcome::Success(Bearer(token))
    }
}

impl Bearer {
    /// Check the caller holds one of `roles`.
    fn require(&self, roles: &[Role]) -> Result<Role, Failure> {
        let role = match self.0.as_deref() {
            Some("admin-token") => Role::Admin,
            Some("officer-token") => Role::Officer,
            Some("candidate-token") => Role::Candidate,
            Some(EXPIRED_TOKEN) => {
                return Err(fail(Status::Unauthorized, json!({"error": "Token expired"})))
            }
            Some(DEACTIVATED_TOKEN) => {
                return Err(fail(
                    Status::Unauthorized,
                    json!({"error": "Your account has been deactivated", "code": "ACCOUNT_DEACTIVATED"}),
                ))
            }
            _ => {
                return Err(fail(
                    Status::Unauthorized,
                    json!({"error": "Invalid token", "code": "TOKEN_INVALID"}),
                ))
            }
        };
        if roles.contains(&role) {
            Ok(role)
        } else {
            Err(fail(Status::Forbidden, json!({"error": "Access denied"})))
        }
    }
}

/// What the mock saw of a request's decorations.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub authorization: Option<String>,
    pub timestamp: Option<i64>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Echo {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        request::Outcome::Success(Echo {
            authorization: req.headers().get_one("Authorization").map(str::to_string),
            timestamp: req.query_value::<i64>("_t").and_then(Result::ok),
        })
    }
}

#[get("/debug/echo")]
fn echo_get(echo: Echo) -> Json<Echo> {
    Json(echo)
}

#[post("/debug/echo")]
fn echo_post(echo: Echo) -> Json<Echo> {
    Json(echo)
}

#[post("/auth/login", data = "<credentials>", format = "json")]
fn login(credentials: Json<Credentials>, state: &State<Arc<MockState>>) -> MockResult<Session> {
    if credentials.password != PASSWORD {
        return Err(fail(Status::Unauthorized, json!({"error": "Invalid email or password"})));
    }
    match credentials.email.as_str() {
        "admin@example.com" => Ok(Json(Session::example(Role::Admin))),
        "officer@example.com" => Ok(Json(Session::example(Role::Officer))),
        "candidate@example.com" => Ok(Json(Session::example(Role::Candidate))),
        "inactive.officer@example.com" => {
            let user = state
                .data()
                .officers
                .iter()
                .find(|o| o.email == credentials.email)
                .cloned()
                .unwrap();
            Ok(Json(Session {
                token: "officer-token".into(),
                user,
            }))
        }
        "blocked.officer@example.com" => Err(fail(
            Status::Unauthorized,
            json!({"error": "Your account has been deactivated. Contact the administrator."}),
        )),
        _ => Err(fail(Status::Unauthorized, json!({"error": "Invalid email or password"}))),
    }
}

#[post("/auth/register", data = "<registration>", format = "json")]
fn register(registration: Json<Registration>) -> MockResult<Acknowledgement> {
    if registration.email == "taken@example.com" {
        return Err(fail(Status::Conflict, json!({"error": "Email already registered"})));
    }
    Ok(Json(Acknowledgement {
        message: Some("Registration successful".into()),
    }))
}

#[post("/auth/forgot-password", data = "<_request>", format = "json")]
fn forgot_password(_request: Json<ForgotPassword>) -> Json<Acknowledgement> {
    Json(Acknowledgement {
        message: Some("If the account exists, a code has been sent".into()),
    })
}

#[post("/auth/reset-password", data = "<reset>", format = "json")]
fn reset_password(reset: Json<PasswordReset>) -> MockResult<Acknowledgement> {
    if reset.otp != Code::example() {
        return Err(fail(Status::BadRequest, json!({"error": "Invalid or expired OTP"})));
    }
    Ok(Json(Acknowledgement {
        message: Some("Password updated".into()),
    }))
}

#[get("/positions")]
fn positions(bearer: Bearer, state: &State<Arc<MockState>>) -> MockResult<Vec<Position>> {
    bearer.require(&[Role::Admin, Role::Officer, Role::Candidate])?;
    Ok(Json(state.data().positions.clone()))
}

#[post("/positions", data = "<position>", format = "json")]
fn create_position(
    bearer: Bearer,
    position: Json<NewPosition>,
    state: &State<Arc<MockState>>,
) -> MockResult<Position> {
    bearer.require(&[Role::Admin])?;
    let mut data = state.data();
    let position = position.into_inner();
    let created = Position {
        id: data.next_id(),
        title: position.title,
        description: position.description,
        seats: position.seats,
        nomination_start: Some(position.nomination_start),
        nomination_end: Some(position.nomination_end),
        voting_start: Some(position.voting_start),
        voting_end: Some(position.voting_end),
    };
    data.positions.push(created.clone());
    Ok(Json(created))
}

#[delete("/positions/<id>")]
fn delete_position(bearer: Bearer, id: u64, state: &State<Arc<MockState>>) -> MockResult<Acknowledgement> {
    bearer.require(&[Role::Admin])?;
    let mut data = state.data();
    let before = data.positions.len();
    data.positions.retain(|p| p.id != ApiId::Number(id));
    if data.positions.len() == before {
        return Err(fail(Status::NotFound, json!({"error": "Position not found"})));
    }
    Ok(Json(Acknowledgement::default()))
}

#[get("/candidates?<status>")]
fn nominations(
    bearer: Bearer,
    status: Option<&str>,
    state: &State<Arc<MockState>>,
) -> MockResult<Vec<Nomination>> {
    bearer.require(&[Role::Admin, Role::Officer])?;
    let nominations = state
        .data()
        .nominations
        .iter()
        .filter(|n| status.map_or(true, |s| n.status.as_query() == s))
        .cloned()
        .collect();
    Ok(Json(nominations))
}

#[get("/candidates/my-nominations")]
fn my_nominations(bearer: Bearer, state: &State<Arc<MockState>>) -> MockResult<Vec<Nomination>> {
    bearer.require(&[Role::Candidate])?;
    let name = User::example(Role::Candidate).name;
    let nominations = state
        .data()
        .nominations
        .iter()
        .filter(|n| n.candidate_name == name)
        .cloned()
        .collect();
    Ok(Json(nominations))
}

#[post("/candidates/nominate", data = "<nomination>", format = "json")]
fn nominate(
    bearer: Bearer,
    nomination: Json<NewNomination>,
    state: &State<Arc<MockState>>,
) -> MockResult<Nomination> {
    bearer.require(&[Role::Candidate])?;
    let mut data = state.data();
    let position = data
        .positions
        .iter()
        .find(|p| p.id == nomination.position_id)
        .cloned()
        .ok_or_else(|| fail(Status::NotFound, json!({"error": "Position not found"})))?;
    let created = Nomination {
        id: data.next_id(),
        position_id: position.id,
        position_title: Some(position.title),
        candidate_name: User::example(Role::Candidate).name,
        manifesto: Some(nomination.manifesto.clone()),
        status: NominationStatus::Pending,
        rejection_reason: None,
    };
    data.nominations.push(created.clone());
    Ok(Json(created))
}

fn review(
    state: &MockState,
    id: u64,
    status: NominationStatus,
    reason: Option<String>,
) -> MockResult<Acknowledgement> {
    let mut data = state.data();
    let nomination = data
        .nominations
        .iter_mut()
        .find(|n| n.id == ApiId::Number(id))
        .ok_or_else(|| fail(Status::NotFound, json!({"error": "Nomination not found"})))?;
    nomination.status = status;
    nomination.rejection_reason = reason;
    Ok(Json(Acknowledgement::default()))
}

#[patch("/candidates/<id>/approve")]
fn approve(bearer: Bearer, id: u64, state: &State<Arc<MockState>>) -> MockResult<Acknowledgement> {
    bearer.require(&[Role::Officer])?;
    review(state, id, NominationStatus::Approved, None)
}

#[patch("/candidates/<id>/reject", data = "<rejection>", format = "json")]
fn reject(
    bearer: Bearer,
    id: u64,
    rejection: Json<Rejection>,
    state: &State<Arc<MockState>>,
) -> MockResult<Acknowledgement> {
    bearer.require(&[Role::Officer])?;
    if rejection.reason.trim().is_empty() {
        return Err(fail(
            Status::BadRequest,
            json!({"error": "Rejection reason is required", "code": "VALIDATION"}),
        ));
    }
    review(state, id, NominationStatus::Rejected, Some(rejection.into_inner().reason))
}

#[get("/voters")]
fn voters(bearer: Bearer, state: &State<Arc<MockState>>) -> MockResult<Vec<Voter>> {
    bearer.require(&[Role::Admin, Role::Officer])?;
    Ok(Json(state.data().voters.clone()))
}

#[post("/voters/import", data = "<upload>")]
async fn import_voters(
    bearer: Bearer,
    upload: Data<'_>,
    state: &State<Arc<MockState>>,
) -> MockResult<ImportSummary> {
    bearer.require(&[Role::Admin, Role::Officer])?;
    let raw = upload
        .open(1.mebibytes())
        .into_string()
        .await
        .map_err(|_| fail(Status::BadRequest, json!({"error": "Unreadable upload"})))?
        .into_inner();
    // Count CSV data rows: lines with a comma, minus the header.
    let rows = raw.lines().filter(|line| line.contains(',')).count();
    state.data().imports.push(raw);
    Ok(Json(ImportSummary {
        imported: rows.saturating_sub(1) as u64,
        skipped: 0,
        errors: Vec::new(),
    }))
}

#[post("/voter/request-otp", data = "<request>", format = "json")]
fn request_otp(request: Json<OtpRequest>, state: &State<Arc<MockState>>) -> MockResult<Acknowledgement> {
    if request.registration_number.as_str() == UNKNOWN_VOTER {
        return Err(fail(Status::NotFound, json!({"error": "Voter not found"})));
    }
    let mut data = state.data();
    if !data.otp_requested.insert(request.registration_number.clone()) {
        return Err(fail(
            Status::TooManyRequests,
            json!({
                "error": "OTP already sent.",
                "hint": "Please wait 60 seconds before requesting a new code.",
                "retryAfter": 60,
            }),
        ));
    }
    Ok(Json(Acknowledgement {
        message: Some("OTP sent".into()),
    }))
}

#[post("/voter/verify-otp", data = "<confirmation>", format = "json")]
fn verify_otp(confirmation: Json<OtpConfirmation>) -> MockResult<BallotGrant> {
    if confirmation.otp != Code::example() {
        return Err(fail(Status::BadRequest, json!({"error": "Invalid or expired OTP"})));
    }
    Ok(Json(BallotGrant {
        ballot_token: BALLOT_TOKEN.into(),
    }))
}

/// The `X-Ballot-Token` header.
pub struct BallotHeader(Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BallotHeader {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        request::Outcome::Success(BallotHeader(
            req.headers().get_one("X-Ballot-Token").map(str::to_string),
        ))
    }
}

#[get("/vote/ballot")]
fn ballot(token: BallotHeader) -> MockResult<Ballot> {
    match token.0.as_deref() {
        Some(
            BALLOT_TOKEN
            | USED_BALLOT_TOKEN
            | CLOSED_BALLOT_TOKEN
            | REVOKED_BALLOT_TOKEN
            | FAILING_BALLOT_TOKEN,
        ) => Ok(Json(Ballot::example())),
        _ => Err(fail(Status::Forbidden, json!({"error": "Invalid ballot token"}))),
    }
}

#[post("/vote/cast", data = "<cast>", format = "json")]
fn cast(cast: Json<CastBallot>, state: &State<Arc<MockState>>) -> MockResult<Acknowledgement> {
    let mut data = state.data();
    match cast.ballot_token.as_str() {
        USED_BALLOT_TOKEN => {
            return Err(fail(
                Status::BadRequest,
                json!({"error": "This ballot token has already been used"}),
            ))
        }
        CLOSED_BALLOT_TOKEN => {
            return Err(fail(
                Status::BadRequest,
                json!({
                    "error": "Some positions are not open for voting",
                    "code": "VOTING_CLOSED",
                    "positions": ["Treasurer"],
                }),
            ))
        }
        REVOKED_BALLOT_TOKEN => {
            return Err(fail(
                Status::Forbidden,
                json!({"error": "Invalid ballot token", "code": "BALLOT_TOKEN_INVALID"}),
            ))
        }
        FAILING_BALLOT_TOKEN => {
            return Err(fail(
                Status::InternalServerError,
                json!({"error": "Database unavailable"}),
            ))
        }
        BALLOT_TOKEN => {}
        _ => return Err(fail(Status::Forbidden, json!({"error": "Invalid ballot token"}))),
    }
    if data.used_ballots.contains(&cast.ballot_token) {
        return Err(fail(
            Status::BadRequest,
            json!({"error": "Ballot already used", "code": "BALLOT_TOKEN_USED"}),
        ));
    }
    if cast.votes.len() != Ballot::example().positions.len() {
        return Err(fail(Status::BadRequest, json!({"error": "Incomplete ballot"})));
    }
    data.used_ballots.insert(cast.ballot_token.clone());
    data.casts.push(cast.into_inner().votes);
    Ok(Json(Acknowledgement {
        message: Some("Vote cast successfully".into()),
    }))
}

#[get("/users?<role>")]
fn users(bearer: Bearer, role: Option<&str>, state: &State<Arc<MockState>>) -> MockResult<Vec<User>> {
    bearer.require(&[Role::Admin])?;
    let officers = state.data().officers.clone();
    match role {
        None | Some("OFFICER") => Ok(Json(officers)),
        Some(_) => Ok(Json(Vec::new())),
    }
}

#[post("/users", data = "<officer>", format = "json")]
fn create_officer(
    bearer: Bearer,
    officer: Json<NewOfficer>,
    state: &State<Arc<MockState>>,
) -> MockResult<User> {
    bearer.require(&[Role::Admin])?;
    let mut data = state.data();
    let user = User {
        id: data.next_id(),
        email: officer.email.clone(),
        name: officer.name.clone(),
        role: Role::Officer,
        status: AccountStatus::Active,
    };
    data.officers.push(user.clone());
    Ok(Json(user))
}

#[patch("/users/<id>/status", data = "<change>", format = "json")]
fn set_status(
    bearer: Bearer,
    id: u64,
    change: Json<StatusChange>,
    state: &State<Arc<MockState>>,
) -> MockResult<Acknowledgement> {
    bearer.require(&[Role::Admin])?;
    let mut data = state.data();
    let officer = data
        .officers
        .iter_mut()
        .find(|o| o.id == ApiId::Number(id))
        .ok_or_else(|| fail(Status::NotFound, json!({"error": "User not found"})))?;
    officer.status = change.status;
    Ok(Json(Acknowledgement::default()))
}

#[get("/reports/summary")]
fn summary(bearer: Bearer, state: &State<Arc<MockState>>) -> MockResult<Summary> {
    bearer.require(&[Role::Admin])?;
    let data = state.data();
    Ok(Json(Summary {
        positions: data.positions.len() as u64,
        candidates: data.nominations.len() as u64,
        voters: data.voters.len() as u64,
        votes: data.casts.len() as u64,
    }))
}

#[get("/reports/turnout")]
fn turnout(bearer: Bearer, state: &State<Arc<MockState>>) -> MockResult<Turnout> {
    bearer.require(&[Role::Admin, Role::Officer])?;
    let data = state.data();
    let votes_cast = data.voters.iter().filter(|v| v.has_voted).count() as u64;
    Ok(Json(Turnout {
        total_voters: data.voters.len() as u64,
        votes_cast,
        turnout_percent: None,
    }))
}

#[get("/reports/results")]
fn results(bearer: Bearer, state: &State<Arc<MockState>>) -> MockResult<Vec<PositionResult>> {
    bearer.require(&[Role::Admin, Role::Officer])?;
    let data = state.data();
    let results = Ballot::example()
        .positions
        .into_iter()
        .map(|position| PositionResult {
            candidates: position
                .candidates
                .iter()
                .map(|candidate| CandidateTally {
                    candidate_id: candidate.id.clone(),
                    name: candidate.name.clone(),
                    votes: data
                        .casts
                        .iter()
                        .flatten()
                        .filter(|vote| vote.candidate_id == candidate.id)
                        .count() as u64,
                })
                .collect(),
            position_id: position.id,
            position_title: position.title,
        })
        .collect();
    Ok(Json(results))
}

#[get("/reports/audit-log?<page>")]
fn audit_log(bearer: Bearer, page: Option<u32>) -> MockResult<AuditPage> {
    bearer.require(&[Role::Admin, Role::Officer])?;
    let page = page.unwrap_or(1);
    let entries = (0..3)
        .map(|i| AuditEntry {
            id: ApiId::Number(u64::from(page) * 10 + i),
            action: "LOGIN".into(),
            actor: Some("admin@example.com".into()),
            details: None,
            created_at: Utc::now() - Duration::minutes(i as i64),
        })
        .collect();
    Ok(Json(AuditPage {
        entries,
        page,
        total_pages: 2,
    }))
}

/// A binary download.
pub struct Download {
    bytes: Vec<u8>,
    content_type: ContentType,
    file_name: Option<String>,
}

impl<'r> Responder<'r, 'static> for Download {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let mut builder = Response::build();
        builder
            .header(self.content_type)
            .sized_body(self.bytes.len(), Cursor::new(self.bytes));
        if let Some(name) = self.file_name {
            builder.raw_header("Content-Disposition", format!("attachment; filename=\"{name}\""));
        }
        builder.ok()
    }
}

#[get("/reports/export/<kind>?<format>")]
fn export(bearer: Bearer, kind: &str, format: &str) -> Result<Download, Failure> {
    bearer.require(&[Role::Admin, Role::Officer])?;
    match (kind, format) {
        ("results", "csv") => Ok(Download {
            bytes: b"position,candidate,votes\nPresident,Alice,3\n".to_vec(),
            content_type: ContentType::CSV,
            file_name: Some("election-results.csv".into()),
        }),
        (_, "pdf") => Ok(Download {
            bytes: b"%PDF-1.4 mock".to_vec(),
            content_type: ContentType::PDF,
            file_name: None,
        }),
        (_, "csv") => Ok(Download {
            bytes: format!("{kind}\n").into_bytes(),
            content_type: ContentType::CSV,
            file_name: None,
        }),
        _ => Err(fail(Status::BadRequest, json!({"error": "Unknown format"}))),
    }
}

fn routes() -> Vec<Route> {
    routes![
        echo_get,
        echo_post,
        login,
        register,
        forgot_password,
        reset_password,
        positions,
        create_position,
        delete_position,
        nominations,
        my_nominations,
        nominate,
        approve,
        reject,
        voters,
        import_voters,
        request_otp,
        verify_otp,
        ballot,
        cast,
        users,
        create_officer,
        set_status,
        summary,
        turnout,
        results,
        audit_log,
        export,
    ]
}

/// Carries requests into an in-process Rocket instance instead of over the network.
pub struct LocalTransport {
    client: Client,
}

const BOUNDARY: &str = "mock-backend-boundary";

#[rocket::async_trait]
impl Transport for LocalTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut uri = format!("/api{}", request.path);
        if !request.query.is_empty() {
            let query = request
                .query
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}={}",
                        RawStr::new(k).percent_encode(),
                        RawStr::new(v).percent_encode()
                    )
                })
                .collect::<Vec<_>>()
                .join("&");
            uri = format!("{uri}?{query}");
        }
        let method = match request.method {
            Method::Get => rocket::http::Method::Get,
            Method::Post => rocket::http::Method::Post,
            Method::Put => rocket::http::Method::Put,
            Method::Patch => rocket::http::Method::Patch,
            Method::Delete => rocket::http::Method::Delete,
        };

        let mut local = self.client.req(method, uri);
        for (name, value) in request.headers {
            local = local.header(Header::new(name, value));
        }
        local = match request.body {
            Body::Empty => local,
            Body::Json(value) => local.header(ContentType::JSON).body(value.to_string()),
            Body::File(upload) => {
                let mut body = format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    upload.field, upload.file_name, upload.mime
                )
                .into_bytes();
                body.extend_from_slice(&upload.bytes);
                body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
                local
                    .header(ContentType::new("multipart", "form-data").with_params(("boundary", BOUNDARY)))
                    .body(body)
            }
        };

        let response = local.dispatch().await;
        let status = response.status().code;
        let headers = response
            .headers()
            .iter()
            .map(|h| (h.name().as_str().to_ascii_lowercase(), h.value().to_string()))
            .collect();
        let body = response.into_bytes().await.unwrap_or_default();
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

async fn local_client(state: Arc<MockState>) -> Client {
    let figment = rocket::Config::figment().merge(("log_level", "off"));
    let rocket = rocket::custom(figment).mount("/api", routes()).manage(state);
    Client::untracked(rocket).await.unwrap()
}

/// An API client wired to a fresh mock backend, with empty storage.
pub async fn client() -> (ApiClient, Arc<MockState>) {
    let state = Arc::new(MockState::seeded());
    let transport = LocalTransport {
        client: local_client(state.clone()).await,
    };
    let api = ApiClient::new(
        transport,
        SessionStore::new(MemoryStorage::new()),
        Navigator::default(),
    );
    (api, state)
}

/// A full page context wired to a fresh mock backend.
pub async fn context() -> (AppContext, Arc<MockState>) {
    let (api, state) = client().await;
    (AppContext::new(api, Toasts::new()), state)
}

/// As [`context`], already logged in as `role`.
pub async fn context_as(role: Role) -> (AppContext, Arc<MockState>) {
    let (ctx, state) = context().await;
    ctx.session().save_session(&Session::example(role)).unwrap();
    ctx.navigator().push(crate::router::Route::dashboard(role));
    (ctx, state)
}
