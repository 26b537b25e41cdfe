use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::schemas::{ExpenseId, Money, NewExpense, ParticipantId};
use crate::settlement::SettlementParty;
use actix_web::{
    delete, error::InternalError, get, http::StatusCode, post, web, HttpResponse, ResponseError,
};
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Mutex, MutexGuard};

/// Shared state of the HTTP handlers. The mutex serializes every mutation
/// and query against the ledger.
#[derive(Debug, Default)]
pub struct AppState {
    ledger: Mutex<Ledger>,
}

impl AppState {
    fn ledger(&self) -> Result<MutexGuard<'_, Ledger>, HttpResponse> {
        self.ledger.lock().map_err(|_| {
            tracing::error!("ledger lock poisoned");
            HttpResponse::InternalServerError().json(json!({ "error": "ledger unavailable" }))
        })
    }
}

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            LedgerError::UnknownParticipant(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

fn bad_request<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    tracing::warn!("rejected request: {err}");
    let response = HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
    InternalError::from_response(err, response).into()
}

fn round_to_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Deserialize, Serialize)]
struct ParticipantNameJson {
    name: String,
}

#[derive(Deserialize, Serialize)]
struct NewExpenseJson {
    description: String,
    amount: Money,
    paid_by: ParticipantId,
    /// Everyone in the ledger when omitted.
    split_between: Option<Vec<ParticipantId>>,
}

#[derive(Serialize)]
struct BalanceJson<'a> {
    id: ParticipantId,
    name: &'a str,
    balance: Money,
}

#[derive(Serialize)]
struct SettlementJson {
    from: SettlementParty,
    to: SettlementParty,
    amount: Money,
}

#[derive(Serialize)]
struct SummaryJson {
    participants: usize,
    expenses: usize,
    total_expenses: Money,
}

#[get("/participants")]
async fn list_participants(state: web::Data<AppState>) -> HttpResponse {
    match state.ledger() {
        Ok(ledger) => HttpResponse::Ok().json(ledger.participants()),
        Err(response) => response,
    }
}

#[post("/participants")]
async fn add_participant(
    state: web::Data<AppState>,
    json: web::Json<ParticipantNameJson>,
) -> HttpResponse {
    let mut ledger = match state.ledger() {
        Ok(ledger) => ledger,
        Err(response) => return response,
    };
    match ledger.add_participant(&json.name) {
        Ok(participant) => HttpResponse::Created().json(participant),
        Err(err) => {
            tracing::warn!("rejected participant: {err}");
            err.error_response()
        }
    }
}

#[delete("/participants/{id}")]
async fn remove_participant(
    state: web::Data<AppState>,
    id: web::Path<ParticipantId>,
) -> HttpResponse {
    let mut ledger = match state.ledger() {
        Ok(ledger) => ledger,
        Err(response) => return response,
    };
    match ledger.remove_participant(id.into_inner()) {
        Ok(removed) => HttpResponse::Ok().json(removed),
        Err(err) => err.error_response(),
    }
}

#[get("/expenses")]
async fn list_expenses(state: web::Data<AppState>) -> HttpResponse {
    match state.ledger() {
        Ok(ledger) => HttpResponse::Ok().json(ledger.expenses()),
        Err(response) => response,
    }
}

#[post("/expenses")]
async fn add_expense(state: web::Data<AppState>, json: web::Json<NewExpenseJson>) -> HttpResponse {
    let mut ledger = match state.ledger() {
        Ok(ledger) => ledger,
        Err(response) => return response,
    };
    let json = json.into_inner();
    let expense = NewExpense {
        description: json.description,
        amount: json.amount,
        paid_by: json.paid_by,
        split_between: json
            .split_between
            .unwrap_or_else(|| ledger.participant_ids()),
    };
    match ledger.add_expense(expense) {
        Ok(expense) => HttpResponse::Created().json(expense),
        Err(err) => {
            tracing::warn!("rejected expense: {err}");
            err.error_response()
        }
    }
}

#[delete("/expenses/{id}")]
async fn remove_expense(state: web::Data<AppState>, id: web::Path<ExpenseId>) -> HttpResponse {
    let mut ledger = match state.ledger() {
        Ok(ledger) => ledger,
        Err(response) => return response,
    };
    match ledger.remove_expense(id.into_inner()) {
        Ok(expense) => HttpResponse::Ok().json(expense),
        Err(err) => err.error_response(),
    }
}

#[get("/balances")]
async fn get_balances(state: web::Data<AppState>) -> HttpResponse {
    let ledger = match state.ledger() {
        Ok(ledger) => ledger,
        Err(response) => return response,
    };
    let balances = ledger.balances();
    let body: Vec<_> = balances
        .iter()
        .map(|entry| BalanceJson {
            id: entry.id,
            name: ledger.find_participant_name(entry.id).unwrap_or("Unknown"),
            balance: round_to_cents(entry.balance),
        })
        .collect();
    HttpResponse::Ok().json(body)
}

#[get("/settlements")]
async fn get_settlements(state: web::Data<AppState>) -> HttpResponse {
    let ledger = match state.ledger() {
        Ok(ledger) => ledger,
        Err(response) => return response,
    };
    let body: Vec<_> = ledger
        .settlements()
        .into_iter()
        .map(|settlement| SettlementJson {
            from: settlement.from,
            to: settlement.to,
            amount: round_to_cents(settlement.amount),
        })
        .collect();
    HttpResponse::Ok().json(body)
}

#[get("/summary")]
async fn get_summary(state: web::Data<AppState>) -> HttpResponse {
    match state.ledger() {
        Ok(ledger) => HttpResponse::Ok().json(SummaryJson {
            participants: ledger.participants().len(),
            expenses: ledger.expenses().len(),
            total_expenses: ledger.total_expenses(),
        }),
        Err(response) => response,
    }
}

/// Registers every ledger route. Expects `web::Data<AppState>` in the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| bad_request(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| bad_request(err)))
        .service(list_participants)
        .service(add_participant)
        .service(remove_participant)
        .service(list_expenses)
        .service(add_expense)
        .service(remove_expense)
        .service(get_balances)
        .service(get_settlements)
        .service(get_summary);
}
