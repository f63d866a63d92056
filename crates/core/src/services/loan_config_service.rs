use crate::app_state::AppState;
use crate::repositories::loan_config_repository::LoanConfigRepository;
use diesel::PgConnection;
use loanline_primitives::error::ApiError;
use loanline_primitives::models::context::RequestContext;
use loanline_primitives::models::dtos::config_dto::{LoanConfigResponse, UpdateLoanConfigRequest};
use loanline_primitives::models::entities::loan_config::{LoanConfigRow, LoanTerms};
use tracing::info;

pub struct LoanConfigService;

impl LoanConfigService {
    /// Terms in force right now; the built-in defaults when no row exists.
    pub fn terms(conn: &mut PgConnection) -> Result<LoanTerms, ApiError> {
        Ok(LoanConfigRepository::get(conn)?
            .map(LoanTerms::from)
            .unwrap_or_default())
    }

    pub async fn current(state: &AppState, ctx: &RequestContext) -> Result<LoanConfigResponse, ApiError> {
        ctx.ensure_staff()?;
        let mut conn = state.db.get()?;

        Ok(match LoanConfigRepository::get(&mut conn)? {
            Some(cfg) => LoanConfigResponse {
                updated_at: Some(cfg.updated_at),
                terms: cfg.into(),
            },
            None => LoanConfigResponse {
                terms: LoanTerms::default(),
                updated_at: None,
            },
        })
    }

    pub async fn update(
        state: &AppState,
        ctx: &RequestContext,
        req: UpdateLoanConfigRequest,
    ) -> Result<LoanConfigResponse, ApiError> {
        ctx.ensure_staff()?;
        let terms = req.terms()?;

        let mut conn = state.db.get()?;
        let saved = LoanConfigRepository::upsert(&mut conn, LoanConfigRow::new(terms, ctx.now))?;

        info!(
            staff_id = %ctx.account_id,
            rate = %saved.interest_rate_monthly,
            min = %saved.min_amount,
            max = %saved.max_amount,
            "loan_config.updated"
        );

        Ok(LoanConfigResponse {
            updated_at: Some(saved.updated_at),
            terms: saved.into(),
        })
    }
}
