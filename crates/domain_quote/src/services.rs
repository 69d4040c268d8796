//! Quotation service
//!
//! Wires the form session controller, the estimator and the storage ports.
//! Each operation loads the user's session, applies one change and writes it
//! back. Session and loyalty writes are best effort: a failure is logged and
//! the operation still succeeds. Saving a quote is explicit, so its failure
//! is returned to the caller.

use std::sync::Arc;

use tracing::{debug, info, warn};

use core_kernel::{Clock, PortError, QuoteId, SystemClock, Timezone, UserId};

use crate::breakdown::PremiumBreakdown;
use crate::error::QuoteError;
use crate::estimator::{EstimationContext, PremiumEstimator};
use crate::form::{FormData, FormField};
use crate::ports::{LoyaltyPort, QuoteStorePort, SessionStorePort};
use crate::quote::{Quote, QuoteStatus, SavedQuote};
use crate::session::FormSession;
use crate::summary::{summary_items, SummaryItem};
use crate::validation::{FieldValidation, FormValidator};

/// Application service for the quotation form
pub struct QuotationService {
    estimator: PremiumEstimator,
    sessions: Arc<dyn SessionStorePort>,
    quotes: Arc<dyn QuoteStorePort>,
    loyalty: Arc<dyn LoyaltyPort>,
    timezone: Timezone,
    clock: Arc<dyn Clock>,
}

impl QuotationService {
    /// Creates a service on the system clock and the market timezone
    pub fn new(
        estimator: PremiumEstimator,
        sessions: Arc<dyn SessionStorePort>,
        quotes: Arc<dyn QuoteStorePort>,
        loyalty: Arc<dyn LoyaltyPort>,
    ) -> Self {
        Self {
            estimator,
            sessions,
            quotes,
            loyalty,
            timezone: Timezone::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn estimator(&self) -> &PremiumEstimator {
        &self.estimator
    }

    /// Loads the user's session, or starts a blank one
    ///
    /// A stored record from another form version, or one that cannot be
    /// decoded, is discarded.
    pub async fn open_session(&self, user: &UserId) -> FormSession {
        let now = self.clock.now();

        let record = match self.sessions.load(user).await {
            Ok(record) => record,
            Err(PortError::Serialization { message }) => {
                warn!(user_id = %user, %message, "Discarding undecodable form session");
                self.discard(user).await;
                None
            }
            Err(e) => {
                warn!(user_id = %user, error = %e, "Failed to load form session, starting fresh");
                None
            }
        };

        let Some(record) = record else {
            return FormSession::new(now);
        };

        match FormSession::restore(record, now) {
            Ok(session) => session,
            Err(e) => {
                warn!(user_id = %user, error = %e, "Discarding stored form session");
                self.discard(user).await;
                FormSession::new(now)
            }
        }
    }

    /// Merges field values into the session
    pub async fn update_fields(&self, user: &UserId, fields: &FormData) -> FormSession {
        let mut session = self.open_session(user).await;
        session.update(fields, self.clock.now());
        self.persist(user, &session).await;
        session
    }

    /// Advances one step if the current step validates
    pub async fn next_step(&self, user: &UserId) -> Result<FormSession, QuoteError> {
        let mut session = self.open_session(user).await;
        let now = self.clock.now();
        session.next_step(&self.validator(), now)?;
        self.persist(user, &session).await;
        Ok(session)
    }

    pub async fn previous_step(&self, user: &UserId) -> FormSession {
        let mut session = self.open_session(user).await;
        session.previous_step(self.clock.now());
        self.persist(user, &session).await;
        session
    }

    /// Jumps back to an earlier step (summary panel)
    pub async fn jump_to(&self, user: &UserId, step: u8) -> Result<FormSession, QuoteError> {
        let mut session = self.open_session(user).await;
        session.jump_to(step, self.clock.now())?;
        self.persist(user, &session).await;
        Ok(session)
    }

    /// Starts a new quote: clears the form and the stored record
    pub async fn reset(&self, user: &UserId) -> FormSession {
        let mut session = self.open_session(user).await;
        session.reset(self.clock.now());
        self.discard(user).await;
        info!(user_id = %user, "Form session reset");
        session
    }

    /// Validates a single raw field value
    pub fn validate_field(&self, field: FormField, value: &str) -> FieldValidation {
        self.validator().validate_field(field, value)
    }

    /// Estimates the current form without recording a quote
    pub async fn preview(&self, user: &UserId) -> PremiumBreakdown {
        let session = self.open_session(user).await;
        let context = self.context(self.last_quote_time(user).await);
        self.estimator.estimate(session.data(), &context)
    }

    /// Computes a quote for the current form and records the quote time
    pub async fn estimate(&self, user: &UserId) -> Quote {
        let session = self.open_session(user).await;
        let context = self.context(self.last_quote_time(user).await);
        let breakdown = self.estimator.estimate(session.data(), &context);
        debug!(
            user_id = %user,
            total = %breakdown.total,
            loyalty = %breakdown.loyalty_discount,
            "Premium estimated"
        );

        if let Err(e) = self.loyalty.record_quote_time(user, context.as_of).await {
            warn!(user_id = %user, error = %e, "Failed to record last quote time");
        }

        Quote::new(session.snapshot(), breakdown, context.as_of)
    }

    /// Summary panel items for the current session
    pub async fn summary(&self, user: &UserId) -> Vec<SummaryItem> {
        let session = self.open_session(user).await;
        let breakdown = if session.data().is_empty() {
            None
        } else {
            let context = self.context(self.last_quote_time(user).await);
            Some(self.estimator.estimate(session.data(), &context))
        };
        summary_items(session.data(), breakdown.as_ref(), session.step())
    }

    /// Computes a quote and appends it to the user's saved quotes
    pub async fn save_quote(&self, user: &UserId, status: QuoteStatus) -> Result<SavedQuote, QuoteError> {
        let quote = self.estimate(user).await;
        let saved = SavedQuote::from_quote(user.clone(), &quote, status);
        self.quotes.save(saved.clone()).await?;
        info!(user_id = %user, quote_id = %saved.id, premium = saved.quote, "Quote saved");
        Ok(saved)
    }

    /// The user's saved quotes, most recent first
    pub async fn saved_quotes(&self, user: &UserId) -> Result<Vec<SavedQuote>, QuoteError> {
        Ok(self.quotes.list_by_user(user).await?)
    }

    /// Restores a saved quote's form data into the session at the first step
    pub async fn load_saved_quote(&self, user: &UserId, quote_id: QuoteId) -> Result<FormSession, QuoteError> {
        let saved = self.quotes.get(user, quote_id).await.map_err(|e| {
            if e.is_not_found() {
                QuoteError::QuoteNotFound(quote_id.to_string())
            } else {
                QuoteError::Port(e)
            }
        })?;

        let session = FormSession::with_data(saved.form_data, self.clock.now());
        self.persist(user, &session).await;
        info!(user_id = %user, %quote_id, "Saved quote loaded into form");
        Ok(session)
    }

    fn validator(&self) -> FormValidator {
        FormValidator::for_context(&self.context(None))
    }

    fn context(&self, last_quote_at: Option<chrono::DateTime<chrono::Utc>>) -> EstimationContext {
        EstimationContext::at(self.clock.now())
            .with_timezone(self.timezone)
            .with_last_quote_at(last_quote_at)
    }

    async fn last_quote_time(&self, user: &UserId) -> Option<chrono::DateTime<chrono::Utc>> {
        match self.loyalty.last_quote_time(user).await {
            Ok(time) => time,
            Err(e) => {
                warn!(user_id = %user, error = %e, "Failed to read last quote time");
                None
            }
        }
    }

    async fn persist(&self, user: &UserId, session: &FormSession) {
        if let Err(e) = self.sessions.save(user, &session.to_record()).await {
            warn!(user_id = %user, error = %e, "Failed to persist form session");
        }
    }

    async fn discard(&self, user: &UserId) {
        if let Err(e) = self.sessions.clear(user).await {
            warn!(user_id = %user, error = %e, "Failed to clear form session");
        }
    }
}
