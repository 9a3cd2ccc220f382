// Booking workflow state machine: search, booking modal, price quote,
// submission, optimistic refresh. Owns all transient user-visible state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::BookingApi;
use crate::dates::DateRangeError;
use crate::model::{
    AvailabilityResult, BookingRequest, GuestInfo, PriceQuote, RoomSummary, SearchCriteria,
};
use crate::views;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);
pub const BOOKING_CREATED_MESSAGE: &str = "Booking created successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Searching,
    ResultsShown,
    ModalOpen,
    QuoteLoading,
    QuoteShown,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

// Transient notification, auto-dismissed after a fixed interval.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    shown_at: Instant,
}

impl Toast {
    pub(crate) fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    pub(crate) fn visible_within(&self, duration: Duration) -> bool {
        self.shown_at.elapsed() < duration
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("no search has been submitted yet")]
    NoSearchCriteria,
    #[error("no booking modal is open")]
    NoActiveModal,
    #[error(transparent)]
    InvalidDateRange(#[from] DateRangeError),
}

// Modal-scoped state, discarded wholesale on close.
#[derive(Debug, Clone)]
pub struct ModalState {
    pub room: RoomSummary,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub quote: Option<PriceQuote>,
    pub guest: GuestInfo,
}

// Token for an issued quote fetch. The sequence number makes a superseded
// response detectable: only the latest issued request may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteRequest {
    seq: u64,
    room_id: i64,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
}

pub struct BookingWorkflow {
    api: Arc<dyn BookingApi>,
    state: WorkflowState,
    criteria: Option<SearchCriteria>,
    results: Vec<AvailabilityResult>,
    modal: Option<ModalState>,
    toast: Option<Toast>,
    toast_duration: Duration,
    quote_seq: u64,
}

impl BookingWorkflow {
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        Self {
            api,
            state: WorkflowState::Idle,
            criteria: None,
            results: Vec::new(),
            modal: None,
            toast: None,
            toast_duration: DEFAULT_TOAST_DURATION,
            quote_seq: 0,
        }
    }

    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = duration;
        self
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn criteria(&self) -> Option<&SearchCriteria> {
        self.criteria.as_ref()
    }

    pub fn results(&self) -> &[AvailabilityResult] {
        &self.results
    }

    pub fn modal(&self) -> Option<&ModalState> {
        self.modal.as_ref()
    }

    pub fn current_toast(&self) -> Option<&Toast> {
        self.toast
            .as_ref()
            .filter(|toast| toast.visible_within(self.toast_duration))
    }

    pub fn catalog_view(&self) -> String {
        views::render_room_catalog(&self.results)
    }

    pub fn modal_view(&self) -> Option<String> {
        self.modal.as_ref().map(|modal| {
            views::render_booking_modal(
                &modal.room,
                modal.check_in,
                modal.check_out,
                modal.nights,
                modal.quote.as_ref(),
            )
        })
    }

    // Stores the criteria wholesale and issues the availability query.
    // A failed search keeps the previous results on screen.
    pub async fn search(&mut self, criteria: SearchCriteria) {
        debug!(check_in = %criteria.check_in, check_out = %criteria.check_out, "searching rooms");
        self.state = WorkflowState::Searching;
        self.criteria = Some(criteria.clone());

        let api = Arc::clone(&self.api);
        match api.search_rooms(&criteria).await {
            Ok(results) => {
                self.results = results;
            }
            Err(err) => {
                warn!(error = %err, "room search failed");
                self.show_toast(err.user_message(), ToastKind::Error);
            }
        }
        self.state = WorkflowState::ResultsShown;
    }

    // Opens the booking modal for a room from the current results. Static
    // fields (room metadata, stay dates, night count) are populated
    // synchronously from the stored criteria before any fetch happens.
    pub fn open_modal(&mut self, room: RoomSummary) -> Result<QuoteRequest, WorkflowError> {
        let criteria = self.criteria.as_ref().ok_or(WorkflowError::NoSearchCriteria)?;
        let nights = criteria.nights()?;
        let (check_in, check_out) = (criteria.check_in, criteria.check_out);
        let (check_in_instant, check_out_instant) =
            (criteria.check_in_instant(), criteria.check_out_instant());

        let room_id = room.id;
        self.modal = Some(ModalState {
            room,
            check_in,
            check_out,
            nights,
            quote: None,
            guest: GuestInfo::default(),
        });

        self.quote_seq += 1;
        self.state = WorkflowState::QuoteLoading;
        Ok(QuoteRequest {
            seq: self.quote_seq,
            room_id,
            check_in: check_in_instant,
            check_out: check_out_instant,
        })
    }

    // Performs the quote fetch for an issued request. A response whose
    // sequence number is no longer current is dropped: the modal was
    // closed or reopened for another room in the meantime. Failures are
    // logged only; the modal stays open with no price shown.
    pub async fn fetch_quote(&mut self, request: QuoteRequest) {
        let api = Arc::clone(&self.api);
        match api
            .quote_price(request.room_id, request.check_in, request.check_out)
            .await
        {
            Ok(quote) => {
                if request.seq != self.quote_seq {
                    debug!(room_id = request.room_id, "dropping superseded price quote");
                    return;
                }
                if let Some(modal) = self.modal.as_mut() {
                    modal.quote = Some(quote);
                    self.state = WorkflowState::QuoteShown;
                }
            }
            Err(err) => {
                warn!(room_id = request.room_id, error = %err, "price quote failed");
                if request.seq == self.quote_seq && self.modal.is_some() {
                    self.state = WorkflowState::ModalOpen;
                }
            }
        }
    }

    pub async fn open_booking_modal(&mut self, room: RoomSummary) -> Result<(), WorkflowError> {
        let request = self.open_modal(room)?;
        self.fetch_quote(request).await;
        Ok(())
    }

    pub fn update_guest_info(&mut self, guest: GuestInfo) -> Result<(), WorkflowError> {
        let modal = self.modal.as_mut().ok_or(WorkflowError::NoActiveModal)?;
        modal.guest = guest;
        Ok(())
    }

    // Submits the booking for the room bound to the modal, with the stay
    // dates taken from the stored criteria. On success the modal closes
    // and the same search re-runs so the catalog reflects the reduced
    // availability; on failure the modal and its fields are kept intact.
    pub async fn confirm(&mut self) -> Result<(), WorkflowError> {
        let (request, criteria, resume_state) = {
            let modal = self.modal.as_ref().ok_or(WorkflowError::NoActiveModal)?;
            let criteria = self.criteria.as_ref().ok_or(WorkflowError::NoSearchCriteria)?;
            let resume_state = if modal.quote.is_some() {
                WorkflowState::QuoteShown
            } else {
                WorkflowState::ModalOpen
            };
            let request = BookingRequest {
                room_id: modal.room.id,
                start_date: criteria.check_in_instant(),
                end_date: criteria.check_out_instant(),
                guest_info: modal.guest.clone(),
            };
            (request, criteria.clone(), resume_state)
        };

        self.state = WorkflowState::Submitting;
        let api = Arc::clone(&self.api);
        match api.create_booking(&request).await {
            Ok(created) => {
                debug!(booking_id = created.booking.id, "booking created");
                self.modal = None;
                self.quote_seq += 1;
                self.show_toast(BOOKING_CREATED_MESSAGE, ToastKind::Success);
                self.search(criteria).await;
            }
            Err(err) => {
                warn!(error = %err, "booking submission failed");
                self.show_toast(err.user_message(), ToastKind::Error);
                self.state = resume_state;
            }
        }
        Ok(())
    }

    // Discards all modal-scoped state; a reopen always re-fetches the
    // quote. Also invalidates any quote fetch still in flight.
    pub fn close_modal(&mut self) {
        self.modal = None;
        self.quote_seq += 1;
        self.state = if self.criteria.is_some() {
            WorkflowState::ResultsShown
        } else {
            WorkflowState::Idle
        };
    }

    fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast = Some(Toast::new(message, kind));
    }
}
