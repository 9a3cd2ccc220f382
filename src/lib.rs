// Client-side controller for a hotel reservation front-end: the booking
// workflow state machine, pure view renderers and a typed client for the
// reservation HTTP API.

pub mod admin;
pub mod api;
pub mod dates;
pub mod model;
pub mod views;
pub mod workflow;

// Re-export key types for convenience
pub use admin::{AdminPanel, PendingAction};
pub use api::{ApiError, BookingApi, ClientConfig, HttpBookingApi, GENERIC_FAILURE_MESSAGE};
pub use dates::{default_search_range, format_local_date, nights_between, DateRangeError};
pub use model::{
    AvailabilityResult, Booking, BookingRequest, BookingStatus, BookingWithRoom, CriteriaError,
    DayPrice, GuestInfo, HotelStats, NewRoom, NewSpecialDate, NotificationChannel,
    NotificationRequest, PriceQuote, RoomStatus, RoomSummary, RoomType, SearchCriteria,
    SpecialDate,
};
pub use workflow::{
    BookingWorkflow, ModalState, QuoteRequest, Toast, ToastKind, WorkflowError, WorkflowState,
};
