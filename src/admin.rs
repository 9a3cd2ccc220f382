// Administrative panel: independent refresh-and-mutate cycles for stats,
// rooms, bookings and special dates, plus notification dispatch. Peer
// consumer of the same API collaborator as the booking workflow.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api::BookingApi;
use crate::model::{
    BookingStatus, BookingWithRoom, HotelStats, NewRoom, NewSpecialDate, NotificationRequest,
    RoomSummary, SpecialDate,
};
use crate::views;
use crate::workflow::{Toast, ToastKind, DEFAULT_TOAST_DURATION};

pub const STATS_NOT_LOADED_PLACEHOLDER: &str = "Statistics not loaded.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminAction {
    DeleteRoom(i64),
    DeleteSpecialDate(i64),
    ConfirmBooking(i64),
    CancelBooking(i64),
}

// A destructive call held back until the caller collects confirmation.
// The presentation layer decides how to ask; only execute() performs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAction {
    pub prompt: &'static str,
    action: AdminAction,
}

pub struct AdminPanel {
    api: Arc<dyn BookingApi>,
    stats: Option<HotelStats>,
    rooms: Vec<RoomSummary>,
    bookings: Vec<BookingWithRoom>,
    special_dates: Vec<SpecialDate>,
    status_filter: Option<BookingStatus>,
    toast: Option<Toast>,
    toast_duration: Duration,
}

impl AdminPanel {
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        Self {
            api,
            stats: None,
            rooms: Vec::new(),
            bookings: Vec::new(),
            special_dates: Vec::new(),
            status_filter: None,
            toast: None,
            toast_duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = duration;
        self
    }

    pub fn stats(&self) -> Option<&HotelStats> {
        self.stats.as_ref()
    }

    pub fn rooms(&self) -> &[RoomSummary] {
        &self.rooms
    }

    pub fn bookings(&self) -> &[BookingWithRoom] {
        &self.bookings
    }

    pub fn special_dates(&self) -> &[SpecialDate] {
        &self.special_dates
    }

    pub fn status_filter(&self) -> Option<BookingStatus> {
        self.status_filter
    }

    pub fn current_toast(&self) -> Option<&Toast> {
        self.toast
            .as_ref()
            .filter(|toast| toast.visible_within(self.toast_duration))
    }

    pub fn stats_view(&self) -> String {
        match &self.stats {
            Some(stats) => views::render_hotel_stats(stats),
            None => format!("{STATS_NOT_LOADED_PLACEHOLDER}\n"),
        }
    }

    pub fn rooms_view(&self) -> String {
        views::render_rooms_table(&self.rooms)
    }

    pub fn bookings_view(&self) -> String {
        views::render_bookings_table(&self.bookings)
    }

    pub fn special_dates_view(&self) -> String {
        views::render_special_dates_table(&self.special_dates)
    }

    // Loads the four tables together. A failed load keeps the previous
    // table contents; only the log records it.
    pub async fn refresh_all(&mut self) {
        let api = Arc::clone(&self.api);
        let (stats, rooms, bookings, dates) = futures::join!(
            api.hotel_stats(),
            api.list_rooms(),
            api.list_bookings(self.status_filter),
            api.list_special_dates(),
        );

        match stats {
            Ok(stats) => self.stats = Some(stats),
            Err(err) => warn!(error = %err, "failed to load hotel stats"),
        }
        match rooms {
            Ok(rooms) => self.rooms = rooms,
            Err(err) => warn!(error = %err, "failed to load rooms"),
        }
        match bookings {
            Ok(bookings) => self.bookings = bookings,
            Err(err) => warn!(error = %err, "failed to load bookings"),
        }
        match dates {
            Ok(dates) => self.special_dates = dates,
            Err(err) => warn!(error = %err, "failed to load special dates"),
        }
    }

    pub async fn refresh_rooms(&mut self) {
        let api = Arc::clone(&self.api);
        match api.list_rooms().await {
            Ok(rooms) => self.rooms = rooms,
            Err(err) => warn!(error = %err, "failed to load rooms"),
        }
    }

    pub async fn refresh_bookings(&mut self) {
        let api = Arc::clone(&self.api);
        match api.list_bookings(self.status_filter).await {
            Ok(bookings) => self.bookings = bookings,
            Err(err) => warn!(error = %err, "failed to load bookings"),
        }
    }

    pub async fn refresh_special_dates(&mut self) {
        let api = Arc::clone(&self.api);
        match api.list_special_dates().await {
            Ok(dates) => self.special_dates = dates,
            Err(err) => warn!(error = %err, "failed to load special dates"),
        }
    }

    pub async fn set_status_filter(&mut self, status: Option<BookingStatus>) {
        self.status_filter = status;
        self.refresh_bookings().await;
    }

    pub fn delete_room(&self, id: i64) -> PendingAction {
        PendingAction {
            prompt: "Delete this room? All related bookings will be removed.",
            action: AdminAction::DeleteRoom(id),
        }
    }

    pub fn delete_special_date(&self, id: i64) -> PendingAction {
        PendingAction {
            prompt: "Delete this date?",
            action: AdminAction::DeleteSpecialDate(id),
        }
    }

    pub fn confirm_booking(&self, id: i64) -> PendingAction {
        PendingAction {
            prompt: "Confirm this booking?",
            action: AdminAction::ConfirmBooking(id),
        }
    }

    pub fn cancel_booking(&self, id: i64) -> PendingAction {
        PendingAction {
            prompt: "Cancel this booking?",
            action: AdminAction::CancelBooking(id),
        }
    }

    // Performs a confirmed destructive action, then refreshes the table
    // that owns it.
    pub async fn execute(&mut self, pending: PendingAction) {
        let api = Arc::clone(&self.api);
        let result = match pending.action {
            AdminAction::DeleteRoom(id) => api.delete_room(id).await,
            AdminAction::DeleteSpecialDate(id) => api.delete_special_date(id).await,
            AdminAction::ConfirmBooking(id) => api.confirm_booking(id).await,
            AdminAction::CancelBooking(id) => api.cancel_booking(id).await,
        };

        if let Err(err) = result {
            warn!(error = %err, "admin action failed");
            self.show_toast(err.user_message(), ToastKind::Error);
            return;
        }

        debug!(action = ?pending.action, "admin action applied");
        match pending.action {
            AdminAction::DeleteRoom(_) => {
                self.show_toast("Room deleted", ToastKind::Success);
                self.refresh_rooms().await;
            }
            AdminAction::DeleteSpecialDate(_) => {
                self.refresh_special_dates().await;
            }
            AdminAction::ConfirmBooking(_) => {
                self.show_toast("Booking confirmed", ToastKind::Success);
                self.refresh_bookings().await;
            }
            AdminAction::CancelBooking(_) => {
                self.show_toast("Booking cancelled", ToastKind::Success);
                self.refresh_bookings().await;
            }
        }
    }

    pub async fn add_room(&mut self, room: NewRoom) {
        let api = Arc::clone(&self.api);
        match api.create_room(&room).await {
            Ok(_) => {
                self.show_toast("Room created", ToastKind::Success);
                self.refresh_rooms().await;
            }
            Err(err) => self.show_toast(err.user_message(), ToastKind::Error),
        }
    }

    pub async fn add_special_date(&mut self, date: NewSpecialDate) {
        let api = Arc::clone(&self.api);
        match api.create_special_date(&date).await {
            Ok(_) => {
                self.show_toast("Date added", ToastKind::Success);
                self.refresh_special_dates().await;
            }
            Err(err) => self.show_toast(err.user_message(), ToastKind::Error),
        }
    }

    pub async fn send_notification(&mut self, request: NotificationRequest) {
        let api = Arc::clone(&self.api);
        match api.send_notification(&request).await {
            Ok(()) => self.show_toast("Notification sent", ToastKind::Success),
            Err(err) => self.show_toast(err.user_message(), ToastKind::Error),
        }
    }

    fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast = Some(Toast::new(message, kind));
    }
}
