// Reservation API collaborator: error taxonomy, client trait and the
// HTTP implementation

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    AvailabilityResult, BookingRequest, BookingStatus, BookingWithRoom, HotelStats, NewRoom,
    NewSpecialDate, NotificationRequest, PriceQuote, RoomSummary, SearchCriteria, SpecialDate,
};

// Shown when a failure carries no server-provided message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed. Please try again.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        ApiError::Status {
            status,
            message: message.into(),
        }
    }

    // Message suitable for a user-facing notification: the server-provided
    // one when present, otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    // Unset by default: a hung call is left to the user to retry.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }
}

// Every endpoint the front-end consumes, behind one seam so the workflow
// and the admin panel can be driven against a test double.
#[async_trait]
pub trait BookingApi: Send + Sync + 'static {
    async fn search_rooms(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<AvailabilityResult>, ApiError>;

    async fn quote_price(
        &self,
        room_id: i64,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<PriceQuote, ApiError>;

    async fn create_booking(&self, request: &BookingRequest)
        -> Result<BookingWithRoom, ApiError>;

    async fn confirm_booking(&self, id: i64) -> Result<(), ApiError>;
    async fn cancel_booking(&self, id: i64) -> Result<(), ApiError>;

    async fn hotel_stats(&self) -> Result<HotelStats, ApiError>;

    async fn list_rooms(&self) -> Result<Vec<RoomSummary>, ApiError>;
    async fn create_room(&self, room: &NewRoom) -> Result<RoomSummary, ApiError>;
    async fn delete_room(&self, id: i64) -> Result<(), ApiError>;

    async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<BookingWithRoom>, ApiError>;

    async fn list_special_dates(&self) -> Result<Vec<SpecialDate>, ApiError>;
    async fn create_special_date(&self, date: &NewSpecialDate) -> Result<SpecialDate, ApiError>;
    async fn delete_special_date(&self, id: i64) -> Result<(), ApiError>;

    async fn send_notification(&self, request: &NotificationRequest) -> Result<(), ApiError>;
}

#[derive(Serialize)]
struct PriceRequest {
    room_id: i64,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

pub(crate) fn error_message_from_body(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_default()
}

pub struct HttpBookingApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBookingApi {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message_from_body(&body),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    // The Go backend serializes empty lists as `null`.
    async fn decode_list<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, ApiError> {
        let items: Option<Vec<T>> = self.decode(request).await?;
        Ok(items.unwrap_or_default())
    }

    async fn expect_success(&self, request: reqwest::RequestBuilder) -> Result<(), ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message_from_body(&body),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn search_rooms(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<AvailabilityResult>, ApiError> {
        let request = self
            .client
            .get(self.url("/booking/rooms/search"))
            .query(&criteria.to_query());
        self.decode_list(request).await
    }

    async fn quote_price(
        &self,
        room_id: i64,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<PriceQuote, ApiError> {
        let body = PriceRequest {
            room_id,
            check_in,
            check_out,
        };
        self.decode(self.client.post(self.url("/booking/price")).json(&body))
            .await
    }

    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingWithRoom, ApiError> {
        self.decode(self.client.post(self.url("/booking/")).json(request))
            .await
    }

    async fn confirm_booking(&self, id: i64) -> Result<(), ApiError> {
        self.expect_success(self.client.put(self.url(&format!("/booking/{id}/confirm"))))
            .await
    }

    async fn cancel_booking(&self, id: i64) -> Result<(), ApiError> {
        self.expect_success(self.client.put(self.url(&format!("/booking/{id}/cancel"))))
            .await
    }

    async fn hotel_stats(&self) -> Result<HotelStats, ApiError> {
        self.decode(self.client.get(self.url("/admin/stats"))).await
    }

    async fn list_rooms(&self) -> Result<Vec<RoomSummary>, ApiError> {
        self.decode_list(self.client.get(self.url("/admin/rooms")))
            .await
    }

    async fn create_room(&self, room: &NewRoom) -> Result<RoomSummary, ApiError> {
        self.decode(self.client.post(self.url("/admin/rooms")).json(room))
            .await
    }

    async fn delete_room(&self, id: i64) -> Result<(), ApiError> {
        self.expect_success(self.client.delete(self.url(&format!("/admin/rooms/{id}"))))
            .await
    }

    async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<BookingWithRoom>, ApiError> {
        let mut request = self.client.get(self.url("/admin/bookings"));
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        self.decode_list(request).await
    }

    async fn list_special_dates(&self) -> Result<Vec<SpecialDate>, ApiError> {
        self.decode_list(self.client.get(self.url("/admin/dates")))
            .await
    }

    async fn create_special_date(&self, date: &NewSpecialDate) -> Result<SpecialDate, ApiError> {
        self.decode(self.client.post(self.url("/admin/dates")).json(date))
            .await
    }

    async fn delete_special_date(&self, id: i64) -> Result<(), ApiError> {
        self.expect_success(self.client.delete(self.url(&format!("/admin/dates/{id}"))))
            .await
    }

    async fn send_notification(&self, request: &NotificationRequest) -> Result<(), ApiError> {
        self.expect_success(self.client.post(self.url("/notification/send")).json(request))
            .await
    }
}
