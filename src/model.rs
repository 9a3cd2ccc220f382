// Data model for the reservation API wire format

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates::{self, DateRangeError};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
    Family,
}

impl RoomType {
    pub fn display_name(&self) -> &'static str {
        match self {
            RoomType::Standard => "Standard",
            RoomType::Deluxe => "Deluxe",
            RoomType::Suite => "Suite",
            RoomType::Family => "Family",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            RoomStatus::Available => "Available",
            RoomStatus::Occupied => "Occupied",
            RoomStatus::Maintenance => "Maintenance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: i64,
    pub room_number: String,
    pub room_type: RoomType,
    pub base_price: f64,
    pub capacity: u32,
    pub status: RoomStatus,
    #[serde(default)]
    pub description: Option<String>,
}

// One search hit: the room plus the price for the whole requested stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub room: RoomSummary,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base_price: f64,
    pub total_price: f64,
    #[serde(default)]
    pub nights: u32,
    pub daily_breakdown: Vec<DayPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPrice {
    pub date: NaiveDate,
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub coefficient: f64,
    pub reason: String,
    pub day_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub room_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub guest_info: GuestInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub room_id: i64,
    pub guest_info: GuestInfo,
    #[serde(default)]
    pub price: f64,
    pub status: BookingStatus,
}

// Admin listing embeds the room next to the flattened booking fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingWithRoom {
    #[serde(flatten)]
    pub booking: Booking,
    pub room: RoomSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialDate {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub name: String,
    pub coefficient: f64,
}

// Creation payloads; the server assigns ids and defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSpecialDate {
    pub date: NaiveDate,
    pub name: String,
    pub coefficient: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoom {
    pub room_number: String,
    pub room_type: RoomType,
    pub base_price: f64,
    pub capacity: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotelStats {
    pub total_rooms: u32,
    pub available_rooms: u32,
    pub occupied_rooms: u32,
    #[serde(default)]
    pub total_bookings: u32,
    #[serde(default)]
    pub pending_bookings: u32,
    #[serde(default)]
    pub confirmed_bookings: u32,
    #[serde(default)]
    pub cancelled_bookings: u32,
    #[serde(default)]
    pub rooms_by_type: BTreeMap<RoomType, u32>,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Sms,
    Viber,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub channel: NotificationChannel,
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("missing form field: {0}")]
    MissingField(&'static str),
    #[error("invalid date in field {0} (use YYYY-MM-DD)")]
    InvalidDate(&'static str),
}

// Current search state: the stay dates plus whatever extra filter fields
// the form submitted, values kept as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub filters: BTreeMap<String, String>,
}

impl SearchCriteria {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in,
            check_out,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    // Normalizes raw form fields. The stay dates are required and parsed;
    // every other field is carried through untouched.
    pub fn from_form<I, K, V>(fields: I) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut check_in = None;
        let mut check_out = None;
        let mut filters = BTreeMap::new();

        for (key, value) in fields {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                "check_in" => check_in = Some(parse_form_date("check_in", &value)?),
                "check_out" => check_out = Some(parse_form_date("check_out", &value)?),
                _ => {
                    filters.insert(key, value);
                }
            }
        }

        Ok(Self {
            check_in: check_in.ok_or(CriteriaError::MissingField("check_in"))?,
            check_out: check_out.ok_or(CriteriaError::MissingField("check_out"))?,
            filters,
        })
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("check_in".to_string(), self.check_in.format(DATE_FORMAT).to_string()),
            ("check_out".to_string(), self.check_out.format(DATE_FORMAT).to_string()),
        ];
        for (key, value) in &self.filters {
            query.push((key.clone(), value.clone()));
        }
        query
    }

    // Stay boundaries as UTC instants, as submitted in booking requests.
    pub fn check_in_instant(&self) -> DateTime<Utc> {
        self.check_in.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn check_out_instant(&self) -> DateTime<Utc> {
        self.check_out.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn nights(&self) -> Result<u32, DateRangeError> {
        dates::nights_between(self.check_in_instant(), self.check_out_instant())
    }
}

fn parse_form_date(field: &'static str, value: &str) -> Result<NaiveDate, CriteriaError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| CriteriaError::InvalidDate(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn availability_result_parses_server_payload() {
        let payload = r#"{
            "room": {
                "id": 3,
                "room_number": "301",
                "room_type": "deluxe",
                "base_price": 4500.0,
                "capacity": 2,
                "status": "available",
                "description": "Corner room with a balcony",
                "created_at": "2024-01-10T08:00:00Z",
                "updated_at": "2024-01-10T08:00:00Z"
            },
            "is_available": true,
            "total_price": 9000.0
        }"#;

        let result: AvailabilityResult = serde_json::from_str(payload).unwrap();
        assert_eq!(result.room.id, 3);
        assert_eq!(result.room.room_type, RoomType::Deluxe);
        assert_eq!(result.room.status, RoomStatus::Available);
        assert!(result.is_available);
        assert_eq!(result.total_price, 9000.0);
    }

    #[test]
    fn price_quote_parses_server_payload() {
        let payload = r#"{
            "base_price": 3500.0,
            "total_price": 10500.0,
            "nights": 2,
            "daily_breakdown": [
                {"date": "2024-06-01", "base_price": 3500.0, "coefficient": 1.0,
                 "reason": "regular", "day_price": 3500.0},
                {"date": "2024-06-02", "base_price": 3500.0, "coefficient": 2.0,
                 "reason": "City Day", "day_price": 7000.0}
            ]
        }"#;

        let quote: PriceQuote = serde_json::from_str(payload).unwrap();
        assert_eq!(quote.daily_breakdown.len(), 2);
        assert_eq!(quote.daily_breakdown[0].date, date(2024, 6, 1));
        assert_eq!(quote.daily_breakdown[1].reason, "City Day");
        assert_eq!(quote.total_price, 10500.0);
    }

    #[test]
    fn booking_with_room_parses_flattened_payload() {
        let payload = r#"{
            "id": 12,
            "start_date": "2024-06-01T00:00:00Z",
            "end_date": "2024-06-03T00:00:00Z",
            "room_id": 3,
            "guest_info": {"name": "Anna", "email": "anna@example.com", "phone": "+100"},
            "price": 9000.0,
            "status": "pending",
            "room": {
                "id": 3,
                "room_number": "301",
                "room_type": "suite",
                "base_price": 4500.0,
                "capacity": 2,
                "status": "occupied"
            }
        }"#;

        let listed: BookingWithRoom = serde_json::from_str(payload).unwrap();
        assert_eq!(listed.booking.id, 12);
        assert_eq!(listed.booking.status, BookingStatus::Pending);
        assert_eq!(listed.room.room_number, "301");
    }

    #[test]
    fn criteria_normalizes_form_fields() {
        let criteria = SearchCriteria::from_form([
            ("check_in", "2024-06-01"),
            ("check_out", "2024-06-03"),
            ("room_type", "deluxe"),
            ("capacity", "2"),
        ])
        .unwrap();

        assert_eq!(criteria.check_in, date(2024, 6, 1));
        assert_eq!(criteria.check_out, date(2024, 6, 3));
        assert_eq!(criteria.filters.get("room_type").map(String::as_str), Some("deluxe"));
        assert_eq!(criteria.nights(), Ok(2));
    }

    #[test]
    fn criteria_requires_both_dates() {
        let err = SearchCriteria::from_form([("check_in", "2024-06-01")]).unwrap_err();
        assert_eq!(err, CriteriaError::MissingField("check_out"));

        let err =
            SearchCriteria::from_form([("check_in", "June 1st"), ("check_out", "2024-06-03")])
                .unwrap_err();
        assert_eq!(err, CriteriaError::InvalidDate("check_in"));
    }

    #[test]
    fn criteria_query_keeps_dates_first_and_filters_as_submitted() {
        let criteria = SearchCriteria::new(date(2024, 6, 1), date(2024, 6, 3))
            .with_filter("capacity", "4")
            .with_filter("room_type", "family");

        let query = criteria.to_query();
        assert_eq!(query[0], ("check_in".to_string(), "2024-06-01".to_string()));
        assert_eq!(query[1], ("check_out".to_string(), "2024-06-03".to_string()));
        assert!(query.contains(&("room_type".to_string(), "family".to_string())));
        assert!(query.contains(&("capacity".to_string(), "4".to_string())));
    }

    #[test]
    fn stats_parse_with_rooms_by_type_map() {
        let payload = r#"{
            "total_rooms": 10,
            "available_rooms": 6,
            "occupied_rooms": 4,
            "total_bookings": 25,
            "pending_bookings": 3,
            "confirmed_bookings": 20,
            "cancelled_bookings": 2,
            "rooms_by_type": {"standard": 5, "deluxe": 3, "suite": 2},
            "total_revenue": 125000.5
        }"#;

        let stats: HotelStats = serde_json::from_str(payload).unwrap();
        assert_eq!(stats.total_rooms, 10);
        assert_eq!(stats.rooms_by_type.get(&RoomType::Standard), Some(&5));
        assert_eq!(stats.total_revenue, 125000.5);
    }
}
