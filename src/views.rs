// Pure text renderers: data in, rendered lines out. No arithmetic is ever
// performed here; every number shown comes from a server-provided field.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::dates::format_local_date;
use crate::model::{
    AvailabilityResult, BookingStatus, BookingWithRoom, HotelStats, PriceQuote, RoomSummary,
    SpecialDate,
};

pub const NO_ROOMS_PLACEHOLDER: &str = "No rooms available for the selected dates.";
pub const NO_DESCRIPTION_PLACEHOLDER: &str = "No description provided.";
pub const QUOTE_PENDING_PLACEHOLDER: &str = "Calculating price...";

// Grouped thousands with a space, two decimals only when fractional.
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    if fraction > 0 {
        format!("{sign}{grouped}.{fraction:02}")
    } else {
        format!("{sign}{grouped}")
    }
}

// Search-result grid. Each card carries exactly one affordance, the [Book]
// marker; the caller holds the full RoomSummary for the entry it rendered.
pub fn render_room_catalog(results: &[AvailabilityResult]) -> String {
    if results.is_empty() {
        return format!("{NO_ROOMS_PLACEHOLDER}\n");
    }

    let mut out = String::new();
    for result in results {
        let room = &result.room;
        let description = room
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(NO_DESCRIPTION_PLACEHOLDER);
        let _ = writeln!(out, "{} - room {}", room.room_type.display_name(), room.room_number);
        let _ = writeln!(out, "  {description}");
        let _ = writeln!(out, "  Sleeps {}", room.capacity);
        let _ = writeln!(
            out,
            "  {} RUB for the stay    [Book]",
            format_price(result.total_price)
        );
    }
    out
}

// One line per night, then the flat base rate, then the server-computed
// total verbatim from the quote.
pub fn render_price_breakdown(quote: &PriceQuote) -> String {
    let mut out = String::new();
    for day in &quote.daily_breakdown {
        let _ = writeln!(
            out,
            "{} ({})  {} RUB",
            format_local_date(day.date),
            day.reason,
            format_price(day.day_price)
        );
    }
    let _ = writeln!(out, "Base price: {} RUB/night", format_price(quote.base_price));
    let _ = writeln!(out, "Total: {} RUB", format_price(quote.total_price));
    out
}

pub fn render_booking_modal(
    room: &RoomSummary,
    check_in: NaiveDate,
    check_out: NaiveDate,
    nights: u32,
    quote: Option<&PriceQuote>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Room {} - {}", room.room_number, room.room_type.display_name());
    let _ = writeln!(out, "Base price: {} RUB/night", format_price(room.base_price));
    let _ = writeln!(
        out,
        "Stay: {} - {}, {} night(s)",
        format_local_date(check_in),
        format_local_date(check_out),
        nights
    );
    match quote {
        Some(quote) => out.push_str(&render_price_breakdown(quote)),
        None => {
            let _ = writeln!(out, "{QUOTE_PENDING_PLACEHOLDER}");
        }
    }
    out
}

pub fn render_hotel_stats(stats: &HotelStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total rooms: {}", stats.total_rooms);
    let _ = writeln!(out, "Available: {}", stats.available_rooms);
    let _ = writeln!(out, "Occupied: {}", stats.occupied_rooms);
    let _ = writeln!(out, "Revenue: {} RUB", format_price(stats.total_revenue));
    out
}

pub fn render_rooms_table(rooms: &[RoomSummary]) -> String {
    if rooms.is_empty() {
        return "No rooms found.\n".to_string();
    }

    let mut out = String::new();
    for room in rooms {
        let _ = writeln!(
            out,
            "{}  {}  {} RUB  {}  [Delete]",
            room.room_number,
            room.room_type.display_name(),
            format_price(room.base_price),
            room.status.display_name()
        );
    }
    out
}

pub fn render_bookings_table(bookings: &[BookingWithRoom]) -> String {
    if bookings.is_empty() {
        return "No bookings found.\n".to_string();
    }

    let mut out = String::new();
    for listed in bookings {
        let booking = &listed.booking;
        let _ = write!(
            out,
            "#{}  {} <{}>  room {}  {} - {}  {}",
            booking.id,
            booking.guest_info.name,
            booking.guest_info.email,
            listed.room.room_number,
            format_local_date(booking.start_date.date_naive()),
            format_local_date(booking.end_date.date_naive()),
            booking.status.display_name()
        );
        // Status transitions are only offered while a booking is pending.
        if booking.status == BookingStatus::Pending {
            out.push_str("  [Confirm] [Cancel]");
        }
        out.push('\n');
    }
    out
}

pub fn render_special_dates_table(dates: &[SpecialDate]) -> String {
    if dates.is_empty() {
        return "No special dates.\n".to_string();
    }

    let mut out = String::new();
    for date in dates {
        let _ = writeln!(
            out,
            "{}  {}  x{}  [Delete]",
            format_local_date(date.date.date_naive()),
            date.name,
            date.coefficient
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DayPrice, RoomStatus, RoomType};

    fn room() -> RoomSummary {
        RoomSummary {
            id: 3,
            room_number: "301".to_string(),
            room_type: RoomType::Deluxe,
            base_price: 4500.0,
            capacity: 2,
            status: RoomStatus::Available,
            description: Some("Corner room with a balcony".to_string()),
        }
    }

    fn quote() -> PriceQuote {
        PriceQuote {
            base_price: 3500.0,
            total_price: 10500.0,
            nights: 2,
            daily_breakdown: vec![
                DayPrice {
                    date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                    base_price: 3500.0,
                    coefficient: 1.0,
                    reason: "regular".to_string(),
                    day_price: 3500.0,
                },
                DayPrice {
                    date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
                    base_price: 3500.0,
                    coefficient: 2.0,
                    reason: "City Day".to_string(),
                    day_price: 7000.0,
                },
            ],
        }
    }

    #[test]
    fn price_grouping() {
        assert_eq!(format_price(3500.0), "3 500");
        assert_eq!(format_price(125000.5), "125 000.50");
        assert_eq!(format_price(1234567.0), "1 234 567");
        assert_eq!(format_price(999.0), "999");
        assert_eq!(format_price(0.0), "0");
    }

    #[test]
    fn empty_catalog_renders_placeholder() {
        let rendered = render_room_catalog(&[]);
        assert!(rendered.contains(NO_ROOMS_PLACEHOLDER));
    }

    #[test]
    fn catalog_rendering_is_idempotent() {
        let results = vec![AvailabilityResult {
            room: room(),
            is_available: true,
            total_price: 9000.0,
        }];
        assert_eq!(render_room_catalog(&results), render_room_catalog(&results));
    }

    #[test]
    fn catalog_card_shows_stay_total_and_book_affordance() {
        let results = vec![AvailabilityResult {
            room: room(),
            is_available: true,
            total_price: 9000.0,
        }];
        let rendered = render_room_catalog(&results);
        assert!(rendered.contains("Deluxe - room 301"));
        assert!(rendered.contains("9 000 RUB for the stay"));
        assert_eq!(rendered.matches("[Book]").count(), 1);
    }

    #[test]
    fn missing_description_gets_placeholder() {
        let mut no_description = room();
        no_description.description = None;
        let rendered = render_room_catalog(&[AvailabilityResult {
            room: no_description,
            is_available: true,
            total_price: 9000.0,
        }]);
        assert!(rendered.contains(NO_DESCRIPTION_PLACEHOLDER));
    }

    #[test]
    fn breakdown_lists_each_night_with_reason() {
        let rendered = render_price_breakdown(&quote());
        assert!(rendered.contains("01.06.2024 (regular)  3 500 RUB"));
        assert!(rendered.contains("02.06.2024 (City Day)  7 000 RUB"));
        assert!(rendered.contains("Base price: 3 500 RUB/night"));
        assert!(rendered.contains("Total: 10 500 RUB"));
    }

    // The renderer projects fields; it never sums the breakdown. A changed
    // total must only move the total line.
    #[test]
    fn breakdown_total_is_not_recomputed() {
        let original = quote();
        let mut bumped = quote();
        bumped.total_price = 99999.0;

        let before: Vec<String> =
            render_price_breakdown(&original).lines().map(str::to_string).collect();
        let after: Vec<String> =
            render_price_breakdown(&bumped).lines().map(str::to_string).collect();

        assert_eq!(before.len(), after.len());
        assert_eq!(before[..before.len() - 1], after[..after.len() - 1]);
        assert_ne!(before.last(), after.last());
        assert!(after.last().unwrap().contains("99 999"));
    }

    #[test]
    fn modal_without_quote_shows_pending_placeholder() {
        let check_in = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let check_out = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let rendered = render_booking_modal(&room(), check_in, check_out, 2, None);
        assert!(rendered.contains("Room 301 - Deluxe"));
        assert!(rendered.contains("Stay: 01.06.2024 - 03.06.2024, 2 night(s)"));
        assert!(rendered.contains(QUOTE_PENDING_PLACEHOLDER));
    }

    #[test]
    fn bookings_table_offers_actions_only_while_pending() {
        let request = crate::model::BookingRequest {
            room_id: 3,
            start_date: "2024-06-01T00:00:00Z".parse().unwrap(),
            end_date: "2024-06-03T00:00:00Z".parse().unwrap(),
            guest_info: crate::model::GuestInfo {
                name: "Anna".to_string(),
                email: "anna@example.com".to_string(),
                phone: "+100".to_string(),
            },
        };
        let mut pending = crate::api::mock::MockApi::sample_booking(&request);
        pending.booking.status = BookingStatus::Pending;
        let mut confirmed = pending.clone();
        confirmed.booking.status = BookingStatus::Confirmed;

        let rendered = render_bookings_table(&[pending, confirmed]);
        assert_eq!(rendered.matches("[Confirm] [Cancel]").count(), 1);
    }

    #[test]
    fn empty_admin_tables_render_placeholders() {
        assert_eq!(render_rooms_table(&[]), "No rooms found.\n");
        assert_eq!(render_bookings_table(&[]), "No bookings found.\n");
        assert_eq!(render_special_dates_table(&[]), "No special dates.\n");
    }
}
