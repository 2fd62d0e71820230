use crate::application::dispatcher::{SaveEvent, SaveKind};
use crate::domain::payment::{Currency, PaymentRecord, PaymentStatus};
use crate::error::{ReconcileError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum EventKind {
    Created,
    Updated,
}

/// One payment save event as it appears in the input CSV.
#[derive(Debug, Deserialize)]
struct EventRow {
    event: EventKind,
    payment: u64,
    vendor: Option<u64>,
    amount: Decimal,
    currency: Currency,
    prev_status: Option<PaymentStatus>,
    status: PaymentStatus,
}

impl From<EventRow> for SaveEvent {
    fn from(row: EventRow) -> Self {
        SaveEvent {
            kind: match row.event {
                EventKind::Created => SaveKind::Created,
                EventKind::Updated => SaveKind::Updated,
            },
            payment: PaymentRecord {
                id: row.payment,
                vendor: row.vendor,
                amount: row.amount,
                currency: row.currency,
                status: row.status,
            },
            previous_status: row.prev_status,
        }
    }
}

/// Reads payment save events from a CSV source.
///
/// Wraps `csv::Reader`, trimming whitespace and tolerating short records, and
/// yields events lazily so large files stream.
pub struct EventReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> EventReader<R> {
    /// Creates a new `EventReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn events(self) -> impl Iterator<Item = Result<SaveEvent>> {
        self.reader.into_deserialize::<EventRow>().map(|result| {
            result
                .map(SaveEvent::from)
                .map_err(ReconcileError::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "event, payment, vendor, amount, currency, prev_status, status";

    #[test]
    fn test_reader_valid_stream() {
        let data = format!(
            "{HEADER}\ncreated, 7, 3, 200.00, eur, , pending\nupdated, 7, 3, 200.00, eur, pending, paid"
        );
        let reader = EventReader::new(data.as_bytes());
        let events: Vec<Result<SaveEvent>> = reader.events().collect();

        assert_eq!(events.len(), 2);
        let created = events[0].as_ref().unwrap();
        assert_eq!(created.kind, SaveKind::Created);
        assert_eq!(created.payment.id, 7);
        assert_eq!(created.payment.amount, dec!(200.00));
        assert_eq!(created.previous_status, None);

        let updated = events[1].as_ref().unwrap();
        assert_eq!(updated.kind, SaveKind::Updated);
        assert_eq!(updated.previous_status, Some(PaymentStatus::Pending));
        assert_eq!(updated.payment.status, PaymentStatus::Paid);
        assert!(updated.became_paid());
    }

    #[test]
    fn test_reader_missing_vendor() {
        let data = format!("{HEADER}\nupdated, 9, , 50.00, usd, pending, paid");
        let reader = EventReader::new(data.as_bytes());
        let events: Vec<Result<SaveEvent>> = reader.events().collect();

        assert_eq!(events[0].as_ref().unwrap().payment.vendor, None);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = format!("{HEADER}\nvanished, 7, 3, 200.00, eur, pending, paid");
        let reader = EventReader::new(data.as_bytes());
        let events: Vec<Result<SaveEvent>> = reader.events().collect();

        assert!(events[0].is_err());
    }
}
