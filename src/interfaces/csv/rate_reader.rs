use crate::domain::payment::VendorId;
use crate::error::{ReconcileError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One vendor commission rate as it appears in the rates CSV.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct VendorRate {
    pub vendor: VendorId,
    /// Percentage.
    pub rate: Decimal,
}

/// Reads vendor commission rates from a CSV source.
pub struct RateReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RateReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    pub fn rates(self) -> impl Iterator<Item = Result<VendorRate>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(ReconcileError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_reader() {
        let data = "vendor, rate\n3, 15\n4, 12.5";
        let reader = RateReader::new(data.as_bytes());
        let rates: Vec<VendorRate> = reader.rates().map(|r| r.unwrap()).collect();

        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0], VendorRate { vendor: 3, rate: dec!(15) });
        assert_eq!(rates[1].rate, dec!(12.5));
    }
}
