use crate::domain::commission::CommissionRecord;
use crate::error::Result;
use std::io::Write;

/// Writes commission records as CSV.
pub struct CommissionWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CommissionWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_commissions(&mut self, commissions: Vec<CommissionRecord>) -> Result<()> {
        for commission in commissions {
            self.writer.serialize(commission)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
