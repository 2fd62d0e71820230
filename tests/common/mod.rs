use std::io::Error;
use std::path::Path;

pub const EVENT_HEADER: [&str; 7] = [
    "event",
    "payment",
    "vendor",
    "amount",
    "currency",
    "prev_status",
    "status",
];

pub fn write_events(path: &Path, rows: &[[&str; 7]]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(EVENT_HEADER)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_rates(path: &Path, rows: &[(&str, &str)]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["vendor", "rate"])?;
    for (vendor, rate) in rows {
        wtr.write_record([*vendor, *rate])?;
    }
    wtr.flush()?;
    Ok(())
}
