use clap::Parser;
use jmi_commissions::application::dispatcher::PaymentObserver;
use jmi_commissions::application::reconciler::{ProfileRateResolver, ReconciliationService};
use jmi_commissions::domain::ports::{CommissionStoreBox, PaymentStore};
use jmi_commissions::infrastructure::in_memory::{
    InMemoryCommissionStore, InMemoryPaymentStore, InMemoryVendorStore,
};
use jmi_commissions::interfaces::csv::commission_writer::CommissionWriter;
use jmi_commissions::interfaces::csv::event_reader::EventReader;
use jmi_commissions::interfaces::csv::rate_reader::RateReader;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input payment save events CSV file
    events: PathBuf,

    /// Vendor commission rates CSV file (vendor, rate)
    #[arg(long)]
    rates: Option<PathBuf>,

    /// System default commission rate (percent) applied when a vendor has none
    #[arg(long)]
    default_rate: Option<Decimal>,

    /// Path to persistent commission database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Log each detected transition and reconciliation outcome
    #[arg(long)]
    verbose: bool,
}

#[cfg(feature = "storage-rocksdb")]
fn open_commission_store(path: PathBuf) -> Result<CommissionStoreBox> {
    use jmi_commissions::infrastructure::rocksdb::RocksDbCommissionStore;
    Ok(Box::new(
        RocksDbCommissionStore::open(path).into_diagnostic()?,
    ))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_commission_store(_path: PathBuf) -> Result<CommissionStoreBox> {
    eprintln!(
        "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
    );
    Ok(Box::new(InMemoryCommissionStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(std::io::IsTerminal::is_terminal(&io::stderr()))
        .init();

    let cli = Cli::parse();

    let commission_store: CommissionStoreBox = match cli.db_path {
        Some(path) => open_commission_store(path)?,
        None => Box::new(InMemoryCommissionStore::new()),
    };

    let vendor_store = InMemoryVendorStore::new();
    if let Some(rates_path) = cli.rates {
        let file = File::open(rates_path).into_diagnostic()?;
        for rate_result in RateReader::new(file).rates() {
            let rate = rate_result.into_diagnostic()?;
            vendor_store.set_rate(rate.vendor, rate.rate).await;
        }
    }

    let payment_store = InMemoryPaymentStore::new();
    let service = Arc::new(ReconciliationService::new(
        Box::new(payment_store.clone()),
        commission_store,
        Box::new(ProfileRateResolver::new(
            Box::new(vendor_store),
            cli.default_rate,
        )),
    ));
    let observer = PaymentObserver::new(service.clone(), cli.verbose);

    // Replay events: persist the payment, then notify the observer. This is
    // the single call site that mutates payment status.
    let file = File::open(cli.events).into_diagnostic()?;
    for event_result in EventReader::new(file).events() {
        match event_result {
            Ok(event) => {
                payment_store
                    .store(event.payment.clone())
                    .await
                    .into_diagnostic()?;
                // Reconciliation failures are logged by the observer and
                // never block the remaining events.
                let _ = observer.on_saved(event).await;
            }
            Err(e) => {
                eprintln!("Error reading event: {e}");
            }
        }
    }

    let commissions = service.commissions().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = CommissionWriter::new(stdout.lock());
    writer.write_commissions(commissions).into_diagnostic()?;

    Ok(())
}
