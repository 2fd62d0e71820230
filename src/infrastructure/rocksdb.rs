use crate::domain::commission::{CommissionId, CommissionRecord, NewCommission};
use crate::domain::payment::PaymentId;
use crate::domain::ports::{CommissionStore, CreateOutcome};
use crate::error::{ReconcileError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for commission records, keyed by payment id.
pub const CF_COMMISSIONS: &str = "commissions";
/// Column Family for store metadata (the id counter).
pub const CF_META: &str = "meta";

const NEXT_ID_KEY: &[u8] = b"next_commission_id";

/// A persistent commission store backed by RocksDB.
///
/// Records are keyed by payment id, which makes the payment reference the
/// storage-level uniqueness constraint. RocksDB has no conditional put, so
/// `create_if_absent` serializes check-then-insert through `create_lock`;
/// `Clone` shares both the database handle and the lock.
#[derive(Clone)]
pub struct RocksDbCommissionStore {
    db: Arc<DB>,
    create_lock: Arc<Mutex<()>>,
}

impl RocksDbCommissionStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_commissions = ColumnFamilyDescriptor::new(CF_COMMISSIONS, Options::default());
        let cf_meta = ColumnFamilyDescriptor::new(CF_META, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_commissions, cf_meta])?;

        Ok(Self {
            db: Arc::new(db),
            create_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            ReconcileError::Internal(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn read_commission(&self, payment_id: PaymentId) -> Result<Option<CommissionRecord>> {
        let cf = self.cf(CF_COMMISSIONS)?;
        let result = self.db.get_cf(cf, payment_id.to_be_bytes())?;
        match result {
            Some(bytes) => {
                let record = serde_json::from_slice(&bytes).map_err(|e| {
                    ReconcileError::Internal(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Deserialization error: {e}"),
                    )))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn next_id(&self) -> Result<CommissionId> {
        let cf = self.cf(CF_META)?;
        let current = match self.db.get_cf(cf, NEXT_ID_KEY)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    ReconcileError::Internal(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "corrupt id counter",
                    )))
                })?;
                u64::from_be_bytes(arr)
            }
            None => 1,
        };
        self.db
            .put_cf(cf, NEXT_ID_KEY, (current + 1).to_be_bytes())?;
        Ok(current)
    }
}

#[async_trait]
impl CommissionStore for RocksDbCommissionStore {
    async fn create_if_absent(&self, commission: NewCommission) -> Result<CreateOutcome> {
        // Serialized critical section around check-then-insert.
        let _guard = self.create_lock.lock().await;

        if let Some(existing) = self.read_commission(commission.payment)? {
            return Ok(CreateOutcome::Conflict(existing));
        }

        let record = commission.with_id(self.next_id()?);
        let cf = self.cf(CF_COMMISSIONS)?;
        let value = serde_json::to_vec(&record).map_err(|e| {
            ReconcileError::Internal(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {e}"),
            )))
        })?;
        self.db
            .put_cf(cf, record.payment.to_be_bytes(), value)
            .map_err(|e| ReconcileError::Persistence {
                payment: record.payment,
                reason: e.to_string(),
            })?;

        Ok(CreateOutcome::Created(record))
    }

    async fn get_by_payment(&self, payment_id: PaymentId) -> Result<Option<CommissionRecord>> {
        self.read_commission(payment_id)
    }

    async fn all(&self) -> Result<Vec<CommissionRecord>> {
        let cf = self.cf(CF_COMMISSIONS)?;
        let mut records = Vec::new();
        let iter = self.db.iterator_cf(cf, rocksdb::IteratorMode::Start);

        for item in iter {
            let (_key, value) = item?;
            let record: CommissionRecord = serde_json::from_slice(&value).map_err(|e| {
                ReconcileError::Internal(Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Deserialization error: {e}"),
                )))
            })?;
            records.push(record);
        }

        records.sort_by_key(|c| c.id);
        Ok(records)
    }
}
