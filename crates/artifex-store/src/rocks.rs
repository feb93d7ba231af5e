//! `RocksDB` storage implementation.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use artifex_core::{Transaction, TransactionId, User, UserId};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{Settlement, Store};

/// `RocksDB`-backed storage implementation.
///
/// Compound mutations (registration, debit, settlement) serialize on
/// `write_lock` so their check-then-write sequences are atomic with respect to
/// each other; the writes themselves commit in a single `WriteBatch`.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Write an updated user record (caller holds the write lock).
    fn write_user(&self, batch: &mut WriteBatch, user: &User) -> Result<()> {
        let cf_users = self.cf(cf::USERS)?;
        let value = Self::serialize(user)?;
        batch.put_cf(&cf_users, keys::user_key(&user.id), value);
        Ok(())
    }

    fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

impl Store for RocksStore {
    // =========================================================================
    // User Operations
    // =========================================================================

    fn create_user(&self, user: &User) -> Result<()> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");

        let cf_email = self.cf(cf::USERS_BY_EMAIL)?;
        let email_key = keys::email_key(&user.email);

        // Uniqueness check and insert happen under the lock, so two
        // registrations for the same email cannot both pass the check.
        let exists = self
            .db
            .get_cf(&cf_email, &email_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();

        if exists {
            return Err(StoreError::EmailTaken {
                email: user.email.clone(),
            });
        }

        let mut batch = WriteBatch::default();
        self.write_user(&mut batch, user)?;
        batch.put_cf(&cf_email, &email_key, user.id.as_bytes());

        self.commit(batch)
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        let cf = self.cf(cf::USERS)?;

        self.db
            .get_cf(&cf, keys::user_key(user_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let cf_email = self.cf(cf::USERS_BY_EMAIL)?;

        let Some(id_bytes) = self
            .db
            .get_cf(&cf_email, keys::email_key(email))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut bytes = [0u8; 16];
        if id_bytes.len() != 16 {
            return Err(StoreError::Database("corrupt email index entry".into()));
        }
        bytes.copy_from_slice(&id_bytes);
        self.get_user(&UserId::from_bytes(bytes))
    }

    fn debit_credit(&self, user_id: &UserId) -> Result<i64> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");

        let mut user = self.get_user(user_id)?.ok_or(StoreError::NotFound)?;

        if user.credit_balance <= 0 {
            return Err(StoreError::InsufficientCredit {
                balance: user.credit_balance,
            });
        }

        user.credit_balance -= 1;
        user.updated_at = chrono::Utc::now();

        let mut batch = WriteBatch::default();
        self.write_user(&mut batch, &user)?;
        self.commit(batch)?;

        Ok(user.credit_balance)
    }

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    fn put_transaction(&self, transaction: &Transaction) -> Result<()> {
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;

        let tx_key = keys::transaction_key(&transaction.id);
        let user_tx_key = keys::user_transaction_key(&transaction.user_id, &transaction.id);
        let value = Self::serialize(transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_tx, &tx_key, &value);
        batch.put_cf(&cf_by_user, &user_tx_key, []); // Index entry (empty value)

        self.commit(batch)
    }

    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>> {
        let cf = self.cf(cf::TRANSACTIONS)?;

        self.db
            .get_cf(&cf, keys::transaction_key(transaction_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>> {
        let cf_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;
        let prefix = keys::user_transactions_prefix(user_id);

        let iter = self.db.iterator_cf(
            &cf_by_user,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        // ULID keys sort oldest-first within the prefix; collect and reverse
        // for newest-first listing.
        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            all_keys.push(key.to_vec());
        }
        all_keys.reverse();

        let mut transactions = Vec::new();
        for key in all_keys.into_iter().skip(offset) {
            if transactions.len() >= limit {
                break;
            }

            let tx_id = keys::extract_transaction_id_from_user_key(&key);
            if let Some(tx) = self.get_transaction(&tx_id)? {
                transactions.push(tx);
            }
        }

        Ok(transactions)
    }

    fn settle_and_credit(&self, transaction_id: &TransactionId) -> Result<Settlement> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");

        let mut transaction = self
            .get_transaction(transaction_id)?
            .ok_or(StoreError::NotFound)?;

        let mut user = self
            .get_user(&transaction.user_id)?
            .ok_or(StoreError::NotFound)?;

        // The settled flag gates crediting: checked before any write, flipped
        // in the same batch as the balance credit.
        if transaction.settled {
            return Ok(Settlement::AlreadySettled {
                balance: user.credit_balance,
            });
        }

        transaction.settled = true;
        user.credit_balance += transaction.credits;
        user.updated_at = chrono::Utc::now();

        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let tx_value = Self::serialize(&transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_tx, keys::transaction_key(transaction_id), tx_value);
        self.write_user(&mut batch, &user)?;
        self.commit(batch)?;

        tracing::debug!(
            transaction_id = %transaction_id,
            user_id = %transaction.user_id,
            credits = %transaction.credits,
            balance = %user.credit_balance,
            "transaction settled"
        );

        Ok(Settlement::Credited {
            balance: user.credit_balance,
        })
    }
}
