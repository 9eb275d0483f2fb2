use super::repo_tx_mysql::MySqlTx;
use crate::domain_port::*;
use sqlx::mysql::MySqlDatabaseError;

pub fn downcast<'a, 't>(tx: &'a mut dyn StorageTx<'t>) -> &'a mut MySqlTx<'t> {
    // SAFETY: the MySQL repositories are only ever wired next to
    // MySqlTxManager, whose transactions are all MySqlTx.
    unsafe {
        let p = tx as *mut dyn StorageTx<'t>;
        let p = p as *mut MySqlTx<'t>;
        &mut *p
    }
}

pub fn is_dup_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return mysql_err.number() == 1062; // ER_DUP_ENTRY
        }
    }

    false
}

/// Maps an insert result onto the unique-index outcome.
pub fn insert_outcome<T>(
    result: Result<T, sqlx::Error>,
    context: &str,
) -> Result<InsertOutcome, StoreError> {
    match result {
        Ok(_) => Ok(InsertOutcome::Inserted),
        Err(e) if is_dup_key(&e) => Ok(InsertOutcome::Duplicate),
        Err(e) => Err(StoreError::backend(context, e)),
    }
}
