//! `PostgreSQL` company store.
//!
//! Every write that sets `is_default` runs in a transaction that first clears
//! the flag on the user's other rows, so the partial unique index on
//! `(user_id) WHERE is_default` is never violated mid-statement.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use facturo_core::{CompanyId, UserId};

use crate::store::{CompanyRow, CompanyStore, CompanyWrite, StoreError};

const COLUMNS: &str = "id, user_id, name, email, address, phone, logo_url, \
     fiscal_region, siret, vat_number, nif, stat, iban, bic, \
     default_currency, default_payment_method, invoice_prefix, quote_prefix, \
     notes, is_default, created_at, updated_at";

/// Company store backed by the `companies` table.
#[derive(Debug, Clone)]
pub struct PgCompanyStore {
    pool: PgPool,
}

impl PgCompanyStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn clear_other_defaults(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
    keep: Option<CompanyId>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        UPDATE companies
        SET is_default = FALSE, updated_at = NOW()
        WHERE user_id = $1 AND is_default AND ($2::uuid IS NULL OR id <> $2)
        ",
    )
    .bind(user_id)
    .bind(keep)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl CompanyStore for PgCompanyStore {
    #[instrument(skip(self))]
    async fn list_companies(&self, user_id: UserId) -> Result<Vec<CompanyRow>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM companies WHERE user_id = $1 ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn get_company(
        &self,
        user_id: UserId,
        id: CompanyId,
    ) -> Result<Option<CompanyRow>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE user_id = $1 AND id = $2");
        let row = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(user_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    #[instrument(skip(self, company), fields(name = %company.name))]
    async fn insert_company(
        &self,
        user_id: UserId,
        company: &CompanyWrite,
    ) -> Result<CompanyRow, StoreError> {
        let mut tx = self.pool.begin().await?;
        if company.is_default {
            clear_other_defaults(&mut tx, user_id, None).await?;
        }

        let sql = format!(
            r"
            INSERT INTO companies (
                user_id, name, email, address, phone, logo_url,
                fiscal_region, siret, vat_number, nif, stat, iban, bic,
                default_currency, default_payment_method, invoice_prefix, quote_prefix,
                notes, is_default
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(user_id)
            .bind(&company.name)
            .bind(&company.email)
            .bind(&company.address)
            .bind(&company.phone)
            .bind(&company.logo_url)
            .bind(&company.fiscal_region)
            .bind(&company.siret)
            .bind(&company.vat_number)
            .bind(&company.nif)
            .bind(&company.stat)
            .bind(&company.iban)
            .bind(&company.bic)
            .bind(&company.default_currency)
            .bind(&company.default_payment_method)
            .bind(&company.invoice_prefix)
            .bind(&company.quote_prefix)
            .bind(&company.notes)
            .bind(company.is_default)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    #[instrument(skip(self, company))]
    async fn update_company(
        &self,
        user_id: UserId,
        id: CompanyId,
        company: &CompanyWrite,
    ) -> Result<Option<CompanyRow>, StoreError> {
        let mut tx = self.pool.begin().await?;
        if company.is_default {
            clear_other_defaults(&mut tx, user_id, Some(id)).await?;
        }

        let sql = format!(
            r"
            UPDATE companies SET
                name = $3, email = $4, address = $5, phone = $6, logo_url = $7,
                fiscal_region = $8, siret = $9, vat_number = $10, nif = $11, stat = $12,
                iban = $13, bic = $14, default_currency = $15, default_payment_method = $16,
                invoice_prefix = $17, quote_prefix = $18, notes = $19, is_default = $20,
                updated_at = NOW()
            WHERE user_id = $1 AND id = $2
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(user_id)
            .bind(id)
            .bind(&company.name)
            .bind(&company.email)
            .bind(&company.address)
            .bind(&company.phone)
            .bind(&company.logo_url)
            .bind(&company.fiscal_region)
            .bind(&company.siret)
            .bind(&company.vat_number)
            .bind(&company.nif)
            .bind(&company.stat)
            .bind(&company.iban)
            .bind(&company.bic)
            .bind(&company.default_currency)
            .bind(&company.default_payment_method)
            .bind(&company.invoice_prefix)
            .bind(&company.quote_prefix)
            .bind(&company.notes)
            .bind(company.is_default)
            .fetch_optional(&mut *tx)
            .await?;

        // Unknown id: dropping the transaction rolls back the cleared defaults.
        if row.is_some() {
            tx.commit().await?;
        }
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn delete_company(&self, user_id: UserId, id: CompanyId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM companies WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn set_default_company(
        &self,
        user_id: UserId,
        id: CompanyId,
    ) -> Result<Option<CompanyRow>, StoreError> {
        let mut tx = self.pool.begin().await?;
        clear_other_defaults(&mut tx, user_id, Some(id)).await?;

        let sql = format!(
            r"
            UPDATE companies SET is_default = TRUE, updated_at = NOW()
            WHERE user_id = $1 AND id = $2
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(user_id)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if row.is_some() {
            tx.commit().await?;
        }
        Ok(row)
    }
}
