//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::account::{
    Account, AccountDetails, DoctorPatch, DoctorProfile, Profile, ProfileUpdate, UserTraits,
};
use crate::domain::entity::otp::OtpRecord;
use crate::domain::repository::{AccountRepository, OtpRepository};
use crate::domain::value_object::{
    account_kind::AccountKind, account_password::AccountPassword, email::Email,
    otp_code::OtpCode,
};
use crate::error::{AccountError, AccountResult};

/// PostgreSQL-backed account store and OTP ledger
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_account<T>(&self, filter: &str, value: T) -> AccountResult<Option<Account>>
    where
        T: for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send + 'static,
    {
        let sql = format!("{SELECT_ACCOUNT} WHERE {filter} = $1");

        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AccountRow::into_account).transpose()
    }
}

const SELECT_ACCOUNT: &str = r#"
    SELECT
        a.account_id,
        a.email,
        a.password_hash,
        a.account_kind,
        a.name,
        a.phone,
        a.profile_image,
        a.bio,
        a.location,
        a.can_donate,
        a.can_request,
        a.food_preference,
        d.specialty,
        d.overview,
        d.patients_count,
        d.stars,
        a.created_at,
        a.updated_at
    FROM accounts a
    LEFT JOIN doctor_profiles d ON d.account_id = a.account_id
"#;

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: &Account) -> AccountResult<()> {
        let (can_donate, can_request, food_preference) = match &account.details {
            AccountDetails::User(traits) => (
                traits.can_donate,
                traits.can_request,
                traits.food_preference.as_str(),
            ),
            AccountDetails::Doctor(_) => (false, false, ""),
        };

        let insert_account = sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                email,
                password_hash,
                account_kind,
                name,
                phone,
                profile_image,
                bio,
                location,
                can_donate,
                can_request,
                food_preference,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        );

        let Some(doctor) = account.doctor() else {
            insert_account
                .bind(account.account_id.as_uuid())
                .bind(account.email.as_str())
                .bind(account.password_hash.as_phc_string())
                .bind(account.kind().id())
                .bind(&account.profile.name)
                .bind(&account.profile.phone)
                .bind(&account.profile.profile_image)
                .bind(&account.profile.bio)
                .bind(&account.profile.location)
                .bind(can_donate)
                .bind(can_request)
                .bind(food_preference)
                .bind(account.created_at)
                .bind(account.updated_at)
                .execute(&self.pool)
                .await?;
            return Ok(());
        };

        // Both rows in one statement
        sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO accounts (
                    account_id,
                    email,
                    password_hash,
                    account_kind,
                    name,
                    phone,
                    profile_image,
                    bio,
                    location,
                    can_donate,
                    can_request,
                    food_preference,
                    created_at,
                    updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                RETURNING account_id
            )
            INSERT INTO doctor_profiles (
                account_id,
                specialty,
                overview,
                patients_count,
                stars,
                updated_at
            )
            SELECT account_id, $15, $16, $17, $18, $14 FROM inserted
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.kind().id())
        .bind(&account.profile.name)
        .bind(&account.profile.phone)
        .bind(&account.profile.profile_image)
        .bind(&account.profile.bio)
        .bind(&account.profile.location)
        .bind(can_donate)
        .bind(can_request)
        .bind(food_preference)
        .bind(account.created_at)
        .bind(account.updated_at)
        .bind(&doctor.specialty)
        .bind(&doctor.overview)
        .bind(doctor.patients_count)
        .bind(doctor.stars)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>> {
        self.fetch_account("a.account_id", *account_id.as_uuid()).await
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>> {
        self.fetch_account("a.email", email.as_str().to_string()).await
    }

    async fn exists_by_email(&self, email: &Email) -> AccountResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update_password(
        &self,
        email: &Email,
        password: &AccountPassword,
    ) -> AccountResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = $2, updated_at = now()
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .bind(password.as_phc_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn update_profile(&self, email: &Email, update: &ProfileUpdate) -> AccountResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE accounts
            SET profile_image = $2, bio = $3, location = $4, updated_at = now()
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .bind(&update.profile_image)
        .bind(&update.bio)
        .bind(&update.location)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn list_doctors(&self) -> AccountResult<Vec<Account>> {
        let query = format!(
            "{SELECT_ACCOUNT} WHERE a.account_kind = $1 ORDER BY a.created_at ASC"
        );

        let rows = sqlx::query_as::<_, AccountRow>(&query)
            .bind(AccountKind::Doctor.id())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    async fn update_doctor(
        &self,
        doctor_id: &AccountId,
        patch: &DoctorPatch,
    ) -> AccountResult<Option<Account>> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            WITH account AS (
                UPDATE accounts
                SET
                    name = COALESCE($2, name),
                    phone = COALESCE($3, phone),
                    profile_image = COALESCE($4, profile_image),
                    bio = COALESCE($5, bio),
                    location = COALESCE($6, location),
                    updated_at = now()
                WHERE account_id = $1 AND account_kind = $9
                RETURNING account_id
            )
            UPDATE doctor_profiles d
            SET
                specialty = COALESCE($7, d.specialty),
                overview = COALESCE($8, d.overview),
                updated_at = now()
            FROM account
            WHERE d.account_id = account.account_id
            RETURNING d.account_id
            "#,
        )
        .bind(doctor_id.as_uuid())
        .bind(patch.name.as_deref())
        .bind(patch.phone.as_deref())
        .bind(patch.profile_image.as_deref())
        .bind(patch.bio.as_deref())
        .bind(patch.location.as_deref())
        .bind(patch.specialty.as_deref())
        .bind(patch.overview.as_deref())
        .bind(AccountKind::Doctor.id())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(_) => self.find_by_id(doctor_id).await,
            None => Ok(None),
        }
    }
}

// ============================================================================
// OTP Repository Implementation
// ============================================================================

impl OtpRepository for PgAccountRepository {
    async fn upsert_otp(&self, record: &OtpRecord) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO otp_codes (email, code, issued_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET code = EXCLUDED.code, issued_at = EXCLUDED.issued_at
            "#,
        )
        .bind(record.email.as_str())
        .bind(record.code.as_str())
        .bind(record.issued_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_otp(&self, email: &Email) -> AccountResult<Option<OtpRecord>> {
        let row = sqlx::query_as::<_, OtpRow>(
            r#"
            SELECT email, code, issued_at
            FROM otp_codes
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OtpRow::into_record))
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    email: String,
    password_hash: String,
    account_kind: i16,
    name: String,
    phone: String,
    profile_image: String,
    bio: String,
    location: String,
    can_donate: bool,
    can_request: bool,
    food_preference: String,
    specialty: Option<String>,
    overview: Option<String>,
    patients_count: Option<i32>,
    stars: Option<i16>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AccountResult<Account> {
        let kind = AccountKind::from_id(self.account_kind).ok_or_else(|| {
            AccountError::Internal(format!("Invalid account_kind: {}", self.account_kind))
        })?;

        let details = match kind {
            AccountKind::User => AccountDetails::User(UserTraits {
                can_donate: self.can_donate,
                can_request: self.can_request,
                food_preference: self.food_preference,
            }),
            AccountKind::Doctor => AccountDetails::Doctor(DoctorProfile {
                specialty: self.specialty.unwrap_or_default(),
                overview: self.overview.unwrap_or_default(),
                patients_count: self.patients_count.unwrap_or_default(),
                stars: self.stars.unwrap_or_default(),
            }),
        };

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            email: Email::from_db(self.email),
            password_hash: AccountPassword::from_db(self.password_hash)?,
            profile: Profile {
                name: self.name,
                phone: self.phone,
                profile_image: self.profile_image,
                bio: self.bio,
                location: self.location,
            },
            details,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OtpRow {
    email: String,
    code: String,
    issued_at: DateTime<Utc>,
}

impl OtpRow {
    fn into_record(self) -> OtpRecord {
        OtpRecord {
            email: Email::from_db(self.email),
            code: OtpCode::from_db(self.code),
            issued_at: self.issued_at,
        }
    }
}
