//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, AppointmentId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{
    Appointment, AppointmentPatch, AppointmentView, Contact, DoctorContact, DoctorStats,
    PaymentClaim,
};
use crate::domain::repository::{
    AppointmentRepository, DoctorLedger, PatientDirectory, PaymentLedger,
};
use crate::domain::services::{MAX_STARS, PATIENTS_PER_STAR};
use crate::domain::value_objects::AppointmentStatus;
use crate::error::BookingResult;

/// `accounts.account_kind` value for doctors
const DOCTOR_KIND: i16 = 1;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_views(&self, filter: &str, id: Uuid) -> BookingResult<Vec<AppointmentView>> {
        let sql = format!("{SELECT_VIEW} WHERE {filter} = $1 ORDER BY ap.created_at DESC");

        let rows = sqlx::query_as::<_, AppointmentViewRow>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(AppointmentViewRow::into_view).collect())
    }
}

const SELECT_VIEW: &str = r#"
    SELECT
        ap.appointment_id,
        ap.doctor_id,
        ap.patient_id,
        ap.scheduled_date,
        ap.scheduled_time,
        ap.notes,
        ap.status,
        ap.transaction_ref,
        ap.created_at,
        ap.updated_at,
        doc.name AS doctor_name,
        doc.email AS doctor_email,
        doc.phone AS doctor_phone,
        doc.profile_image AS doctor_image,
        dp.specialty AS doctor_specialty,
        pat.name AS patient_name,
        pat.email AS patient_email,
        pat.phone AS patient_phone,
        pat.profile_image AS patient_image
    FROM appointments ap
    LEFT JOIN accounts doc ON doc.account_id = ap.doctor_id
    LEFT JOIN doctor_profiles dp ON dp.account_id = ap.doctor_id
    LEFT JOIN accounts pat ON pat.account_id = ap.patient_id
"#;

// ============================================================================
// Appointment Repository Implementation
// ============================================================================

impl AppointmentRepository for PgBookingRepository {
    async fn create(&self, appointment: &Appointment) -> BookingResult<()> {
        sqlx::query(
            r#"
            INSERT INTO appointments (
                appointment_id,
                doctor_id,
                patient_id,
                scheduled_date,
                scheduled_time,
                notes,
                status,
                transaction_ref,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(appointment.appointment_id.as_uuid())
        .bind(appointment.doctor_id.as_uuid())
        .bind(appointment.patient_id.as_uuid())
        .bind(&appointment.date)
        .bind(appointment.time.as_deref())
        .bind(&appointment.notes)
        .bind(appointment.status.as_str())
        .bind(appointment.transaction_ref.as_deref())
        .bind(appointment.created_at)
        .bind(appointment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_view(
        &self,
        appointment_id: &AppointmentId,
    ) -> BookingResult<Option<AppointmentView>> {
        let views = self
            .fetch_views("ap.appointment_id", *appointment_id.as_uuid())
            .await?;
        Ok(views.into_iter().next())
    }

    async fn list_by_doctor(&self, doctor_id: &AccountId) -> BookingResult<Vec<AppointmentView>> {
        self.fetch_views("ap.doctor_id", *doctor_id.as_uuid()).await
    }

    async fn list_by_patient(
        &self,
        patient_id: &AccountId,
    ) -> BookingResult<Vec<AppointmentView>> {
        self.fetch_views("ap.patient_id", *patient_id.as_uuid()).await
    }

    async fn update(
        &self,
        appointment_id: &AppointmentId,
        patch: &AppointmentPatch,
    ) -> BookingResult<Option<Appointment>> {
        let status = patch.status.as_deref().map(AppointmentStatus::new);

        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            UPDATE appointments
            SET
                scheduled_date = COALESCE($2, scheduled_date),
                scheduled_time = COALESCE($3, scheduled_time),
                notes = COALESCE($4, notes),
                status = COALESCE($5, status),
                updated_at = now()
            WHERE appointment_id = $1
            RETURNING
                appointment_id,
                doctor_id,
                patient_id,
                scheduled_date,
                scheduled_time,
                notes,
                status,
                transaction_ref,
                created_at,
                updated_at
            "#,
        )
        .bind(appointment_id.as_uuid())
        .bind(patch.date.as_deref())
        .bind(patch.time.as_deref())
        .bind(patch.notes.as_deref())
        .bind(status.as_ref().map(AppointmentStatus::as_str))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AppointmentRow::into_appointment))
    }
}

// ============================================================================
// Doctor Ledger Implementation
// ============================================================================

impl DoctorLedger for PgBookingRepository {
    async fn find_doctor(&self, doctor_id: &AccountId) -> BookingResult<Option<DoctorContact>> {
        let row = sqlx::query_as::<_, DoctorContactRow>(
            r#"
            SELECT a.account_id, a.name, a.email
            FROM accounts a
            JOIN doctor_profiles d ON d.account_id = a.account_id
            WHERE a.account_id = $1 AND a.account_kind = $2
            "#,
        )
        .bind(doctor_id.as_uuid())
        .bind(DOCTOR_KIND)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| DoctorContact {
            doctor_id: AccountId::from_uuid(r.account_id),
            name: r.name,
            email: r.email,
        }))
    }

    async fn record_patient(&self, doctor_id: &AccountId) -> BookingResult<Option<DoctorStats>> {
        // SET sees the pre-update row, so both columns derive from the same count
        let row = sqlx::query_as::<_, DoctorStatsRow>(
            r#"
            UPDATE doctor_profiles
            SET
                patients_count = patients_count + 1,
                stars = LEAST((patients_count + 1) / $2, $3),
                updated_at = now()
            WHERE account_id = $1
            RETURNING patients_count, stars
            "#,
        )
        .bind(doctor_id.as_uuid())
        .bind(PATIENTS_PER_STAR)
        .bind(MAX_STARS as i32)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| DoctorStats {
            patients_count: r.patients_count,
            stars: r.stars,
        }))
    }
}

// ============================================================================
// Patient Directory / Payment Ledger Implementation
// ============================================================================

impl PatientDirectory for PgBookingRepository {
    async fn find_patient_by_email(&self, email: &str) -> BookingResult<Option<Contact>> {
        let row = sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT account_id, name, email, phone, profile_image
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Contact {
            account_id: AccountId::from_uuid(r.account_id),
            name: r.name,
            email: r.email,
            phone: r.phone,
            profile_image: r.profile_image,
            specialty: None,
        }))
    }
}

impl PaymentLedger for PgBookingRepository {
    async fn claim_payment(&self, claim: &PaymentClaim) -> BookingResult<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO processed_payments (transaction_id, doctor_id, patient_email)
            VALUES ($1, $2, $3)
            ON CONFLICT (transaction_id) DO NOTHING
            "#,
        )
        .bind(&claim.transaction_id)
        .bind(claim.doctor_id.as_uuid())
        .bind(&claim.patient_email)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted == 1)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AppointmentRow {
    appointment_id: Uuid,
    doctor_id: Uuid,
    patient_id: Uuid,
    scheduled_date: String,
    scheduled_time: Option<String>,
    notes: String,
    status: String,
    transaction_ref: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AppointmentRow {
    fn into_appointment(self) -> Appointment {
        Appointment {
            appointment_id: AppointmentId::from_uuid(self.appointment_id),
            doctor_id: AccountId::from_uuid(self.doctor_id),
            patient_id: AccountId::from_uuid(self.patient_id),
            date: self.scheduled_date,
            time: self.scheduled_time,
            notes: self.notes,
            status: AppointmentStatus::new(self.status),
            transaction_ref: self.transaction_ref,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AppointmentViewRow {
    #[sqlx(flatten)]
    appointment: AppointmentRow,
    doctor_name: Option<String>,
    doctor_email: Option<String>,
    doctor_phone: Option<String>,
    doctor_image: Option<String>,
    doctor_specialty: Option<String>,
    patient_name: Option<String>,
    patient_email: Option<String>,
    patient_phone: Option<String>,
    patient_image: Option<String>,
}

impl AppointmentViewRow {
    fn into_view(self) -> AppointmentView {
        let appointment = self.appointment.into_appointment();

        // LEFT JOIN: a missing account leaves every column NULL
        let doctor = self.doctor_email.map(|email| Contact {
            account_id: appointment.doctor_id,
            name: self.doctor_name.unwrap_or_default(),
            email,
            phone: self.doctor_phone.unwrap_or_default(),
            profile_image: self.doctor_image.unwrap_or_default(),
            specialty: self.doctor_specialty,
        });
        let patient = self.patient_email.map(|email| Contact {
            account_id: appointment.patient_id,
            name: self.patient_name.unwrap_or_default(),
            email,
            phone: self.patient_phone.unwrap_or_default(),
            profile_image: self.patient_image.unwrap_or_default(),
            specialty: None,
        });

        AppointmentView {
            appointment,
            doctor,
            patient,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DoctorContactRow {
    account_id: Uuid,
    name: String,
    email: String,
}

#[derive(sqlx::FromRow)]
struct DoctorStatsRow {
    patients_count: i32,
    stars: i16,
}

#[derive(sqlx::FromRow)]
struct PatientRow {
    account_id: Uuid,
    name: String,
    email: String,
    phone: String,
    profile_image: String,
}
