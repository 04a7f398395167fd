use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::attendance::model::{
    AttendanceDetail, AttendanceStatus, CreateAttendanceDto, UpdateAttendanceDto,
};

use crate::metrics;
use crate::utils::auth_helpers::AccessScope;
use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, order_clause};

const ATTENDANCE_ORDERING: &[(&str, &str)] = &[
    ("date", "att.date"),
    ("status", "att.status"),
    ("student_name", "u.first_name"),
    ("marked_at", "att.marked_at"),
];

const DETAIL_SELECT: &str =
    "SELECT att.id, att.student_id, u.first_name || ' ' || u.last_name AS student_name, \
     att.class_id, c.name AS class_name, att.subject_id, sub.name AS subject_name, \
     att.date, att.status, att.marked_by, \
     mu.first_name || ' ' || mu.last_name AS marked_by_name, \
     att.notes, att.marked_at \
     FROM attendance att \
     JOIN students s ON s.id = att.student_id \
     JOIN users u ON u.id = s.user_id \
     JOIN classes c ON c.id = att.class_id \
     JOIN subjects sub ON sub.id = att.subject_id \
     JOIN teachers mt ON mt.id = att.marked_by \
     JOIN users mu ON mu.id = mt.user_id \
     WHERE 1=1";

fn push_scope_filter(qb: &mut QueryBuilder<'_, Postgres>, scope: &AccessScope) -> bool {
    match scope {
        AccessScope::Admin => true,
        AccessScope::Teacher { teacher_id } => {
            qb.push(" AND att.class_id IN (SELECT id FROM classes WHERE teacher_id = ")
                .push_bind(*teacher_id)
                .push(")");
            true
        }
        AccessScope::Student { student_id, .. } => {
            qb.push(" AND att.student_id = ").push_bind(*student_id);
            true
        }
        AccessScope::Staff | AccessScope::Unlinked => false,
    }
}

fn push_search_filter(qb: &mut QueryBuilder<'_, Postgres>, search: &str) {
    let pattern = format!("%{}%", search);
    qb.push(" AND (u.first_name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR u.last_name ILIKE ")
        .push_bind(pattern)
        .push(")");
}

fn status_slug(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Present => "present",
        AttendanceStatus::Absent => "absent",
        AttendanceStatus::Late => "late",
        AttendanceStatus::Excused => "excused",
    }
}

pub struct AttendanceService;

impl AttendanceService {
    #[instrument(skip(db, params))]
    pub async fn list_attendance(
        db: &PgPool,
        scope: &AccessScope,
        params: &ListParams,
    ) -> Result<(Vec<AttendanceDetail>, i64), AppError> {
        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM attendance att \
             JOIN students s ON s.id = att.student_id \
             JOIN users u ON u.id = s.user_id \
             WHERE 1=1",
        );
        if !push_scope_filter(&mut count_qb, scope) {
            return Ok((Vec::new(), 0));
        }
        if let Some(search) = params.search() {
            push_search_filter(&mut count_qb, search);
        }
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(db)
            .await
            .context("Failed to count attendance records")
            .map_err(AppError::database)?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(DETAIL_SELECT);
        push_scope_filter(&mut qb, scope);
        if let Some(search) = params.search() {
            push_search_filter(&mut qb, search);
        }
        qb.push(" ORDER BY ");
        qb.push(order_clause(
            params.ordering.as_deref(),
            ATTENDANCE_ORDERING,
            "att.date DESC, u.first_name ASC",
        ));
        qb.push(" LIMIT ")
            .push_bind(params.page_size())
            .push(" OFFSET ")
            .push_bind(params.offset());

        let records: Vec<AttendanceDetail> = qb
            .build_query_as()
            .fetch_all(db)
            .await
            .context("Failed to fetch attendance records")
            .map_err(AppError::database)?;

        Ok((records, total))
    }

    #[instrument(skip(db))]
    pub async fn get_attendance(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<AttendanceDetail, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(DETAIL_SELECT);
        if !push_scope_filter(&mut qb, scope) {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Attendance record not found"
            )));
        }
        qb.push(" AND att.id = ").push_bind(id);

        let record: Option<AttendanceDetail> = qb
            .build_query_as()
            .fetch_optional(db)
            .await
            .context("Failed to fetch attendance record by ID")
            .map_err(AppError::database)?;

        record.ok_or_else(|| AppError::not_found(anyhow::anyhow!("Attendance record not found")))
    }

    /// Mark attendance. Teachers mark only their own classes; admins must
    /// name the marking teacher.
    #[instrument(skip(db, dto))]
    pub async fn create_attendance(
        db: &PgPool,
        scope: &AccessScope,
        dto: CreateAttendanceDto,
    ) -> Result<AttendanceDetail, AppError> {
        let marked_by = match scope {
            AccessScope::Teacher { teacher_id } => {
                let owns_class: Option<(Uuid,)> =
                    sqlx::query_as("SELECT id FROM classes WHERE id = $1 AND teacher_id = $2")
                        .bind(dto.class_id)
                        .bind(*teacher_id)
                        .fetch_optional(db)
                        .await
                        .context("Failed to check class ownership")
                        .map_err(AppError::database)?;

                if owns_class.is_none() {
                    return Err(AppError::forbidden(
                        "Teachers can only mark attendance for their own classes".to_string(),
                    ));
                }
                *teacher_id
            }
            AccessScope::Admin => dto.marked_by.ok_or_else(|| {
                AppError::bad_request(anyhow::anyhow!(
                    "marked_by is required when an admin marks attendance"
                ))
            })?,
            _ => {
                return Err(AppError::forbidden(
                    "Only teachers and admins can mark attendance".to_string(),
                ));
            }
        };

        let record_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO attendance (student_id, class_id, subject_id, date, status,
                                    marked_by, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(dto.student_id)
        .bind(dto.class_id)
        .bind(dto.subject_id)
        .bind(dto.date)
        .bind(dto.status)
        .bind(marked_by)
        .bind(&dto.notes)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Attendance is already marked for this student, class, subject and date"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Referenced student, class, subject or teacher does not exist"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        metrics::track_attendance_marked(status_slug(dto.status));

        Self::get_attendance(db, scope, record_id).await
    }

    /// Update an attendance record. Admins update anything; teachers only
    /// records of their own classes.
    #[instrument(skip(db, dto))]
    pub async fn update_attendance(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
        dto: UpdateAttendanceDto,
    ) -> Result<AttendanceDetail, AppError> {
        if !matches!(scope, AccessScope::Admin | AccessScope::Teacher { .. }) {
            return Err(AppError::forbidden(
                "Only teachers and admins can update attendance".to_string(),
            ));
        }

        let existing = Self::get_attendance(db, scope, id).await?;

        if dto.status.is_none() && dto.notes.is_none() {
            return Ok(existing);
        }

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE attendance SET ");
        {
            let mut sets = qb.separated(", ");
            if let Some(status) = dto.status {
                sets.push("status = ");
                sets.push_bind_unseparated(status);
            }
            if let Some(notes) = &dto.notes {
                sets.push("notes = ");
                sets.push_bind_unseparated(notes);
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        qb.build()
            .execute(db)
            .await
            .context("Failed to update attendance record")
            .map_err(AppError::database)?;

        Self::get_attendance(db, scope, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_attendance(
        db: &PgPool,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<(), AppError> {
        if !matches!(scope, AccessScope::Admin | AccessScope::Teacher { .. }) {
            return Err(AppError::forbidden(
                "Only teachers and admins can delete attendance".to_string(),
            ));
        }

        Self::get_attendance(db, scope, id).await?;

        sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete attendance record")
            .map_err(AppError::database)?;

        Ok(())
    }

    /// Share of records with status present or late, rounded to two
    /// decimals. Zero when the student has no records.
    #[instrument(skip(db))]
    pub async fn attendance_percentage(db: &PgPool, student_id: Uuid) -> Result<f64, AppError> {
        let (total, present): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status IN ('present', 'late'))
            FROM attendance
            WHERE student_id = $1
            "#,
        )
        .bind(student_id)
        .fetch_one(db)
        .await
        .context("Failed to compute attendance percentage")
        .map_err(AppError::database)?;

        if total == 0 {
            return Ok(0.0);
        }

        Ok((present as f64 / total as f64 * 100.0 * 100.0).round() / 100.0)
    }
}
