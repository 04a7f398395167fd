//! Demo-data seeder.
//!
//! Creates a set of subjects, then one teacher, one class, a roster of
//! students and a couple of assignments per class. A single low-cost
//! bcrypt hash is shared by every generated account (password
//! `password123`).

use chrono::{Datelike, Duration, Utc};
use fake::Fake;
use fake::faker::address::en::StreetName;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::students::model::Gender;
use crate::modules::users::model::UserRole;

const SUBJECTS: &[(&str, &str, i32)] = &[
    ("Mathematics", "MATH", 4),
    ("English", "ENG", 3),
    ("Physics", "PHY", 4),
    ("Chemistry", "CHEM", 4),
    ("Biology", "BIO", 3),
    ("History", "HIST", 2),
    ("Geography", "GEO", 2),
    ("Computer Science", "CS", 3),
];

const STUDENTS_PER_CLASS: usize = 20;
const ASSIGNMENTS_PER_CLASS: usize = 2;

pub async fn seed_database(
    db: &PgPool,
    num_classes: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🌱 Seeding {} classes...", num_classes);

    // Cost 4 keeps seeding fast; these are throwaway demo credentials.
    let password_hash = bcrypt::hash("password123", 4)?;

    let mut subject_ids = Vec::with_capacity(SUBJECTS.len());
    for (name, code, credits) in SUBJECTS {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO subjects (name, code, credits)
             VALUES ($1, $2, $3)
             ON CONFLICT (code) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(name)
        .bind(code)
        .bind(credits)
        .fetch_one(db)
        .await?;
        subject_ids.push(id);
    }

    let mut rng = rand::thread_rng();
    let academic_year = {
        let year = Utc::now().year();
        format!("{}-{}", year, year + 1)
    };

    for class_index in 0..num_classes {
        let teacher_id = seed_teacher(db, &password_hash, &subject_ids).await?;

        let grade_level = (6 + class_index % 6).to_string();
        let section = ["A", "B", "C"][class_index % 3];
        let class_id: Uuid = sqlx::query_scalar(
            "INSERT INTO classes (name, grade_level, section, academic_year, teacher_id,
                                  room_number, max_students)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(format!("Grade {} {}", grade_level, section))
        .bind(&grade_level)
        .bind(section)
        .bind(&academic_year)
        .bind(teacher_id)
        .bind(format!("R-{}", 100 + class_index))
        .bind(30i32)
        .fetch_one(db)
        .await?;

        for subject_id in subject_ids.iter().take(4) {
            sqlx::query(
                "INSERT INTO class_subjects (class_id, subject_id)
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(class_id)
            .bind(subject_id)
            .execute(db)
            .await?;
        }

        for roll in 1..=STUDENTS_PER_CLASS {
            seed_student(db, &password_hash, class_id, roll).await?;
        }

        for n in 0..ASSIGNMENTS_PER_CLASS {
            let subject_id = subject_ids[rng.gen_range(0..4)];
            sqlx::query(
                "INSERT INTO assignments (title, description, subject_id, class_id, teacher_id,
                                          total_marks, due_date)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(format!("Worksheet {}", n + 1))
            .bind("Auto-generated demo assignment")
            .bind(subject_id)
            .bind(class_id)
            .bind(teacher_id)
            .bind(rng.gen_range(2..=10) * 10)
            .bind(Utc::now() + Duration::days(rng.gen_range(3..30)))
            .execute(db)
            .await?;
        }

        println!(
            "   - Grade {} {}: 1 teacher, {} students, {} assignments",
            grade_level, section, STUDENTS_PER_CLASS, ASSIGNMENTS_PER_CLASS
        );
    }

    Ok(())
}

async fn seed_teacher(
    db: &PgPool,
    password_hash: &str,
    subject_ids: &[Uuid],
) -> Result<Uuid, Box<dyn std::error::Error>> {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let uid = Uuid::new_v4().simple().to_string();
    let tag = &uid[..8];

    let user_id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (username, email, password, first_name, last_name,
                            role, address)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id",
    )
    .bind(format!("teacher_{}", tag))
    .bind(format!("teacher.{}@slateboard.test", tag))
    .bind(password_hash)
    .bind(&first_name)
    .bind(&last_name)
    .bind(UserRole::Teacher)
    .bind::<String>(StreetName().fake())
    .fetch_one(db)
    .await?;

    let mut rng = rand::thread_rng();
    let teacher_id: Uuid = sqlx::query_scalar(
        "INSERT INTO teachers (user_id, employee_id, department, qualification,
                               experience_years, hire_date)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(user_id)
    .bind(format!("EMP-{}", tag))
    .bind("General Studies")
    .bind("BEd")
    .bind(rng.gen_range(0..20))
    .bind((Utc::now() - Duration::days(rng.gen_range(100..3000))).date_naive())
    .fetch_one(db)
    .await?;

    for subject_id in subject_ids.iter().take(2) {
        sqlx::query(
            "INSERT INTO teacher_subjects (teacher_id, subject_id)
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(teacher_id)
        .bind(subject_id)
        .execute(db)
        .await?;
    }

    Ok(teacher_id)
}

async fn seed_student(
    db: &PgPool,
    password_hash: &str,
    class_id: Uuid,
    roll: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let guardian: String = FirstName().fake();
    let uid = Uuid::new_v4().simple().to_string();
    let tag = &uid[..8];

    let user_id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (username, email, password, first_name, last_name, role)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(format!("student_{}", tag))
    .bind(format!("student.{}@slateboard.test", tag))
    .bind(password_hash)
    .bind(&first_name)
    .bind(&last_name)
    .bind(UserRole::Student)
    .fetch_one(db)
    .await?;

    let mut rng = rand::thread_rng();
    let gender = match rng.gen_range(0..3) {
        0 => Gender::Male,
        1 => Gender::Female,
        _ => Gender::Other,
    };

    sqlx::query(
        "INSERT INTO students (user_id, student_code, roll_number, class_id, gender,
                               guardian_name, guardian_phone, admission_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(user_id)
    .bind(format!("STU-{}", tag))
    .bind(roll.to_string())
    .bind(class_id)
    .bind(gender)
    .bind(format!("{} {}", guardian, last_name))
    .bind(format!("555{:07}", rng.gen_range(0..10_000_000)))
    .bind((Utc::now() - Duration::days(rng.gen_range(30..700))).date_naive())
    .execute(db)
    .await?;

    Ok(())
}
