//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Courses and their seat counters.
    ///
    /// A check constraint keeps `0 <= current_capacity <= max_capacity`.
    courses (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        name -> Text,
        /// Free-form category tag.
        course_type -> Text,
        max_capacity -> Int4,
        /// Approved enrollments. Written only by the admission workflow.
        current_capacity -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Subjects taught within a course.
    subjects (id) {
        id -> Uuid,
        course_id -> Uuid,
        description -> Text,
        /// At least one.
        ects_points -> Int4,
    }
}

diesel::table! {
    /// Student profiles keyed by account id.
    students (id) {
        /// Primary key: the student's account id.
        id -> Uuid,
        school -> Text,
        /// Soft hold set by the latest enrollment request.
        current_course_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Enrollment requests and their decisions.
    ///
    /// A partial unique index allows one open (pending or approved) row per
    /// student and course.
    enrollments (id) {
        id -> Uuid,
        student_id -> Uuid,
        course_id -> Uuid,
        /// One of `pending`, `approved`, `rejected`.
        status -> Text,
        /// Administrator who decided the enrollment.
        decided_by -> Nullable<Uuid>,
        requested_at -> Timestamptz,
        decided_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(enrollments -> courses (course_id));
diesel::joinable!(enrollments -> students (student_id));
diesel::joinable!(students -> courses (current_course_id));
diesel::joinable!(subjects -> courses (course_id));

diesel::allow_tables_to_appear_in_same_query!(courses, subjects, students, enrollments);
