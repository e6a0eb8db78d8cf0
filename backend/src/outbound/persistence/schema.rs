//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. When a
//! migration changes a table, regenerate with `diesel print-schema` or edit by
//! hand.

diesel::table! {
    /// Registered users keyed by login name.
    users (username) {
        username -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// `student` or `admin`.
        role -> Varchar,
        full_name -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per user per day; `(username, date)` is unique.
    attendance (id) {
        /// Insertion sequence, also the recent-activity order.
        id -> Int8,
        username -> Varchar,
        /// ISO-8601 `YYYY-MM-DD`.
        date -> Varchar,
        breakfast -> Bool,
        lunch -> Bool,
        dinner -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Complaints and feedback.
    issues (id) {
        id -> Int8,
        username -> Varchar,
        /// `complaint` or `feedback`.
        kind -> Varchar,
        category -> Varchar,
        subject -> Varchar,
        message -> Text,
        date -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(attendance -> users (username));
diesel::joinable!(issues -> users (username));

diesel::allow_tables_to_appear_in_same_query!(attendance, issues, users);
