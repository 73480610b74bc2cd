//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    ///
    /// `email` and `user_name` carry the `users_email_key` and
    /// `users_user_name_key` unique constraints.
    users (id) {
        /// Identity primary key.
        id -> Int4,
        /// Unique login address.
        email -> Varchar,
        /// Display name.
        name -> Varchar,
        /// Unique handle.
        user_name -> Varchar,
        /// bcrypt hash of the account password.
        password -> Text,
        /// Optional role label.
        role -> Nullable<Varchar>,
        /// Optional avatar location.
        profile_image -> Nullable<Text>,
        /// One of `active`, `inactive`, `banned`.
        status -> Varchar,
        /// Last time the user was seen online.
        last_seen -> Nullable<Timestamptz>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}
