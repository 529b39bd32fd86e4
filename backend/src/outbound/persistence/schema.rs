//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. Regenerate
//! with `diesel print-schema` after a migration changes the schema.

diesel::table! {
    /// Users created by the signup workflow.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Full name as submitted on the signup form.
        name -> Varchar,
        /// Contact email address.
        email -> Varchar,
        /// Contact phone number (10 digits).
        phone -> Varchar,
        /// City slug selected during signup.
        city -> Varchar,
        /// Street address.
        address -> Varchar,
        /// Partner-bank affiliation tag, when present.
        bank -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bank accounts, one per signup, referencing the owning user.
    accounts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user (foreign key to `users.id`).
        user_id -> Uuid,
        /// Account product: savings, checking, or business.
        account_type -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Digital-money voucher rows, one per issuance.
    digital_coins (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Requester name.
        name -> Varchar,
        /// Country name from the location cascade.
        country -> Varchar,
        /// State name from the location cascade.
        state -> Varchar,
        /// City name from the location cascade.
        city -> Varchar,
        /// Voucher amount (one of the fixed denominations).
        amount -> Int4,
        /// Phone number the voucher is registered under.
        generator_phone_number -> Varchar,
        /// URL of the uploaded ID photo, when one was supplied.
        id_photo_url -> Nullable<Varchar>,
        /// 15-digit claim token; carries a unique constraint.
        coin_token -> Varchar,
        /// Record creation timestamp; orders prior-voucher lookups.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(accounts -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, digital_coins, users);
