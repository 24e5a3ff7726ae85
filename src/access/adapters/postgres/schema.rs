//! Diesel schema for the user records read by the task core.

diesel::table! {
    /// User records owned by the identity collaborator.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Contact email address.
        #[max_length = 255]
        email -> Varchar,
        /// Role name (`user` or `admin`).
        #[max_length = 50]
        role -> Varchar,
    }
}
