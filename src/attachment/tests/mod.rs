//! Unit tests for attachment validation, storage, and download views.

mod store_tests;
