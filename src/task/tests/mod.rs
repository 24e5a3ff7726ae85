//! Unit tests for the task domain and the task service.
