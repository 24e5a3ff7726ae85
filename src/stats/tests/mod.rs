//! Unit tests for task statistics.
