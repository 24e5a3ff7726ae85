//! Unit tests for identity and access policy.
