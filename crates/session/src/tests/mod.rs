//! Controller tests against a scripted in-memory backend.
