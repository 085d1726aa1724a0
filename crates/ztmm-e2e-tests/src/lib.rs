//! End-to-end tests for the ZTMM assessment log store.
//!
//! These tests exercise the store the way the assessment client does:
//! - Producers recording through a shared store
//! - Level gating and bounded retention
//! - Export to disk, tampering, and verified import
//! - Viewer auto refresh

#![cfg(test)]
