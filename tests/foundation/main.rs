//! Integration tests for Layer 0: Foundation
//!
//! Tests for spans, points, and errors.
