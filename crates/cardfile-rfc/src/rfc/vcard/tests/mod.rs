//! Fixture-based parsing and round-trip suites.

mod round_trip;
