// tests/property/main.rs

mod clock;
