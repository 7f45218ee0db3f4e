//! Port traits the overlay core is written against.

pub mod outbound;
