//! Behavioural scenarios for the retention sweep.

mod retention;
