//! Transit reachability server.
//!
//! A web application that answers: "starting from this point at this time,
//! which stops can I reach by bus or train within my time budget?"

pub mod cache;
pub mod domain;
pub mod odpt;
pub mod reach;
pub mod web;
