//! Invoice and customer administration dashboard.
//!
//! The interesting parts are the invoice form pipeline in [`actions`] and
//! [`validation`], credential sign-in in [`auth`], and the pagination and
//! chart label generators in [`labels`]. The rest wires them to Postgres and
//! axum.

pub mod actions;
pub mod auth;
pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod format;
pub mod labels;
pub mod models;
pub mod repository;
pub mod revalidate;
pub mod routes;
pub mod state;
pub mod validation;

#[cfg(test)]
mod testing;
