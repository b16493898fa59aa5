//! HTTP request handlers

pub mod health;
pub mod invoke;
pub mod whatsapp;
