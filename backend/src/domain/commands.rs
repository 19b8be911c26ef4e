//! Inputs and results of the identity operations, decoupled from the wire DTOs.

use chrono::NaiveDate;

use crate::domain::models::{Account, Baby};

#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub username: String,
    pub password: String,
    pub baby_name: String,
    pub date_of_birth: NaiveDate,
    pub invitation_code: String,
}

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// An account together with the baby it owns
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account: Account,
    pub baby: Baby,
}
