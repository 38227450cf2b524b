//! Data models for the helpdesk REST API.
//!
//! This module contains the wire representation of every managed object:
//! business rules (triggers, automations, macros, views), schedules,
//! fields and forms, SLA policies, webhooks, and account-level objects.

mod account;
mod business_rule;
mod common;
mod schedule;
mod sla;
mod ticket_field;
mod ticket_form;
mod webhook;

pub use account::*;
pub use business_rule::*;
pub use common::*;
pub use schedule::*;
pub use sla::*;
pub use ticket_field::*;
pub use ticket_form::*;
pub use webhook::*;
