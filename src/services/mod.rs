// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod google;
pub mod stripe;
pub mod viewer;

pub use google::{GoogleIdentity, GoogleService, PersonResponse};
pub use stripe::StripeService;
pub use viewer::{SessionOutcome, ViewerService};
