// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Instrumented networking APIs
//!
//! The two request APIs a hosted application uses. Both emit lifecycle events
//! on an [`EventBus`](crate::network::EventBus) and otherwise behave like the
//! APIs they stand in for.

mod fetch;
mod xhr;

pub use fetch::ObservedFetch;
pub use xhr::XmlHttpRequest;
