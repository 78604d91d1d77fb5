#![allow(dead_code, unused_imports)]

pub mod builders;
pub mod collector_mock;
pub mod dialer_mock;

pub use builders::{sample_message, sample_response, test_settings};
pub use collector_mock::{CollectorBehaviour, CollectorEvent, CollectorEvents, MockCollector};
pub use dialer_mock::{DialOutcome, ScriptedDialer};
