//! Behaviour tests and shared fixtures for the cardboard crate.

pub(crate) mod support;
