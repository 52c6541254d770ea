//! Scripted collaborators shared by the end-to-end tests of this workspace.

pub mod fakes;

mod control;
mod inventory;
mod streaming;
