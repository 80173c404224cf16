// SPDX-License-Identifier: MIT

//! Emoji Oracle - an LLM-powered emoji guessing game
//!
//! The [`gateway`] module is the multi-provider puzzle generation layer; it
//! normalizes request/response shape across the supported LLM APIs behind a
//! single never-failing operation. The [`game`] module holds the player-facing
//! state the CLI builds on: settings, statistics, guess checking and UI text.

pub mod game;
pub mod gateway;
