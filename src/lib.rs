//! Echolocation - shared grid sequencer engine
//!
//! Participants place metronomes, notes and redirectors on a 16x16 grid.
//! Every tick, pulses travel one cell, emitters fire, and notes hit by a
//! pulse are collected into a batch of sounds for the room to play.

pub mod cell;
pub mod core;
pub mod pattern;
pub mod room;
pub mod simulation;
pub mod spatial;
