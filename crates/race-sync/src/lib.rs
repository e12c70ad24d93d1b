//! `race-sync` — blocking coordination primitives shared by every car.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`gate`]        | `StartGate` — one-shot broadcast release                   |
//! | [`ready`]       | `ReadySignal`, `ReadyBarrier` — per-car rendezvous flags   |
//! | [`pit`]         | `PitStop`, `PitPermit` — bounded-capacity admission (FIFO) |
//! | [`stop_sign`]   | `StopSign`, `StopSignGuard` — single-occupant admission    |
//! | [`error`]       | `SyncError`, `SyncResult<T>`                               |
//!
//! # Design notes
//!
//! Every primitive owns its own `parking_lot::Mutex` + `Condvar` pair and is
//! `Send + Sync`, so it can sit behind one `Arc` shared by all car threads.
//! No operation here ever holds two of these locks at once.
//!
//! Admission primitives hand out RAII guards: dropping the guard is the only
//! way to release, so a release can never outnumber its acquire.

pub mod error;
pub mod gate;
pub mod pit;
pub mod ready;
pub mod stop_sign;


pub use error::{SyncError, SyncResult};
pub use gate::StartGate;
pub use pit::{PitPermit, PitStop};
pub use ready::{ReadyBarrier, ReadySignal};
pub use stop_sign::{StopSign, StopSignGuard};
