// ABOUTME: Session module — role-tagged turns, per-session history, and the session store.
// ABOUTME: History lives in process memory only; a restart starts every session empty.

pub mod store;
pub mod turn;

pub use store::{SessionHandle, SessionStore};
pub use turn::{Role, Session, Turn};
