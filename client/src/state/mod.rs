//! Client-side state owned by the app root.
//!
//! DESIGN
//! ======
//! `storage` is the durable key-value port, `session` owns the signed-in flag
//! on top of it, and `nav` turns session changes into the active route tree.

pub mod nav;
pub mod session;
pub mod storage;
