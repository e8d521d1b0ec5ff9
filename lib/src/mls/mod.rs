//! Continuous group key agreement, modelled on
//! [RFC9420](https://www.rfc-editor.org/rfc/rfc9420.html) (MLS).
//!
//! The [`ratchet_tree`] stores one secret per tree node and derives a single
//! group-wide root secret, which is rotated at O(log N) cost per membership
//! change. [`group`] sequences adds, removes and key updates into commits and
//! a monotonic epoch, and encrypts group messages under the root secret.

pub mod crypto;
pub mod framing;
pub mod group;
pub mod key_package;
pub mod ratchet_tree;
pub mod utilities;
