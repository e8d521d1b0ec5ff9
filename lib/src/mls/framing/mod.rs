//! Signed handshake objects exchanged between members and the sealed group
//! message format.
//!
//! Every change to a group is expressed as [`Proposal`]s signed by the member
//! who asks for them, bundled into a [`Commit`] that is itself signed and bound
//! to one group and one epoch. Application data travels as [`PrivateMessage`]s
//! encrypted under the group's root secret.

pub mod commit;
pub mod private_message;
pub mod proposal;

pub use self::commit::Commit;
pub use self::private_message::PrivateMessage;
pub use self::proposal::{Proposal, ProposalType, SignedProposal};
