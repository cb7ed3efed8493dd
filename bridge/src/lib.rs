//! Bridge adapter — moves ledger balances between domains.
//!
//! A cross-domain transfer runs `Initiated → Debited → Credited`:
//! - **Outbound (lock-or-burn)** on the source domain validates the request,
//!   debits the sender and emits a message carrying the amount and the
//!   sender's locked rate.
//! - **Inbound (release-or-mint)** on the destination domain checks that the
//!   message came from the trusted paired adapter, decodes the rate and
//!   credits the recipient.
//!
//! The two halves are never atomic together. Once `Debited` the transfer is
//! irreversible on the source; delivery, retry and timeout belong to the
//! external transport.

pub mod adapter;
pub mod dedupe;
pub mod error;
pub mod message;
pub mod payload;
pub mod routing;
pub mod validator;

pub use adapter::{AdapterConfig, BridgeAdapter, InboundReceipt, OutboundMessage, TransferState};
pub use dedupe::{RecentDeliveries, DEFAULT_DEDUPE_CAPACITY};
pub use error::BridgeError;
pub use message::{BridgeMessage, InboundDelivery, OutboundRequest};
pub use payload::{decode_rate, encode_rate, PAYLOAD_LEN};
pub use routing::{RemoteRoute, RouteEntry, RoutingTable};
pub use validator::{RouteValidator, TransferValidator};
