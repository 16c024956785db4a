//! # darkbook
//!
//! A deterministic dark-pool matching engine for testing trading algorithms.
//!
//! ## Features
//!
//! - **Size-then-time priority**: larger orders rank first, timestamp breaks ties
//! - **Minimum execution size**: orders match only when each side's size covers the other's MES
//! - **One order per participant per side**: resubmitting overwrites the previous order
//! - **Batch uncross**: match and execute repeatedly until the book is quiescent
//! - **Block discovery**: indication matching with reputation-gated access and
//!   two-sided qualifying-order confirmation
//! - **Append-only tape**: every trade and cancellation, flushable with or without wiping
//!
//! ## Quick Start
//!
//! ```
//! use darkbook::{Exchange, Order, ParticipantId, Price, Side};
//!
//! let mut exchange = Exchange::new();
//!
//! // Two buys and a sell; the q=10 buy outranks the q=5 buy.
//! exchange.add_order(Order::new(1, ParticipantId(0), Side::Buy, 10, 7));
//! exchange.add_order(Order::new(2, ParticipantId(1), Side::Buy, 5, 3));
//! exchange.add_order(Order::new(1, ParticipantId(2), Side::Sell, 8, 6));
//!
//! // Uncross at the reference price: one trade for min(10, 8) = 8.
//! let trades = exchange.uncross(3, Price(50), None);
//! assert_eq!(trades, 1);
//!
//! // The large buy's residual rests with its MES clamped down; at q=2 it
//! // now sorts behind the untouched q=5 buy.
//! let residual = exchange
//!     .book()
//!     .side(Side::Buy)
//!     .orders()
//!     .iter()
//!     .find(|o| o.participant == ParticipantId(0))
//!     .unwrap();
//! assert_eq!(residual.quantity, 2);
//! assert_eq!(residual.min_exec_size, 2);
//! ```
//!
//! ## Block Discovery
//!
//! Large orders can negotiate away from the continuous book. An indication
//! must exceed the minimum indication value and its owner's reputation must
//! clear the threshold; a matched pair completes only when both sides
//! confirm with qualifying orders, and each confirmation is scored against
//! the original indication:
//!
//! ```
//! use darkbook::{Confirmation, Exchange, Order, ParticipantId, Side};
//!
//! let mut exchange = Exchange::new();
//!
//! exchange
//!     .add_indication(Order::indication(1, ParticipantId(0), Side::Buy, 1024, 500))
//!     .unwrap();
//! exchange
//!     .add_indication(Order::indication(1, ParticipantId(1), Side::Sell, 500, 500))
//!     .unwrap();
//!
//! let id = exchange.find_block_match().unwrap();
//!
//! let first = exchange
//!     .submit_qualifying_order(Order::qualifying(2, ParticipantId(0), Side::Buy, 1024, 500, id))
//!     .unwrap();
//! assert_eq!(first, Confirmation::First);
//!
//! let second = exchange
//!     .submit_qualifying_order(Order::qualifying(2, ParticipantId(1), Side::Sell, 500, 500, id))
//!     .unwrap();
//! assert!(matches!(second, Confirmation::Complete(_)));
//!
//! // Both sides restated exactly: reputation moves 50 -> 62.5.
//! assert_eq!(exchange.reputation(ParticipantId(0)), Some(62.5));
//! ```
//!
//! ## Tape
//!
//! Every execution and cancellation lands on the book's tape in order:
//!
//! ```
//! use darkbook::{Exchange, FlushMode, Order, ParticipantId, Price, Side, TapeRecord};
//!
//! let mut exchange = Exchange::new();
//! exchange.add_order(Order::new(1, ParticipantId(0), Side::Buy, 8, 7));
//! exchange.add_order(Order::new(1, ParticipantId(1), Side::Sell, 8, 6));
//! exchange.uncross(2, Price(50), None);
//!
//! let records = exchange.flush_tape(FlushMode::Wipe);
//! assert!(matches!(records[0], TapeRecord::Trade(_)));
//! assert!(exchange.book().tape().is_empty());
//! ```

mod block;
mod book;
mod book_side;
mod config;
mod error;
mod exchange;
mod matching;
mod order;
mod participant;
#[cfg(feature = "persistence")]
pub mod persistence;
mod reputation;
mod tape;
mod types;

// Re-export public API
pub use block::{BlockIndicationBook, BlockMatch, Confirmation};
pub use book::OrderBook;
pub use book_side::{BookEntry, BookSide};
pub use config::BlockConfig;
pub use error::{BookError, RejectReason};
pub use exchange::Exchange;
pub use matching::MatchCandidate;
pub use order::{Order, OrderKind};
pub use participant::{Bookkeeper, Participant};
pub use reputation::{event_score, ReputationLedger};
pub use tape::{FlushMode, Tape, TapeRecord, TradeRecord};
pub use types::{MatchId, OrderId, ParticipantId, Price, Quantity, Side, Timestamp};
