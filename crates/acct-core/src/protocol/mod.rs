//! JSON wire protocol shared by `acct-api` and `acct-editor`.
//!
//! # Why separate wire records from domain types?
//!
//! The hosted store hands back loosely structured rows: nullable columns,
//! extra bookkeeping fields, tags stored as plain strings.  The records in
//! [`messages`] mirror that shape exactly so serde can always parse them.
//! [`schema`] then validates a record before it is allowed to become an
//! [`AccountConfig`](crate::AccountConfig); nothing downstream ever sees an
//! unchecked tag.

pub mod messages;
pub mod schema;

pub use messages::{
    AccountRecord, AccountResponse, ConfigRecord, ErrorResponse, FetchConfigResponse,
    SaveConfigRequest, SaveConfigResponse,
};
