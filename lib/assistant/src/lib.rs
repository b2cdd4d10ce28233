//! Chat message routing for cloudbuddy.
//!
//! [`ResponseComposer`] turns one inbound chat message into a [`ChatReply`].
//! Branches are tried in order:
//!
//! 1. greetings get a fixed introduction
//! 2. practice requests get a generated question
//! 3. messages with a screenshot get an image analysis
//! 4. everything else gets a model answer, or a formatted knowledge base
//!    entry when no model is configured
//!
//! Every turn is written back to the session store.

pub mod composer;
pub mod reply;
pub mod templates;

pub use composer::ResponseComposer;
pub use reply::ChatReply;
