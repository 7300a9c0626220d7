//! Terminal front end for interactive design sessions.
//!
//! - [`chat_loop`]: reads input lines, dispatches them to [`crate::commands`]
//!   and awaits backend requests on the session.
//! - [`render`]: plain-text formatting of transcript entries, designs and
//!   notifications.
//!
//! [`crate::core`] owns all session state; this layer only presents it.

pub mod chat_loop;
pub mod render;
