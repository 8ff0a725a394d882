//! Navigation collaborator: login redirects and one-time token handoff.

/// The piece of the UI shell the session manager talks to when it needs
/// to leave the authenticated area or read a handed-off token.
pub trait Navigator: Send + Sync + std::fmt::Debug + 'static {
    /// Read the one-time handoff token attached to the current navigation
    /// entry and erase it from history in the same step.
    ///
    /// A second call, or a call after a reload, returns `None`.
    fn take_handoff(&self) -> Option<String>;

    /// Send the user to the login entry point.
    fn redirect_to_login(&self);
}
