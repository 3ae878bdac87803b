//! Seams towards the host application.

/// Operator-facing output channel used for echoed results.
pub trait OperatorOutput {
    fn print(&self, text: &str);
}

/// The host's command-routing mechanism.
pub trait CommandRouter {
    /// Registers a command token with its help text.
    fn add_handler(&mut self, token: &str, description: &str);

    /// Unregisters a command token. Unknown tokens are ignored.
    fn remove_handler(&mut self, token: &str);
}
