pub mod args;
pub mod commands;
pub mod repl;

/// Exit codes for different error conditions
pub mod exit_codes {
    /// Successful execution
    pub const SUCCESS: u8 = 0;
    /// Network/connection error (e.g., host unreachable, connection refused)
    pub const NETWORK_ERROR: u8 = 1;
    /// Protocol error (unparseable bytes from the broker)
    pub const PROTOCOL_ERROR: u8 = 2;
    /// Bad invocation (e.g., malformed broker URL)
    pub const USAGE_ERROR: u8 = 3;
}
