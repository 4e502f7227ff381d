pub const BATCH_CHUNK_SIZE: usize = 100;
pub const MAX_IDENTIFIER_LENGTH: usize = 256;
pub const TOGGLE_MAX_ATTEMPTS: usize = 3;
pub const PREPARED_STATEMENT_CACHE_SIZE: usize = 1000;

/// Partition shared by all contact messages.
pub const INBOX: &str = "contact";
