use fractic_server_error::{define_client_error, define_internal_error};

// Chart-of-accounts related.
define_client_error!(
    UnknownChartAccount,
    "Account '{account_id}' does not exist in chart of accounts '{coa_id}'.",
    { coa_id: &str, account_id: &str }
);
define_internal_error!(
    ChartUnavailable,
    "Chart of accounts '{coa_id}' is unavailable.",
    { coa_id: &str }
);
define_internal_error!(
    ChartIndexOutOfRange,
    "Account '{account_id}' sits at chart position {position}, beyond the ledger's index range.",
    { account_id: &str, position: usize }
);

// Ledger-related.
define_internal_error!(
    LedgerStoreFailure,
    "Ledger store failed: {details}.",
    { details: &str }
);
define_internal_error!(
    LedgerIndexOverflow,
    "Chart index {index} has no ledger counterpart.",
    { index: u32 }
);

// Metadata-related.
define_client_error!(
    InvalidTransactionMetadata,
    "Invalid metadata for ledger transaction {moment}: {details}.",
    { moment: i64, details: &str }
);
define_internal_error!(
    MetadataEncodingFailed,
    "Failed to encode transaction metadata."
);
define_client_error!(
    ReservedRemovalReference,
    "Removal reference {moment} is reserved to mark a transaction that removes nothing.",
    { moment: i64 }
);

// Streaming-related.
define_client_error!(
    StreamCancelled,
    "Transaction stream was cancelled before completion."
);
define_internal_error!(
    ProducerTaskFailed,
    "Transaction producer task ended without reporting a result."
);

// Config-related.
define_client_error!(InvalidConfig, "Invalid data source config: {details}.", { details: &str });
