// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod chart_of_accounts_datasource;
        pub(crate) mod ledger_space_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod transaction_metadata_model;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod chart_account;
        pub(crate) mod fs_account;
        pub(crate) mod fs_transaction;
        pub(crate) mod ledger;
        pub(crate) mod transaction_metadata;
    }
    pub(crate) mod logic {
        pub(crate) mod account_view_impl;
        pub(crate) mod entry_reconciler;
        pub(crate) mod index_resolver;
    }
    pub(crate) mod usecases {
        pub(crate) mod projection_usecase;
        pub(crate) mod transaction_stream;
    }
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::chart_account::*;
        pub use crate::domain::entities::fs_account::*;
        pub use crate::domain::entities::fs_transaction::*;
        pub use crate::domain::entities::ledger::*;
        pub use crate::domain::entities::transaction_metadata::*;
    }

    pub mod datasources {
        pub use crate::data::datasources::chart_of_accounts_datasource::*;
        pub use crate::data::datasources::ledger_space_datasource::*;
    }

    pub mod codec {
        pub use crate::data::models::transaction_metadata_model::{
            decode_metadata, encode_metadata,
        };
    }

    pub use crate::domain::usecases::transaction_stream::TransactionStream;
}
