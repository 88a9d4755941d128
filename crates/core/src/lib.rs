pub mod config;
pub mod config_loader;
pub mod error;
pub mod finance;
pub mod gateway;
pub mod storage;
pub mod types;

pub use config::{ApiConfig, AppConfig, GatewayBackend, GatewayConfig, StorageConfig};
pub use config_loader::ConfigLoader;
pub use error::{GatewayError, Result};
pub use gateway::LedgerGateway;
pub use storage::ClientStorage;
pub use types::{
    Borrower, BorrowerUpdate, Contract, ContractStatus, ContractUpdate, CurrentUser,
    DashboardSummary, InterestMode, NewBorrower, NewContract, NewOffer, NewPayment, Offer,
    OfferStatus, OfferUpdate, Payment, TermType, UserRole,
};
