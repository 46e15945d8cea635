pub mod balance;

pub use balance::BalanceAggregator;
