pub mod balance;
pub mod contract;
