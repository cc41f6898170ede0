//! Integration tests for the multi-token ledger client.

pub mod mock_gateway;

pub mod contract_tests;
pub mod conversion_tests;
pub mod diagnostics_tests;
