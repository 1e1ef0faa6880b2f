//! Mailbox transport implementations.

pub mod inmemory;

pub use inmemory::InMemoryMailboxTransport;
