//! Chain id to burn/mint domain mapping for the mainnet deployments.

use crate::types::{ChainId, Domain};

/// A known chain and the domain the burn/mint protocol assigns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainEntry {
    /// Human readable name of the chain.
    pub name: &'static str,

    /// The chain's native id.
    pub chain_id: ChainId,

    /// The burn/mint domain.
    pub domain: Domain,
}

/// The chains supported by the burn/mint protocol.
pub const BURN_MINT_DOMAINS: &[DomainEntry] = &[
    DomainEntry {
        name: "ethereum",
        chain_id: 1,
        domain: 0,
    },
    DomainEntry {
        name: "avalanche",
        chain_id: 43114,
        domain: 1,
    },
    DomainEntry {
        name: "optimism",
        chain_id: 10,
        domain: 2,
    },
    DomainEntry {
        name: "arbitrum",
        chain_id: 42161,
        domain: 3,
    },
    DomainEntry {
        name: "base",
        chain_id: 8453,
        domain: 6,
    },
    DomainEntry {
        name: "polygon",
        chain_id: 137,
        domain: 7,
    },
];

/// Returns the burn/mint domain of a chain, if the chain is supported.
pub fn burn_mint_domain(chain_id: ChainId) -> Option<Domain> {
    BURN_MINT_DOMAINS
        .iter()
        .find(|entry| entry.chain_id == chain_id)
        .map(|entry| entry.domain)
}

/// Returns the chain id for a burn/mint domain, if the domain is known.
pub fn chain_for_burn_mint_domain(domain: Domain) -> Option<ChainId> {
    BURN_MINT_DOMAINS
        .iter()
        .find(|entry| entry.domain == domain)
        .map(|entry| entry.chain_id)
}
