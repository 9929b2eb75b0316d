// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Address validation
//!
//! An address is `0x` followed by exactly 40 hex digits once surrounding
//! whitespace is removed. Mixed-case input must also carry a valid EIP-55
//! checksum; all-lowercase and all-uppercase input is taken as is.

use std::sync::LazyLock;

use alloy_primitives::Address;
use regex::Regex;

static ADDRESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address regex is valid"));

/// Whether `input` is a well-formed address
pub fn is_valid_address(input: &str) -> bool {
    parse_address(input).is_some()
}

/// Parse `input` into an [`Address`], applying the same rules as [`is_valid_address`]
pub fn parse_address(input: &str) -> Option<Address> {
    let candidate = input.trim();
    if !ADDRESS_REGEX.is_match(candidate) {
        return None;
    }

    let digits = &candidate[2..];
    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(candidate, None).ok()
    } else {
        candidate.parse().ok()
    }
}
