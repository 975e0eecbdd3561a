//! Utility functions for identity generation

use bech32::Bech32m;
use uuid7::uuid7;

// mint a unique id then encode using bech32, e.g. fresh_id("user_")
pub fn fresh_id(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}
