//! # Native Currency Units
//!
//! Conversion and display helpers for wei, gwei and ether denominations.
//!
//! Fee rates are carried as `u64` wei and totals as `u128` wei throughout
//! the crate; these helpers only exist at the edges (configuration and
//! logging).

/// Wei per gwei.
pub const WEI_PER_GWEI: u64 = 1_000_000_000;

/// Wei per ether.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Converts a gwei amount into wei.
#[must_use]
pub const fn gwei(amount: u64) -> u64 {
    amount * WEI_PER_GWEI
}

/// Formats a wei amount as a decimal ether string.
///
/// Trailing zeros in the fractional part are trimmed; whole amounts render
/// without a decimal point.
#[must_use]
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let frac = wei % WEI_PER_ETHER;
    if frac == 0 {
        return whole.to_string();
    }
    let mut frac_str = format!("{frac:018}");
    while frac_str.ends_with('0') {
        frac_str.pop();
    }
    format!("{whole}.{frac_str}")
}

/// Formats a wei amount as a decimal gwei string.
#[must_use]
pub fn format_gwei(wei: u64) -> String {
    let whole = wei / WEI_PER_GWEI;
    let frac = wei % WEI_PER_GWEI;
    if frac == 0 {
        return whole.to_string();
    }
    let mut frac_str = format!("{frac:09}");
    while frac_str.ends_with('0') {
        frac_str.pop();
    }
    format!("{whole}.{frac_str}")
}
