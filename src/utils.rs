//! Utility functions for the on-chain intelligence agent

use ethers::types::U256;
use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};

use crate::agent::protocol::{error_codes, Response};

/// Native-token decimals for every chain the agent supports.
pub const NATIVE_DECIMALS: usize = 18;

/// Helper function to extract a required argument from a JSON object
pub fn get_required_arg<T: DeserializeOwned>(
    args: &Value,
    key: &str,
    req_id: &Value,
) -> Result<T, Response> {
    from_value(args.get(key).cloned().unwrap_or(Value::Null)).map_err(|_| {
        Response::error(
            req_id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Missing or invalid required argument: '{}'", key),
        )
    })
}

/// Checks for `0x` followed by exactly 40 hex digits.
pub fn is_hex_address(input: &str) -> bool {
    match input.strip_prefix("0x") {
        Some(digits) => digits.len() == 40 && hex::decode(digits).is_ok(),
        None => false,
    }
}

/// Render a wei amount as an exact decimal with 18 fractional digits.
pub fn format_wei(wei: U256) -> String {
    let scale = U256::exp10(NATIVE_DECIMALS);
    let (whole, frac) = wei.div_mod(scale);
    format!("{}.{:0>width$}", whole, frac.to_string(), width = NATIVE_DECIMALS)
}

/// `printf("%.*g")`-style formatting: `precision` significant digits,
/// trailing zeros dropped, exponent form for very large or small values.
pub fn format_significant(value: f64, precision: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let precision = precision.max(1);

    // Rounding to the requested digits first gives the exponent the
    // rounded value actually has (999999.5 -> 1e+06).
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
