//! Loose value coercion (string/number/bool the way a dynamic UI layer would see them) and
//! locale-aware currency rendering.

use serde_json::Value;

/// Numeric reading of a JSON value. `None` when the value is not a number in any reading.
pub fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_numeric_str(s)?,
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => parse_numeric_str(&to_display_string(single))?,
            _ => return None,
        },
        Value::Object(_) => return None,
    };
    (!n.is_nan()).then_some(n)
}

fn parse_numeric_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Rust accepts "inf"/"nan" spellings that are not numbers here.
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    s.parse::<f64>().ok()
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Shortest round-trip form of a float, integers without a fraction.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Plain stringification: strings verbatim, arrays comma-joined, objects opaque.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Upper bound on fraction digits; schemas asking for more are not honoured.
pub const MAX_FIXED_DECIMALS: u32 = 100;

/// Fixed-point rendering. `None` when `decimals` exceeds [`MAX_FIXED_DECIMALS`].
pub fn to_fixed(n: f64, decimals: u32) -> Option<String> {
    if decimals > MAX_FIXED_DECIMALS {
        return None;
    }
    let s = format!("{:.*}", decimals as usize, n);
    // "-0.00" style output for tiny negatives collapses to positive zero.
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        Some(s[1..].to_string())
    } else {
        Some(s)
    }
}

struct LocaleFormat {
    group: &'static str,
    decimal: &'static str,
    symbol_after: bool,
}

const EN: LocaleFormat = LocaleFormat {
    group: ",",
    decimal: ".",
    symbol_after: false,
};
const CONTINENTAL: LocaleFormat = LocaleFormat {
    group: ".",
    decimal: ",",
    symbol_after: true,
};
const FRENCH: LocaleFormat = LocaleFormat {
    group: "\u{202f}",
    decimal: ",",
    symbol_after: true,
};
const NORDIC: LocaleFormat = LocaleFormat {
    group: "\u{a0}",
    decimal: ",",
    symbol_after: true,
};

fn locale_format(locale: &str) -> &'static LocaleFormat {
    let lang = locale
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    match lang.as_str() {
        "de" | "es" | "it" | "nl" | "pt" | "id" | "tr" | "da" => &CONTINENTAL,
        "fr" => &FRENCH,
        "sv" | "nb" | "no" | "fi" | "pl" | "cs" | "ru" => &NORDIC,
        _ => &EN,
    }
}

/// (symbol, minor digits) for common ISO 4217 codes.
fn currency_symbol(code: &str) -> (&str, u32) {
    match code {
        "USD" => ("$", 2),
        "EUR" => ("€", 2),
        "GBP" => ("£", 2),
        "JPY" => ("¥", 0),
        "CNY" => ("CN¥", 2),
        "INR" => ("₹", 2),
        "KRW" => ("₩", 0),
        "CAD" => ("CA$", 2),
        "AUD" => ("A$", 2),
        "BRL" => ("R$", 2),
        "MXN" => ("MX$", 2),
        "CHF" => ("CHF", 2),
        other => (other, 2),
    }
}

fn group_digits(digits: &str, sep: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(c);
    }
    out
}

/// Currency rendering for `locale` and an ISO 4217 `code`. `None` for a malformed code or a
/// non-finite amount.
pub fn format_currency(amount: f64, locale: &str, code: &str) -> Option<String> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) || !amount.is_finite() {
        return None;
    }
    let code = code.to_ascii_uppercase();
    let (symbol, minor) = currency_symbol(&code);
    let fmt = locale_format(locale);

    let fixed = to_fixed(amount.abs(), minor)?;
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut number = group_digits(int_part, fmt.group);
    if let Some(frac) = frac_part {
        number.push_str(fmt.decimal);
        number.push_str(frac);
    }

    let sign = if amount < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    let symbol_is_code = symbol.len() == 3 && symbol.chars().all(|c| c.is_ascii_uppercase());
    Some(if fmt.symbol_after {
        format!("{}{}\u{a0}{}", sign, number, symbol)
    } else if symbol_is_code {
        format!("{}{}\u{a0}{}", sign, symbol, number)
    } else {
        format!("{}{}{}", sign, symbol, number)
    })
}
