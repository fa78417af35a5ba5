use serde_json::Number;

/// Render a number the way a browser would put it into a form field:
/// integral values carry no fraction and exponents are written out.
pub fn format_leaf_number(number: &Number) -> String {
    if let Some(value) = number.as_u64() {
        let mut buffer = itoa::Buffer::new();
        return buffer.format(value).to_string();
    }
    if let Some(value) = number.as_i64() {
        let mut buffer = itoa::Buffer::new();
        return buffer.format(value).to_string();
    }
    match number.as_f64() {
        Some(value) => format_f64(value),
        None => number.to_string(),
    }
}

fn format_f64(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        let mut buffer = itoa::Buffer::new();
        return buffer.format(value as i64).to_string();
    }
    let mut buffer = ryu::Buffer::new();
    let raw = buffer.format_finite(value);
    if raw.contains('e') {
        expand_exponent(raw)
    } else {
        trim_fraction(raw.to_string())
    }
}

fn expand_exponent(raw: &str) -> String {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let Some((mantissa, exponent)) = unsigned.split_once('e') else {
        return raw.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return raw.to_string();
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{int_part}{frac_part}");
    let point = int_part.len() as i32 + exponent;

    let mut out = String::with_capacity(digits.len() + point.unsigned_abs() as usize + 3);
    if negative {
        out.push('-');
    }
    if point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take(point.unsigned_abs() as usize));
        out.push_str(&digits);
    } else if point as usize >= digits.len() {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take(point as usize - digits.len()));
    } else {
        let (head, tail) = digits.split_at(point as usize);
        out.push_str(head);
        out.push('.');
        out.push_str(tail);
    }
    trim_fraction(out)
}

fn trim_fraction(mut text: String) -> String {
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}
