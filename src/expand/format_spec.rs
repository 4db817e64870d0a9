//! Format specifications for `%key:spec%`
//!
//! The mini language follows the one of Python's `format()`:
//! `[[fill]align][sign][#][0][width][grouping][.precision][type]`.
//! Integers support `b c d o x X n` and the float types, floats support
//! `e E f F g G n %`, everything else is formatted as text (`s`).

use crate::config::Value;

#[derive(Debug, Clone, PartialEq)]
struct Spec {
    fill: char,
    align: Option<char>,
    sign: Option<char>,
    alternate: bool,
    zero: bool,
    width: usize,
    grouping: Option<char>,
    precision: Option<usize>,
    ty: Option<char>,
}

fn is_align(c: char) -> bool {
    matches!(c, '<' | '>' | '^' | '=')
}

fn parse_spec(spec: &str) -> Result<Spec, String> {
    let chars: Vec<char> = spec.chars().collect();
    let n = chars.len();
    let mut out = Spec {
        fill: ' ',
        align: None,
        sign: None,
        alternate: false,
        zero: false,
        width: 0,
        grouping: None,
        precision: None,
        ty: None,
    };
    let mut i = 0;

    if n >= 2 && is_align(chars[1]) {
        out.fill = chars[0];
        out.align = Some(chars[1]);
        i = 2;
    } else if n >= 1 && is_align(chars[0]) {
        out.align = Some(chars[0]);
        i = 1;
    }
    if i < n && matches!(chars[i], '+' | '-' | ' ') {
        out.sign = Some(chars[i]);
        i += 1;
    }
    if i < n && chars[i] == '#' {
        out.alternate = true;
        i += 1;
    }
    if i < n && chars[i] == '0' {
        out.zero = true;
        i += 1;
    }
    let start = i;
    while i < n && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i > start {
        let digits: String = chars[start..i].iter().collect();
        out.width = digits.parse().map_err(|_| "Too many decimal digits in format string".to_string())?;
    }
    if i < n && matches!(chars[i], ',' | '_') {
        out.grouping = Some(chars[i]);
        i += 1;
    }
    if i < n && chars[i] == '.' {
        i += 1;
        let start = i;
        while i < n && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return Err("Format specifier missing precision".to_string());
        }
        let digits: String = chars[start..i].iter().collect();
        out.precision = Some(
            digits
                .parse()
                .map_err(|_| "Too many decimal digits in format string".to_string())?,
        );
    }
    if i < n {
        out.ty = Some(chars[i]);
        i += 1;
    }
    if i != n {
        return Err("Invalid format specifier".to_string());
    }
    Ok(out)
}

/// Format `value` according to `spec`
pub fn format_with_spec(value: &Value, spec: &str) -> Result<String, String> {
    let spec = parse_spec(spec)?;
    match value {
        Value::Int(i) => format_int(*i, &spec),
        Value::Float(x) => format_float(*x, &spec),
        other => format_str(&other.to_string(), &spec),
    }
}

/// Format a text, used after a conversion
pub fn format_text(text: &str, spec: &str) -> Result<String, String> {
    format_str(text, &parse_spec(spec)?)
}

fn unknown_code(ty: char, type_name: &str) -> String {
    format!("Unknown format code '{ty}' for object of type '{type_name}'")
}

fn format_str(text: &str, spec: &Spec) -> Result<String, String> {
    if let Some(ty) = spec.ty.filter(|&t| t != 's') {
        return Err(unknown_code(ty, "str"));
    }
    if spec.sign.is_some() {
        return Err("Sign not allowed in string format specifier".to_string());
    }
    if spec.alternate {
        return Err("Alternate form (#) not allowed in string format specifier".to_string());
    }
    if let Some(sep) = spec.grouping {
        return Err(format!("Cannot specify '{sep}' with 's'."));
    }
    if spec.align == Some('=') {
        return Err("'=' alignment not allowed in string format specifier".to_string());
    }
    let body: String = match spec.precision {
        Some(p) => text.chars().take(p).collect(),
        None => text.to_string(),
    };
    Ok(pad(spec, "", &body, false))
}

fn format_int(value: i64, spec: &Spec) -> Result<String, String> {
    if matches!(spec.ty, Some('e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%')) {
        return format_float(value as f64, spec);
    }
    if spec.precision.is_some() {
        return Err("Precision not allowed in integer format specifier".to_string());
    }

    let magnitude = value.unsigned_abs();
    let (digits, prefix, group_size) = match spec.ty {
        None | Some('d') | Some('n') => (magnitude.to_string(), "", 3),
        Some('b') => (format!("{magnitude:b}"), "0b", 4),
        Some('o') => (format!("{magnitude:o}"), "0o", 4),
        Some('x') => (format!("{magnitude:x}"), "0x", 4),
        Some('X') => (format!("{magnitude:X}"), "0X", 4),
        Some('c') => {
            let c = u32::try_from(value)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| "%c arg not in range(0x110000)".to_string())?;
            return Ok(pad(spec, "", &c.to_string(), true));
        }
        Some(other) => return Err(unknown_code(other, "int")),
    };

    let digits = match spec.grouping {
        Some(',') if group_size != 3 => {
            return Err(format!("Cannot specify ',' with '{}'.", spec.ty.unwrap_or('d')));
        }
        Some(sep) => group_digits(&digits, sep, group_size),
        None => digits,
    };
    let prefix = if spec.alternate { prefix } else { "" };
    let lead = format!("{}{}", sign_str(value < 0, spec.sign), prefix);
    Ok(pad(spec, &lead, &digits, true))
}

fn format_float(value: f64, spec: &Spec) -> Result<String, String> {
    let negative = value.is_sign_negative() && !value.is_nan();
    let x = value.abs();
    let upper = matches!(spec.ty, Some('E' | 'F' | 'G'));

    let body = if !x.is_finite() {
        let name = if x.is_nan() { "nan" } else { "inf" };
        let name = if upper { name.to_uppercase() } else { name.to_string() };
        if spec.ty == Some('%') {
            format!("{name}%")
        } else {
            name
        }
    } else {
        match spec.ty {
            Some('f' | 'F') => fixed(x, spec.precision.unwrap_or(6), spec.alternate),
            Some('e' | 'E') => exponent(x, spec.precision.unwrap_or(6), upper, spec.alternate),
            Some('g' | 'G' | 'n') => general(x, spec.precision.unwrap_or(6), upper, spec.alternate, false),
            Some('%') => format!("{}%", fixed(x * 100.0, spec.precision.unwrap_or(6), spec.alternate)),
            None => match spec.precision {
                Some(p) => general(x, p, false, spec.alternate, true),
                None => format!("{x:?}"),
            },
            Some(other) => return Err(unknown_code(other, "float")),
        }
    };

    let body = match spec.grouping {
        Some(sep) if x.is_finite() => group_integer_part(&body, sep),
        _ => body,
    };
    Ok(pad(spec, sign_str(negative, spec.sign), &body, true))
}

fn fixed(x: f64, precision: usize, alternate: bool) -> String {
    let out = format!("{x:.precision$}");
    if alternate && precision == 0 {
        out + "."
    } else {
        out
    }
}

fn exponent(x: f64, precision: usize, upper: bool, alternate: bool) -> String {
    let raw = format!("{x:.precision$e}");
    let (mantissa, exp) = split_exponent(&raw);
    let mantissa = if alternate && precision == 0 {
        format!("{mantissa}.")
    } else {
        mantissa.to_string()
    };
    join_exponent(&mantissa, exp, upper)
}

fn general(x: f64, precision: usize, upper: bool, alternate: bool, min_one_decimal: bool) -> String {
    let p = precision.max(1);
    let exp = if x == 0.0 {
        0
    } else {
        let raw = format!("{x:.prec$e}", prec = p - 1);
        split_exponent(&raw).1
    };

    if -4 <= exp && exp < p as i32 {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        let mut out = format!("{x:.decimals$}");
        if !alternate {
            out = strip_zeros(&out);
        }
        if min_one_decimal && !out.contains('.') {
            out.push_str(".0");
        }
        out
    } else {
        let raw = format!("{x:.prec$e}", prec = p - 1);
        let (mantissa, exp) = split_exponent(&raw);
        let mantissa = if alternate {
            mantissa.to_string()
        } else {
            strip_zeros(mantissa)
        };
        join_exponent(&mantissa, exp, upper)
    }
}

fn split_exponent(raw: &str) -> (&str, i32) {
    match raw.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (raw, 0),
    }
}

fn join_exponent(mantissa: &str, exp: i32, upper: bool) -> String {
    let e = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exp.abs())
}

fn strip_zeros(number: &str) -> String {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        number.to_string()
    }
}

fn sign_str(negative: bool, sign: Option<char>) -> &'static str {
    match (negative, sign) {
        (true, _) => "-",
        (false, Some('+')) => "+",
        (false, Some(' ')) => " ",
        _ => "",
    }
}

fn group_digits(digits: &str, sep: char, size: usize) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / size);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % size == 0 {
            out.push(sep);
        }
        out.push(*c);
    }
    out
}

fn group_integer_part(body: &str, sep: char) -> String {
    let end = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    format!("{}{}", group_digits(&body[..end], sep, 3), &body[end..])
}

fn pad(spec: &Spec, lead: &str, body: &str, numeric: bool) -> String {
    let (fill, align) = match spec.align {
        Some(align) => (spec.fill, align),
        None if spec.zero && numeric => ('0', '='),
        None if spec.zero => ('0', '<'),
        None if numeric => (spec.fill, '>'),
        None => (spec.fill, '<'),
    };

    let len = lead.chars().count() + body.chars().count();
    if len >= spec.width {
        return format!("{lead}{body}");
    }
    let missing = spec.width - len;
    let fill_n = |n: usize| fill.to_string().repeat(n);
    match align {
        '<' => format!("{lead}{body}{}", fill_n(missing)),
        '^' => format!("{}{lead}{body}{}", fill_n(missing / 2), fill_n(missing - missing / 2)),
        '=' => format!("{lead}{}{body}", fill_n(missing)),
        _ => format!("{}{lead}{body}", fill_n(missing)),
    }
}
