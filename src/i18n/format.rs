//! printf-style template formatting.
//!
//! Supported conversions: `%s %S %d %x %X %o %f %e %E %c %C %b %B %n %%`,
//! with explicit (`%2$s`) and relative (`%<s`) argument indices, the flags
//! `- 0 + space , #`, width and precision. Arguments beyond those the template
//! consumes are ignored.

use std::fmt;

use thiserror::Error;

/// Template/argument mismatch. Always surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format specifier '{specifier}' refers to missing argument #{position}")]
    MissingArgument { specifier: String, position: usize },

    #[error("format specifier '{specifier}' cannot format {found} argument #{position}")]
    Mismatch {
        specifier: String,
        position: usize,
        found: &'static str,
    },

    #[error("unknown format conversion '{0}'")]
    UnknownConversion(String),

    #[error("format specifier '{0}' requires a width")]
    MissingWidth(String),

    #[error("format specifier '{0}' has a width or precision above 65535")]
    InvalidWidth(String),
}

/// Largest width or precision a specifier may request.
pub const MAX_WIDTH: usize = u16::MAX as usize;

/// A positional format argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Char(char),
}

impl Arg {
    fn kind(&self) -> &'static str {
        match self {
            Arg::Str(_) => "string",
            Arg::Int(_) | Arg::UInt(_) => "integer",
            Arg::Float(_) => "float",
            Arg::Bool(_) => "boolean",
            Arg::Char(_) => "char",
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.write_str(s),
            Arg::Int(v) => write!(f, "{}", v),
            Arg::UInt(v) => write!(f, "{}", v),
            Arg::Float(v) if v.is_nan() => f.write_str("NaN"),
            Arg::Float(v) if v.is_infinite() => {
                f.write_str(if *v > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Arg::Float(v) => f.write_str(&float_text(*v)),
            Arg::Bool(v) => write!(f, "{}", v),
            Arg::Char(c) => write!(f, "{}", c),
        }
    }
}

/// Shortest round-trip text in the same shape as Java's `Double.toString`:
/// plain decimal for magnitudes in `[1e-3, 1e7)`, otherwise `d.dddE<exp>`.
fn float_text(v: f64) -> String {
    let magnitude = v.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{:?}", v);
    }
    let sci = format!("{:e}", v);
    match sci.split_once('e') {
        Some((mantissa, exp)) if mantissa.contains('.') => format!("{}E{}", mantissa, exp),
        Some((mantissa, exp)) => format!("{}.0E{}", mantissa, exp),
        None => sci,
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Str(value.clone())
    }
}

macro_rules! signed_arg {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(value: $t) -> Self {
                Arg::Int(value as i64)
            }
        })*
    };
}

macro_rules! unsigned_arg {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(value: $t) -> Self {
                Arg::UInt(value as u64)
            }
        })*
    };
}

signed_arg!(i8, i16, i32, i64, isize);
unsigned_arg!(u8, u16, u32, u64, usize);

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::Float(value as f64)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

/// Build a `Vec<Arg>` from heterogeneous values.
///
/// ```
/// use message_keys::args;
/// use message_keys::i18n::Arg;
///
/// assert_eq!(args!["Ann", 3], vec![Arg::Str("Ann".into()), Arg::Int(3)]);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::i18n::Arg::from($arg)),*]
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgRef {
    Next,
    Explicit(usize),
    Previous,
}

#[derive(Debug, Default, Clone, Copy)]
struct Flags {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    group: bool,
    alternate: bool,
}

#[derive(Debug)]
struct Spec<'a> {
    text: &'a str,
    arg_ref: ArgRef,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

impl<'a> Spec<'a> {
    /// Parse the specifier at the start of `s` (which begins with `%`).
    fn parse(s: &'a str) -> Result<Spec<'a>, FormatError> {
        let bytes = s.as_bytes();
        let mut i = 1;

        let mut arg_ref = ArgRef::Next;
        let digits = scan_digits(bytes, i);
        if digits > i && bytes.get(digits) == Some(&b'$') {
            let n: usize = s[i..digits]
                .parse()
                .map_err(|_| FormatError::UnknownConversion(s[..=digits].to_string()))?;
            if n == 0 {
                return Err(FormatError::UnknownConversion(s[..=digits].to_string()));
            }
            arg_ref = ArgRef::Explicit(n - 1);
            i = digits + 1;
        }

        let mut flags = Flags::default();
        while let Some(&b) = bytes.get(i) {
            match b {
                b'-' => flags.left = true,
                b'0' => flags.zero = true,
                b'+' => flags.plus = true,
                b' ' => flags.space = true,
                b',' => flags.group = true,
                b'#' => flags.alternate = true,
                b'<' => arg_ref = ArgRef::Previous,
                _ => break,
            }
            i += 1;
        }

        let mut width = None;
        let end = scan_digits(bytes, i);
        if end > i {
            width = Some(bounded(&s[i..end], &s[..end])?);
            i = end;
        }

        let mut precision = None;
        if bytes.get(i) == Some(&b'.') {
            let end = scan_digits(bytes, i + 1);
            if end == i + 1 {
                return Err(FormatError::UnknownConversion(s[..=i].to_string()));
            }
            precision = Some(bounded(&s[i + 1..end], &s[..end])?);
            i = end;
        }

        let conversion = match s[i..].chars().next() {
            Some(c) => c,
            None => return Err(FormatError::UnknownConversion(s.to_string())),
        };
        let text = &s[..i + conversion.len_utf8()];

        if !"sSdxXofeEcCbBn%".contains(conversion) {
            return Err(FormatError::UnknownConversion(text.to_string()));
        }
        if (flags.left || flags.zero) && width.is_none() {
            return Err(FormatError::MissingWidth(text.to_string()));
        }

        Ok(Spec {
            text,
            arg_ref,
            flags,
            width,
            precision,
            conversion,
        })
    }

    fn mismatch(&self, position: usize, arg: &Arg) -> FormatError {
        FormatError::Mismatch {
            specifier: self.text.to_string(),
            position: position + 1,
            found: arg.kind(),
        }
    }

    fn render(&self, position: usize, arg: &Arg) -> Result<String, FormatError> {
        let upper = self.conversion.is_ascii_uppercase();
        let body = match self.conversion.to_ascii_lowercase() {
            's' => return Ok(self.pad_text(&self.truncate(arg.to_string()), upper)),
            'b' => {
                let value = !matches!(arg, Arg::Bool(false));
                return Ok(self.pad_text(&self.truncate(value.to_string()), upper));
            }
            'c' => {
                let c = match arg {
                    Arg::Char(c) => *c,
                    Arg::Int(v) => u32::try_from(*v)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| self.mismatch(position, arg))?,
                    Arg::UInt(v) => u32::try_from(*v)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| self.mismatch(position, arg))?,
                    _ => return Err(self.mismatch(position, arg)),
                };
                return Ok(self.pad_text(&c.to_string(), upper));
            }
            'd' => match arg {
                Arg::Int(v) => self.signed(*v < 0, group(&v.unsigned_abs().to_string(), self.flags.group)),
                Arg::UInt(v) => self.signed(false, group(&v.to_string(), self.flags.group)),
                _ => return Err(self.mismatch(position, arg)),
            },
            'x' => {
                let digits = match arg {
                    Arg::Int(v) => format!("{:x}", *v as u64),
                    Arg::UInt(v) => format!("{:x}", v),
                    _ => return Err(self.mismatch(position, arg)),
                };
                let prefix = if self.flags.alternate { "0x" } else { "" };
                (prefix.to_string(), digits)
            }
            'o' => {
                let digits = match arg {
                    Arg::Int(v) => format!("{:o}", *v as u64),
                    Arg::UInt(v) => format!("{:o}", v),
                    _ => return Err(self.mismatch(position, arg)),
                };
                let prefix = if self.flags.alternate { "0" } else { "" };
                (prefix.to_string(), digits)
            }
            'f' | 'e' => {
                let v = match arg {
                    Arg::Float(v) => *v,
                    _ => return Err(self.mismatch(position, arg)),
                };
                if !v.is_finite() {
                    let text = if v.is_nan() {
                        "NaN".to_string()
                    } else if v > 0.0 {
                        self.sign_prefix(false) + "Infinity"
                    } else {
                        "-Infinity".to_string()
                    };
                    return Ok(self.pad_text(&text, upper));
                }
                let precision = self.precision.unwrap_or(6);
                let digits = if self.conversion.eq_ignore_ascii_case(&'f') {
                    let fixed = format!("{:.*}", precision, v.abs());
                    match fixed.split_once('.') {
                        Some((int, frac)) => format!("{}.{}", group(int, self.flags.group), frac),
                        None => group(&fixed, self.flags.group),
                    }
                } else {
                    scientific(v.abs(), precision)
                };
                self.signed(v.is_sign_negative() && v != 0.0, digits)
            }
            _ => return Err(FormatError::UnknownConversion(self.text.to_string())),
        };

        let (prefix, digits) = body;
        let text = self.pad_number(&prefix, &digits);
        Ok(if upper { text.to_uppercase() } else { text })
    }

    fn sign_prefix(&self, negative: bool) -> String {
        if negative {
            "-".to_string()
        } else if self.flags.plus {
            "+".to_string()
        } else if self.flags.space {
            " ".to_string()
        } else {
            String::new()
        }
    }

    fn signed(&self, negative: bool, digits: String) -> (String, String) {
        (self.sign_prefix(negative), digits)
    }

    fn truncate(&self, text: String) -> String {
        match self.precision {
            Some(p) => text.chars().take(p).collect(),
            None => text,
        }
    }

    fn pad_text(&self, text: &str, upper: bool) -> String {
        let text = if upper { text.to_uppercase() } else { text.to_string() };
        let len = text.chars().count();
        match self.width {
            Some(w) if w > len && self.flags.left => format!("{}{}", text, " ".repeat(w - len)),
            Some(w) if w > len => format!("{}{}", " ".repeat(w - len), text),
            _ => text,
        }
    }

    fn pad_number(&self, prefix: &str, digits: &str) -> String {
        let len = prefix.len() + digits.chars().count();
        match self.width {
            Some(w) if w > len && self.flags.zero && !self.flags.left => {
                format!("{}{}{}", prefix, "0".repeat(w - len), digits)
            }
            Some(w) if w > len && self.flags.left => {
                format!("{}{}{}", prefix, digits, " ".repeat(w - len))
            }
            Some(w) if w > len => format!("{}{}{}", " ".repeat(w - len), prefix, digits),
            _ => format!("{}{}", prefix, digits),
        }
    }
}

/// Parse a width or precision, rejecting values above [`MAX_WIDTH`].
fn bounded(digits: &str, specifier: &str) -> Result<usize, FormatError> {
    digits
        .parse::<usize>()
        .ok()
        .filter(|n| *n <= MAX_WIDTH)
        .ok_or_else(|| FormatError::InvalidWidth(specifier.to_string()))
}

fn scan_digits(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    end
}

/// Insert `,` every three digits from the right when `enabled`.
fn group(digits: &str, enabled: bool) -> String {
    if !enabled || digits.len() <= 3 {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `d.ddddde+XX` with at least two exponent digits.
fn scientific(v: f64, precision: usize) -> String {
    let formatted = format!("{:.*e}", precision, v);
    let (mantissa, exponent) = formatted
        .split_once('e')
        .unwrap_or((formatted.as_str(), "0"));
    let exp: i32 = exponent.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.abs())
}

/// Substitute `args` into `template`.
///
/// # Errors
/// Returns a [`FormatError`] when the template references a missing argument,
/// applies a conversion to an argument of the wrong kind, or contains a
/// malformed specifier.
///
/// # Example
/// ```
/// use message_keys::args;
/// use message_keys::i18n::format;
///
/// let text = format("Hi %s, you have %d messages", &args!["Ann", 3]).unwrap();
/// assert_eq!(text, "Hi Ann, you have 3 messages");
/// ```
pub fn format(template: &str, args: &[Arg]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut next = 0;
    let mut last: Option<usize> = None;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let spec = Spec::parse(&rest[pos..])?;
        rest = &rest[pos + spec.text.len()..];

        match spec.conversion {
            '%' => {
                out.push_str(&spec.pad_text("%", false));
                continue;
            }
            'n' => {
                out.push('\n');
                continue;
            }
            _ => {}
        }

        let position = match spec.arg_ref {
            ArgRef::Next => {
                next += 1;
                next - 1
            }
            ArgRef::Explicit(i) => i,
            ArgRef::Previous => last.ok_or_else(|| FormatError::MissingArgument {
                specifier: spec.text.to_string(),
                position: 0,
            })?,
        };

        let arg = args.get(position).ok_or_else(|| FormatError::MissingArgument {
            specifier: spec.text.to_string(),
            position: position + 1,
        })?;
        last = Some(position);
        out.push_str(&spec.render(position, arg)?);
    }

    out.push_str(rest);
    Ok(out)
}
