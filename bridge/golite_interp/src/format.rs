//! Go-style `Sprint`, `Sprintln` and `Sprintf`.

use std::fmt::Write;
use std::iter::Peekable;
use std::str::Chars;

use crate::value::Value;

/// `fmt.Sprint`: spaces go between operands when neither side is a string.
pub fn sprint(args: &[Value]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 && !matches!(arg, Value::Str(_)) && !matches!(args[i - 1], Value::Str(_)) {
            out.push(' ');
        }
        let _ = write!(out, "{arg}");
    }
    out
}

/// `fmt.Sprintln`: spaces between every operand, trailing newline.
pub fn sprintln(args: &[Value]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{arg}");
    }
    out.push('\n');
    out
}

/// Go `strconv.Quote`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Widths above this render `%!(BADWIDTH)` and are ignored.
const MAX_WIDTH: usize = 1_000_000;

#[derive(Default)]
struct Spec {
    minus: bool,
    plus: bool,
    zero: bool,
    width: Option<usize>,
    bad_width: bool,
}

impl Spec {
    fn parse(chars: &mut Peekable<Chars<'_>>) -> Self {
        let mut spec = Spec::default();
        while let Some(&c) = chars.peek() {
            match c {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                '0' => spec.zero = true,
                _ => break,
            }
            chars.next();
        }
        while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
            chars.next();
            if spec.bad_width {
                continue;
            }
            let width = spec
                .width
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|w| w.checked_add(digit as usize))
                .filter(|&w| w <= MAX_WIDTH);
            spec.bad_width = width.is_none();
            spec.width = width;
        }
        spec
    }

    fn pad(&self, text: String, numeric: bool) -> String {
        let Some(width) = self.width else {
            return text;
        };
        let len = text.chars().count();
        if len >= width {
            return text;
        }
        let fill = width - len;
        if self.minus {
            return text + &" ".repeat(fill);
        }
        if self.zero && numeric {
            let (sign, digits) = match text.strip_prefix(|c| c == '-' || c == '+') {
                Some(rest) => (&text[..1], rest),
                None => ("", text.as_str()),
            };
            return format!("{sign}{}{digits}", "0".repeat(fill));
        }
        " ".repeat(fill) + &text
    }
}

/// `fmt.Sprintf` for the verbs `%v %d %s %q %t %x %c %T %%`.
///
/// Mismatched verbs render as `%!verb(type=value)`, a missing operand as
/// `%!verb(MISSING)` and leftover operands as `%!(EXTRA type=value, ...)`.
/// A width over one million renders `%!(BADWIDTH)` and the operand is
/// formatted unpadded.
pub fn sprintf(format: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut next = 0;
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let spec = Spec::parse(&mut chars);
        if spec.bad_width {
            out.push_str("%!(BADWIDTH)");
        }
        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }
        let Some(arg) = args.get(next) else {
            let _ = write!(out, "%!{verb}(MISSING)");
            continue;
        };
        next += 1;
        let (text, numeric) = format_verb(verb, arg, &spec);
        out.push_str(&spec.pad(text, numeric));
    }

    if next < args.len() {
        out.push_str("%!(EXTRA ");
        for (i, arg) in args[next..].iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}={arg}", arg.type_name());
        }
        out.push(')');
    }
    out
}

fn format_verb(verb: char, arg: &Value, spec: &Spec) -> (String, bool) {
    match (verb, arg) {
        ('v', Value::Int(n)) | ('d', Value::Int(n)) => (signed(*n, spec.plus), true),
        ('v', other) => (other.to_string(), false),
        ('s', Value::Str(s)) => (s.clone(), false),
        ('s', list @ Value::List(_)) => (list.to_string(), false),
        ('q', Value::Str(s)) => (quote(s), false),
        ('q', Value::Int(n)) => match char_of(*n) {
            Some(c) => (format!("'{c}'"), false),
            None => (bad_verb(verb, arg), false),
        },
        ('t', Value::Bool(b)) => (b.to_string(), false),
        ('x', Value::Int(n)) => {
            let hex = format!("{:x}", n.unsigned_abs());
            (if *n < 0 { format!("-{hex}") } else { hex }, true)
        }
        ('X', Value::Int(n)) => {
            let hex = format!("{:X}", n.unsigned_abs());
            (if *n < 0 { format!("-{hex}") } else { hex }, true)
        }
        ('x', Value::Str(s)) => (s.bytes().map(|b| format!("{b:02x}")).collect(), false),
        ('c', Value::Int(n)) => match char_of(*n) {
            Some(c) => (c.to_string(), false),
            None => ("\u{fffd}".to_string(), false),
        },
        ('T', other) => (go_type(other).to_string(), false),
        _ => (bad_verb(verb, arg), false),
    }
}

fn signed(n: i64, plus: bool) -> String {
    if plus && n >= 0 {
        format!("+{n}")
    } else {
        n.to_string()
    }
}

fn char_of(n: i64) -> Option<char> {
    u32::try_from(n).ok().and_then(char::from_u32)
}

fn bad_verb(verb: char, arg: &Value) -> String {
    match arg {
        Value::Nil => format!("%!{verb}(<nil>)"),
        other => format!("%!{verb}({}={other})", other.type_name()),
    }
}

fn go_type(value: &Value) -> &'static str {
    match value {
        Value::Nil => "<nil>",
        Value::List(_) => "[]interface {}",
        other => other.type_name(),
    }
}
