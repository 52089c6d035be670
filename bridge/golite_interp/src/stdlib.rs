//! Importable library packages: `fmt`, `strings`, `strconv`.

use crate::builtins::NativeCall;
use crate::error::{EvalResult, Fault};
use crate::format;
use crate::value::{NativeFunc, Value};

/// A named set of native functions made visible by `import "path"`.
#[derive(Clone, Copy, Debug)]
pub struct Package {
    pub path: &'static str,
    members: &'static [NativeFunc],
}

impl Package {
    pub const fn new(path: &'static str, members: &'static [NativeFunc]) -> Self {
        Package { path, members }
    }

    /// Look up `path.name`.
    pub fn member(&self, name: &str) -> Option<NativeFunc> {
        self.members
            .iter()
            .find(|func| {
                func.name
                    .strip_prefix(self.path)
                    .and_then(|rest| rest.strip_prefix('.'))
                    == Some(name)
            })
            .copied()
    }

    pub fn members(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.iter().map(|func| func.name)
    }
}

/// The packages every session installs.
pub fn symbols() -> Vec<Package> {
    vec![
        Package::new("fmt", FMT),
        Package::new("strings", STRINGS),
        Package::new("strconv", STRCONV),
    ]
}

macro_rules! natives {
    ($($name:literal => $func:path),* $(,)?) => {
        &[$(NativeFunc { name: $name, func: $func }),*]
    };
}

const FMT: &[NativeFunc] = natives![
    "fmt.Print" => fmt_print,
    "fmt.Println" => fmt_println,
    "fmt.Printf" => fmt_printf,
    "fmt.Sprint" => fmt_sprint,
    "fmt.Sprintln" => fmt_sprintln,
    "fmt.Sprintf" => fmt_sprintf,
];

const STRINGS: &[NativeFunc] = natives![
    "strings.ToUpper" => strings_to_upper,
    "strings.ToLower" => strings_to_lower,
    "strings.Repeat" => strings_repeat,
    "strings.Contains" => strings_contains,
    "strings.HasPrefix" => strings_has_prefix,
    "strings.HasSuffix" => strings_has_suffix,
    "strings.Join" => strings_join,
    "strings.Split" => strings_split,
    "strings.TrimSpace" => strings_trim_space,
];

const STRCONV: &[NativeFunc] = natives![
    "strconv.Itoa" => strconv_itoa,
    "strconv.Quote" => strconv_quote,
];

fn fmt_print(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.write(&format::sprint(&args))?;
    Ok(Value::Nil)
}

fn fmt_println(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.write(&format::sprintln(&args))?;
    Ok(Value::Nil)
}

fn fmt_printf(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.min_arity(&args, 1)?;
    let text = format::sprintf(call.str_arg(&args[0])?, &args[1..]);
    call.write(&text)?;
    Ok(Value::Nil)
}

fn fmt_sprint(_call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    Ok(Value::Str(format::sprint(&args)))
}

fn fmt_sprintln(_call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    Ok(Value::Str(format::sprintln(&args)))
}

fn fmt_sprintf(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.min_arity(&args, 1)?;
    Ok(Value::Str(format::sprintf(
        call.str_arg(&args[0])?,
        &args[1..],
    )))
}

fn strings_to_upper(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 1)?;
    Ok(Value::str(call.str_arg(&args[0])?.to_uppercase()))
}

fn strings_to_lower(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 1)?;
    Ok(Value::str(call.str_arg(&args[0])?.to_lowercase()))
}

fn strings_repeat(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 2)?;
    let s = call.str_arg(&args[0])?;
    let count = call.int_arg(&args[1])?;
    let Ok(count) = usize::try_from(count) else {
        Fault::raise("strings: negative Repeat count");
    };
    if count != 0 && s.len().checked_mul(count).is_none() {
        Fault::raise("strings: Repeat output length overflow");
    }
    Ok(Value::str(s.repeat(count)))
}

fn strings_contains(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 2)?;
    let s = call.str_arg(&args[0])?;
    Ok(Value::Bool(s.contains(call.str_arg(&args[1])?)))
}

fn strings_has_prefix(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 2)?;
    let s = call.str_arg(&args[0])?;
    Ok(Value::Bool(s.starts_with(call.str_arg(&args[1])?)))
}

fn strings_has_suffix(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 2)?;
    let s = call.str_arg(&args[0])?;
    Ok(Value::Bool(s.ends_with(call.str_arg(&args[1])?)))
}

fn strings_join(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 2)?;
    let sep = call.str_arg(&args[1])?;
    let parts = match &args[0] {
        Value::List(items) => items
            .iter()
            .map(|item| call.str_arg(item))
            .collect::<EvalResult<Vec<_>>>()?,
        Value::Nil => Vec::new(),
        other => return Err(call.type_error("[]string", other)),
    };
    Ok(Value::str(parts.join(sep)))
}

fn strings_split(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 2)?;
    let s = call.str_arg(&args[0])?;
    let sep = call.str_arg(&args[1])?;
    let parts: Vec<Value> = if sep.is_empty() {
        s.chars().map(|c| Value::str(c.to_string())).collect()
    } else {
        s.split(sep).map(Value::str).collect()
    };
    Ok(Value::list(parts))
}

fn strings_trim_space(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 1)?;
    Ok(Value::str(call.str_arg(&args[0])?.trim()))
}

fn strconv_itoa(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 1)?;
    Ok(Value::str(call.int_arg(&args[0])?.to_string()))
}

fn strconv_quote(call: &NativeCall<'_>, args: Vec<Value>) -> EvalResult<Value> {
    call.arity(&args, 1)?;
    Ok(Value::str(format::quote(call.str_arg(&args[0])?)))
}

#[cfg(test)]
mod tests;
