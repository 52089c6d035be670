//! Whole-program tests through the public API.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::sync::Arc;

use golite_capture::{OutputSink, SharedBuffer, Target};
use golite_interp::{stdlib, InterpOptions, Interpreter, Value};
use pretty_assertions::assert_eq;

fn run(source: &str) -> String {
    let buf = SharedBuffer::new();
    let sink = Arc::new(OutputSink::new(Target::Buffer(buf.clone())));
    let mut interp = Interpreter::new(sink, InterpOptions::default()).unwrap();
    interp.use_symbols(stdlib::symbols()).unwrap();
    interp.evaluate(source).unwrap();
    buf.contents()
}

#[test]
fn fizzbuzz() {
    let out = run(r#"
package main

import (
    "fmt"
    "strconv"
)

func fizzbuzz(n int) string {
    if n%15 == 0 {
        return "FizzBuzz"
    } else if n%3 == 0 {
        return "Fizz"
    } else if n%5 == 0 {
        return "Buzz"
    }
    return strconv.Itoa(n)
}

func main() {
    for i := 1; i <= 15; i++ {
        fmt.Print(fizzbuzz(i), " ")
    }
    fmt.Println()
}
"#);
    assert_eq!(out, "1 2 Fizz 4 Buzz Fizz 7 8 Fizz Buzz 11 Fizz 13 14 FizzBuzz \n");
}

#[test]
fn string_processing() {
    let out = run(r#"
import (
    "fmt"
    "strings"
)

words := strings.Split("the quick brown fox", " ")
var shouted []string
for _, w := range words {
    if strings.HasPrefix(w, "b") {
        continue
    }
    shouted = append(shouted, strings.ToUpper(w))
}
fmt.Printf("%d words: %s\n", len(shouted), strings.Join(shouted, "-"))
fmt.Println(strings.Repeat("=", 5), strings.Contains("golite", "lit"))
"#);
    assert_eq!(out, "3 words: THE-QUICK-FOX\n===== true\n");
}

#[test]
fn sorting_with_nested_loops() {
    let out = run(r#"
import "fmt"

func sort(xs []int) []int {
    for i := 0; i < len(xs); i++ {
        for j := i + 1; j < len(xs); j++ {
            if xs[j] < xs[i] {
                tmp := xs[i]
                xs[i] = xs[j]
                xs[j] = tmp
            }
        }
    }
    return xs
}

fmt.Println(sort([]int{5, 2, 9, 1, 3}))
"#);
    assert_eq!(out, "[1 2 3 5 9]\n");
}

#[test]
fn sprintf_builds_values() {
    let buf = SharedBuffer::new();
    let sink = Arc::new(OutputSink::new(Target::Buffer(buf.clone())));
    let mut interp = Interpreter::new(sink, InterpOptions::default()).unwrap();
    interp.use_symbols(stdlib::symbols()).unwrap();

    let value = interp
        .evaluate(r#"import "fmt"; fmt.Sprintf("%s has %d items", "cart", 3)"#)
        .unwrap();
    assert_eq!(value, Value::str("cart has 3 items"));
    assert_eq!(buf.contents(), "");
}

#[test]
fn builtin_println_and_print() {
    let out = run("println(\"a\", 1, true)\nprint(\"b\", 2, \"\\n\")");
    assert_eq!(out, "a 1 true\nb2\n");
}
