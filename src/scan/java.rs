//! Per-file Java source measurements.

use regex::Regex;
use std::sync::OnceLock;

static METHOD: OnceLock<Option<Regex>> = OnceLock::new();

const NOT_METHODS: [&str; 10] = [
    "if", "for", "while", "switch", "catch", "return", "new", "else", "synchronized", "try",
];

pub fn is_java_file(name: &str) -> bool {
    name.ends_with(".java")
}

pub fn is_test_name(name: &str) -> bool {
    name.contains("test") || name.contains("Test")
}

pub fn count_lines(contents: &str) -> u32 {
    contents.lines().count() as u32
}

/// Lines that open a method or constructor declaration.
///
/// Heuristic: an optional access modifier, optional `static`/`abstract`/
/// `final`/`void` words, an optional type, then `name(params)` on one line.
/// Statements (lines ending in `;`) and control keywords are not methods.
pub fn count_methods(contents: &str) -> u32 {
    let Some(pattern) = METHOD
        .get_or_init(|| {
            Regex::new(
                r"^(?:(?:public|private|protected) )?(?:(?:static|abstract|final|void) ?)*(?:([a-zA-Z0-9.<>, ?$\[\]]+) )?([a-zA-Z_$][a-zA-Z0-9_$]*)\(([^)]*)\)",
            )
            .ok()
        })
        .as_ref()
    else {
        return 0;
    };

    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.ends_with(';'))
        .filter(|line| {
            pattern.captures(line).is_some_and(|captures| {
                let name = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
                let type_words = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
                !NOT_METHODS.contains(&name)
                    && !type_words
                        .split_whitespace()
                        .any(|word| NOT_METHODS.contains(&word))
            })
        })
        .count() as u32
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Lexical {
    Code,
    Str,
    Char,
}

/// Lines carrying comment text.
///
/// Line comments and every line a block comment touches count once each;
/// comment markers inside string and char literals are ignored.
pub fn count_comments(contents: &str) -> u32 {
    let mut in_block = false;
    let mut count = 0;

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut commented = in_block;
        let mut state = Lexical::Code;
        let mut chars = line.chars().peekable();

        while let Some(ch) = chars.next() {
            if in_block {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    in_block = false;
                }
                continue;
            }
            match (state, ch) {
                (Lexical::Str, '\\') | (Lexical::Char, '\\') => {
                    chars.next();
                }
                (Lexical::Str, '"') | (Lexical::Char, '\'') => state = Lexical::Code,
                (Lexical::Str, _) | (Lexical::Char, _) => {}
                (Lexical::Code, '"') => state = Lexical::Str,
                (Lexical::Code, '\'') => state = Lexical::Char,
                (Lexical::Code, '/') if chars.peek() == Some(&'/') => {
                    commented = true;
                    break;
                }
                (Lexical::Code, '/') if chars.peek() == Some(&'*') => {
                    chars.next();
                    in_block = true;
                    commented = true;
                }
                (Lexical::Code, _) => {}
            }
        }

        if commented {
            count += 1;
        }
    }
    count
}
