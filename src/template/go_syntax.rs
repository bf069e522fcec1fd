//! Go `text/template` style actions rewritten into handlebars syntax.
//!
//! Bodies authored with `{{.Name}}`, `{{if .X}}...{{else}}...{{end}}`,
//! `{{range .Items}}`, `{{with .X}}`, pipelines (`{{.Name | upper}}`),
//! `$` for the root context and `{{/* comments */}}` are translated action by
//! action. Handlebars-native actions (`{{#if}}`, `{{/each}}`, `{{{raw}}}`,
//! `{{!-- --}}`, bare `{{Name}}`) are copied unchanged, so a body may mix both.
//!
//! Template variables (`$x := ...`), `define`/`template`/`block` and
//! `break`/`continue` have no handlebars counterpart and are rejected with
//! [`Error::Parse`].

use crate::error::{Error, Result};
use memchr::memmem;

const OPEN: &[u8] = b"{{";
const CLOSE: &[u8] = b"}}";

/// Block opened by a Go action and closed by `{{end}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    If,
    Range,
    With,
}

impl Block {
    fn helper(self) -> &'static str {
        match self {
            Block::If => "if",
            Block::Range => "each",
            Block::With => "with",
        }
    }
}

/// Rewrite every Go-style action in `source` into its handlebars form.
pub fn translate(source: &str) -> Result<String> {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut blocks: Vec<Block> = Vec::new();
    let mut pos = 0;

    while let Some(offset) = memmem::find(&bytes[pos..], OPEN) {
        let start = pos + offset;
        out.push_str(&source[pos..start]);
        let inner_start = start + OPEN.len();
        let rest = &source[inner_start..];

        let end = match action_end(rest)? {
            Some(end) => end,
            None => {
                // Unterminated; the compiler reports it with a position
                out.push_str(&source[start..]);
                return Ok(out);
            },
        };

        match end {
            ActionEnd::Verbatim(len) => {
                out.push_str(&source[start..inner_start + len]);
                pos = inner_start + len;
            },
            ActionEnd::Comment {
                text,
                len,
                trim_left,
                trim_right,
            } => {
                out.push_str("{{");
                out.push_str(trim_marker(trim_left));
                out.push_str("!--");
                out.push_str(text);
                out.push_str("--");
                out.push_str(trim_marker(trim_right));
                out.push_str("}}");
                pos = inner_start + len;
            },
            ActionEnd::Action(len) => {
                let action = translate_action(&rest[..len], &mut blocks)?;
                out.push_str("{{");
                out.push_str(&action);
                out.push_str("}}");
                pos = inner_start + len + CLOSE.len();
            },
        }
    }
    out.push_str(&source[pos..]);

    if let Some(block) = blocks.last() {
        return Err(Error::Parse(format!(
            "unclosed {{{{{}}}}} action: missing {{{{end}}}}",
            go_keyword(*block)
        )));
    }
    Ok(out)
}

fn go_keyword(block: Block) -> &'static str {
    match block {
        Block::If => "if",
        Block::Range => "range",
        Block::With => "with",
    }
}

/// Where an action that starts right after `{{` ends.
enum ActionEnd<'a> {
    /// Copy `len` bytes (closing delimiter included) unchanged
    Verbatim(usize),
    /// A Go comment spanning `len` bytes, closing delimiter included
    Comment {
        text: &'a str,
        len: usize,
        trim_left: bool,
        trim_right: bool,
    },
    /// An ordinary action of `len` bytes, followed by `}}`
    Action(usize),
}

fn action_end(rest: &str) -> Result<Option<ActionEnd<'_>>> {
    let bytes = rest.as_bytes();

    // Raw output `{{{x}}}`
    if rest.starts_with('{') {
        return Ok(memmem::find(bytes, b"}}}").map(|i| ActionEnd::Verbatim(i + 3)));
    }

    // Handlebars block comment, optionally trimmed on the left
    let unmarked = rest.strip_prefix('~').unwrap_or(rest);
    if unmarked.starts_with("!--") {
        let plain = memmem::find(bytes, b"--}}").map(|i| i + 4);
        let trimmed = memmem::find(bytes, b"--~}}").map(|i| i + 5);
        let end = match (plain, trimmed) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        return Ok(end.map(ActionEnd::Verbatim));
    }

    // Go comment `{{/* ... */}}`, with optional `- ` / ` -` trim markers
    let (trim_left, unmarked) = strip_left_trim(rest);
    if let Some(comment) = unmarked.trim_start().strip_prefix("/*") {
        let Some(close) = memmem::find(comment.as_bytes(), b"*/") else {
            return Err(Error::Parse("unclosed comment".to_string()));
        };
        let text = &comment[..close];
        let after = &comment[close + 2..];
        let (trim_right, tail) = match after.strip_prefix(" -") {
            Some(tail) => (true, tail),
            None => (false, after),
        };
        if !tail.starts_with("}}") {
            return Err(Error::Parse("comment ends before closing delimiter".to_string()));
        }
        let len = rest.len() - tail.len() + CLOSE.len();
        return Ok(Some(ActionEnd::Comment {
            text,
            len,
            trim_left,
            trim_right,
        }));
    }

    Ok(memmem::find(bytes, CLOSE).map(ActionEnd::Action))
}

#[inline]
fn trim_marker(trim: bool) -> &'static str {
    if trim { "~" } else { "" }
}

/// Go's left trim marker is `-` followed by whitespace; `{{-3}}` is a number.
fn strip_left_trim(inner: &str) -> (bool, &str) {
    if let Some(rest) = inner.strip_prefix('-')
        && rest.starts_with(char::is_whitespace)
    {
        return (true, rest);
    }
    (false, inner)
}

fn strip_right_trim(inner: &str) -> (bool, &str) {
    if let Some(rest) = inner.strip_suffix('-')
        && rest.ends_with(char::is_whitespace)
    {
        return (true, rest);
    }
    (false, inner)
}

fn translate_action(inner: &str, blocks: &mut Vec<Block>) -> Result<String> {
    let (trim_left, body) = match inner.strip_prefix('~') {
        Some(body) => (true, body),
        None => strip_left_trim(inner),
    };
    let (trim_right, body) = match body.strip_suffix('~') {
        Some(body) => (true, body),
        None => strip_right_trim(body),
    };
    let l = trim_marker(trim_left);
    let r = trim_marker(trim_right);

    // Handlebars block, partial, comment and unescaped forms
    if body.starts_with(['#', '/', '^', '>', '!', '&']) {
        return Ok(format!("{}{}{}", l, body, r));
    }

    let body = body.trim();
    let (keyword, args) = match body.split_once(char::is_whitespace) {
        Some((keyword, args)) => (keyword, args.trim()),
        None => (body, ""),
    };

    match keyword {
        "if" | "range" | "with" => {
            let block = match keyword {
                "if" => Block::If,
                "range" => Block::Range,
                _ => Block::With,
            };
            let param = block_param(keyword, args)?;
            blocks.push(block);
            Ok(format!("{}#{} {}{}", l, block.helper(), param, r))
        },
        "else" => {
            if args.is_empty() {
                return Ok(format!("{}else{}", l, r));
            }
            match args.split_once(char::is_whitespace) {
                Some(("if", condition)) => {
                    let param = block_param("else if", condition.trim())?;
                    Ok(format!("{}else if {}{}", l, param, r))
                },
                _ => Err(Error::Parse(format!("unsupported action: {{{{{}}}}}", body))),
            }
        },
        "end" if args.is_empty() => match blocks.pop() {
            Some(block) => Ok(format!("{}/{}{}", l, block.helper(), r)),
            None => Err(Error::Parse("unexpected {{end}}".to_string())),
        },
        "define" | "template" | "block" | "break" | "continue" => Err(Error::Parse(format!(
            "{{{{{}}}}} actions are not supported",
            keyword
        ))),
        _ => Ok(format!("{}{}{}", l, translate_pipeline(body)?.text, r)),
    }
}

/// Block helpers take a single parameter; compound expressions become a
/// subexpression.
fn block_param(keyword: &str, args: &str) -> Result<String> {
    if args.is_empty() {
        return Err(Error::Parse(format!("missing value for {{{{{}}}}}", keyword)));
    }
    if args.contains(":=") {
        return Err(Error::Parse(format!(
            "template variables are not supported: {{{{{} {}}}}}",
            keyword, args
        )));
    }
    Ok(translate_pipeline(args)?.as_param())
}

/// A translated expression.
struct Expr {
    text: String,
    compound: bool,
}

impl Expr {
    fn as_param(self) -> String {
        if self.compound {
            format!("({})", self.text)
        } else {
            self.text
        }
    }
}

/// `a | f b | g` becomes `g (f b a)`: each stage receives the previous
/// result as its last argument.
fn translate_pipeline(body: &str) -> Result<Expr> {
    let mut previous: Option<Expr> = None;

    for stage in split_stages(body)? {
        let mut words = translate_command(stage)?;
        if words.is_empty() {
            return Err(Error::Parse(format!("empty command in pipeline: {}", body)));
        }
        if let Some(expr) = previous.take() {
            words.push(expr.as_param());
        }
        previous = Some(Expr {
            compound: words.len() > 1,
            text: words.join(" "),
        });
    }

    previous.ok_or_else(|| Error::Parse("empty action".to_string()))
}

/// Split on `|` outside string literals and parentheses.
fn split_stages(body: &str) -> Result<Vec<&str>> {
    let mut stages = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' && q == '"' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::Parse(format!("unbalanced parentheses: {}", body)))?;
            },
            '|' if depth == 0 => {
                stages.push(&body[start..i]);
                start = i + 1;
            },
            _ => {},
        }
    }

    if quote.is_some() {
        return Err(Error::Parse(format!("unterminated string: {}", body)));
    }
    if depth != 0 {
        return Err(Error::Parse(format!("unbalanced parentheses: {}", body)));
    }
    stages.push(&body[start..]);
    Ok(stages)
}

/// Translate one command (function name plus arguments, or a single operand).
fn translate_command(stage: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut chars = stage.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        match c {
            '"' => {
                let mut escaped = false;
                let mut end = None;
                chars.next();
                for (i, c) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == '"' {
                        end = Some(i);
                        break;
                    }
                }
                let end = end.ok_or_else(|| Error::Parse(format!("unterminated string: {}", stage)))?;
                words.push(stage[start..=end].to_string());
            },
            '`' => {
                chars.next();
                let end = chars
                    .by_ref()
                    .find(|&(_, c)| c == '`')
                    .map(|(i, _)| i)
                    .ok_or_else(|| Error::Parse(format!("unterminated raw string: {}", stage)))?;
                let raw = &stage[start + 1..end];
                if raw.contains(['"', '\\']) {
                    return Err(Error::Parse(format!(
                        "raw strings with quotes or backslashes are not supported: {}",
                        stage
                    )));
                }
                words.push(format!("\"{}\"", raw));
            },
            '(' => {
                let mut depth = 0usize;
                let mut end = None;
                for (i, c) in chars.by_ref() {
                    match c {
                        '(' => depth += 1,
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                end = Some(i);
                                break;
                            }
                        },
                        _ => {},
                    }
                }
                let end =
                    end.ok_or_else(|| Error::Parse(format!("unbalanced parentheses: {}", stage)))?;
                let inner = translate_pipeline(&stage[start + 1..end])?;
                words.push(format!("({})", inner.text));
            },
            _ => {
                let mut end = stage.len();
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                if end == start {
                    return Err(Error::Parse(format!("unexpected '{}' in: {}", c, stage)));
                }
                words.push(translate_operand(&stage[start..end])?);
            },
        }
    }

    // Go comparison functions under their handlebars names
    if words.len() > 1 {
        match words[0].as_str() {
            "le" => words[0] = "lte".to_string(),
            "ge" => words[0] = "gte".to_string(),
            _ => {},
        }
    }
    Ok(words)
}

fn translate_operand(word: &str) -> Result<String> {
    if word == "." {
        return Ok("this".to_string());
    }
    if word == "$" {
        return Ok("@root".to_string());
    }
    if let Some(path) = word.strip_prefix("$.") {
        return Ok(format!("@root.{}", path));
    }
    if word.starts_with('$') {
        return Err(Error::Parse(format!("template variables are not supported: {}", word)));
    }
    if word == "nil" {
        return Ok("null".to_string());
    }
    if let Some(path) = word.strip_prefix('.')
        && !path.starts_with(['.', '/'])
        && !path.starts_with(|c: char| c.is_ascii_digit())
    {
        return Ok(path.to_string());
    }
    Ok(word.to_string())
}
