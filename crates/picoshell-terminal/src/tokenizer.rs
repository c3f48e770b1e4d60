//! Quote-aware line splitting.
//!
//! Only the plain space separates tokens. A `"` opens a quoted token that
//! runs to the next `"`; the closing quote must be followed by a space or the
//! end of the line. There are no escapes inside quotes.

use picoshell_types::error::TokenizeError;

/// Split `line` into borrowed tokens, at most `max_tokens` of them.
pub fn tokenize(line: &str, max_tokens: usize) -> Result<Vec<&str>, TokenizeError> {
    if is_blank(line) {
        return Ok(Vec::new());
    }
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_quotes = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_quotes {
            if b != b'"' {
                continue;
            }
            if !matches!(bytes.get(i + 1), None | Some(b' ')) {
                return Err(TokenizeError::NoSpaceAfterQuote);
            }
            // `""` contributes nothing.
            if let Some(s) = start.take()
                && s != i
            {
                push_token(&mut tokens, &line[s..i], max_tokens)?;
            }
            in_quotes = false;
            continue;
        }

        match b {
            b' ' => {
                if let Some(s) = start.take() {
                    push_token(&mut tokens, &line[s..i], max_tokens)?;
                }
            },
            b'"' => {
                // Bare text directly before a quote is kept as its own token
                // rather than discarded.
                if let Some(s) = start.take() {
                    push_token(&mut tokens, &line[s..i], max_tokens)?;
                }
                if i + 1 >= bytes.len() {
                    return Err(TokenizeError::UnclosedQuote);
                }
                start = Some(i + 1);
                in_quotes = true;
            },
            _ => {
                if start.is_none() {
                    start = Some(i);
                }
            },
        }
    }

    if in_quotes {
        return Err(TokenizeError::UnclosedQuote);
    }
    if let Some(s) = start {
        push_token(&mut tokens, &line[s..], max_tokens)?;
    }
    Ok(tokens)
}

fn push_token<'a>(
    tokens: &mut Vec<&'a str>,
    token: &'a str,
    max_tokens: usize,
) -> Result<(), TokenizeError> {
    if tokens.len() >= max_tokens {
        return Err(TokenizeError::TooManyTokens);
    }
    tokens.push(token);
    Ok(())
}

/// True for an empty line or one made only of whitespace.
pub fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b.is_ascii_whitespace())
}
